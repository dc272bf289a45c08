//! Delta codec for text transformations.
//!
//! A delta describes how to turn a base string into a target string as a
//! sequence of equal/insert/delete spans. The serialized form is the
//! diff-match-patch delta format, so deltas produced by the proofreading
//! front end decode unchanged:
//!
//! - `=N` keeps the next N units of the base
//! - `-N` drops the next N units of the base
//! - `+text` inserts URI-encoded `text`
//!
//! Tokens are separated by tabs. Lengths are counted in UTF-16 code units,
//! as the browser counts them.

use crate::error::{Error, Result};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use similar::{Algorithm, ChangeTag, TextDiff};

/// Kind of a diff span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOp {
    /// Text present in both base and target
    Equal,
    /// Text only in the target
    Insert,
    /// Text only in the base
    Delete,
}

/// A span of a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    /// Span kind
    pub op: DiffOp,
    /// Span text
    pub text: String,
}

impl Diff {
    /// Create a new span.
    pub fn new(op: DiffOp, text: impl Into<String>) -> Self {
        Self {
            op,
            text: text.into(),
        }
    }
}

/// Compute a char-level diff between `base` and `target`.
pub fn diff(base: &str, target: &str) -> Vec<Diff> {
    let text_diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(base, target);

    let mut diffs: Vec<Diff> = Vec::new();
    for change in text_diff.iter_all_changes() {
        let op = match change.tag() {
            ChangeTag::Equal => DiffOp::Equal,
            ChangeTag::Insert => DiffOp::Insert,
            ChangeTag::Delete => DiffOp::Delete,
        };
        match diffs.last_mut() {
            Some(last) if last.op == op => last.text.push_str(change.value()),
            _ => diffs.push(Diff::new(op, change.value())),
        }
    }
    diffs
}

/// Serialize diff spans as a delta string.
pub fn to_delta(diffs: &[Diff]) -> String {
    diffs
        .iter()
        .map(|d| match d.op {
            DiffOp::Insert => format!("+{}", utf8_percent_encode(&d.text, URI_ENCODE_SET)),
            DiffOp::Delete => format!("-{}", utf16_len(&d.text)),
            DiffOp::Equal => format!("={}", utf16_len(&d.text)),
        })
        .collect::<Vec<_>>()
        .join("\t")
}

/// Encode the transformation from `base` to `target` as a delta string.
pub fn encode(base: &str, target: &str) -> String {
    to_delta(&diff(base, target))
}

/// Decode a delta against its base string into diff spans.
///
/// Fails if a token is malformed, a span ends inside a surrogate pair, or
/// the delta does not cover the whole base.
pub fn decode(base: &str, delta: &str) -> Result<Vec<Diff>> {
    let units: Vec<u16> = base.encode_utf16().collect();
    let mut pointer = 0usize;
    let mut diffs = Vec::new();

    for token in delta.split('\t') {
        let mut rest = token.chars();
        let Some(op) = rest.next() else {
            continue;
        };
        let param = rest.as_str();

        match op {
            '+' => {
                let text = decode_uri(param)
                    .ok_or_else(|| Error::Delta(format!("Illegal escape in delta: {}", param)))?;
                diffs.push(Diff::new(DiffOp::Insert, text));
            }
            '-' | '=' => {
                let n: usize = param
                    .parse()
                    .map_err(|_| Error::Delta(format!("Invalid number in delta: {}", param)))?;
                let end = pointer
                    .checked_add(n)
                    .filter(|&end| end <= units.len())
                    .ok_or_else(|| {
                        Error::Delta(format!(
                            "Delta length exceeds source text length ({})",
                            units.len()
                        ))
                    })?;

                let text = String::from_utf16(&units[pointer..end]).map_err(|_| {
                    Error::Delta(format!("Delta splits a surrogate pair at {}", end))
                })?;
                pointer = end;

                let op = if op == '=' {
                    DiffOp::Equal
                } else {
                    DiffOp::Delete
                };
                diffs.push(Diff::new(op, text));
            }
            _ => {
                return Err(Error::Delta(format!(
                    "Invalid diff operation in delta: {}",
                    token
                )));
            }
        }
    }

    if pointer != units.len() {
        return Err(Error::Delta(format!(
            "Delta length ({}) does not equal source text length ({})",
            pointer,
            units.len()
        )));
    }

    Ok(diffs)
}

/// Decode a delta against `base` and return the resulting text.
pub fn apply(base: &str, delta: &str) -> Result<String> {
    Ok(decode(base, delta)?
        .into_iter()
        .filter(|d| d.op != DiffOp::Delete)
        .map(|d| d.text)
        .collect())
}

/// Bytes `encodeURI` escapes: everything except ASCII alphanumerics and
/// `;,/?:@&=+$-_.!~*'()#`. Spaces stay literal in deltas.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#')
    .remove(b' ');

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

fn decode_uri(text: &str) -> Option<String> {
    // decodeURI rejects a '%' that does not start a two-digit hex escape.
    let bytes = text.as_bytes();
    let well_formed = bytes.iter().enumerate().all(|(i, &b)| {
        b != b'%'
            || bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit)
    });
    if !well_formed {
        return None;
    }

    percent_decode_str(text)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_delta() {
        // diff-match-patch: "The quick brown fox" -> "The slow brown fox"
        let diffs = decode("The quick brown fox", "=4\t-5\t+slow\t=10").unwrap();
        assert_eq!(
            diffs,
            vec![
                Diff::new(DiffOp::Equal, "The "),
                Diff::new(DiffOp::Delete, "quick"),
                Diff::new(DiffOp::Insert, "slow"),
                Diff::new(DiffOp::Equal, " brown fox"),
            ]
        );
    }

    #[test]
    fn test_apply_percent_encoded_insert() {
        // "一" is %E4%B8%80 in UTF-8
        let result = apply("ab", "=1\t+%E4%B8%80 x\t=1").unwrap();
        assert_eq!(result, "a一 xb");
    }

    #[test]
    fn test_encode_then_apply() {
        let base = "第一段有注释〔1〕。";
        let target = "第一段落有注释〔1〕，已校对。\t100%";
        let delta = encode(base, target);
        assert_eq!(apply(base, &delta).unwrap(), target);
    }

    #[test]
    fn test_encode_identical_is_single_equal() {
        assert_eq!(encode("same", "same"), "=4");
        assert_eq!(encode("", ""), "");
    }

    #[test]
    fn test_encode_escapes_tab_and_percent() {
        let delta = encode("", "a\tb%");
        assert_eq!(delta, "+a%09b%25");
    }

    #[test]
    fn test_length_mismatch() {
        let err = decode("abc", "=2").unwrap_err();
        assert!(err.to_string().contains("Delta length (2)"));

        let err = decode("abc", "=5").unwrap_err();
        assert!(err.to_string().contains("exceeds source text length"));
    }

    #[test]
    fn test_overflowing_length_is_an_error() {
        let err = decode("abc", "=1\t=18446744073709551615").unwrap_err();
        assert!(matches!(err, Error::Delta(_)));
        assert!(err.to_string().contains("exceeds source text length"));

        assert!(decode("abc", "=18446744073709551615\t=18446744073709551615").is_err());
    }

    #[test]
    fn test_lengths_count_utf16_units() {
        // U+20BB7 is a surrogate pair in UTF-16
        assert_eq!(apply("𠮷a", "=2\t-1\t+b").unwrap(), "𠮷b");
        let delta = encode("𠮷a", "𠮷b");
        assert!(delta.starts_with("=2\t"));
        assert_eq!(apply("𠮷a", &delta).unwrap(), "𠮷b");
        assert!(decode("𠮷a", "=3").is_ok());
    }

    #[test]
    fn test_split_surrogate_pair_is_an_error() {
        let err = decode("𠮷a", "=1\t-2").unwrap_err();
        assert!(err.to_string().contains("surrogate pair"));
    }

    #[test]
    fn test_uri_reserved_chars_stay_literal() {
        assert_eq!(encode("", "a b;/?#(x)"), "+a b;/?#(x)");
        assert_eq!(encode("", "é\n"), "+%C3%A9%0A");
    }

    #[test]
    fn test_invalid_tokens() {
        assert!(decode("abc", "=x").is_err());
        assert!(decode("abc", "*3").is_err());
        assert!(decode("abc", "=3\t+%E4").is_err());
        assert!(decode("abc", "=3\t+%G1").is_err());
    }

    #[test]
    fn test_empty_delta_on_empty_base() {
        assert_eq!(apply("", "").unwrap(), "");
    }
}
