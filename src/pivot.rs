//! Comment marker extraction and re-insertion.
//!
//! Part text shown to proofreaders carries inline markers such as `〔3〕`
//! pointing at the third comment. Stored part text is marker-free; the
//! marker positions live in [`Pivot`] records instead.
//!
//! Offsets are counted in UTF-16 code units of the marker-free text, the
//! way the proofreading front end measures them.

use crate::model::Pivot;
use once_cell::sync::Lazy;
use regex::Regex;

/// Opening bracket of a comment marker (U+3014).
pub const MARKER_OPEN: char = '〔';

/// Closing bracket of a comment marker (U+3015).
pub const MARKER_CLOSE: char = '〕';

static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"〔([0-9]+)〕").unwrap());

/// Render the marker for a 1-based comment number.
pub fn format_marker(index: usize) -> String {
    format!("{}{}{}", MARKER_OPEN, index, MARKER_CLOSE)
}

/// Strip comment markers from `text`, recording where each one was.
///
/// Markers are removed one at a time, always the leftmost remaining one, so
/// every recorded offset is the marker's position in the final marker-free
/// text. Scanning stops at the first marker whose number cannot be
/// represented; that marker and everything after it is left in place.
pub fn extract_pivots(text: &str, part_idx: usize) -> (Vec<Pivot>, String) {
    let mut pivots = Vec::new();
    let mut text = text.to_string();

    loop {
        let (range, parsed) = {
            let Some(caps) = MARKER_RE.captures(&text) else {
                break;
            };
            let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            (whole.range(), digits.as_str().parse::<usize>())
        };
        let Ok(index) = parsed else {
            log::trace!("Marker number out of range at byte {}", range.start);
            break;
        };

        let offset = text[..range.start].encode_utf16().count();
        pivots.push(Pivot::new(part_idx, offset, index));
        text.replace_range(range, "");
    }

    (pivots, text)
}

/// Re-insert markers for `pivots` into marker-free `text`.
///
/// Markers are placed from the highest offset down so earlier insertions do
/// not shift later ones. Pivots sharing an offset keep their stored order.
/// Offsets past the end of the text land at the end; an offset inside a
/// surrogate pair lands after that character.
pub fn insert_pivots(text: &str, pivots: &[Pivot]) -> String {
    let mut ordered: Vec<&Pivot> = pivots.iter().collect();
    ordered.sort_by_key(|p| p.offset);

    let mut output = text.to_string();
    for pivot in ordered.into_iter().rev() {
        let at = byte_offset(&output, pivot.offset);
        output.insert_str(at, &format_marker(pivot.index));
    }
    output
}

/// Byte position of a UTF-16 offset, rounded up to the next char boundary.
fn byte_offset(text: &str, unit_offset: usize) -> usize {
    let mut units = 0;
    for (i, c) in text.char_indices() {
        if units >= unit_offset {
            return i;
        }
        units += c.len_utf16();
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_no_markers() {
        let (pivots, text) = extract_pivots("plain text", 0);
        assert!(pivots.is_empty());
        assert_eq!(text, "plain text");
    }

    #[test]
    fn test_extract_offsets_in_stripped_text() {
        let (pivots, text) = extract_pivots("ab〔1〕cd〔2〕e", 4);
        assert_eq!(text, "abcde");
        assert_eq!(pivots, vec![Pivot::new(4, 2, 1), Pivot::new(4, 4, 2)]);
    }

    #[test]
    fn test_extract_counts_units_not_bytes() {
        let (pivots, text) = extract_pivots("第一段〔1〕。", 0);
        assert_eq!(text, "第一段。");
        assert_eq!(pivots[0].offset, 3);
    }

    #[test]
    fn test_extract_adjacent_markers() {
        let (pivots, text) = extract_pivots("x〔1〕〔2〕y", 0);
        assert_eq!(text, "xy");
        assert_eq!(pivots[0].offset, 1);
        assert_eq!(pivots[1].offset, 1);
    }

    #[test]
    fn test_malformed_markers_are_left_alone() {
        let (pivots, text) = extract_pivots("a〔〕b〔12c〔3〕", 0);
        assert_eq!(text, "a〔〕b〔12c");
        assert_eq!(pivots, vec![Pivot::new(0, 8, 3)]);
    }

    #[test]
    fn test_oversized_number_stops_scan() {
        let (pivots, text) = extract_pivots("a〔1〕b〔99999999999999999999999〕c〔2〕", 0);
        assert_eq!(pivots, vec![Pivot::new(0, 1, 1)]);
        assert_eq!(text, "ab〔99999999999999999999999〕c〔2〕");
    }

    #[test]
    fn test_insert_roundtrip() {
        for original in [
            "",
            "no markers",
            "〔1〕at start",
            "at end〔1〕",
            "a〔1〕b〔2〕c〔3〕",
            "adjacent〔1〕〔2〕〔3〕here",
            "中文〔10〕注释〔11〕",
        ] {
            let (pivots, stripped) = extract_pivots(original, 0);
            assert_eq!(insert_pivots(&stripped, &pivots), original);
        }
    }

    #[test]
    fn test_insert_clamps_offset() {
        let pivots = [Pivot::new(0, 99, 1)];
        assert_eq!(insert_pivots("abc", &pivots), "abc〔1〕");
    }

    #[test]
    fn test_offsets_count_utf16_units() {
        let (pivots, text) = extract_pivots("𠮷a〔1〕b", 2);
        assert_eq!(text, "𠮷ab");
        assert_eq!(pivots, vec![Pivot::new(2, 3, 1)]);
        assert_eq!(insert_pivots(&text, &pivots), "𠮷a〔1〕b");
    }

    #[test]
    fn test_insert_inside_surrogate_pair_rounds_up() {
        let pivots = [Pivot::new(0, 1, 1)];
        assert_eq!(insert_pivots("𠮷a", &pivots), "𠮷〔1〕a");
    }
}
