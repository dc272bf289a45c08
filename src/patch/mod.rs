//! Patch application.
//!
//! Legacy patches are applied in place ([`apply_patch_v1`]); structural
//! patches produce a new document and leave the input untouched
//! ([`apply_patch_v2`]). Callers rely on the difference: v2 previews are
//! computed from the canonical document without disturbing it.

mod batch;
mod options;
mod v1;
mod v2;

pub use batch::{apply_batch_v2, BatchOutcome};
pub use options::{ApplyOptions, ErrorMode};
pub use v1::apply_patch_v1;
pub use v2::apply_patch_v2;

use crate::error::Result;
use crate::model::{AnyPatch, ParserResult};

/// Apply a patch of either generation to `result`.
///
/// A structural patch replaces `result` with the patched copy; on error
/// `result` is unchanged. A legacy patch edits `result` directly.
pub fn apply_patch(result: &mut ParserResult, patch: &AnyPatch) -> Result<()> {
    match patch {
        AnyPatch::V1(p) => apply_patch_v1(result, p),
        AnyPatch::V2(p) => {
            *result = apply_patch_v2(result, p)?;
            Ok(())
        }
    }
}

/// Parse a patch key as a decimal index.
///
/// Keys are matched textually, the way they are looked up in the JSON
/// object, so `"01"` does not name index 1.
pub(crate) fn parse_key(key: &str) -> Option<usize> {
    key.parse::<usize>()
        .ok()
        .filter(|idx| idx.to_string() == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentPart, Patch, PatchV2};

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("0"), Some(0));
        assert_eq!(parse_key("12"), Some(12));
        assert_eq!(parse_key("01"), None);
        assert_eq!(parse_key("-1"), None);
        assert_eq!(parse_key("x"), None);
    }

    #[test]
    fn test_apply_patch_dispatch() {
        let mut doc = ParserResult::new("Doc");
        doc.parts.push(ContentPart::paragraph("abc"));
        doc.description = "keep".into();

        apply_patch(&mut doc, &Patch::new().with_part(0, "=3\t+d").into()).unwrap();
        assert_eq!(doc.parts[0].text, "abcd");
        assert_eq!(doc.description, "keep");

        apply_patch(&mut doc, &PatchV2::new().into()).unwrap();
        assert_eq!(doc.parts[0].text, "abcd");
        assert_eq!(doc.description, "");
    }
}
