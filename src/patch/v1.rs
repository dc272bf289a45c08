//! Legacy patch application.

use super::parse_key;
use crate::delta;
use crate::error::Result;
use crate::model::{ParserResult, Patch};
use crate::pivot;

/// Apply a legacy patch to `result` in place.
///
/// Each part delta is decoded against the part's text with its comment
/// markers re-inserted; the markers in the patched text then become the
/// part's new pivots. Comment and description deltas are decoded against
/// the stored text directly.
///
/// Parts are patched in ascending index order, so pivots of later parts are
/// appended after those of earlier ones. Keys that do not name an existing
/// part or comment are skipped. On a
/// decode error the document keeps the edits made before the failing
/// entry.
pub fn apply_patch_v1(result: &mut ParserResult, patch: &Patch) -> Result<()> {
    let mut part_diffs = Vec::with_capacity(patch.parts.len());
    for (key, diff) in &patch.parts {
        match parse_key(key).filter(|&i| i < result.parts.len()) {
            Some(idx) => part_diffs.push((idx, diff)),
            None => log::trace!(
                "Skipping part key {:?} (document has {} parts)",
                key,
                result.parts.len()
            ),
        }
    }
    part_diffs.sort_by_key(|&(idx, _)| idx);

    for (idx, diff) in part_diffs {
        let display = pivot::insert_pivots(&result.parts[idx].text, &result.pivots_for(idx));
        let patched = delta::apply(&display, diff)?;
        let (pivots, text) = pivot::extract_pivots(&patched, idx);

        result.parts[idx].text = text;
        result.comment_pivots.retain(|p| p.part_idx != idx);
        result.comment_pivots.extend(pivots);
    }

    for (key, diff) in &patch.comments {
        let Some(idx) = parse_key(key).filter(|&i| i >= 1 && i <= result.comments.len()) else {
            log::trace!(
                "Skipping comment key {:?} (document has {} comments)",
                key,
                result.comments.len()
            );
            continue;
        };

        let comment = &mut result.comments[idx - 1];
        *comment = delta::apply(comment, diff)?;
    }

    if let Some(diff) = patch.description.as_deref().filter(|d| !d.is_empty()) {
        result.description = delta::apply(&result.description, diff)?;
    }

    log::debug!(
        "Applied v1 patch: {} part(s), {} comment(s)",
        patch.parts.len(),
        patch.comments.len()
    );

    Ok(())
}
