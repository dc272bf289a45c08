//! Structural patch application.

use crate::delta;
use crate::error::Result;
use crate::model::{ContentPart, ContentType, ParserResult, PatchV2, Pivot};
use crate::pivot;

/// Apply a structural patch, returning the patched document.
///
/// `result` is left untouched. Parts are rebuilt by walking the original
/// parts in order, so patch keys always refer to original indices and keys
/// outside the original arrays have no effect.
///
/// For each part with an operation, `insertBefore` parts come first, then
/// the part itself unless deleted, then `insertAfter` parts. A part with a
/// `diff` is patched against its text with markers re-inserted; a part
/// without one keeps its stored text, and pivots are taken from whatever
/// markers that text contains. Parts without an operation are copied and
/// their pivots moved to the part's new index.
///
/// A non-empty `newComments` replaces the comment list and per-comment
/// operations are ignored.
///
/// The description is decoded from `patch.description` when it is a
/// non-empty delta, kept as-is when it is an empty string, and cleared when
/// it is absent.
pub fn apply_patch_v2(result: &ParserResult, patch: &PatchV2) -> Result<ParserResult> {
    let (parts, comment_pivots) = apply_parts(result, patch)?;
    let comments = apply_comments(result, patch)?;

    let description = match patch.description.as_deref() {
        None => String::new(),
        Some("") => result.description.clone(),
        Some(diff) => delta::apply(&result.description, diff)?,
    };

    log::debug!(
        "Applied v2 patch: {} -> {} part(s), {} -> {} comment(s)",
        result.parts.len(),
        parts.len(),
        result.comments.len(),
        comments.len()
    );

    Ok(ParserResult {
        title: result.title.clone(),
        authors: result.authors.clone(),
        dates: result.dates.clone(),
        is_range_date: result.is_range_date,
        parts,
        comments,
        comment_pivots,
        description,
        page_start: result.page_start,
        page_end: result.page_end,
        file_id: result.file_id.clone(),
    })
}

/// Accumulates rebuilt parts and their pivots.
struct PartBuilder {
    parts: Vec<ContentPart>,
    pivots: Vec<Pivot>,
}

impl PartBuilder {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            parts: Vec::with_capacity(capacity),
            pivots: Vec::new(),
        }
    }

    /// Push a part whose text may carry markers.
    fn push_marked(&mut self, content_type: ContentType, text: &str) {
        let (pivots, text) = pivot::extract_pivots(text, self.parts.len());
        self.pivots.extend(pivots);
        self.parts.push(ContentPart::new(content_type, text));
    }

    /// Push an untouched part, moving its pivots along.
    fn push_copied(&mut self, part: &ContentPart, pivots: impl Iterator<Item = Pivot>) {
        let new_idx = self.parts.len();
        self.pivots
            .extend(pivots.map(|p| Pivot::new(new_idx, p.offset, p.index)));
        self.parts.push(part.clone());
    }
}

fn apply_parts(
    result: &ParserResult,
    patch: &PatchV2,
) -> Result<(Vec<ContentPart>, Vec<Pivot>)> {
    let ops = patch.part_ops();
    let mut pivots_by_part: Vec<Vec<Pivot>> = vec![Vec::new(); result.parts.len()];
    for p in &result.comment_pivots {
        if let Some(bucket) = pivots_by_part.get_mut(p.part_idx) {
            bucket.push(*p);
        }
    }

    let mut builder = PartBuilder::with_capacity(result.parts.len());

    for ((idx, part), original_pivots) in result.parts.iter().enumerate().zip(pivots_by_part) {
        let Some(op) = ops.get(&idx) else {
            builder.push_copied(part, original_pivots.into_iter());
            continue;
        };

        for inserted in &op.insert_before {
            builder.push_marked(inserted.content_type, &inserted.text);
        }

        if !op.delete {
            let text = match op.diff.as_deref() {
                Some(diff) => {
                    delta::apply(&pivot::insert_pivots(&part.text, &original_pivots), diff)?
                }
                None => part.text.clone(),
            };
            builder.push_marked(op.content_type.unwrap_or(part.content_type), &text);
        }

        for inserted in &op.insert_after {
            builder.push_marked(inserted.content_type, &inserted.text);
        }
    }

    Ok((builder.parts, builder.pivots))
}

fn apply_comments(result: &ParserResult, patch: &PatchV2) -> Result<Vec<String>> {
    if !patch.new_comments.is_empty() {
        return Ok(patch.new_comments.clone());
    }

    let ops = patch.comment_ops();
    let mut comments = Vec::with_capacity(result.comments.len());
    for (j, comment) in result.comments.iter().enumerate() {
        let Some(op) = ops.get(&(j + 1)) else {
            comments.push(comment.clone());
            continue;
        };

        comments.extend(op.insert_before.iter().map(|c| c.text.clone()));
        if !op.delete {
            let text = match op.diff.as_deref() {
                Some(diff) => delta::apply(comment, diff)?,
                None => comment.clone(),
            };
            comments.push(text);
        }
        comments.extend(op.insert_after.iter().map(|c| c.text.clone()));
    }

    Ok(comments)
}
