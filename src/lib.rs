//! # archive-patch
//!
//! Structural proofreading patches for OCR-derived historical documents.
//!
//! A document ([`ParserResult`]) is an ordered list of content parts plus a
//! list of footnote-style comments. Part text is stored without comment
//! markers; the marker positions are kept as [`Pivot`]s. Proofreaders see
//! and edit the text with markers such as `〔1〕` re-inserted, and their
//! edits come back as patches:
//!
//! - [`Patch`] (v1): one delta per part, per comment and for the
//!   description. Applied in place by [`apply_patch_v1`].
//! - [`PatchV2`]: per-part and per-comment insert/delete/retype/diff
//!   operations. Applied by [`apply_patch_v2`], which returns a new document.
//!
//! ## Quick Start
//!
//! ```no_run
//! use archive_patch::{apply_patch_v2, AnyPatch, ParserResult};
//!
//! fn main() -> archive_patch::Result<()> {
//!     let doc = archive_patch::read_document("a1b2c3d4e5.json")?;
//!     let patch = AnyPatch::from_issue_body(&std::fs::read_to_string("issue.md")?)?;
//!
//!     if let AnyPatch::V2(patch) = patch {
//!         let patched: ParserResult = apply_patch_v2(&doc, &patch)?;
//!         println!("{}", archive_patch::render::to_text(&patched, &Default::default()));
//!     }
//!     Ok(())
//! }
//! ```

pub mod delta;
pub mod error;
pub mod id;
pub mod model;
pub mod patch;
pub mod pivot;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use id::get_article_id;
pub use model::{
    AnyPatch, CommentOp, ContentPart, ContentType, InsertedComment, InsertedPart, ParserResult,
    PartOp, PartialDate, Patch, PatchV2, Pivot, PATCH_MARKER,
};
pub use patch::{
    apply_batch_v2, apply_patch, apply_patch_v1, apply_patch_v2, ApplyOptions, BatchOutcome,
    ErrorMode,
};
pub use pivot::{extract_pivots, insert_pivots};
pub use render::{JsonFormat, RenderOptions};

use std::path::Path;

/// Read a document from a JSON file.
///
/// # Example
///
/// ```no_run
/// let doc = archive_patch::read_document("a1b2c3d4e5.json").unwrap();
/// println!("{} parts", doc.part_count());
/// ```
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<ParserResult> {
    let json = std::fs::read_to_string(path)?;
    ParserResult::from_json(&json)
}

/// Read a patch of either generation from a file.
///
/// The file may hold bare patch JSON or a submission issue body carrying
/// the [`PATCH_MARKER`] prefix.
pub fn read_patch<P: AsRef<Path>>(path: P) -> Result<AnyPatch> {
    let content = std::fs::read_to_string(path)?;
    if content.contains(PATCH_MARKER) {
        AnyPatch::from_issue_body(&content)
    } else {
        AnyPatch::from_json(&content)
    }
}

/// Apply a JSON patch to a JSON document and return the patched document.
///
/// Legacy patches are applied to a private copy, so neither input is
/// affected.
pub fn apply_patch_json(document: &str, patch: &str) -> Result<ParserResult> {
    let mut doc = ParserResult::from_json(document)?;
    let patch = AnyPatch::from_json(patch)?;
    apply_patch(&mut doc, &patch)?;
    Ok(doc)
}
