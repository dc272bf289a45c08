//! Document and patch model types.
//!
//! A [`ParserResult`] is the canonical representation of one parsed
//! document. Parts and comments are addressed purely by position; patches
//! refer to them by their index in a specific snapshot of the arrays.

mod content;
mod document;
mod patch;

pub use content::{ContentPart, ContentType};
pub use document::{ParserResult, PartialDate, Pivot};
pub use patch::{
    AnyPatch, CommentOp, InsertedComment, InsertedPart, PartOp, Patch, PatchV2, PATCH_MARKER,
};
