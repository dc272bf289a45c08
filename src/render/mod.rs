//! Rendering module for previewing documents.

mod json;
mod options;
mod text;

pub use json::{to_json, JsonFormat};
pub use options::RenderOptions;
pub use text::to_text;
