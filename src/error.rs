//! Error types for archive-patch library.

use std::io;
use thiserror::Error;

/// Result type alias for archive-patch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading or applying patches.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A document or patch could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A delta string is malformed or does not match its base text.
    #[error("Delta error: {0}")]
    Delta(String),

    /// The patch declares a format version this library cannot apply.
    #[error("Unsupported patch version: {0}")]
    UnsupportedPatchVersion(u64),

    /// An issue body does not carry the patch marker.
    #[error("Patch marker not found in issue body")]
    MissingPatchMarker,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
