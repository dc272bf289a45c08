//! Content-addressed article identifiers.
//!
//! The id depends only on a document's identifying metadata, never on its
//! body, so proofreading patches do not change it.

use crate::model::ParserResult;
use md5::{Digest, Md5};
use serde_json::json;

/// Number of hex characters kept from the digest.
pub const ARTICLE_ID_LEN: usize = 10;

/// Derive the article id of a document.
///
/// The id is the first ten hex digits of the MD5 of the compact JSON array
/// `[title, dates, is_range_date, authors, file_id]`, where dates are
/// rendered `YYYY-MM-DD` and both dates and authors are sorted, so input
/// order does not matter. A missing `file_id` hashes as `""`.
pub fn get_article_id(result: &ParserResult) -> String {
    let mut dates: Vec<String> = result.dates.iter().map(|d| d.normalized()).collect();
    dates.sort();

    let mut authors: Vec<&str> = result.authors.iter().map(String::as_str).collect();
    authors.sort();

    let canonical = json!([
        result.title,
        dates,
        result.is_range_date,
        authors,
        result.file_id.as_deref().unwrap_or(""),
    ]);

    let digest = Md5::digest(canonical.to_string().as_bytes());
    let mut id = format!("{:x}", digest);
    id.truncate(ARTICLE_ID_LEN);
    id
}
