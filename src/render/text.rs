//! Plain text preview of a document.

use crate::model::ParserResult;
use crate::pivot;

use super::RenderOptions;

/// Render a document as text, with comment markers back in place.
pub fn to_text(doc: &ParserResult, options: &RenderOptions) -> String {
    let mut blocks = Vec::with_capacity(doc.parts.len() + 2);

    if !doc.title.is_empty() {
        blocks.push(doc.title.clone());
    }

    for (idx, part) in doc.parts.iter().enumerate() {
        let text = pivot::insert_pivots(&part.text, &doc.pivots_for(idx));
        if options.show_types {
            blocks.push(format!("[{}] {}", part.content_type.as_str(), text));
        } else {
            blocks.push(text);
        }
    }

    if options.with_comments && !doc.comments.is_empty() {
        let comments = doc
            .comments
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}{}", pivot::format_marker(i + 1), c))
            .collect::<Vec<_>>()
            .join("\n");
        blocks.push(comments);
    }

    if options.with_description && !doc.description.is_empty() {
        blocks.push(doc.description.clone());
    }

    blocks.join("\n\n")
}
