//! Content parts: the ordered body blocks of a document.

use serde::{Deserialize, Serialize};

/// Semantic role of a content part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Document title
    Title,
    /// First-level subtitle
    #[serde(alias = "subtitle1")]
    Subtitle,
    /// Second-level subtitle
    Subtitle2,
    /// Third-level subtitle
    Subtitle3,
    /// Fourth-level subtitle
    Subtitle4,
    /// Fifth-level subtitle
    Subtitle5,
    /// Body paragraph
    #[default]
    Paragraph,
    /// Quoted passage
    Quotation,
    /// Image placeholder
    Image,
    /// Image caption
    ImageDescription,
    /// Place line
    Place,
    /// Date fragment inside the body
    Subdate,
    /// Author line
    Authors,
    /// Signature
    Signature,
    /// Salutation / form of address
    Appellation,
}

impl ContentType {
    /// Check if this is the document title.
    pub fn is_title(&self) -> bool {
        matches!(self, ContentType::Title)
    }

    /// Serialized name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Title => "title",
            ContentType::Subtitle => "subtitle",
            ContentType::Subtitle2 => "subtitle2",
            ContentType::Subtitle3 => "subtitle3",
            ContentType::Subtitle4 => "subtitle4",
            ContentType::Subtitle5 => "subtitle5",
            ContentType::Paragraph => "paragraph",
            ContentType::Quotation => "quotation",
            ContentType::Image => "image",
            ContentType::ImageDescription => "image_description",
            ContentType::Place => "place",
            ContentType::Subdate => "subdate",
            ContentType::Authors => "authors",
            ContentType::Signature => "signature",
            ContentType::Appellation => "appellation",
        }
    }

    /// Get the subtitle level (1-5) or None.
    pub fn subtitle_level(&self) -> Option<u8> {
        match self {
            ContentType::Subtitle => Some(1),
            ContentType::Subtitle2 => Some(2),
            ContentType::Subtitle3 => Some(3),
            ContentType::Subtitle4 => Some(4),
            ContentType::Subtitle5 => Some(5),
            _ => None,
        }
    }
}

/// One block of a document body, addressed by its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPart {
    /// Semantic role
    #[serde(rename = "type")]
    pub content_type: ContentType,

    /// Marker-free text
    pub text: String,
}

impl ContentPart {
    /// Create a new part.
    pub fn new(content_type: ContentType, text: impl Into<String>) -> Self {
        Self {
            content_type,
            text: text.into(),
        }
    }

    /// Create a paragraph part.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(ContentType::Paragraph, text)
    }
}
