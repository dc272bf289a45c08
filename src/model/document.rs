//! Document-level types.

use super::ContentPart;
use crate::error::Result;
use crate::pivot;
use serde::{Deserialize, Serialize};

/// A parsed document as produced by the OCR ingestion pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParserResult {
    /// Document title
    pub title: String,

    /// Authors in source order
    #[serde(default)]
    pub authors: Vec<String>,

    /// Publication dates (a list, or a two-element range)
    #[serde(default)]
    pub dates: Vec<PartialDate>,

    /// Whether `dates` is an inclusive range rather than a discrete list
    #[serde(default)]
    pub is_range_date: bool,

    /// Body parts in reading order
    #[serde(default)]
    pub parts: Vec<ContentPart>,

    /// Annotation texts; referenced from part text as 1-based markers
    #[serde(default)]
    pub comments: Vec<String>,

    /// Bindings between part text positions and comments
    #[serde(default)]
    pub comment_pivots: Vec<Pivot>,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// First source page
    #[serde(default)]
    pub page_start: u32,

    /// Last source page
    #[serde(default)]
    pub page_end: u32,

    /// Source file identifier, when one document file holds several articles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

impl ParserResult {
    /// Create a new empty document with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Get the number of parts.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Get a comment by its 1-based marker number.
    pub fn comment(&self, index: usize) -> Option<&str> {
        if index == 0 {
            return None;
        }
        self.comments.get(index - 1).map(String::as_str)
    }

    /// Pivots bound to the given part, in stored order.
    pub fn pivots_for(&self, part_idx: usize) -> Vec<Pivot> {
        self.comment_pivots
            .iter()
            .filter(|p| p.part_idx == part_idx)
            .copied()
            .collect()
    }

    /// Text of a part with its comment markers re-inserted.
    pub fn display_text(&self, part_idx: usize) -> Option<String> {
        let part = self.parts.get(part_idx)?;
        Some(pivot::insert_pivots(&part.text, &self.pivots_for(part_idx)))
    }

    /// Content-addressed identifier of this document.
    pub fn article_id(&self) -> String {
        crate::id::get_article_id(self)
    }
}

/// A date where any component may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDate {
    /// Year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,

    /// Month (1-12)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,

    /// Day of month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

impl PartialDate {
    /// Create a fully specified date.
    pub fn ymd(year: u32, month: u32, day: u32) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            day: Some(day),
        }
    }

    /// Create a year-only date.
    pub fn year(year: u32) -> Self {
        Self {
            year: Some(year),
            ..Default::default()
        }
    }

    /// Render as `YYYY-MM-DD`, with unknown components zeroed.
    pub fn normalized(&self) -> String {
        let year = match self.year {
            Some(y) => y.to_string(),
            None => "0000".to_string(),
        };
        format!(
            "{}-{:02}-{:02}",
            year,
            self.month.unwrap_or(0),
            self.day.unwrap_or(0)
        )
    }
}

/// Position of a removed comment marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pivot {
    /// Index of the part the marker belongs to
    pub part_idx: usize,

    /// UTF-16 offset into the marker-free part text
    pub offset: usize,

    /// 1-based comment number
    pub index: usize,
}

impl Pivot {
    /// Create a new pivot.
    pub fn new(part_idx: usize, offset: usize, index: usize) -> Self {
        Self {
            part_idx,
            offset,
            index,
        }
    }
}
