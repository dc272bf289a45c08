//! Proofreading patch formats.
//!
//! Two generations exist. [`Patch`] (V1) carries one delta string per part,
//! per comment and for the description, and only edits text in place.
//! [`PatchV2`] carries structural operations per part and per comment
//! (insert before/after, delete, retype, diff) and may replace the comment
//! list wholesale.
//!
//! Part keys are 0-based indices, comment keys are 1-based, both encoded as
//! decimal strings because patches travel as JSON objects.

use super::ContentType;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::patch::parse_key;
use std::collections::{BTreeMap, HashMap};

/// Prefix that introduces a patch inside a submission issue body.
pub const PATCH_MARKER: &str = "{OCR补丁}";

/// Legacy flat patch: delta strings keyed by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    /// Part deltas keyed by 0-based part index
    #[serde(default)]
    pub parts: BTreeMap<String, String>,

    /// Comment deltas keyed by 1-based comment index
    #[serde(default)]
    pub comments: BTreeMap<String, String>,

    /// Description delta
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Patch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delta for a part.
    pub fn with_part(mut self, part_idx: usize, delta: impl Into<String>) -> Self {
        self.parts.insert(part_idx.to_string(), delta.into());
        self
    }

    /// Set the delta for a 1-based comment.
    pub fn with_comment(mut self, index: usize, delta: impl Into<String>) -> Self {
        self.comments.insert(index.to_string(), delta.into());
        self
    }

    /// Set the description delta.
    pub fn with_description(mut self, delta: impl Into<String>) -> Self {
        self.description = Some(delta.into());
        self
    }
}

/// Structural patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchV2 {
    /// Format version, always 2
    pub version: u64,

    /// Operations keyed by 0-based part index
    #[serde(default)]
    pub parts: BTreeMap<String, PartOp>,

    /// Operations keyed by 1-based comment index
    #[serde(default)]
    pub comments: BTreeMap<String, CommentOp>,

    /// Replacement comment list; when non-empty, `comments` is ignored
    #[serde(
        default,
        rename = "newComments",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub new_comments: Vec<String>,

    /// Description delta
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PatchV2 {
    /// Create an empty V2 patch.
    pub fn new() -> Self {
        Self {
            version: 2,
            parts: BTreeMap::new(),
            comments: BTreeMap::new(),
            new_comments: Vec::new(),
            description: None,
        }
    }

    /// Set the operation for a part.
    pub fn with_part(mut self, part_idx: usize, op: PartOp) -> Self {
        self.parts.insert(part_idx.to_string(), op);
        self
    }

    /// Set the operation for a 1-based comment.
    pub fn with_comment(mut self, index: usize, op: CommentOp) -> Self {
        self.comments.insert(index.to_string(), op);
        self
    }

    /// Replace the whole comment list.
    pub fn with_new_comments<I, S>(mut self, comments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.new_comments = comments.into_iter().map(Into::into).collect();
        self
    }

    /// Set the description delta.
    pub fn with_description(mut self, delta: impl Into<String>) -> Self {
        self.description = Some(delta.into());
        self
    }

    /// Part operations by original index. Keys that are not canonical
    /// decimal indices are skipped.
    pub fn part_ops(&self) -> HashMap<usize, &PartOp> {
        index_keys(&self.parts)
    }

    /// Comment operations by 1-based index.
    pub fn comment_ops(&self) -> HashMap<usize, &CommentOp> {
        index_keys(&self.comments)
    }
}

impl Default for PatchV2 {
    fn default() -> Self {
        Self::new()
    }
}

/// Operation on a single part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartOp {
    /// New content type
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,

    /// Delta against the part's text with markers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,

    /// Drop the part and its pivots
    #[serde(default, skip_serializing_if = "is_false")]
    pub delete: bool,

    /// Parts inserted before this one
    #[serde(default, rename = "insertBefore", skip_serializing_if = "Vec::is_empty")]
    pub insert_before: Vec<InsertedPart>,

    /// Parts inserted after this one
    #[serde(default, rename = "insertAfter", skip_serializing_if = "Vec::is_empty")]
    pub insert_after: Vec<InsertedPart>,
}

impl PartOp {
    /// Create an empty operation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the content type.
    pub fn retype(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Apply a text delta.
    pub fn with_diff(mut self, delta: impl Into<String>) -> Self {
        self.diff = Some(delta.into());
        self
    }

    /// Delete the part.
    pub fn deleted(mut self) -> Self {
        self.delete = true;
        self
    }

    /// Insert a part before this one.
    pub fn insert_before(mut self, content_type: ContentType, text: impl Into<String>) -> Self {
        self.insert_before.push(InsertedPart::new(content_type, text));
        self
    }

    /// Insert a part after this one.
    pub fn insert_after(mut self, content_type: ContentType, text: impl Into<String>) -> Self {
        self.insert_after.push(InsertedPart::new(content_type, text));
        self
    }
}

/// Operation on a single comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentOp {
    /// Delta against the comment text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,

    /// Drop the comment
    #[serde(default, skip_serializing_if = "is_false")]
    pub delete: bool,

    /// Comments inserted before this one
    #[serde(default, rename = "insertBefore", skip_serializing_if = "Vec::is_empty")]
    pub insert_before: Vec<InsertedComment>,

    /// Comments inserted after this one
    #[serde(default, rename = "insertAfter", skip_serializing_if = "Vec::is_empty")]
    pub insert_after: Vec<InsertedComment>,
}

impl CommentOp {
    /// Create an empty operation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a text delta.
    pub fn with_diff(mut self, delta: impl Into<String>) -> Self {
        self.diff = Some(delta.into());
        self
    }

    /// Delete the comment.
    pub fn deleted(mut self) -> Self {
        self.delete = true;
        self
    }

    /// Insert a comment before this one.
    pub fn insert_before(mut self, text: impl Into<String>) -> Self {
        self.insert_before.push(InsertedComment { text: text.into() });
        self
    }

    /// Insert a comment after this one.
    pub fn insert_after(mut self, text: impl Into<String>) -> Self {
        self.insert_after.push(InsertedComment { text: text.into() });
        self
    }
}

/// A part introduced by a patch. Its text may contain comment markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertedPart {
    /// Text with markers
    pub text: String,

    /// Content type
    #[serde(rename = "type")]
    pub content_type: ContentType,
}

impl InsertedPart {
    /// Create a new inserted part.
    pub fn new(content_type: ContentType, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            content_type,
        }
    }
}

/// A comment introduced by a patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertedComment {
    /// Comment text
    pub text: String,
}

/// A patch of either generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyPatch {
    /// Legacy flat patch
    V1(Patch),
    /// Structural patch
    V2(PatchV2),
}

impl AnyPatch {
    /// Parse a patch from JSON, detecting its generation.
    ///
    /// Objects with `"version": 2` are structural patches; objects without a
    /// version are legacy patches.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a patch from an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let version = match value.get("version") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) if n.as_u64().is_some() => n.as_u64(),
            Some(other) => {
                return Err(Error::Other(format!("Invalid patch version: {}", other)));
            }
        };

        match version {
            None => Ok(AnyPatch::V1(serde_json::from_value(value)?)),
            Some(2) => Ok(AnyPatch::V2(serde_json::from_value(value)?)),
            Some(v) => Err(Error::UnsupportedPatchVersion(v)),
        }
    }

    /// Extract the patch embedded in a submission issue body.
    ///
    /// The JSON object must directly follow [`PATCH_MARKER`]; anything after
    /// the object is ignored.
    pub fn from_issue_body(body: &str) -> Result<Self> {
        let start = body.find(PATCH_MARKER).ok_or(Error::MissingPatchMarker)?;
        let rest = &body[start + PATCH_MARKER.len()..];

        let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
        match stream.next() {
            Some(value) => Self::from_value(value?),
            None => Err(Error::Other("Empty patch after marker".into())),
        }
    }

    /// Format version number.
    pub fn version(&self) -> u64 {
        match self {
            AnyPatch::V1(_) => 1,
            AnyPatch::V2(p) => p.version,
        }
    }

    /// Serialize to JSON in the patch's own format.
    pub fn to_json(&self) -> Result<String> {
        let json = match self {
            AnyPatch::V1(p) => serde_json::to_string(p)?,
            AnyPatch::V2(p) => serde_json::to_string(p)?,
        };
        Ok(json)
    }

    /// Render as a submission issue body.
    pub fn to_issue_body(&self) -> Result<String> {
        Ok(format!("{}{}", PATCH_MARKER, self.to_json()?))
    }
}

impl From<Patch> for AnyPatch {
    fn from(patch: Patch) -> Self {
        AnyPatch::V1(patch)
    }
}

impl From<PatchV2> for AnyPatch {
    fn from(patch: PatchV2) -> Self {
        AnyPatch::V2(patch)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn index_keys<T>(ops: &BTreeMap<String, T>) -> HashMap<usize, &T> {
    ops.iter()
        .filter_map(|(key, op)| parse_key(key).map(|idx| (idx, op)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_v1() {
        let patch = AnyPatch::from_json(r#"{"parts": {"0": "=3"}, "comments": {}}"#).unwrap();
        match patch {
            AnyPatch::V1(p) => assert_eq!(p.parts.get("0").map(String::as_str), Some("=3")),
            other => panic!("expected V1, got {:?}", other),
        }
    }

    #[test]
    fn test_detect_v2() {
        let json = r#"{
            "version": 2,
            "parts": {"1": {"type": "title", "insertAfter": [{"text": "x", "type": "paragraph"}]}},
            "comments": {"2": {"delete": true}},
            "newComments": []
        }"#;
        let patch = AnyPatch::from_json(json).unwrap();
        let AnyPatch::V2(p) = patch else {
            panic!("expected V2");
        };
        let parts = p.part_ops();
        let op = parts[&1];
        assert_eq!(op.content_type, Some(ContentType::Title));
        assert_eq!(op.insert_after.len(), 1);
        let comments = p.comment_ops();
        assert!(comments[&2].delete);
        assert!(!comments.contains_key(&1));
    }

    #[test]
    fn test_non_canonical_keys_are_not_indexed() {
        let json = r#"{"version": 2, "parts": {"01": {"delete": true}, "x": {}, "10": {}}}"#;
        let AnyPatch::V2(p) = AnyPatch::from_json(json).unwrap() else {
            panic!("expected V2");
        };
        let parts = p.part_ops();
        assert_eq!(parts.len(), 1);
        assert!(parts.contains_key(&10));
    }

    #[test]
    fn test_unsupported_version() {
        let err = AnyPatch::from_json(r#"{"version": 3, "parts": {}}"#).unwrap_err();
        assert!(matches!(err, Error::UnsupportedPatchVersion(3)));
    }

    #[test]
    fn test_issue_body_roundtrip() {
        let patch: AnyPatch = PatchV2::new()
            .with_comment(1, CommentOp::new().deleted())
            .into();
        let body = format!("Please review.\n\n{}\n\nThanks", patch.to_issue_body().unwrap());

        let parsed = AnyPatch::from_issue_body(&body).unwrap();
        assert_eq!(parsed, patch);
    }

    #[test]
    fn test_issue_body_without_marker() {
        let err = AnyPatch::from_issue_body("no patch here").unwrap_err();
        assert!(matches!(err, Error::MissingPatchMarker));
    }

    #[test]
    fn test_v2_serialization_omits_defaults() {
        let patch = PatchV2::new().with_part(0, PartOp::new().retype(ContentType::Title));
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(
            json,
            r#"{"version":2,"parts":{"0":{"type":"title"}},"comments":{}}"#
        );
    }
}
