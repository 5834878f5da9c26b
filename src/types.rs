use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a resource record.
///
/// Sources may hand out integer or string ids. Two ids address the same
/// resource when their canonical keys (the `Display` form) are equal, so
/// `Int(2)` and `Str("2")` are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(i64),
    Str(String),
}

impl ResourceId {
    /// Returns the canonical lookup key for this id.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Returns `true` if this id and `other` address the same resource.
    pub fn same_as(&self, other: &ResourceId) -> bool {
        match (self, other) {
            (ResourceId::Int(a), ResourceId::Int(b)) => a == b,
            (ResourceId::Str(a), ResourceId::Str(b)) => a == b,
            (ResourceId::Int(a), ResourceId::Str(b)) | (ResourceId::Str(b), ResourceId::Int(a)) => {
                *b == a.to_string()
            }
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Int(n) => write!(f, "{}", n),
            ResourceId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(n: i64) -> Self {
        ResourceId::Int(n)
    }
}

impl From<i32> for ResourceId {
    fn from(n: i32) -> Self {
        ResourceId::Int(i64::from(n))
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        ResourceId::Str(s)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        ResourceId::Str(s.to_string())
    }
}

/// A single resource record as supplied by a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    /// Parent id. `None`, or an id that matches no record, means "no parent".
    #[serde(default)]
    pub pid: Option<ResourceId>,
    pub name: String,
    /// Snippet associated with the resource. Display only.
    #[serde(default)]
    pub code: String,
}

impl Resource {
    /// Creates a resource with empty `code`.
    pub fn new(id: impl Into<ResourceId>, pid: Option<ResourceId>, name: &str) -> Self {
        Self {
            id: id.into(),
            pid,
            name: name.to_string(),
            code: String::new(),
        }
    }

    /// Sets the associated code snippet.
    pub fn with_code(mut self, code: &str) -> Self {
        self.code = code.to_string();
        self
    }
}

/// A zero-based position in a text buffer. `character` counts UTF-16 code
/// units within the line, as editor hosts do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A half-open range between two positions on the same line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// One occurrence of a reference token in a buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMatch {
    pub line: u32,
    /// The digit run exactly as written.
    pub id_text: String,
    /// Character offset of the first digit.
    pub id_start: u32,
    /// Character offset just past the last digit.
    pub id_end: u32,
    /// Character span of the whole token, `getRes(` through `)`.
    pub token_start: u32,
    pub token_end: u32,
    /// The resource the id resolved to, if any.
    pub resource: Option<Resource>,
    /// Root-to-resource name chain, if the id resolved.
    pub path: Option<Vec<String>>,
    pub cursor_overlap: bool,
}

/// Request to show resolved path text right after a reference id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRequest {
    pub position: Position,
    pub text: String,
    pub style: AnnotationStyle,
}

/// Rendering hint for annotations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationStyle {
    #[default]
    Muted,
}

/// Text for the low-attention status display, `"<id>:<path>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub text: String,
}

/// Output of scanning a whole buffer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub annotations: Vec<AnnotationRequest>,
    pub status: Option<StatusPayload>,
    /// Resolved matches only; unknown ids are left out.
    pub matches: Vec<ReferenceMatch>,
}

/// A block of hover content tagged with the language it should be shown in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverBlock {
    pub language: String,
    pub value: String,
}

/// Hover content for a reference token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverPayload {
    pub range: Range,
    pub blocks: Vec<HoverBlock>,
}

/// A completion suggestion offered after `getRes(`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionItem {
    /// `"<id>: <path>"`.
    pub label: String,
    /// The joined path.
    pub detail: String,
    /// The id to insert.
    pub insert_text: String,
    /// Lowercased resource name.
    pub sort_text: String,
}
