use serde_json::{Map, Value};

/// Result of looking for a structured header at the start of a note.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrontmatterInfo {
    pub exists: bool,
    pub mapping: Map<String, Value>,
    /// Byte offset where the body starts.
    pub body_start: usize,
}

impl FrontmatterInfo {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn body<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.body_start..).unwrap_or_default()
    }
}
