use serde::Serialize;
use serde_json::{Map, Value};

pub const KEY_CONTENT: &str = "content";
pub const KEY_FILENAME: &str = "filename";
pub const KEY_FILEPATH: &str = "filepath";
pub const KEY_TIMESTAMP: &str = "timestamp";
pub const KEY_CREATED_AT: &str = "createdAt";
pub const KEY_MODIFIED_AT: &str = "modifiedAt";
pub const KEY_ATTACHMENTS: &str = "attachments";
pub const KEY_RENDERED_HTML: &str = "renderedHtml";

/// The JSON object POSTed to a webhook. Built fresh for every send.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct OutboundPayload(Map<String, Value>);

impl OutboundPayload {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn content(&self) -> Option<&str> {
        self.0.get(KEY_CONTENT).and_then(Value::as_str)
    }

    pub fn set_rendered_html(&mut self, html: String) {
        self.0.insert(KEY_RENDERED_HTML.to_string(), Value::String(html));
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}
