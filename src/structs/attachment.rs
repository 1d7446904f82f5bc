use serde::{Deserialize, Serialize};

/// An embedded file, encoded for the outbound payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub mime_type: String,
    pub size: usize,
    pub data: String,
    pub path: String,
}
