use crate::config::constants::CONTENT_TYPE_JSON;

const TEXT_TYPES: &[&str] = &[
    "text/",
    "application/json",
    "application/xml",
    "application/javascript",
    "application/ecmascript",
    "application/x-httpd-php",
    "application/x-yaml",
];

pub struct ContentTypeHelper;

impl ContentTypeHelper {
    pub fn is_json(content_type: &str) -> bool {
        content_type.to_lowercase().contains(CONTENT_TYPE_JSON)
    }

    pub fn is_text(content_type: &str) -> bool {
        let content_type = content_type.to_lowercase();
        TEXT_TYPES.iter().any(|t| content_type.contains(t))
    }
}
