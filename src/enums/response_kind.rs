use crate::helpers::content_type_helper::ContentTypeHelper;

/// How a response body is decoded, decided from its declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Json,
    Text,
    Binary,
}

impl ResponseKind {
    pub fn classify(content_type: &str) -> Self {
        if ContentTypeHelper::is_json(content_type) {
            Self::Json
        } else if ContentTypeHelper::is_text(content_type) {
            Self::Text
        } else {
            Self::Binary
        }
    }
}
