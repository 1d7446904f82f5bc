use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::response_handling::ResponseHandling;
use crate::helpers::config_helper::ConfigHelper;

/// Custom request headers as stored in the settings: either the raw JSON text
/// typed into the settings panel, or an already structured table.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum CustomHeaders {
    Raw(String),
    Structured(BTreeMap<String, serde_json::Value>),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WebhookConfig {
    pub id: String,

    #[serde(default = "ConfigHelper::default_webhook_name")]
    pub name: String,

    #[serde(default)]
    pub url: String,

    #[serde(default = "ConfigHelper::default_enabled")]
    pub enabled: bool,

    #[serde(default, alias = "excludeAttachments")]
    pub exclude_attachments: bool,

    #[serde(default, alias = "includeVariableNote")]
    pub include_variable_note: bool,

    #[serde(default, alias = "processInlineFields")]
    pub process_inline_fields: bool,

    #[serde(default = "ConfigHelper::default_response_handling", alias = "responseHandling")]
    pub response_handling: ResponseHandling,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<CustomHeaders>,

    /// Seconds to wait for the response before giving up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default, alias = "sendRenderedMarkup", alias = "sendRenderedHtml")]
    pub send_rendered_markup: bool,

    #[serde(default, alias = "convertInternalLinks")]
    pub convert_internal_links: bool,

    #[serde(default, alias = "includeRawContent")]
    pub include_raw_content: bool,
}

impl WebhookConfig {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            id: ConfigHelper::generate_webhook_id(),
            name: name.to_string(),
            url: url.to_string(),
            enabled: ConfigHelper::default_enabled(),
            exclude_attachments: false,
            include_variable_note: false,
            process_inline_fields: false,
            response_handling: ConfigHelper::default_response_handling(),
            headers: None,
            timeout: None,
            send_rendered_markup: false,
            convert_internal_links: false,
            include_raw_content: false,
        }
    }

    /// Positive timeout in seconds, if one is configured.
    pub fn effective_timeout(&self) -> Option<u64> {
        self.timeout.filter(|secs| *secs > 0)
    }
}
