use std::time::Duration;

pub const CONFIG_DIR_NAME: &str = "post-webhook";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_ATTACHMENT_FOLDER: &str = "attachments";
pub const DEFAULT_VAULT_NAME: &str = "Vault";
pub const DEFAULT_WEBHOOK_NAME: &str = "New Webhook";

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
pub const DEFAULT_BINARY_EXTENSION: &str = ".bin";

pub const EXCLUDE_ATTACHMENT_KEY: &str = "exclude-attachment";
pub const VARIABLE_NOTE_MARKER: &str = "post-webhook";
pub const MARKDOWN_EXTENSION: &str = "md";

pub const OBSIDIAN_URI_PREFIX: &str = "obsidian://vault";
pub const RESPONSE_FILE_PREFIX: &str = "webhook-response";

pub const JSON_FAILURE_MARKER: &str = "Failed to parse JSON response";
pub const TEXT_FAILURE_MARKER: &str = "Failed to get text response";
pub const BINARY_FAILURE_MARKER: &str = "Failed to process binary response";

pub const TEST_PAYLOAD_MESSAGE: &str = "Test Webhook from Obsidian";

pub fn timeout_duration(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}
