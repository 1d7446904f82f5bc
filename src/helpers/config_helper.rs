use crate::config::constants::{DEFAULT_ATTACHMENT_FOLDER, DEFAULT_VAULT_NAME, DEFAULT_WEBHOOK_NAME};
use crate::enums::response_handling::ResponseHandling;

pub struct ConfigHelper;

impl ConfigHelper {
    pub fn default_enabled() -> bool {
        true
    }

    pub fn default_webhook_name() -> String {
        DEFAULT_WEBHOOK_NAME.to_string()
    }

    pub fn default_response_handling() -> ResponseHandling {
        ResponseHandling::None
    }

    pub fn default_attachment_folder() -> String {
        DEFAULT_ATTACHMENT_FOLDER.to_string()
    }

    pub fn default_vault_name() -> String {
        DEFAULT_VAULT_NAME.to_string()
    }

    pub fn generate_webhook_id() -> String {
        format!("webhook-{}", uuid::Uuid::new_v4())
    }
}
