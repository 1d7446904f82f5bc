use serde::{Deserialize, Serialize};

use crate::helpers::config_helper::ConfigHelper;
use crate::structs::config::webhook_config::WebhookConfig;

/// Plugin-wide settings. Owned by the caller and passed into whatever needs
/// them.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "ConfigHelper::default_vault_name", alias = "vaultName")]
    pub vault_name: String,

    #[serde(default, alias = "vaultPath", skip_serializing_if = "Option::is_none")]
    pub vault_path: Option<String>,

    #[serde(default = "ConfigHelper::default_attachment_folder", alias = "attachmentFolderPath")]
    pub attachment_folder: String,

    #[serde(default)]
    pub webhooks: Vec<WebhookConfig>,
}

impl Settings {
    /// Looks a webhook up by id first, then by name.
    pub fn find_webhook(&self, key: &str) -> Option<&WebhookConfig> {
        self.webhooks
            .iter()
            .find(|w| w.id == key)
            .or_else(|| self.webhooks.iter().find(|w| w.name == key))
    }

    pub fn find_webhook_mut(&mut self, key: &str) -> Option<&mut WebhookConfig> {
        let index = self
            .webhooks
            .iter()
            .position(|w| w.id == key)
            .or_else(|| self.webhooks.iter().position(|w| w.name == key))?;
        self.webhooks.get_mut(index)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_name: ConfigHelper::default_vault_name(),
            vault_path: None,
            attachment_folder: ConfigHelper::default_attachment_folder(),
            webhooks: vec![],
        }
    }
}
