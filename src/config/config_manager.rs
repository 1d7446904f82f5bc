use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::enums::response_handling::ResponseHandling;
use crate::errors::ConfigError;
use crate::helpers::config_helper::ConfigHelper;
use crate::helpers::url_helper::UrlHelper;
use crate::services::dispatch_engine::DispatchEngine;
use crate::structs::config::settings::Settings;
use crate::structs::config::webhook_config::WebhookConfig;

const SAMPLE_CONFIG: &str = r#"# post-webhook configuration

# Vault name used when converting [[links]] into obsidian:// URIs
vault_name = "My Vault"

# Vault directory used when --vault is not passed to `send`
# vault_path = "/home/user/Notes"

# Folder (inside the vault) for files received from webhooks
attachment_folder = "attachments"

[[webhooks]]
id = "webhook-sample"
name = "Sample Webhook"
url = "https://example.com/webhook"
enabled = true
exclude_attachments = false
include_variable_note = false
process_inline_fields = true
# One of: "none", "append", "new", "overwrite", "ask"
response_handling = "append"
send_rendered_markup = false
convert_internal_links = true
include_raw_content = false
# Seconds; leave out for no limit
timeout = 30
# Raw JSON object, as typed into the plugin settings
headers = '{"Authorization": "Bearer <token>"}'
"#;

pub struct ConfigManager;

impl ConfigManager {
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_DIR_NAME))
            .ok_or(ConfigError::NoHomeDir)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn load() -> Result<Settings, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Defaults when the file does not exist yet.
    pub fn load_from(path: &Path) -> Result<Settings, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Settings::default());
        }

        log::info!("📋 Loading config from: {}", path.display());
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(settings: &Settings) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path()?;
        Self::save_to(&path, settings)?;
        Ok(path)
    }

    pub fn save_to(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(settings)?)?;
        log::debug!("💾 Saved config to {}", path.display());
        Ok(())
    }

    pub fn create_sample_config() -> Result<PathBuf, ConfigError> {
        let path = Self::config_path()?;
        Self::create_sample_config_at(&path)?;
        Ok(path)
    }

    /// Never overwrites an existing file.
    pub fn create_sample_config_at(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            )));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, SAMPLE_CONFIG)?;
        log::info!("✅ Created sample config at: {}", path.display());
        Ok(())
    }

    pub fn validate_config(settings: &Settings) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let mut ids = HashSet::new();
        for webhook in &settings.webhooks {
            if webhook.id.trim().is_empty() {
                errors.push(format!("Webhook '{}' has an empty id", webhook.name));
            } else if !ids.insert(webhook.id.as_str()) {
                errors.push(format!("Duplicate webhook id: {}", webhook.id));
            }

            if !webhook.url.is_empty() && !UrlHelper::is_valid_webhook_url(&webhook.url) {
                errors.push(format!("Webhook '{}' has an invalid URL: {}", webhook.name, webhook.url));
            }

            if let Err(e) = DispatchEngine::build_headers(webhook.headers.as_ref()) {
                errors.push(format!("Webhook '{}': {}", webhook.name, e));
            }

            if webhook.timeout == Some(0) {
                errors.push(format!("Webhook '{}' has a timeout of 0; leave it out for no limit", webhook.name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn import_plugin_json(path: &Path) -> Result<Settings, ConfigError> {
        log::info!("📥 Importing plugin settings from: {}", path.display());
        Self::parse_plugin_json(&fs::read_to_string(path)?)
    }

    /// Reads the plugin's `data.json`. Webhooks without an id get one, and the
    /// old `attachResponse` flag becomes the `append` response mode.
    pub fn parse_plugin_json(text: &str) -> Result<Settings, ConfigError> {
        let mut raw: Value = serde_json::from_str(text)?;

        if let Some(webhooks) = raw.get_mut("webhooks").and_then(Value::as_array_mut) {
            for webhook in webhooks.iter_mut().filter_map(Value::as_object_mut) {
                let has_id = webhook.get("id").and_then(Value::as_str).is_some_and(|id| !id.is_empty());
                if !has_id {
                    webhook.insert("id".into(), Value::String(ConfigHelper::generate_webhook_id()));
                }

                let attach = webhook.get("attachResponse").and_then(Value::as_bool).unwrap_or(false);
                if attach && !webhook.contains_key("responseHandling") {
                    webhook.insert("responseHandling".into(), Value::String(ResponseHandling::Append.to_string()));
                }
            }
        }

        let settings: Settings = serde_json::from_value(raw)?;
        log::info!("✅ Imported {} webhooks", settings.webhooks.len());
        Ok(settings)
    }

    pub fn add_webhook<'a>(settings: &'a mut Settings, name: &str, url: &str) -> &'a WebhookConfig {
        settings.webhooks.push(WebhookConfig::new(name, url));
        let index = settings.webhooks.len() - 1;
        &settings.webhooks[index]
    }

    /// Removes by id or name.
    pub fn remove_webhook(settings: &mut Settings, key: &str) -> Option<WebhookConfig> {
        let index = settings
            .webhooks
            .iter()
            .position(|w| w.id == key)
            .or_else(|| settings.webhooks.iter().position(|w| w.name == key))?;
        Some(settings.webhooks.remove(index))
    }
}
