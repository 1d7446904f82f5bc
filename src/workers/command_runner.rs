use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};

use crate::config::config_manager::ConfigManager;
use crate::enums::commands::Commands;
use crate::enums::response_handling::ResponseHandling;
use crate::errors::{ConfigError, ErrorHandler, WebhookError};
use crate::logger::animated_logger::AnimatedLogger;
use crate::services::dispatch_engine::DispatchEngine;
use crate::services::fs_vault::FsVault;
use crate::services::reqwest_transport::ReqwestTransport;
use crate::services::stdin_prompt::StdinPrompt;
use crate::services::webhook_service::{Collaborators, WebhookService};
use crate::structs::config::settings::Settings;
use crate::structs::send_request::SendRequest;

pub struct CommandRunner {
    start_time: Option<Instant>,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self { start_time: None }
    }

    pub async fn run_command(&mut self, command: Commands) -> anyhow::Result<()> {
        self.start_time = Some(Instant::now());

        let result = match command {
            Commands::Init => self.init_command(),
            Commands::List => self.list_command(),
            Commands::Validate => self.validate_command(),
            Commands::Add { name, url } => self.add_command(&name, &url),
            Commands::Remove { id } => self.remove_command(&id),
            Commands::Import { path } => self.import_command(&path),
            Commands::Send { webhook, note, selection, vault } => {
                self.send_command(&webhook, &note, selection.as_deref(), vault).await
            }
            Commands::Test { webhook } => self.test_command(&webhook).await,
        };

        if let Some(start) = self.start_time {
            log::debug!("⏱️  Command completed in {:.2}s", start.elapsed().as_secs_f64());
        }

        result
    }

    fn init_command(&self) -> anyhow::Result<()> {
        log::info!("🚀 Initializing post-webhook configuration...");

        let path = ConfigManager::create_sample_config().context("Failed to create configuration")?;
        log::info!("📝 Edit {} to add your webhooks.", path.display());
        log::info!("🔧 Run 'post-webhook validate' to check your configuration.");
        Ok(())
    }

    fn list_command(&self) -> anyhow::Result<()> {
        let settings = Self::load_settings()?;

        if settings.webhooks.is_empty() {
            log::info!("⚠️ No webhooks configured.");
            log::info!("💡 Run 'post-webhook add --name <name> --url <url>' to add one.");
            return Ok(());
        }

        log::info!("📋 Configured Webhooks:");
        log::info!("{}", "=".repeat(50));
        for (i, webhook) in settings.webhooks.iter().enumerate() {
            log::info!("{}. {} {}", i + 1, if webhook.enabled { "✅" } else { "❌" }, webhook.name);
            log::info!("   🆔 {}", webhook.id);
            log::info!("   🌐 {}", if webhook.url.is_empty() { "(no URL)" } else { webhook.url.as_str() });
            log::info!("   📥 {}", webhook.response_handling.label());
        }
        log::info!("📊 Total webhooks: {}", settings.webhooks.len());
        Ok(())
    }

    fn validate_command(&self) -> anyhow::Result<()> {
        let settings = Self::load_settings()?;

        match ConfigManager::validate_config(&settings) {
            Ok(()) => {
                log::info!("✅ Configuration is valid ({} webhooks)", settings.webhooks.len());
                Ok(())
            }
            Err(errors) => {
                for error in &errors {
                    log::error!("❌ {}", error);
                }
                Err(ConfigError::Invalid(errors).into())
            }
        }
    }

    fn add_command(&self, name: &str, url: &str) -> anyhow::Result<()> {
        if !url.is_empty() {
            DispatchEngine::validate_url(url)?;
        }

        let mut settings = Self::load_settings()?;
        let id = ConfigManager::add_webhook(&mut settings, name, url).id.clone();
        let path = ConfigManager::save(&settings)?;

        log::info!("✅ Added webhook '{}' ({}) to {}", name, id, path.display());
        Ok(())
    }

    fn remove_command(&self, key: &str) -> anyhow::Result<()> {
        let mut settings = Self::load_settings()?;
        let Some(removed) = ConfigManager::remove_webhook(&mut settings, key) else {
            return Err(WebhookError::WebhookNotFound(key.to_string()).into());
        };
        ConfigManager::save(&settings)?;

        log::info!("🗑️ Removed webhook '{}' ({})", removed.name, removed.id);
        Ok(())
    }

    /// Adds the imported webhooks to the current configuration. Webhooks whose
    /// id is already configured are skipped.
    fn import_command(&self, path: &Path) -> anyhow::Result<()> {
        let mut settings = Self::load_settings()?;
        let imported = ConfigManager::import_plugin_json(path)?;

        let (added, skipped) = Self::merge_imported(&mut settings, imported);
        ConfigManager::save(&settings)?;

        log::info!("✅ Imported {} webhooks, skipped {} already configured", added, skipped);
        Ok(())
    }

    fn merge_imported(settings: &mut Settings, imported: Settings) -> (usize, usize) {
        let mut added = 0;
        let mut skipped = 0;
        for webhook in imported.webhooks {
            if settings.webhooks.iter().any(|w| w.id == webhook.id) {
                log::warn!("⚠️ Skipping '{}': id {} already exists", webhook.name, webhook.id);
                skipped += 1;
            } else {
                settings.webhooks.push(webhook);
                added += 1;
            }
        }
        (added, skipped)
    }

    async fn send_command(
        &self,
        key: &str,
        note: &str,
        selection: Option<&str>,
        vault: Option<PathBuf>,
    ) -> anyhow::Result<()> {
        let mut settings = Self::load_settings()?;
        let vault = FsVault::new(Self::vault_root(&settings, vault)?);
        let transport = ReqwestTransport::new();
        let prompt = StdinPrompt::new();

        let host = Collaborators {
            store: &vault,
            index: &vault,
            transport: &transport,
            variable_prompt: &prompt,
            mode_prompt: &prompt,
        };
        let service = WebhookService::new(host, &settings);

        let document = vault
            .document(note)
            .await
            .with_context(|| format!("Note '{}' not found in {}", note, vault.root().display()))?;
        let request = match selection {
            Some(text) => SendRequest::selection(document, text),
            None => SendRequest::note(document),
        };

        let webhook = settings
            .find_webhook_mut(key)
            .ok_or_else(|| WebhookError::WebhookNotFound(key.to_string()))?;
        if !webhook.enabled {
            bail!("Webhook '{}' is disabled", webhook.name);
        }

        // Prompts read from stdin, so no spinner while one may be shown.
        let interactive = webhook.include_variable_note || webhook.response_handling == ResponseHandling::Ask;
        let mut spinner = AnimatedLogger::new(format!("📤 Sending to {}", webhook.name));
        if !interactive {
            spinner.start();
        }

        let outcome = match service.send(webhook, request).await {
            Ok(outcome) => {
                spinner.stop(&format!("Webhook answered with status {}", outcome.response.status)).await;
                outcome
            }
            Err(e) => {
                spinner.error("Webhook failed").await;
                ErrorHandler::handle_error(&e);
                if e.is_cancellation() {
                    return Ok(());
                }
                return Err(e.into());
            }
        };

        match (&outcome.applied_mode, &outcome.created_path) {
            (ResponseHandling::None, _) => println!("{}", outcome.response.text),
            (_, Some(path)) => log::info!("📄 Response written to {}", path),
            (mode, None) => log::info!("📄 Response applied ({})", mode.label()),
        }

        if outcome.settings_changed {
            let path = ConfigManager::save(&settings)?;
            log::info!("💾 Saved response handling choice to {}", path.display());
        }
        Ok(())
    }

    async fn test_command(&self, key: &str) -> anyhow::Result<()> {
        let settings = Self::load_settings()?;
        let webhook = settings
            .find_webhook(key)
            .ok_or_else(|| WebhookError::WebhookNotFound(key.to_string()))?;

        let vault = FsVault::new(Self::vault_root(&settings, None)?);
        let transport = ReqwestTransport::new();
        let prompt = StdinPrompt::new();
        let service = WebhookService::new(
            Collaborators {
                store: &vault,
                index: &vault,
                transport: &transport,
                variable_prompt: &prompt,
                mode_prompt: &prompt,
            },
            &settings,
        );

        match service.test(webhook).await {
            Ok(status) => {
                log::info!("✅ Test webhook sent successfully (status {})", status);
                Ok(())
            }
            Err(e) => {
                ErrorHandler::handle_error(&e);
                Err(e.into())
            }
        }
    }

    fn load_settings() -> anyhow::Result<Settings> {
        ConfigManager::load().map_err(|e| {
            log::error!("❌ Failed to load configuration: {}", e);
            log::error!("💡 Run 'post-webhook init' to create a configuration file.");
            e.into()
        })
    }

    /// `--vault`, then `vault_path` from the settings, then the working directory.
    fn vault_root(settings: &Settings, vault: Option<PathBuf>) -> anyhow::Result<PathBuf> {
        let root = match vault.or_else(|| settings.vault_path.as_ref().map(PathBuf::from)) {
            Some(root) => root,
            None => std::env::current_dir()?,
        };
        if !root.is_dir() {
            bail!("Vault directory {} does not exist", root.display());
        }
        Ok(root)
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}
