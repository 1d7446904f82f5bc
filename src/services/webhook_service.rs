use serde_json::json;

use crate::config::constants::TEST_PAYLOAD_MESSAGE;
use crate::enums::response_handling::ResponseHandling;
use crate::errors::{WebhookError, WebhookResult};
use crate::services::attachment_resolver::AttachmentResolver;
use crate::services::dispatch_engine::DispatchEngine;
use crate::services::link_rewriter::LinkRewriter;
use crate::services::payload_builder::{PayloadBuilder, PayloadInput};
use crate::services::response_interpreter::ResponseInterpreter;
use crate::services::response_router::ResponseRouter;
use crate::services::variable_note_service::VariableNoteService;
use crate::structs::config::settings::Settings;
use crate::structs::config::webhook_config::WebhookConfig;
use crate::structs::outbound_payload::OutboundPayload;
use crate::structs::send_outcome::SendOutcome;
use crate::structs::send_request::SendRequest;
use crate::structs::variable_note::VariableNote;
use crate::structs::webhook_response::WebhookResponse;
use crate::traits::document_store::DocumentStore;
use crate::traits::http_transport::HttpTransport;
use crate::traits::metadata_index::MetadataIndex;
use crate::traits::prompt::{ResponseModePrompt, VariableNotePrompt};

/// The host pieces a pipeline run talks to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub store: &'a dyn DocumentStore,
    pub index: &'a dyn MetadataIndex,
    pub transport: &'a dyn HttpTransport,
    pub variable_prompt: &'a dyn VariableNotePrompt,
    pub mode_prompt: &'a dyn ResponseModePrompt,
}

/// Runs one send from document to vault mutation.
pub struct WebhookService<'a> {
    host: Collaborators<'a>,
    vault_name: String,
    attachment_folder: String,
}

impl<'a> WebhookService<'a> {
    /// Copies what it needs out of `settings` so the caller can keep a
    /// mutable borrow on the webhook being sent.
    pub fn new(host: Collaborators<'a>, settings: &Settings) -> Self {
        Self {
            host,
            vault_name: settings.vault_name.clone(),
            attachment_folder: settings.attachment_folder.clone(),
        }
    }

    pub async fn send(&self, webhook: &mut WebhookConfig, request: SendRequest) -> WebhookResult<SendOutcome> {
        DispatchEngine::preflight(webhook)?;
        log::info!("🚀 Sending {} to {}", request.document.path, webhook.name);

        let variable_note = if webhook.include_variable_note {
            Some(self.choose_variable_note().await?)
        } else {
            None
        };

        let payload = self.build_payload(webhook, &request, variable_note.as_ref()).await?;
        let raw = DispatchEngine::new(self.host.transport).dispatch(webhook, &payload).await?;

        let text = ResponseInterpreter::new(self.host.store, &self.attachment_folder)
            .interpret(&raw)
            .await;

        let (applied_mode, settings_changed) = if text.is_empty() {
            log::info!("📭 Empty response from {}; leaving {} untouched", webhook.name, request.document.path);
            (ResponseHandling::None, false)
        } else {
            self.resolve_mode(webhook).await
        };
        let created_path = ResponseRouter::new(self.host.store)
            .route(applied_mode, &request.document, request.selection.as_deref(), &text)
            .await?;

        log::info!("✅ Webhook {} answered with status {}", webhook.name, raw.status);
        Ok(SendOutcome {
            response: WebhookResponse { status: raw.status, text },
            applied_mode,
            created_path,
            settings_changed,
        })
    }

    /// Posts the fixed test payload used by the settings screen.
    pub async fn test(&self, webhook: &WebhookConfig) -> WebhookResult<u16> {
        let mut fields = serde_json::Map::new();
        fields.insert("test".into(), json!(true));
        fields.insert("timestamp".into(), json!(chrono::Utc::now().timestamp_millis()));
        fields.insert("message".into(), json!(TEST_PAYLOAD_MESSAGE));

        let raw = DispatchEngine::new(self.host.transport)
            .dispatch(webhook, &OutboundPayload::from_map(fields))
            .await?;
        log::info!("🧪 Test webhook {} answered with status {}", webhook.name, raw.status);
        Ok(raw.status)
    }

    async fn choose_variable_note(&self) -> WebhookResult<VariableNote> {
        let notes = VariableNoteService::new(self.host.store, self.host.index)
            .find_variable_notes()
            .await?;

        if notes.is_empty() {
            log::warn!("⚠️ No context notes found. Add post-webhook: true to note frontmatter.");
            return Err(WebhookError::Cancelled);
        }

        self.host.variable_prompt.choose(notes).await.ok_or(WebhookError::Cancelled)
    }

    async fn build_payload(
        &self,
        webhook: &WebhookConfig,
        request: &SendRequest,
        variable_note: Option<&VariableNote>,
    ) -> WebhookResult<OutboundPayload> {
        let text = self.host.store.read(&request.document).await?;
        let attachments = AttachmentResolver::new(self.host.store, self.host.index)
            .resolve(&request.document, webhook.exclude_attachments)
            .await?;

        let mut builder = PayloadBuilder::new()
            .with_inline_fields(webhook.process_inline_fields)
            .with_raw_content(webhook.include_raw_content)
            .with_rendered_markup(webhook.send_rendered_markup);
        if webhook.convert_internal_links {
            builder = builder.with_link_rewriter(LinkRewriter::new(self.host.index, &self.vault_name));
        }

        let payload = builder
            .build(PayloadInput {
                text: &text,
                document: &request.document,
                selection: request.selection.as_deref(),
                attachments,
                variable_note,
                timestamp: chrono::Utc::now().timestamp_millis(),
            })
            .await;
        Ok(payload)
    }

    /// Turns `Ask` into a concrete mode. A dismissed prompt means `None`.
    async fn resolve_mode(&self, webhook: &mut WebhookConfig) -> (ResponseHandling, bool) {
        if webhook.response_handling != ResponseHandling::Ask {
            return (webhook.response_handling, false);
        }

        match self.host.mode_prompt.choose().await {
            Some(choice) if choice.remember => {
                log::info!("💾 Remembering '{}' for {}", choice.mode, webhook.name);
                webhook.response_handling = choice.mode;
                (choice.mode, true)
            }
            Some(choice) => (choice.mode, false),
            None => (ResponseHandling::None, false),
        }
    }
}
