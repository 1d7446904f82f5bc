use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::config::constants::{BINARY_FAILURE_MARKER, JSON_FAILURE_MARKER, RESPONSE_FILE_PREFIX, TEXT_FAILURE_MARKER};
use crate::enums::response_kind::ResponseKind;
use crate::errors::StoreError;
use crate::helpers::mime_types::MimeTypeHelper;
use crate::structs::raw_response::RawResponse;
use crate::traits::document_store::DocumentStore;

static DISPOSITION_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"filename\*?=(?:UTF-8'')?"?([^";]+)"?"#).expect("valid disposition regex"));

/// Turns a successful response into the text that will be shown or inserted.
/// Decoding problems become fixed marker strings; this never fails.
pub struct ResponseInterpreter<'a> {
    store: &'a dyn DocumentStore,
    attachment_folder: &'a str,
}

impl<'a> ResponseInterpreter<'a> {
    pub fn new(store: &'a dyn DocumentStore, attachment_folder: &'a str) -> Self {
        Self { store, attachment_folder }
    }

    pub async fn interpret(&self, response: &RawResponse) -> String {
        let content_type = response.content_type().to_lowercase();

        match ResponseKind::classify(&content_type) {
            ResponseKind::Json => self.interpret_json(response).await,
            ResponseKind::Text => Self::interpret_text(response),
            ResponseKind::Binary => match self.store_binary(response, &content_type).await {
                Ok(embed) => embed,
                Err(e) => {
                    log::error!("❌ Failed to process binary response: {}", e);
                    BINARY_FAILURE_MARKER.to_string()
                }
            },
        }
    }

    async fn interpret_json(&self, response: &RawResponse) -> String {
        let json = match response.json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("❌ Failed to parse JSON response: {}", e);
                return JSON_FAILURE_MARKER.to_string();
            }
        };

        if let Some((content, attachments)) = Self::complex_parts(&json) {
            self.materialize_attachments(attachments).await;
            return content.to_string();
        }

        match serde_json::to_string_pretty(&json) {
            Ok(pretty) => format!("```json\n{pretty}\n```"),
            Err(_) => JSON_FAILURE_MARKER.to_string(),
        }
    }

    /// `{content, attachments}` either at the top level or as the first item
    /// of an array, which is how many automation tools wrap their output.
    fn complex_parts(json: &Value) -> Option<(&str, &Vec<Value>)> {
        let candidate = match json {
            Value::Array(items) => items.first()?,
            other => other,
        };
        let content = candidate.get("content")?.as_str()?;
        let attachments = candidate.get("attachments")?.as_array()?;
        Some((content, attachments))
    }

    async fn materialize_attachments(&self, attachments: &[Value]) {
        if attachments.is_empty() {
            return;
        }
        self.ensure_folder().await;

        for entry in attachments {
            let (Some(name), Some(data)) = (
                entry.get("name").and_then(Value::as_str),
                entry.get("data").and_then(Value::as_str),
            ) else {
                continue;
            };

            let Some(name) = Self::safe_file_name(name) else { continue };
            let bytes = match BASE64_STANDARD.decode(Self::strip_data_uri(data)) {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!("⚠️ Attachment {} is not valid base64: {}", name, e);
                    continue;
                }
            };

            match self.store.create_binary(&self.path_in_folder(&name), &bytes).await {
                Ok(file) => log::info!("📎 Saved response attachment {}", file.path),
                Err(e) => log::warn!("⚠️ Could not save response attachment {}: {}", name, e),
            }
        }
    }

    fn interpret_text(response: &RawResponse) -> String {
        match response.text() {
            Ok(text) => text.to_string(),
            Err(e) => {
                log::error!("❌ Failed to get text response: {}", e);
                TEXT_FAILURE_MARKER.to_string()
            }
        }
    }

    async fn store_binary(&self, response: &RawResponse, content_type: &str) -> Result<String, StoreError> {
        let filename = Self::generate_filename(response, content_type);
        self.ensure_folder().await;

        let file = self.store.create_binary(&self.path_in_folder(&filename), &response.body).await?;
        Ok(format!("![[{}]]", file.name))
    }

    pub fn generate_filename(response: &RawResponse, content_type: &str) -> String {
        response
            .header("content-disposition")
            .and_then(|disposition| DISPOSITION_FILENAME.captures(disposition))
            .and_then(|captures| Self::safe_file_name(captures[1].trim()))
            .unwrap_or_else(|| {
                format!(
                    "{}-{}{}",
                    RESPONSE_FILE_PREFIX,
                    chrono::Utc::now().timestamp_millis(),
                    MimeTypeHelper::extension_for(content_type)
                )
            })
    }

    async fn ensure_folder(&self) {
        if self.attachment_folder.is_empty() {
            return;
        }
        match self.store.create_folder(self.attachment_folder).await {
            Ok(()) | Err(StoreError::AlreadyExists(_)) => {}
            Err(e) => log::debug!("Could not create {}: {}", self.attachment_folder, e),
        }
    }

    fn path_in_folder(&self, name: &str) -> String {
        let folder = self.attachment_folder.trim_end_matches('/');
        if folder.is_empty() {
            name.to_string()
        } else {
            format!("{folder}/{name}")
        }
    }

    /// Last path component only, so a response cannot write outside the folder.
    fn safe_file_name(name: &str) -> Option<String> {
        let name = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
        (!name.is_empty() && name != "." && name != "..").then(|| name.to_string())
    }

    fn strip_data_uri(data: &str) -> &str {
        if data.starts_with("data:") {
            data.split_once(";base64,").map_or(data, |(_, payload)| payload)
        } else {
            data
        }
    }
}
