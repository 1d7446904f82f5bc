use reqwest::header::{HeaderName, HeaderValue};
use serde_json::Value;

use crate::config::constants::{timeout_duration, CONTENT_TYPE_JSON};
use crate::errors::{WebhookError, WebhookResult};
use crate::helpers::url_helper::UrlHelper;
use crate::structs::config::webhook_config::{CustomHeaders, WebhookConfig};
use crate::structs::outbound_payload::OutboundPayload;
use crate::structs::outbound_request::OutboundRequest;
use crate::structs::raw_response::RawResponse;
use crate::traits::http_transport::HttpTransport;

const RESERVED_HEADERS: [(&str, &str); 2] = [("Content-Type", CONTENT_TYPE_JSON), ("Accept", CONTENT_TYPE_JSON)];

pub struct DispatchEngine<'a> {
    transport: &'a dyn HttpTransport,
}

impl<'a> DispatchEngine<'a> {
    pub fn new(transport: &'a dyn HttpTransport) -> Self {
        Self { transport }
    }

    /// Checks everything that can be checked without touching the network.
    pub fn preflight(webhook: &WebhookConfig) -> WebhookResult<Vec<(String, String)>> {
        Self::validate_url(&webhook.url)?;
        Self::build_headers(webhook.headers.as_ref())
    }

    pub fn validate_url(url: &str) -> WebhookResult<()> {
        if url.trim().is_empty() {
            return Err(WebhookError::MissingUrl);
        }
        if !UrlHelper::is_valid_webhook_url(url) {
            return Err(WebhookError::InvalidUrl(url.to_string()));
        }
        Ok(())
    }

    /// Custom headers first, then the JSON defaults, which replace any custom
    /// header of the same name.
    pub fn build_headers(custom: Option<&CustomHeaders>) -> WebhookResult<Vec<(String, String)>> {
        let mut headers: Vec<(String, String)> = match custom {
            None => vec![],
            Some(CustomHeaders::Raw(text)) if text.trim().is_empty() => vec![],
            Some(CustomHeaders::Raw(text)) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => map.into_iter().map(|(k, v)| (k, Self::header_value(v))).collect(),
                Ok(_) => return Err(WebhookError::InvalidHeaders("headers must be a JSON object".to_string())),
                Err(e) => return Err(WebhookError::InvalidHeaders(e.to_string())),
            },
            Some(CustomHeaders::Structured(map)) => {
                map.iter().map(|(k, v)| (k.clone(), Self::header_value(v.clone()))).collect()
            }
        };

        for (name, value) in &headers {
            Self::check_header(name, value)?;
        }

        for (name, value) in RESERVED_HEADERS {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            headers.push((name.to_string(), value.to_string()));
        }

        Ok(headers)
    }

    /// Names and values must be valid on the wire, so a bad entry is caught
    /// here rather than by the HTTP client.
    fn check_header(name: &str, value: &str) -> WebhookResult<()> {
        HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| WebhookError::InvalidHeaders(format!("'{name}' is not a valid header name")))?;
        HeaderValue::from_str(value)
            .map_err(|_| WebhookError::InvalidHeaders(format!("header '{name}' has an invalid value")))?;
        Ok(())
    }

    fn header_value(value: Value) -> String {
        match value {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }

    /// POSTs the payload and classifies the outcome. Status codes of 400 and
    /// above are errors; the body of a successful response is returned raw.
    pub async fn dispatch(&self, webhook: &WebhookConfig, payload: &OutboundPayload) -> WebhookResult<RawResponse> {
        let headers = Self::preflight(webhook)?;
        let body = payload
            .to_json()
            .map_err(|e| WebhookError::Request(format!("could not serialize payload: {e}")))?;

        self.send(OutboundRequest { url: webhook.url.clone(), headers, body }, webhook.effective_timeout())
            .await
    }

    pub async fn send(&self, request: OutboundRequest, timeout: Option<u64>) -> WebhookResult<RawResponse> {
        log::info!("📤 POST {}", request.url);

        let result = match timeout {
            Some(secs) => match tokio::time::timeout(timeout_duration(secs), self.transport.post(request)).await {
                Ok(result) => result,
                Err(_) => {
                    log::warn!("⏰ Webhook did not answer within {}s", secs);
                    return Err(WebhookError::Timeout(secs));
                }
            },
            None => self.transport.post(request).await,
        };

        let response = result.map_err(WebhookError::from)?;
        log::info!("📥 Webhook answered with status {}", response.status);

        if response.status >= 400 {
            return Err(WebhookError::http_status(response.status));
        }

        Ok(response)
    }
}
