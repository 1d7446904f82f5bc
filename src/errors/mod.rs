use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while sending a note to a webhook.
///
/// Decode problems in the response body are not represented here: the
/// response interpreter degrades those to a failure marker string because the
/// request itself already succeeded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("Webhook URL is required")]
    MissingUrl,

    #[error("Invalid Webhook URL '{0}'. Must be a valid HTTP or HTTPS URL")]
    InvalidUrl(String),

    #[error("Invalid custom headers: {0}")]
    InvalidHeaders(String),

    #[error("Webhook '{0}' not found")]
    WebhookNotFound(String),

    #[error("Could not connect to the Webhook URL. Please check your internet connection and the URL ({0})")]
    ConnectionFailed(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Failed to send Webhook: {0}")]
    Request(String),

    #[error("Request failed: {status}{}", .hint.as_ref().map(|h| format!(" ({h})")).unwrap_or_default())]
    HttpStatus { status: u16, hint: Option<String> },

    #[error("Failed to apply response: {0}")]
    Storage(String),

    #[error("Variable note selection cancelled")]
    Cancelled,
}

impl WebhookError {
    pub fn http_status(status: u16) -> Self {
        let hint = match status {
            404 => Some("Not Found: check that the Webhook URL is correct".to_string()),
            405 => Some(
                "Method Not Allowed: the endpoint does not accept POST requests, check the URL and the HTTP method it expects"
                    .to_string(),
            ),
            _ => None,
        };
        Self::HttpStatus { status, hint }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingUrl | Self::InvalidUrl(_) | Self::InvalidHeaders(_) | Self::WebhookNotFound(_) => {
                ErrorCategory::Configuration
            }
            Self::ConnectionFailed(_) | Self::Timeout(_) | Self::Request(_) => ErrorCategory::Transport,
            Self::HttpStatus { .. } => ErrorCategory::Protocol,
            Self::Storage(_) => ErrorCategory::Storage,
            Self::Cancelled => ErrorCategory::Cancelled,
        }
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// True when the failure happened before anything was sent.
    pub fn is_pre_flight(&self) -> bool {
        matches!(self.category(), ErrorCategory::Configuration | ErrorCategory::Cancelled)
    }
}

/// Coarse grouping used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorCategory {
    Configuration,
    Transport,
    Protocol,
    Storage,
    Cancelled,
}

impl ErrorCategory {
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Configuration => "⚙️",
            Self::Transport => "🌐",
            Self::Protocol => "🚫",
            Self::Storage => "💾",
            Self::Cancelled => "⏹️",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Configuration => "CONFIGURATION",
            Self::Transport => "TRANSPORT",
            Self::Protocol => "PROTOCOL",
            Self::Storage => "STORAGE",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// Result type alias for pipeline operations
pub type WebhookResult<T> = Result<T, WebhookError>;

/// Failures reported by a [`DocumentStore`](crate::traits::document_store::DocumentStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("'{0}' does not exist")]
    NotFound(String),

    #[error("'{0}' already exists")]
    AlreadyExists(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for WebhookError {
    fn from(error: StoreError) -> Self {
        WebhookError::Storage(error.to_string())
    }
}

/// Failures reported by an [`HttpTransport`](crate::traits::http_transport::HttpTransport).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Request(String),
}

impl From<TransportError> for WebhookError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Connect(reason) => WebhookError::ConnectionFailed(reason),
            TransportError::Request(reason) => WebhookError::Request(reason),
        }
    }
}

/// Errors from loading, saving or validating the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML configuration: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Could not serialize configuration: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Invalid plugin JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration:\n  {}", .0.join("\n  "))]
    Invalid(Vec<String>),

    #[error("Could not locate the home directory")]
    NoHomeDir,
}

/// Error handler for consistent error processing
pub struct ErrorHandler;

impl ErrorHandler {
    pub fn handle_error(error: &WebhookError) {
        let category = error.category();

        if error.is_cancellation() {
            log::info!("{} {}", category.emoji(), error);
            return;
        }

        log::error!("[{}] {:?}", category.name(), error);
        eprintln!("{} {}", category.emoji(), error);

        if error.is_pre_flight() {
            eprintln!("ℹ️ Nothing was sent - fix the webhook settings and try again");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_and_method_not_allowed_carry_hints() {
        let not_found = WebhookError::http_status(404).to_string();
        assert!(not_found.starts_with("Request failed: 404"));
        assert!(not_found.contains("Webhook URL is correct"));

        let method = WebhookError::http_status(405).to_string();
        assert!(method.contains("does not accept POST"));
    }

    #[test]
    fn test_other_statuses_report_bare_code() {
        assert_eq!(WebhookError::http_status(500).to_string(), "Request failed: 500");
    }

    #[test]
    fn test_categories() {
        assert_eq!(WebhookError::MissingUrl.category(), ErrorCategory::Configuration);
        assert_eq!(WebhookError::Timeout(5).category(), ErrorCategory::Transport);
        assert_eq!(WebhookError::http_status(418).category(), ErrorCategory::Protocol);
        assert!(WebhookError::Cancelled.is_cancellation());
        assert!(WebhookError::Cancelled.is_pre_flight());
        assert!(!WebhookError::ConnectionFailed("refused".into()).is_pre_flight());
    }

    #[test]
    fn test_transport_errors_are_normalized() {
        let err: WebhookError = TransportError::Connect("dns".into()).into();
        assert!(matches!(err, WebhookError::ConnectionFailed(_)));
        assert!(err.to_string().starts_with("Could not connect to the Webhook URL"));
    }
}
