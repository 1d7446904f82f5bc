use serde::{Deserialize, Serialize};

/// The interpreted response, ready to display or insert into a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: u16,
    pub text: String,
}
