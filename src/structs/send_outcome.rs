use crate::enums::response_handling::ResponseHandling;
use crate::structs::webhook_response::WebhookResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub response: WebhookResponse,
    /// Mode actually applied, after resolving [`ResponseHandling::Ask`].
    pub applied_mode: ResponseHandling,
    /// Path of the note created by [`ResponseHandling::New`].
    pub created_path: Option<String>,
    /// The webhook configuration was changed and should be persisted.
    pub settings_changed: bool,
}
