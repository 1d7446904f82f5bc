use crate::enums::response_handling::ResponseHandling;

/// Answer from the response-mode prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseModeChoice {
    pub mode: ResponseHandling,
    /// Store the mode on the webhook so the prompt is skipped next time.
    pub remember: bool,
}
