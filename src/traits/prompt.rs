use async_trait::async_trait;

use crate::structs::response_mode_choice::ResponseModeChoice;
use crate::structs::variable_note::VariableNote;

/// Asks the user which variable note to attach. `None` means cancelled.
#[async_trait]
pub trait VariableNotePrompt: Send + Sync {
    async fn choose(&self, notes: Vec<VariableNote>) -> Option<VariableNote>;
}

/// Asks the user how to handle a response. `None` means dismissed.
#[async_trait]
pub trait ResponseModePrompt: Send + Sync {
    async fn choose(&self) -> Option<ResponseModeChoice>;
}
