use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do with the interpreted response text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseHandling {
    #[default]
    None,      // Discard the response
    Append,    // Insert after the selection, or at the end of the note
    New,       // Write into a new versioned note
    Overwrite, // Replace the note content
    Ask,       // Prompt for one of the above at send time
}

impl ResponseHandling {
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "Do not use response",
            Self::Append => "Append to note",
            Self::New => "Create new note",
            Self::Overwrite => "Overwrite note",
            Self::Ask => "Ask every time",
        }
    }

    /// Modes that can be picked when the configured mode is [`Self::Ask`].
    pub fn choices() -> [Self; 3] {
        [Self::Append, Self::New, Self::Overwrite]
    }
}

impl fmt::Display for ResponseHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Append => "append",
            Self::New => "new",
            Self::Overwrite => "overwrite",
            Self::Ask => "ask",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ResponseHandling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "append" => Ok(Self::Append),
            "new" => Ok(Self::New),
            "overwrite" => Ok(Self::Overwrite),
            "ask" => Ok(Self::Ask),
            other => Err(format!("unknown response handling mode '{other}'")),
        }
    }
}
