use serde::{Deserialize, Serialize};

/// A link or embed as recorded by the metadata index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    /// Link target as written, without alias.
    pub link: String,
    /// Full original text, e.g. `![[image.png|200]]`.
    pub original: String,
    pub display: Option<String>,
}
