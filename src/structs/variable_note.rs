use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableNote {
    pub title: String,
    pub path: String,
    /// Ordered by first appearance in the note.
    pub variables: Vec<(String, String)>,
}

impl VariableNote {
    pub fn as_layer(&self) -> Map<String, Value> {
        self.variables
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect()
    }
}
