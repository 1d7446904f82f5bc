use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::config::constants::VARIABLE_NOTE_MARKER;
use crate::errors::StoreError;
use crate::structs::variable_note::VariableNote;
use crate::traits::document_store::DocumentStore;
use crate::traits::metadata_index::MetadataIndex;

static VARIABLE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^--([\w_]+)").expect("valid variable header regex"));

pub struct VariableNoteService<'a> {
    store: &'a dyn DocumentStore,
    index: &'a dyn MetadataIndex,
}

impl<'a> VariableNoteService<'a> {
    pub fn new(store: &'a dyn DocumentStore, index: &'a dyn MetadataIndex) -> Self {
        Self { store, index }
    }

    /// Every note flagged with `post-webhook: true`, with its variables parsed.
    pub async fn find_variable_notes(&self) -> Result<Vec<VariableNote>, StoreError> {
        let mut notes = Vec::new();

        for document in self.store.list_documents().await? {
            let Some(header) = self.index.frontmatter(&document).await else {
                continue;
            };

            if !Self::is_flagged(header.get(VARIABLE_NOTE_MARKER)) {
                continue;
            }

            let text = match self.store.read(&document).await {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("⚠️ Skipping variable note {}: {}", document.path, e);
                    continue;
                }
            };
            notes.push(VariableNote {
                title: document.basename.clone(),
                path: document.path.clone(),
                variables: Self::parse_variables(&text),
            });
        }

        log::debug!("🗂️ Found {} variable notes", notes.len());
        Ok(notes)
    }

    fn is_flagged(value: Option<&Value>) -> bool {
        matches!(value, Some(Value::Bool(true))) || matches!(value, Some(Value::String(s)) if s == "true")
    }

    /// Splits `text` into blocks started by `--name` lines. A later block with
    /// the same name replaces the earlier value.
    pub fn parse_variables(text: &str) -> Vec<(String, String)> {
        let mut variables: Vec<(String, String)> = Vec::new();
        let mut current: Option<(String, Vec<&str>)> = None;

        for line in text.split('\n') {
            if let Some(captures) = VARIABLE_HEADER.captures(line) {
                if let Some((key, lines)) = current.take() {
                    Self::store_variable(&mut variables, key, &lines);
                }
                current = Some((captures[1].to_string(), Vec::new()));
            } else if let Some((_, lines)) = current.as_mut() {
                lines.push(line);
            }
        }

        if let Some((key, lines)) = current {
            Self::store_variable(&mut variables, key, &lines);
        }

        variables
    }

    fn store_variable(variables: &mut Vec<(String, String)>, key: String, lines: &[&str]) {
        let value = lines.join("\n").trim().to_string();
        match variables.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => variables.push((key, value)),
        }
    }
}
