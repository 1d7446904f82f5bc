use crate::structs::document_ref::DocumentRef;

/// What the user asked to send: a note, optionally narrowed to a selection.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub document: DocumentRef,
    pub selection: Option<String>,
}

impl SendRequest {
    pub fn note(document: DocumentRef) -> Self {
        Self { document, selection: None }
    }

    pub fn selection(document: DocumentRef, selection: &str) -> Self {
        Self {
            document,
            selection: Some(selection.to_string()).filter(|s| !s.is_empty()),
        }
    }
}
