use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use post_webhook::errors::{StoreError, TransportError};
use post_webhook::services::frontmatter_extractor::FrontmatterExtractor;
use post_webhook::services::webhook_service::Collaborators;
use post_webhook::structs::document_ref::DocumentRef;
use post_webhook::structs::link_ref::LinkRef;
use post_webhook::structs::outbound_request::OutboundRequest;
use post_webhook::structs::raw_response::RawResponse;
use post_webhook::structs::response_mode_choice::ResponseModeChoice;
use post_webhook::structs::variable_note::VariableNote;
use post_webhook::traits::document_store::DocumentStore;
use post_webhook::traits::http_transport::HttpTransport;
use post_webhook::traits::metadata_index::MetadataIndex;
use post_webhook::traits::prompt::{ResponseModePrompt, VariableNotePrompt};

pub const CREATED_AT: i64 = 1_700_000_000_000;
pub const MODIFIED_AT: i64 = 1_700_000_500_000;

/// In-memory vault with a hand-wired link index.
#[derive(Default)]
pub struct MemoryVault {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
    folders: Mutex<BTreeSet<String>>,
    resolutions: HashMap<String, String>,
    embeds: HashMap<String, Vec<LinkRef>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, text: &str) -> Self {
        self.with_binary(path, text.as_bytes())
    }

    pub fn with_binary(self, path: &str, data: &[u8]) -> Self {
        self.files.lock().unwrap().insert(path.to_string(), data.to_vec());
        self
    }

    pub fn with_folder(self, path: &str) -> Self {
        self.folders.lock().unwrap().insert(path.to_string());
        self
    }

    /// Makes `link` resolve to `path` from any note.
    pub fn with_link(mut self, link: &str, path: &str) -> Self {
        self.resolutions.insert(link.to_string(), path.to_string());
        self
    }

    pub fn with_embed(mut self, document: &str, link: &str) -> Self {
        self.embeds.entry(document.to_string()).or_default().push(LinkRef {
            link: link.to_string(),
            original: format!("![[{link}]]"),
            display: None,
        });
        self
    }

    pub fn doc(path: &str) -> DocumentRef {
        DocumentRef::file(path, CREATED_AT, MODIFIED_AT)
    }

    pub fn text(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).to_string())
    }

    pub fn bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    fn taken(&self, path: &str) -> bool {
        self.files.lock().unwrap().contains_key(path) || self.folders.lock().unwrap().contains(path)
    }
}

#[async_trait]
impl DocumentStore for MemoryVault {
    async fn read(&self, document: &DocumentRef) -> Result<String, StoreError> {
        self.text(&document.path).ok_or_else(|| StoreError::NotFound(document.path.clone()))
    }

    async fn read_binary(&self, document: &DocumentRef) -> Result<Vec<u8>, StoreError> {
        self.bytes(&document.path).ok_or_else(|| StoreError::NotFound(document.path.clone()))
    }

    async fn write(&self, document: &DocumentRef, text: &str) -> Result<(), StoreError> {
        let mut files = self.files.lock().unwrap();
        match files.get_mut(&document.path) {
            Some(existing) => {
                *existing = text.as_bytes().to_vec();
                Ok(())
            }
            None => Err(StoreError::NotFound(document.path.clone())),
        }
    }

    async fn create(&self, path: &str, text: &str) -> Result<DocumentRef, StoreError> {
        self.create_binary(path, text.as_bytes()).await
    }

    async fn create_binary(&self, path: &str, data: &[u8]) -> Result<DocumentRef, StoreError> {
        if self.taken(path) {
            return Err(StoreError::AlreadyExists(path.to_string()));
        }
        self.files.lock().unwrap().insert(path.to_string(), data.to_vec());
        Ok(Self::doc(path))
    }

    async fn create_folder(&self, path: &str) -> Result<(), StoreError> {
        if self.taken(path) {
            return Err(StoreError::AlreadyExists(path.to_string()));
        }
        self.folders.lock().unwrap().insert(path.to_string());
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        self.taken(path)
    }

    async fn list_documents(&self) -> Result<Vec<DocumentRef>, StoreError> {
        Ok(self
            .paths()
            .into_iter()
            .filter(|p| p.ends_with(".md"))
            .map(|p| Self::doc(&p))
            .collect())
    }
}

#[async_trait]
impl MetadataIndex for MemoryVault {
    async fn resolve(&self, link: &str, _source_path: &str) -> Option<DocumentRef> {
        let path = self.resolutions.get(link)?;
        if self.folders.lock().unwrap().contains(path) {
            return Some(DocumentRef::folder(path));
        }
        self.files.lock().unwrap().contains_key(path).then(|| Self::doc(path))
    }

    async fn embeds(&self, document: &DocumentRef) -> Vec<LinkRef> {
        self.embeds.get(&document.path).cloned().unwrap_or_default()
    }

    async fn links(&self, _document: &DocumentRef) -> Vec<LinkRef> {
        vec![]
    }

    async fn frontmatter(&self, document: &DocumentRef) -> Option<Map<String, Value>> {
        let info = FrontmatterExtractor::extract(&self.text(&document.path)?);
        info.exists.then_some(info.mapping)
    }
}

/// Records every request and answers with a canned response.
pub struct RecordingTransport {
    response: RawResponse,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl RecordingTransport {
    pub fn new(status: u16, content_type: &str, body: &[u8]) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), content_type.to_string());
        Self::with_headers(status, headers, body)
    }

    pub fn with_headers(status: u16, headers: HashMap<String, String>, body: &[u8]) -> Self {
        Self {
            response: RawResponse::new(status, headers, body.to_vec()),
            requests: Mutex::new(vec![]),
        }
    }

    pub fn text(body: &str) -> Self {
        Self::new(200, "text/plain; charset=utf-8", body.as_bytes())
    }

    pub fn json(body: &str) -> Self {
        Self::new(200, "application/json", body.as_bytes())
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> OutboundRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request was sent")
    }

    pub fn last_payload(&self) -> Value {
        serde_json::from_str(&self.last_request().body).expect("payload is JSON")
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn post(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

/// Prompt with fixed answers.
#[derive(Default)]
pub struct FixedPrompt {
    pub note_index: Option<usize>,
    pub mode: Option<ResponseModeChoice>,
}

impl FixedPrompt {
    pub fn cancelling() -> Self {
        Self::default()
    }

    pub fn picking_note(index: usize) -> Self {
        Self { note_index: Some(index), mode: None }
    }

    pub fn picking_mode(choice: ResponseModeChoice) -> Self {
        Self { note_index: None, mode: Some(choice) }
    }
}

#[async_trait]
impl VariableNotePrompt for FixedPrompt {
    async fn choose(&self, notes: Vec<VariableNote>) -> Option<VariableNote> {
        notes.into_iter().nth(self.note_index?)
    }
}

#[async_trait]
impl ResponseModePrompt for FixedPrompt {
    async fn choose(&self) -> Option<ResponseModeChoice> {
        self.mode
    }
}

pub fn collaborators<'a>(
    vault: &'a MemoryVault,
    transport: &'a RecordingTransport,
    prompt: &'a FixedPrompt,
) -> Collaborators<'a> {
    Collaborators {
        store: vault,
        index: vault,
        transport,
        variable_prompt: prompt,
        mode_prompt: prompt,
    }
}
