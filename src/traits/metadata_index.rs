use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::structs::document_ref::DocumentRef;
use crate::structs::link_ref::LinkRef;

/// The host's link and metadata cache.
#[async_trait]
pub trait MetadataIndex: Send + Sync {
    /// Resolves a link target as written in `source_path` to a file or folder.
    async fn resolve(&self, link: &str, source_path: &str) -> Option<DocumentRef>;

    /// Embeds (`![[...]]`, `![](...)`) in the document, in document order.
    async fn embeds(&self, document: &DocumentRef) -> Vec<LinkRef>;

    /// Plain links (`[[...]]`) in the document, in document order.
    async fn links(&self, document: &DocumentRef) -> Vec<LinkRef>;

    /// Parsed header data, when the index has it cached.
    async fn frontmatter(&self, document: &DocumentRef) -> Option<Map<String, Value>>;
}
