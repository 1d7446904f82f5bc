use async_trait::async_trait;

use crate::errors::StoreError;
use crate::structs::document_ref::DocumentRef;

/// Read/write access to the host's vault. Paths are vault-relative and use
/// `/` as separator.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn read(&self, document: &DocumentRef) -> Result<String, StoreError>;

    async fn read_binary(&self, document: &DocumentRef) -> Result<Vec<u8>, StoreError>;

    /// Replaces the full text of an existing document.
    async fn write(&self, document: &DocumentRef, text: &str) -> Result<(), StoreError>;

    /// Fails with [`StoreError::AlreadyExists`] if `path` is taken.
    async fn create(&self, path: &str, text: &str) -> Result<DocumentRef, StoreError>;

    /// Fails with [`StoreError::AlreadyExists`] if `path` is taken.
    async fn create_binary(&self, path: &str, data: &[u8]) -> Result<DocumentRef, StoreError>;

    /// Fails with [`StoreError::AlreadyExists`] if the folder is there already.
    async fn create_folder(&self, path: &str) -> Result<(), StoreError>;

    async fn exists(&self, path: &str) -> bool;

    /// All markdown documents in the vault.
    async fn list_documents(&self) -> Result<Vec<DocumentRef>, StoreError>;
}
