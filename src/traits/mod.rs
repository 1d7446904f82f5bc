pub mod document_store;
pub mod http_transport;
pub mod metadata_index;
pub mod prompt;
