use base64::prelude::BASE64_STANDARD;
use base64::Engine;

use crate::errors::StoreError;
use crate::helpers::mime_types::MimeTypeHelper;
use crate::services::frontmatter_extractor::FrontmatterExtractor;
use crate::structs::attachment::Attachment;
use crate::structs::document_ref::DocumentRef;
use crate::traits::document_store::DocumentStore;
use crate::traits::metadata_index::MetadataIndex;

pub struct AttachmentResolver<'a> {
    store: &'a dyn DocumentStore,
    index: &'a dyn MetadataIndex,
}

impl<'a> AttachmentResolver<'a> {
    pub fn new(store: &'a dyn DocumentStore, index: &'a dyn MetadataIndex) -> Self {
        Self { store, index }
    }

    /// Encodes every embedded file of `document` that resolves to a real file
    /// and is not listed under `exclude-attachment`.
    pub async fn resolve(&self, document: &DocumentRef, exclude_all: bool) -> Result<Vec<Attachment>, StoreError> {
        if exclude_all {
            return Ok(vec![]);
        }

        let text = self.store.read(document).await?;
        let exclude_list = FrontmatterExtractor::excluded_attachments(&text);

        let mut attachments = Vec::new();
        for embed in self.index.embeds(document).await {
            if embed.link.is_empty() {
                continue;
            }

            let Some(linked) = self.index.resolve(&embed.link, &document.path).await else {
                log::debug!("🔗 Embed '{}' does not resolve, skipping", embed.link);
                continue;
            };

            if linked.is_folder || exclude_list.contains(&linked.name) {
                continue;
            }

            match self.encode(&linked).await {
                Ok(attachment) => attachments.push(attachment),
                Err(e) => log::warn!("⚠️ Failed to process attachment {}: {}", linked.name, e),
            }
        }

        log::debug!("📎 Resolved {} attachments for {}", attachments.len(), document.path);
        Ok(attachments)
    }

    async fn encode(&self, file: &DocumentRef) -> Result<Attachment, StoreError> {
        let bytes = self.store.read_binary(file).await?;
        let extension = file.extension.to_lowercase();

        Ok(Attachment {
            name: file.name.clone(),
            mime_type: MimeTypeHelper::mime_type(&extension).to_string(),
            file_type: extension,
            size: bytes.len(),
            data: BASE64_STANDARD.encode(&bytes),
            path: file.path.clone(),
        })
    }
}
