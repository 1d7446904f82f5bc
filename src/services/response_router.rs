use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::constants::MARKDOWN_EXTENSION;
use crate::enums::response_handling::ResponseHandling;
use crate::errors::{StoreError, WebhookError, WebhookResult};
use crate::structs::document_ref::DocumentRef;
use crate::traits::document_store::DocumentStore;

static VERSION_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*) v(\d+)$").expect("valid version regex"));

/// Writes interpreted response text back into the vault.
pub struct ResponseRouter<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ResponseRouter<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Applies `mode`. `Ask` must be resolved by the caller beforehand and is
    /// treated like `None` here. Returns the path of a newly created note.
    pub async fn route(
        &self,
        mode: ResponseHandling,
        document: &DocumentRef,
        selection: Option<&str>,
        text: &str,
    ) -> WebhookResult<Option<String>> {
        match mode {
            ResponseHandling::None | ResponseHandling::Ask => Ok(None),
            ResponseHandling::Append => {
                self.append(document, selection, text).await?;
                Ok(None)
            }
            ResponseHandling::Overwrite => {
                self.store.write(document, text).await?;
                log::info!("📝 Replaced {} with the webhook response", document.path);
                Ok(None)
            }
            ResponseHandling::New => self.create_version(document, text).await.map(Some),
        }
    }

    async fn append(&self, document: &DocumentRef, selection: Option<&str>, text: &str) -> Result<(), StoreError> {
        let current = self.store.read(document).await?;
        let updated = Self::insert_response(&current, selection, text);
        self.store.write(document, &updated).await?;
        log::info!("📝 Appended webhook response to {}", document.path);
        Ok(())
    }

    /// Places `text` right after the first occurrence of `selection`, or at
    /// the end of the document when there is no selection to anchor on.
    pub fn insert_response(current: &str, selection: Option<&str>, text: &str) -> String {
        let anchor = selection
            .filter(|s| !s.is_empty())
            .and_then(|s| current.find(s).map(|start| start + s.len()));

        match anchor {
            Some(end) => format!("{}\n\n{}\n\n{}", &current[..end], text, &current[end..]),
            None => format!("{current}\n\n{text}"),
        }
    }

    async fn create_version(&self, document: &DocumentRef, text: &str) -> WebhookResult<String> {
        let (base, mut version) = Self::split_version(&document.basename)?;
        let folder = document.parent();

        loop {
            let path = Self::versioned_path(folder, &base, version);
            if self.store.exists(&path).await {
                version = Self::next_version(&base, version)?;
                continue;
            }

            return match self.store.create(&path, text).await {
                Ok(created) => {
                    log::info!("✨ Created {} from the webhook response", created.path);
                    Ok(created.path)
                }
                // Lost a race with another writer; try the next number.
                Err(StoreError::AlreadyExists(_)) => {
                    version = Self::next_version(&base, version)?;
                    continue;
                }
                Err(e) => Err(WebhookError::from(e)),
            };
        }
    }

    /// `"Report v2"` gives `("Report", 3)`, `"Report"` gives `("Report", 1)`.
    /// A suffix too large to count past is an error.
    pub fn split_version(basename: &str) -> WebhookResult<(String, u32)> {
        let Some(caps) = VERSION_SUFFIX.captures(basename) else {
            return Ok((basename.to_string(), 1));
        };
        let base = caps[1].to_string();
        let current = caps[2]
            .parse::<u32>()
            .map_err(|_| WebhookError::Storage(format!("version suffix of '{basename}' is too large")))?;
        let next = Self::next_version(&base, current)?;
        Ok((base, next))
    }

    fn next_version(base: &str, version: u32) -> WebhookResult<u32> {
        version
            .checked_add(1)
            .ok_or_else(|| WebhookError::Storage(format!("no version number left for '{base}'")))
    }

    fn versioned_path(folder: &str, base: &str, version: u32) -> String {
        if folder.is_empty() {
            format!("{base} v{version}.{MARKDOWN_EXTENSION}")
        } else {
            format!("{folder}/{base} v{version}.{MARKDOWN_EXTENSION}")
        }
    }
}
