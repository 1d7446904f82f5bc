use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;

use crate::config::constants::MARKDOWN_EXTENSION;
use crate::errors::StoreError;
use crate::services::frontmatter_extractor::FrontmatterExtractor;
use crate::structs::document_ref::DocumentRef;
use crate::structs::link_ref::LinkRef;
use crate::traits::document_store::DocumentStore;
use crate::traits::metadata_index::MetadataIndex;

static WIKI_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(!?)\[\[([^\[\]]+?)\]\]").expect("valid wiki link regex"));
static MARKDOWN_EMBED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)\)").expect("valid markdown embed regex"));

/// A vault that is just a directory on disk. Implements both the document
/// store and a link index that re-reads notes on demand.
///
/// Dot-folders such as `.obsidian` and `.trash` are not listed. The file
/// list used for name lookups is walked once and reused until this vault
/// creates something.
pub struct FsVault {
    root: PathBuf,
    file_cache: Mutex<Option<Arc<Vec<DocumentRef>>>>,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_cache: Mutex::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Looks up an existing file by its vault-relative path.
    pub async fn document(&self, path: &str) -> Result<DocumentRef, StoreError> {
        match self.document_ref(path).await {
            Some(document) if !document.is_folder => Ok(document),
            _ => Err(StoreError::NotFound(path.to_string())),
        }
    }

    /// Vault-relative path to an absolute one. Paths escaping the root are
    /// refused.
    fn absolute(&self, path: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
        if escapes {
            return Err(StoreError::NotFound(path.to_string()));
        }
        Ok(self.root.join(relative))
    }

    fn relative(&self, absolute: &Path) -> String {
        absolute
            .strip_prefix(&self.root)
            .unwrap_or(absolute)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    async fn document_ref(&self, path: &str) -> Option<DocumentRef> {
        let absolute = self.absolute(path).ok()?;
        let metadata = tokio::fs::metadata(&absolute).await.ok()?;
        let path = path.trim_start_matches('/');

        if metadata.is_dir() {
            return Some(DocumentRef::folder(path));
        }

        let modified = metadata.modified().map(Self::millis).unwrap_or_default();
        let created = metadata.created().map(Self::millis).unwrap_or(modified);
        Some(DocumentRef::file(path, created, modified))
    }

    fn millis(time: SystemTime) -> i64 {
        time.duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or_default()
    }

    fn map_io(path: &str, error: std::io::Error) -> StoreError {
        match error.kind() {
            ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
            ErrorKind::AlreadyExists => StoreError::AlreadyExists(path.to_string()),
            _ => StoreError::Io(error),
        }
    }

    async fn all_files(&self) -> Result<Vec<DocumentRef>, StoreError> {
        let mut files = Vec::new();
        let mut stack = vec![self.root.clone()];

        while let Some(dir) = stack.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                if entry.file_name().to_string_lossy().starts_with('.') {
                    continue;
                }

                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    stack.push(path);
                } else if let Some(document) = self.document_ref(&self.relative(&path)).await {
                    files.push(document);
                }
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    async fn cached_files(&self) -> Result<Arc<Vec<DocumentRef>>, StoreError> {
        let cached = self.file_cache.lock().ok().and_then(|cache| cache.clone());
        if let Some(files) = cached {
            return Ok(files);
        }

        let files = Arc::new(self.all_files().await?);
        if let Ok(mut cache) = self.file_cache.lock() {
            *cache = Some(Arc::clone(&files));
        }
        Ok(files)
    }

    fn invalidate_files(&self) {
        if let Ok(mut cache) = self.file_cache.lock() {
            *cache = None;
        }
    }

    async fn write_new(&self, path: &str, data: &[u8]) -> Result<DocumentRef, StoreError> {
        let absolute = self.absolute(path)?;
        if let Some(parent) = absolute.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&absolute)
            .await
            .map_err(|e| Self::map_io(path, e))?;
        self.invalidate_files();
        file.write_all(data).await?;
        file.flush().await?;

        self.document_ref(path)
            .await
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    /// Splits `target|alias` and drops any `#section` from the target.
    fn split_target(inner: &str) -> (String, Option<String>) {
        let (target, alias) = match inner.split_once('|') {
            Some((target, alias)) => (target, Some(alias.trim().to_string())),
            None => (inner, None),
        };
        let target = target.split('#').next().unwrap_or_default().trim().to_string();
        (target, alias.filter(|a| !a.is_empty()))
    }

    fn candidates(link: &str, source_path: &str) -> Vec<String> {
        let link = link.trim_start_matches('/');
        let folder = source_path.rfind('/').map_or("", |idx| &source_path[..idx]);

        let mut candidates = vec![link.to_string(), format!("{link}.{MARKDOWN_EXTENSION}")];
        if !folder.is_empty() {
            candidates.push(format!("{folder}/{link}"));
            candidates.push(format!("{folder}/{link}.{MARKDOWN_EXTENSION}"));
        }
        candidates
    }
}

#[async_trait]
impl DocumentStore for FsVault {
    async fn read(&self, document: &DocumentRef) -> Result<String, StoreError> {
        let absolute = self.absolute(&document.path)?;
        tokio::fs::read_to_string(absolute)
            .await
            .map_err(|e| Self::map_io(&document.path, e))
    }

    async fn read_binary(&self, document: &DocumentRef) -> Result<Vec<u8>, StoreError> {
        let absolute = self.absolute(&document.path)?;
        tokio::fs::read(absolute).await.map_err(|e| Self::map_io(&document.path, e))
    }

    async fn write(&self, document: &DocumentRef, text: &str) -> Result<(), StoreError> {
        let absolute = self.absolute(&document.path)?;
        if !tokio::fs::try_exists(&absolute).await? {
            return Err(StoreError::NotFound(document.path.clone()));
        }
        tokio::fs::write(absolute, text).await?;
        Ok(())
    }

    async fn create(&self, path: &str, text: &str) -> Result<DocumentRef, StoreError> {
        self.write_new(path, text.as_bytes()).await
    }

    async fn create_binary(&self, path: &str, data: &[u8]) -> Result<DocumentRef, StoreError> {
        self.write_new(path, data).await
    }

    async fn create_folder(&self, path: &str) -> Result<(), StoreError> {
        let absolute = self.absolute(path)?;
        if tokio::fs::try_exists(&absolute).await? {
            return Err(StoreError::AlreadyExists(path.to_string()));
        }
        tokio::fs::create_dir_all(absolute).await?;
        self.invalidate_files();
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        match self.absolute(path) {
            Ok(absolute) => tokio::fs::try_exists(absolute).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn list_documents(&self) -> Result<Vec<DocumentRef>, StoreError> {
        Ok(self
            .cached_files()
            .await?
            .iter()
            .filter(|f| f.is_markdown())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MetadataIndex for FsVault {
    /// Exact path first, then relative to the linking note, then the shortest
    /// vault path whose file name matches.
    async fn resolve(&self, link: &str, source_path: &str) -> Option<DocumentRef> {
        let link = percent_decode_str(link).decode_utf8_lossy().trim().to_string();
        if link.is_empty() {
            return None;
        }

        for candidate in Self::candidates(&link, source_path) {
            if let Some(found) = self.document_ref(&candidate).await {
                return Some(found);
            }
        }

        let name = link.rsplit('/').next().unwrap_or(&link).to_string();
        let suffix = format!("/{link}");
        let markdown_suffix = format!("/{link}.{MARKDOWN_EXTENSION}");
        let files = self.cached_files().await.ok()?;
        files
            .iter()
            .filter(|f| {
                f.path.ends_with(&suffix)
                    || f.path.ends_with(&markdown_suffix)
                    || (!link.contains('/') && (f.name == name || (f.is_markdown() && f.basename == name)))
            })
            .min_by_key(|f| (f.path.len(), f.path.as_str()))
            .cloned()
    }

    async fn embeds(&self, document: &DocumentRef) -> Vec<LinkRef> {
        let Ok(text) = self.read(document).await else {
            return vec![];
        };

        let mut found: Vec<(usize, LinkRef)> = Vec::new();
        for captures in WIKI_LINK.captures_iter(&text) {
            if captures[1].is_empty() {
                continue;
            }
            let (link, display) = Self::split_target(&captures[2]);
            let start = captures.get(0).map_or(0, |m| m.start());
            found.push((start, LinkRef { link, original: captures[0].to_string(), display }));
        }
        for captures in MARKDOWN_EMBED.captures_iter(&text) {
            let target = &captures[2];
            if target.contains("://") {
                continue;
            }
            let start = captures.get(0).map_or(0, |m| m.start());
            let alt = captures[1].trim();
            found.push((
                start,
                LinkRef {
                    link: target.split('#').next().unwrap_or_default().to_string(),
                    original: captures[0].to_string(),
                    display: (!alt.is_empty()).then(|| alt.to_string()),
                },
            ));
        }

        found.sort_by_key(|(start, _)| *start);
        found.into_iter().map(|(_, link)| link).collect()
    }

    async fn links(&self, document: &DocumentRef) -> Vec<LinkRef> {
        let Ok(text) = self.read(document).await else {
            return vec![];
        };

        WIKI_LINK
            .captures_iter(&text)
            .filter(|captures| captures[1].is_empty())
            .map(|captures| {
                let (link, display) = Self::split_target(&captures[2]);
                LinkRef { link, original: captures[0].to_string(), display }
            })
            .collect()
    }

    async fn frontmatter(&self, document: &DocumentRef) -> Option<Map<String, Value>> {
        let text = self.read(document).await.ok()?;
        let info = FrontmatterExtractor::extract(&text);
        info.exists.then_some(info.mapping)
    }
}
