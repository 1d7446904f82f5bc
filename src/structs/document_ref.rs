use serde::{Deserialize, Serialize};

/// A file or folder in the vault, addressed by its vault-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub path: String,
    pub name: String,
    pub basename: String,
    pub extension: String,
    pub is_folder: bool,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Milliseconds since the Unix epoch.
    pub modified_at: i64,
}

impl DocumentRef {
    pub fn file(path: &str, created_at: i64, modified_at: i64) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        let (basename, extension) = match name.rfind('.') {
            Some(idx) if idx > 0 => (name[..idx].to_string(), name[idx + 1..].to_string()),
            _ => (name.clone(), String::new()),
        };

        Self {
            path: path.to_string(),
            name,
            basename,
            extension,
            is_folder: false,
            created_at,
            modified_at,
        }
    }

    pub fn folder(path: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        Self {
            path: path.to_string(),
            basename: name.clone(),
            name,
            extension: String::new(),
            is_folder: true,
            created_at: 0,
            modified_at: 0,
        }
    }

    /// Folder part of the path, empty for files at the vault root.
    pub fn parent(&self) -> &str {
        self.path.rfind('/').map_or("", |idx| &self.path[..idx])
    }

    pub fn is_markdown(&self) -> bool {
        !self.is_folder && self.extension.eq_ignore_ascii_case("md")
    }
}
