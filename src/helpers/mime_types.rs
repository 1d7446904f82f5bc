use crate::config::constants::{DEFAULT_BINARY_EXTENSION, DEFAULT_MIME_TYPE};

/// Extension to MIME type table shared by attachment encoding and response
/// file naming. The first entry for a MIME type is its canonical extension.
pub const MIME_TYPES: &[(&str, &str)] = &[
    // Images
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("bmp", "image/bmp"),
    ("tiff", "image/tiff"),
    // Audio
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("opus", "audio/opus"),
    ("aac", "audio/aac"),
    ("m4a", "audio/mp4"),
    ("flac", "audio/flac"),
    // Video
    ("mp4", "video/mp4"),
    ("mpeg", "video/mpeg"),
    ("webm", "video/webm"),
    ("ogv", "video/ogg"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("mkv", "video/x-matroska"),
    // Documents
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    ("docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
    ("xls", "application/vnd.ms-excel"),
    ("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    ("ppt", "application/vnd.ms-powerpoint"),
    ("pptx", "application/vnd.openxmlformats-officedocument.presentationml.presentation"),
    // Archives
    ("zip", "application/zip"),
    ("rar", "application/x-rar-compressed"),
    ("7z", "application/x-7z-compressed"),
    ("tar", "application/x-tar"),
    ("gz", "application/gzip"),
    // Other
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("txt", "text/plain"),
    ("csv", "text/csv"),
    ("md", "text/markdown"),
];

/// Alternate spellings some servers send, mapped to an extension.
const MIME_ALIASES: &[(&str, &str)] = &[
    ("image/jpg", "jpg"),
    ("audio/mp3", "mp3"),
    ("audio/wave", "wav"),
    ("audio/x-wav", "wav"),
    ("audio/x-m4a", "m4a"),
];

pub struct MimeTypeHelper;

impl MimeTypeHelper {
    pub fn mime_type(extension: &str) -> &'static str {
        let extension = extension.to_lowercase();
        MIME_TYPES
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map_or(DEFAULT_MIME_TYPE, |(_, mime)| *mime)
    }

    /// Returns the extension (with leading dot) for a content type header
    /// value. Parameters such as `; charset=utf-8` are ignored.
    pub fn extension_for(content_type: &str) -> String {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        MIME_TYPES
            .iter()
            .find(|(_, mime)| *mime == essence)
            .map(|(ext, _)| *ext)
            .or_else(|| {
                MIME_ALIASES
                    .iter()
                    .find(|(mime, _)| *mime == essence)
                    .map(|(_, ext)| *ext)
            })
            .map_or_else(|| DEFAULT_BINARY_EXTENSION.to_string(), |ext| format!(".{ext}"))
    }
}
