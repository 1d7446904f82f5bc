pub mod config_helper;
pub mod content_type_helper;
pub mod mime_types;
pub mod url_helper;
