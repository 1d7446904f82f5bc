use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::config::constants::EXCLUDE_ATTACHMENT_KEY;
use crate::structs::frontmatter_info::FrontmatterInfo;

static FRONTMATTER_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^---[ \t]*\r?\n(?:([\s\S]*?)\r?\n)?---[ \t]*(?:\r?\n|$)").expect("valid frontmatter regex")
});

pub struct FrontmatterExtractor;

impl FrontmatterExtractor {
    /// Finds and parses the YAML header at the very start of `text`.
    ///
    /// Malformed YAML is treated as if there were no header at all. A header
    /// that parses to something other than a mapping yields an empty mapping.
    pub fn extract(text: &str) -> FrontmatterInfo {
        let Some(captures) = FRONTMATTER_BLOCK.captures(text) else {
            return FrontmatterInfo::absent();
        };

        let body_start = captures.get(0).map_or(0, |m| m.end());
        let yaml = captures.get(1).map_or("", |m| m.as_str());

        let mapping = if yaml.trim().is_empty() {
            Map::new()
        } else {
            match serde_yaml::from_str::<Value>(yaml) {
                Ok(Value::Object(map)) => map,
                Ok(_) => Map::new(),
                Err(e) => {
                    log::warn!("⚠️ Invalid YAML frontmatter, sending note without it: {}", e);
                    return FrontmatterInfo::absent();
                }
            }
        };

        FrontmatterInfo {
            exists: true,
            mapping,
            body_start,
        }
    }

    /// Names listed under `exclude-attachment`, as a single string or a list.
    pub fn excluded_attachments(text: &str) -> Vec<String> {
        let info = Self::extract(text);
        Self::excluded_attachments_from(&info.mapping)
    }

    pub fn excluded_attachments_from(mapping: &Map<String, Value>) -> Vec<String> {
        match mapping.get(EXCLUDE_ATTACHMENT_KEY) {
            Some(Value::String(name)) => vec![name.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => vec![],
        }
    }
}
