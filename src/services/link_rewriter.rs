use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

use crate::config::constants::OBSIDIAN_URI_PREFIX;
use crate::traits::metadata_index::MetadataIndex;

static WIKI_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(!?)\[\[([^\[\]]+?)\]\]").expect("valid wiki link regex"));

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub struct LinkRewriter<'a> {
    index: &'a dyn MetadataIndex,
    vault_name: &'a str,
}

impl<'a> LinkRewriter<'a> {
    pub fn new(index: &'a dyn MetadataIndex, vault_name: &'a str) -> Self {
        Self { index, vault_name }
    }

    /// Turns `[[target|alias]]` into `[alias](obsidian://vault/<vault>/<path>)`.
    /// Embeds and links that do not resolve are left as written.
    pub async fn rewrite(&self, content: &str, source_path: &str) -> String {
        let mut output = String::with_capacity(content.len());
        let mut last = 0;

        for captures in WIKI_LINK.captures_iter(content) {
            let Some(whole) = captures.get(0) else { continue };
            output.push_str(&content[last..whole.start()]);
            last = whole.end();

            if !captures[1].is_empty() {
                output.push_str(whole.as_str());
                continue;
            }

            let inner = &captures[2];
            let (target, display) = match inner.split_once('|') {
                Some((target, alias)) => (target.trim(), alias.trim()),
                None => (inner.trim(), inner.trim()),
            };
            let lookup = target.split('#').next().unwrap_or(target).trim();

            match self.index.resolve(lookup, source_path).await {
                Some(resolved) if !lookup.is_empty() && !resolved.is_folder => {
                    output.push_str(&format!("[{}]({})", display, self.uri_for(&resolved.path)));
                }
                _ => output.push_str(whole.as_str()),
            }
        }

        output.push_str(&content[last..]);
        output
    }

    pub fn uri_for(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            OBSIDIAN_URI_PREFIX,
            utf8_percent_encode(self.vault_name, URI_COMPONENT),
            utf8_percent_encode(path, URI_COMPONENT)
        )
    }
}
