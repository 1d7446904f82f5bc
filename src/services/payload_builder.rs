use serde_json::{json, Map, Value};

use crate::services::frontmatter_extractor::FrontmatterExtractor;
use crate::services::inline_field_extractor::InlineFieldExtractor;
use crate::services::link_rewriter::LinkRewriter;
use crate::services::markup_renderer::MarkupRenderer;
use crate::structs::attachment::Attachment;
use crate::structs::document_ref::DocumentRef;
use crate::structs::outbound_payload::{
    OutboundPayload, KEY_ATTACHMENTS, KEY_CONTENT, KEY_CREATED_AT, KEY_FILENAME, KEY_FILEPATH, KEY_MODIFIED_AT,
    KEY_TIMESTAMP,
};
use crate::structs::variable_note::VariableNote;

/// Everything the payload is assembled from.
pub struct PayloadInput<'a> {
    pub text: &'a str,
    pub document: &'a DocumentRef,
    pub selection: Option<&'a str>,
    pub attachments: Vec<Attachment>,
    pub variable_note: Option<&'a VariableNote>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

pub struct PayloadBuilder<'a> {
    link_rewriter: Option<LinkRewriter<'a>>,
    process_inline_fields: bool,
    include_raw_content: bool,
    render_markup: bool,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new() -> Self {
        Self {
            link_rewriter: None,
            process_inline_fields: false,
            include_raw_content: false,
            render_markup: false,
        }
    }

    pub fn with_link_rewriter(mut self, rewriter: LinkRewriter<'a>) -> Self {
        self.link_rewriter = Some(rewriter);
        self
    }

    pub fn with_inline_fields(mut self, enabled: bool) -> Self {
        self.process_inline_fields = enabled;
        self
    }

    pub fn with_raw_content(mut self, enabled: bool) -> Self {
        self.include_raw_content = enabled;
        self
    }

    pub fn with_rendered_markup(mut self, enabled: bool) -> Self {
        self.render_markup = enabled;
        self
    }

    pub async fn build(&self, input: PayloadInput<'_>) -> OutboundPayload {
        let info = FrontmatterExtractor::extract(input.text);
        let body = info.body(input.text);

        let mut content = match input.selection {
            Some(selection) => selection.to_string(),
            None if self.include_raw_content => input.text.to_string(),
            None if info.exists => body.trim().to_string(),
            None => input.text.to_string(),
        };

        if let Some(rewriter) = &self.link_rewriter {
            content = rewriter.rewrite(&content, &input.document.path).await;
        }

        let rendered_html = self.render_markup.then(|| MarkupRenderer::render(&content));

        let mut layers = Vec::with_capacity(4);
        if info.exists {
            layers.push(info.mapping.clone());
        }
        layers.push(Self::reserved_fields(&input, content));
        if self.process_inline_fields {
            layers.push(InlineFieldExtractor::extract(input.selection.unwrap_or(body)));
        }
        if let Some(note) = input.variable_note {
            layers.push(note.as_layer());
        }

        let mut payload = OutboundPayload::from_map(merge_layers(layers));
        if let Some(html) = rendered_html {
            payload.set_rendered_html(html);
        }
        payload
    }

    fn reserved_fields(input: &PayloadInput<'_>, content: String) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(KEY_CONTENT.to_string(), Value::String(content));
        fields.insert(KEY_FILENAME.to_string(), Value::String(input.document.name.clone()));
        fields.insert(KEY_FILEPATH.to_string(), Value::String(input.document.path.clone()));
        fields.insert(KEY_TIMESTAMP.to_string(), json!(input.timestamp));
        fields.insert(KEY_CREATED_AT.to_string(), json!(input.document.created_at));
        fields.insert(KEY_MODIFIED_AT.to_string(), json!(input.document.modified_at));
        fields.insert(KEY_ATTACHMENTS.to_string(), json!(input.attachments));
        fields
    }
}

impl Default for PayloadBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shallow merge where later layers win on key collisions.
pub fn merge_layers(layers: Vec<Map<String, Value>>) -> Map<String, Value> {
    let mut merged = Map::new();
    for layer in layers {
        for (key, value) in layer {
            merged.insert(key, value);
        }
    }
    merged
}
