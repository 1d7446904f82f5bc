pub mod attachment_resolver;
pub mod dispatch_engine;
pub mod frontmatter_extractor;
pub mod fs_vault;
pub mod inline_field_extractor;
pub mod link_rewriter;
pub mod markup_renderer;
pub mod payload_builder;
pub mod reqwest_transport;
pub mod response_interpreter;
pub mod response_router;
pub mod stdin_prompt;
pub mod variable_note_service;
pub mod webhook_service;
