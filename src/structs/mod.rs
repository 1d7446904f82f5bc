pub mod attachment;
pub mod cli;
pub mod config;
pub mod document_ref;
pub mod frontmatter_info;
pub mod link_ref;
pub mod outbound_payload;
pub mod outbound_request;
pub mod raw_response;
pub mod response_mode_choice;
pub mod send_outcome;
pub mod send_request;
pub mod variable_note;
pub mod webhook_response;
