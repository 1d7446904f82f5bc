//! Sends markdown notes to webhooks and routes the responses back into the
//! vault.
//!
//! The pipeline lives in [`services::webhook_service`]. Everything it needs
//! from the outside world goes through the traits in [`traits`]; the crate
//! ships a directory-backed vault, a `reqwest` transport and terminal prompts
//! for the command-line tool.

pub mod config;
pub mod enums;
pub mod errors;
pub mod helpers;
pub mod logger;
pub mod services;
pub mod structs;
pub mod traits;
pub mod workers;
