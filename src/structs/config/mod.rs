pub mod settings;
pub mod webhook_config;
