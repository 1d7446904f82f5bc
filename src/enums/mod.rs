pub mod commands;
pub mod response_handling;
pub mod response_kind;
