pub mod apis;
pub mod arguments;
pub mod config;
pub mod core;
pub mod logger;
pub mod paths;
pub mod transcripts;
pub mod webserver;
