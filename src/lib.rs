pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod history;
pub mod http;
pub mod llm;
pub mod prompts;
pub mod types;
pub mod validation;
