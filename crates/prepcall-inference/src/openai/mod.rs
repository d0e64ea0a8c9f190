//! OpenAI-compatible inference backend.
//!
//! This module provides a generation backend that works with any
//! OpenAI-compatible chat-completions endpoint, including:
//!
//! - OpenAI cloud API
//! - Azure OpenAI
//! - Ollama (in OpenAI compatibility mode)
//! - vLLM
//! - LocalAI
//! - LM Studio
//!
//! # Example
//!
//! ```rust,no_run
//! use prepcall_inference::openai::{OpenAIBackend, OpenAIConfig};
//! use prepcall_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     // From environment variables
//!     let backend = OpenAIBackend::from_env().unwrap();
//!
//!     // Or with custom config
//!     let config = OpenAIConfig {
//!         base_url: "http://localhost:11434/v1".to_string(), // Ollama
//!         api_key: None, // Not needed for local
//!         gen_model: "llama3".to_string(),
//!         ..Default::default()
//!     };
//!     let backend = OpenAIBackend::new(config).unwrap();
//!
//!     let brief = backend.generate("Generate a brief for Acme").await.unwrap();
//!     println!("{}", brief);
//! }
//! ```

mod backend;
mod types;

pub use backend::{
    OpenAIBackend, OpenAIConfig, DEFAULT_GEN_MODEL, DEFAULT_OPENAI_URL, DEFAULT_TIMEOUT_SECS,
};
pub use types::*;
