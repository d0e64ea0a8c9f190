//! # prepcall-inference
//!
//! LLM inference backend abstraction for prepcall.
//!
//! This crate provides:
//! - The OpenAI-compatible generation backend (cloud or local endpoints)
//! - The brief prompt builder
//! - A deterministic mock backend (feature `mock`) for consumers' tests
//!
//! # Feature Flags
//!
//! - `mock`: Enable [`mock::MockGenerationBackend`]
//! - `integration`: Enable tests that require a live inference endpoint

pub mod openai;
pub mod prompt;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use prepcall_core::*;

pub use openai::{OpenAIBackend, OpenAIConfig};
pub use prompt::{build_brief_prompt, BRIEF_SYSTEM_PROMPT};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerationBackend;
