//! Mock generation backend for deterministic testing.
//!
//! Provides a scripted implementation of [`GenerationBackend`] so service
//! and handler tests can run without a network. Responses are fully
//! deterministic: a default canned response, optional per-substring
//! response mappings, and an optional scripted failure.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use prepcall_core::{Error, GenerationBackend, Result};

/// One recorded generation call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
}

#[derive(Debug, Clone)]
struct MockConfig {
    default_response: String,
    /// Responses keyed by prompt substring, checked in insertion order.
    mapped_responses: Vec<(String, String)>,
    failure: Option<String>,
    model_name: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            default_response: "Mock response".to_string(),
            mapped_responses: Vec::new(),
            failure: None,
            model_name: "mock-model".to_string(),
        }
    }
}

/// Deterministic mock generation backend.
#[derive(Clone, Default)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockGenerationBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canned response returned when no mapping matches.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Map prompts containing `substring` to a specific response.
    pub fn with_response_mapping(
        mut self,
        substring: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .mapped_responses
            .push((substring.into(), response.into()));
        self
    }

    /// Make every generation call fail with the given message.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(message.into());
        self
    }

    /// Override the reported model name.
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).model_name = name.into();
        self
    }

    /// All generation calls seen so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of generation calls seen so far.
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.call_log.lock().unwrap().push(MockCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
        });

        if let Some(ref message) = self.config.failure {
            return Err(Error::Inference(message.clone()));
        }

        for (substring, response) in &self.config.mapped_responses {
            if prompt.contains(substring.as_str()) {
                return Ok(response.clone());
            }
        }

        Ok(self.config.default_response.clone())
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }
}
