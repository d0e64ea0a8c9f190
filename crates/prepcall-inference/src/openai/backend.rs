//! OpenAI-compatible inference backend implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use prepcall_core::{defaults, Error, GenerationBackend, Result};

use super::types::*;

/// Default OpenAI API endpoint.
pub const DEFAULT_OPENAI_URL: &str = defaults::OPENAI_URL;

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = defaults::GEN_MODEL;

/// Default timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = defaults::GEN_TIMEOUT_SECS;

/// Configuration for OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication (optional for local endpoints).
    pub api_key: Option<String>,
    /// Model to use for generation.
    pub gen_model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Response token budget.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Skip TLS verification (for self-signed certs in local environments).
    pub skip_tls_verify: bool,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key: None,
            gen_model: DEFAULT_GEN_MODEL.to_string(),
            temperature: defaults::GEN_TEMPERATURE,
            max_tokens: defaults::GEN_MAX_TOKENS,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            skip_tls_verify: false,
        }
    }
}

/// OpenAI-compatible generation backend.
///
/// Works with any OpenAI-compatible chat-completions endpoint: the OpenAI
/// cloud API, Azure OpenAI, Ollama in compatibility mode, vLLM, LM Studio.
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    /// Create a new OpenAI backend with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let mut client_builder =
            Client::builder().timeout(Duration::from_secs(config.timeout_seconds));

        if config.skip_tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing OpenAI backend: url={}, gen={}",
            config.base_url, config.gen_model
        );

        Ok(Self { client, config })
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(OpenAIConfig::default())
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        let config = OpenAIConfig {
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_URL.to_string()),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            gen_model: std::env::var("OPENAI_GEN_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEN_MODEL.to_string()),
            temperature: std::env::var("OPENAI_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::GEN_TEMPERATURE),
            max_tokens: std::env::var("OPENAI_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::GEN_MAX_TOKENS),
            timeout_seconds: std::env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            skip_tls_verify: std::env::var("OPENAI_SKIP_TLS_VERIFY")
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(false),
        };

        Self::new(config)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Build a request with authentication if configured.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.post(&url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        req.header("Content-Type", "application/json")
    }

    /// Build a GET request with authentication.
    fn build_get_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.get(&url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        req
    }

    /// Check if the backend is available and responding.
    ///
    /// Tries a minimal models-list request; any 2xx counts as healthy.
    pub async fn health_check(&self) -> Result<bool> {
        let response = self
            .build_get_request("/models")
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        match response {
            Ok(resp) => {
                if resp.status().is_success() {
                    info!("OpenAI health check passed");
                    Ok(true)
                } else {
                    warn!("OpenAI health check failed: {}", resp.status());
                    Ok(false)
                }
            }
            Err(e) => {
                warn!("OpenAI health check error: {}", e);
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        debug!(
            "Generating with model {}, prompt length: {}",
            self.config.gen_model,
            prompt.len()
        );

        let mut messages = Vec::new();

        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }

        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        let request = ChatCompletionRequest {
            model: self.config.gen_model.clone(),
            messages,
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
            stream: false,
        };

        let response = self
            .build_request("/chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: OpenAIErrorResponse = response.json().await.unwrap_or(OpenAIErrorResponse {
                error: OpenAIError {
                    message: "Unknown error".to_string(),
                    error_type: "unknown".to_string(),
                    code: None,
                },
            });
            return Err(Error::Inference(format!(
                "OpenAI returned {}: {}",
                status, body.error.message
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        debug!("Generation complete, response length: {}", content.len());
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.gen_model
    }
}
