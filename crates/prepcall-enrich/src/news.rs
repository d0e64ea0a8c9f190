//! Recent-news provider (SerpAPI-compatible endpoint).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use prepcall_core::{defaults, EnrichmentProvider, Error, Result};

/// Configuration for the news search provider.
#[derive(Debug, Clone)]
pub struct NewsSearchConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key. `None` disables the provider.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Maximum headlines folded into the snippet.
    pub result_limit: usize,
}

impl Default for NewsSearchConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::NEWS_SEARCH_URL.to_string(),
            api_key: None,
            timeout_seconds: defaults::ENRICH_TIMEOUT_SECS,
            result_limit: defaults::NEWS_RESULT_LIMIT,
        }
    }
}

/// Fetches recent company news from a SerpAPI-compatible endpoint
/// (Google News engine).
pub struct NewsSearchProvider {
    client: Client,
    config: NewsSearchConfig,
}

#[derive(Debug, Deserialize)]
struct NewsSearchResponse {
    #[serde(default)]
    news_results: Vec<NewsResult>,
}

#[derive(Debug, Deserialize)]
struct NewsResult {
    title: String,
    #[serde(default)]
    source: Option<NewsSource>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsSource {
    name: Option<String>,
}

impl NewsSearchProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: NewsSearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Enrichment(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            provider = "news_search",
            configured = config.api_key.is_some(),
            "News search provider initialized"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables (`SERP_API_KEY`, `SERP_BASE_URL`).
    pub fn from_env() -> Result<Self> {
        let config = NewsSearchConfig {
            base_url: std::env::var("SERP_BASE_URL")
                .unwrap_or_else(|_| defaults::NEWS_SEARCH_URL.to_string()),
            api_key: std::env::var("SERP_API_KEY").ok().filter(|k| !k.is_empty()),
            timeout_seconds: defaults::ENRICH_TIMEOUT_SECS,
            result_limit: defaults::NEWS_RESULT_LIMIT,
        };
        Self::new(config)
    }
}

#[async_trait]
impl EnrichmentProvider for NewsSearchProvider {
    async fn enrich(&self, company_name: &str) -> Result<Option<String>> {
        let Some(ref api_key) = self.config.api_key else {
            debug!(provider = "news_search", "No API key configured, skipping");
            return Ok(None);
        };

        let url = format!(
            "{}/search.json?engine=google_news&q={}&api_key={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(company_name),
            urlencoding::encode(api_key)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Enrichment(format!("News search failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Enrichment(format!(
                "News search returned {}",
                response.status()
            )));
        }

        let result: NewsSearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Enrichment(format!("Failed to parse news results: {}", e)))?;

        debug!(
            provider = "news_search",
            company = company_name,
            result_count = result.news_results.len(),
            "News search complete"
        );

        Ok(format_news_snippet(
            &result.news_results,
            self.config.result_limit,
        ))
    }

    fn name(&self) -> &'static str {
        "news_search"
    }
}

/// Render the top headlines as a bullet list for the prompt.
fn format_news_snippet(results: &[NewsResult], limit: usize) -> Option<String> {
    if results.is_empty() {
        return None;
    }

    let mut lines = vec!["Recent news:".to_string()];
    for item in results.iter().take(limit) {
        let mut line = format!("- {}", item.title);
        let source = item.source.as_ref().and_then(|s| s.name.as_deref());
        match (source, item.date.as_deref()) {
            (Some(source), Some(date)) => line.push_str(&format!(" ({}, {})", source, date)),
            (Some(source), None) => line.push_str(&format!(" ({})", source)),
            (None, Some(date)) => line.push_str(&format!(" ({})", date)),
            (None, None) => {}
        }
        if let Some(ref snippet) = item.snippet {
            line.push_str(&format!(": {}", snippet));
        }
        lines.push(line);
    }

    Some(lines.join("\n"))
}
