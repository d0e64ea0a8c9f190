//! Company firmographics provider (Clearbit-compatible endpoint).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use prepcall_core::{defaults, EnrichmentProvider, Error, Result};

/// Configuration for the company data provider.
#[derive(Debug, Clone)]
pub struct CompanyDataConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key. `None` disables the provider.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for CompanyDataConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::COMPANY_DATA_URL.to_string(),
            api_key: None,
            timeout_seconds: defaults::ENRICH_TIMEOUT_SECS,
        }
    }
}

/// Fetches company firmographics from a Clearbit-compatible endpoint.
///
/// Key-gated: without `CLEARBIT_API_KEY` the provider stays registered but
/// contributes nothing (`Ok(None)`), so a bare deployment still generates
/// briefs.
pub struct CompanyDataProvider {
    client: Client,
    config: CompanyDataConfig,
}

/// Subset of the company record we fold into the enrichment block.
#[derive(Debug, Deserialize)]
struct CompanyRecord {
    name: Option<String>,
    domain: Option<String>,
    description: Option<String>,
    #[serde(default)]
    category: Option<CompanyCategory>,
    #[serde(default)]
    metrics: Option<CompanyMetrics>,
    #[serde(rename = "foundedYear")]
    founded_year: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct CompanyCategory {
    industry: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompanyMetrics {
    employees: Option<i64>,
}

impl CompanyDataProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: CompanyDataConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Enrichment(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            provider = "company_data",
            configured = config.api_key.is_some(),
            "Company data provider initialized"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables (`CLEARBIT_API_KEY`,
    /// `CLEARBIT_BASE_URL`).
    pub fn from_env() -> Result<Self> {
        let config = CompanyDataConfig {
            base_url: std::env::var("CLEARBIT_BASE_URL")
                .unwrap_or_else(|_| defaults::COMPANY_DATA_URL.to_string()),
            api_key: std::env::var("CLEARBIT_API_KEY").ok().filter(|k| !k.is_empty()),
            timeout_seconds: defaults::ENRICH_TIMEOUT_SECS,
        };
        Self::new(config)
    }
}

#[async_trait]
impl EnrichmentProvider for CompanyDataProvider {
    async fn enrich(&self, company_name: &str) -> Result<Option<String>> {
        let Some(ref api_key) = self.config.api_key else {
            debug!(provider = "company_data", "No API key configured, skipping");
            return Ok(None);
        };

        let url = format!(
            "{}/v2/companies/find?name={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(company_name)
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .send()
            .await
            .map_err(|e| Error::Enrichment(format!("Company lookup failed: {}", e)))?;

        // Unknown company is a normal outcome, not a failure.
        if response.status() == StatusCode::NOT_FOUND
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
        {
            debug!(
                provider = "company_data",
                company = company_name,
                "Company not found"
            );
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(Error::Enrichment(format!(
                "Company lookup returned {}",
                response.status()
            )));
        }

        let record: CompanyRecord = response
            .json()
            .await
            .map_err(|e| Error::Enrichment(format!("Failed to parse company record: {}", e)))?;

        Ok(format_company_snippet(&record))
    }

    fn name(&self) -> &'static str {
        "company_data"
    }
}

/// Render the record as a compact fact list for the prompt.
fn format_company_snippet(record: &CompanyRecord) -> Option<String> {
    let mut lines = Vec::new();

    if let Some(ref name) = record.name {
        match record.domain {
            Some(ref domain) => lines.push(format!("Company profile: {} ({})", name, domain)),
            None => lines.push(format!("Company profile: {}", name)),
        }
    }
    if let Some(industry) = record.category.as_ref().and_then(|c| c.industry.as_ref()) {
        lines.push(format!("Industry: {}", industry));
    }
    if let Some(employees) = record.metrics.as_ref().and_then(|m| m.employees) {
        lines.push(format!("Employees: {}", employees));
    }
    if let Some(year) = record.founded_year {
        lines.push(format!("Founded: {}", year));
    }
    if let Some(ref description) = record.description {
        lines.push(format!("Description: {}", description));
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
