//! # prepcall-enrich
//!
//! External company-signal enrichment for prepcall.
//!
//! This crate provides:
//! - Company firmographics lookup (Clearbit-compatible endpoint)
//! - Recent-news search (SerpAPI-compatible endpoint)
//! - A fan-out helper that queries every configured provider concurrently
//!
//! Enrichment is strictly advisory. Providers are key-gated (unconfigured
//! providers contribute nothing) and a provider failure is logged and
//! skipped; brief generation never fails because a lookup did.

pub mod company;
pub mod news;

use std::sync::Arc;

use tracing::{debug, warn};

use prepcall_core::EnrichmentProvider;

// Re-export core types
pub use prepcall_core::{Error, Result};

pub use company::{CompanyDataConfig, CompanyDataProvider};
pub use news::{NewsSearchConfig, NewsSearchProvider};

/// Build the default provider set from environment configuration.
pub fn providers_from_env() -> Result<Vec<Arc<dyn EnrichmentProvider>>> {
    Ok(vec![
        Arc::new(CompanyDataProvider::from_env()?),
        Arc::new(NewsSearchProvider::from_env()?),
    ])
}

/// Query every provider concurrently and fold the snippets into one
/// enrichment block.
///
/// Returns `None` when no provider had anything to contribute. Provider
/// errors are downgraded to WARN logs; a dead enrichment endpoint must
/// not take brief generation down with it.
pub async fn gather_enrichment(
    providers: &[Arc<dyn EnrichmentProvider>],
    company_name: &str,
) -> Option<String> {
    let fetches = providers.iter().map(|provider| {
        let provider = Arc::clone(provider);
        let company = company_name.to_string();
        async move { (provider.name(), provider.enrich(&company).await) }
    });

    let mut snippets = Vec::new();
    for (name, outcome) in futures::future::join_all(fetches).await {
        match outcome {
            Ok(Some(snippet)) => {
                debug!(provider = name, len = snippet.len(), "Enrichment snippet collected");
                snippets.push(snippet);
            }
            Ok(None) => {
                debug!(provider = name, "Provider had nothing to contribute");
            }
            Err(e) => {
                warn!(provider = name, error = %e, "Enrichment provider failed, skipping");
            }
        }
    }

    if snippets.is_empty() {
        None
    } else {
        Some(snippets.join("\n\n"))
    }
}
