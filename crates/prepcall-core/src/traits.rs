//! Core traits for prepcall abstractions.
//!
//! These traits define the seams between the orchestration layer and its
//! collaborators (generation, enrichment, persistence), enabling
//! pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Brief, BriefSummary, NewBrief};

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

// =============================================================================
// ENRICHMENT TRAITS
// =============================================================================

/// Provider of external signal about a company.
///
/// Enrichment is advisory: `Ok(None)` means the provider had nothing to
/// contribute (not configured, company unknown). Errors are for actual
/// fetch failures; the caller logs and continues without the snippet.
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    /// Fetch a text snippet about the company, if available.
    async fn enrich(&self, company_name: &str) -> Result<Option<String>>;

    /// Stable provider name for logging.
    fn name(&self) -> &'static str;
}

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

/// Repository for brief persistence.
#[async_trait]
pub trait BriefRepository: Send + Sync {
    /// Insert a classified brief. Returns the new brief's ID.
    async fn insert(&self, brief: NewBrief) -> Result<Uuid>;

    /// Fetch a full brief by ID.
    async fn fetch(&self, id: Uuid) -> Result<Brief>;

    /// List the most recent briefs, newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<BriefSummary>>;

    /// Permanently delete a brief.
    async fn delete(&self, id: Uuid) -> Result<()>;
}
