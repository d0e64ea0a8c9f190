//! Centralized default constants for the prepcall system.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates should reference these constants instead of defining
//! their own magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// GENERATION
// =============================================================================

/// Default OpenAI-compatible API endpoint.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default generation model.
pub const GEN_MODEL: &str = "gpt-4o-mini";

/// Default generation timeout in seconds. Brief generation produces a long
/// multi-section document; slow local backends need the headroom.
pub const GEN_TIMEOUT_SECS: u64 = 300;

/// Sampling temperature for brief generation. High enough for varied
/// phrasing, low enough that section headings stay recognizable.
pub const GEN_TEMPERATURE: f32 = 0.7;

/// Response token budget for one brief.
pub const GEN_MAX_TOKENS: u32 = 4096;

// =============================================================================
// ENRICHMENT
// =============================================================================

/// Default Clearbit-compatible company data endpoint.
pub const COMPANY_DATA_URL: &str = "https://company.clearbit.com";

/// Default SerpAPI-compatible news search endpoint.
pub const NEWS_SEARCH_URL: &str = "https://serpapi.com";

/// Timeout for a single enrichment fetch in seconds. Enrichment is
/// advisory; a slow provider must not stall brief generation.
pub const ENRICH_TIMEOUT_SECS: u64 = 10;

/// Maximum news headlines folded into the enrichment block.
pub const NEWS_RESULT_LIMIT: usize = 5;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for the brief history endpoint.
pub const HISTORY_LIMIT: i64 = 20;

/// Upper bound for the brief history page size.
pub const HISTORY_LIMIT_MAX: i64 = 100;

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Default brief generations allowed per period.
pub const RATE_LIMIT_REQUESTS: u64 = 10;

/// Default rate limit period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;
