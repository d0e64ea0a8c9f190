//! # prepcall-core
//!
//! Core types, traits, and abstractions for the prepcall service.
//!
//! This crate provides the foundational data structures, the markdown
//! section classifier, and the trait definitions the other prepcall
//! crates depend on. It performs no I/O.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod sections;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::{Brief, BriefSummary, CreateBriefRequest, NewBrief};
pub use sections::{
    ClassifiedBrief, SectionClassifier, SectionKey, SectionTaxonomy, DEFAULT_ALIASES,
};
pub use traits::{BriefRepository, EnrichmentProvider, GenerationBackend};
