//! Brief generation orchestration.
//!
//! One entry point, [`BriefService::generate`], walks the full pipeline:
//! enrichment fan-out → prompt construction → LLM generation → section
//! classification → persistence. Enrichment is best-effort; a generation
//! or persistence failure propagates to the caller: a brief is stored
//! whole or not at all.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use prepcall_core::{
    Brief, BriefRepository, CreateBriefRequest, EnrichmentProvider, GenerationBackend, NewBrief,
    Result, SectionClassifier,
};
use prepcall_enrich::gather_enrichment;
use prepcall_inference::{build_brief_prompt, BRIEF_SYSTEM_PROMPT};

/// Orchestrates brief generation against pluggable collaborators.
pub struct BriefService {
    backend: Arc<dyn GenerationBackend>,
    providers: Vec<Arc<dyn EnrichmentProvider>>,
    classifier: SectionClassifier,
    repository: Arc<dyn BriefRepository>,
}

impl BriefService {
    /// Create a service over the given backend, enrichment providers, and
    /// repository, classifying with the default five-section taxonomy.
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        providers: Vec<Arc<dyn EnrichmentProvider>>,
        repository: Arc<dyn BriefRepository>,
    ) -> Self {
        Self {
            backend,
            providers,
            classifier: SectionClassifier::with_defaults(),
            repository,
        }
    }

    /// Generate, classify, and persist one brief.
    pub async fn generate(&self, request: CreateBriefRequest) -> Result<Brief> {
        let request = request.validated()?;
        let start = Instant::now();

        info!(
            subsystem = "api",
            component = "brief_service",
            op = "generate",
            company = %request.company_name,
            model = %self.backend.model_name(),
            "Generating brief"
        );

        let enrichment = gather_enrichment(&self.providers, &request.company_name).await;
        let prompt = build_brief_prompt(&request, enrichment.as_deref());

        debug!(
            company = %request.company_name,
            prompt_len = prompt.len(),
            enriched = enrichment.is_some(),
            "Prompt assembled"
        );

        let full_brief = self
            .backend
            .generate_with_system(BRIEF_SYSTEM_PROMPT, &prompt)
            .await?;

        let sections = self.classifier.classify(&full_brief);

        debug!(
            company = %request.company_name,
            response_len = full_brief.len(),
            sections_filled = sections.sections_filled(),
            "Brief classified"
        );

        let id = self
            .repository
            .insert(NewBrief {
                company_name: request.company_name.clone(),
                meeting_date: request.meeting_date,
                attendees: request.attendees.clone(),
                sections,
                full_brief,
            })
            .await?;

        let brief = self.repository.fetch(id).await?;

        info!(
            subsystem = "api",
            component = "brief_service",
            op = "generate",
            brief_id = %id,
            company = %brief.company_name,
            duration_ms = start.elapsed().as_millis() as u64,
            "Brief generated"
        );

        Ok(brief)
    }
}
