//! Shared test doubles for API and service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use prepcall_core::{
    Brief, BriefRepository, BriefSummary, Error, NewBrief, Result, SectionKey,
};

/// In-memory repository double.
#[derive(Default)]
pub struct InMemoryBriefRepository {
    pub briefs: Mutex<HashMap<Uuid, Brief>>,
}

#[async_trait]
impl BriefRepository for InMemoryBriefRepository {
    async fn insert(&self, brief: NewBrief) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();
        let stored = Brief {
            id,
            company_name: brief.company_name,
            meeting_date: brief.meeting_date,
            attendees: brief.attendees,
            company_context: brief.sections.text(SectionKey::CompanyContext).to_string(),
            attendee_analysis: brief.sections.text(SectionKey::AttendeeAnalysis).to_string(),
            tech_stack: brief.sections.text(SectionKey::TechStack).to_string(),
            competitive_landscape: brief
                .sections
                .text(SectionKey::CompetitiveLandscape)
                .to_string(),
            suggested_questions: brief
                .sections
                .text(SectionKey::SuggestedQuestions)
                .to_string(),
            full_brief: brief.full_brief,
            created_at: now,
            updated_at: now,
        };
        self.briefs.lock().unwrap().insert(id, stored);
        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<Brief> {
        self.briefs
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(Error::BriefNotFound(id))
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<BriefSummary>> {
        let mut summaries: Vec<BriefSummary> = self
            .briefs
            .lock()
            .unwrap()
            .values()
            .map(|b| BriefSummary {
                id: b.id,
                company_name: b.company_name.clone(),
                meeting_date: b.meeting_date,
                attendees: b.attendees.clone(),
                created_at: b.created_at,
            })
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries.truncate(limit as usize);
        Ok(summaries)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.briefs
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::BriefNotFound(id))
    }
}
