//! Domain models for prepcall.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sections::{ClassifiedBrief, SectionKey};

/// Request to generate a new intelligence brief.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBriefRequest {
    /// Company the meeting is with. Required, non-empty after trimming.
    pub company_name: String,
    /// Scheduled meeting date, if known.
    #[serde(default)]
    pub meeting_date: Option<DateTime<Utc>>,
    /// Free-text attendee list ("Jane Doe (CTO), Sam Lee (VP Eng)").
    #[serde(default)]
    pub attendees: Option<String>,
}

impl CreateBriefRequest {
    /// Validate the request, normalizing the company name.
    pub fn validated(mut self) -> crate::Result<Self> {
        let trimmed = self.company_name.trim();
        if trimmed.is_empty() {
            return Err(crate::Error::InvalidInput(
                "company_name must not be empty".to_string(),
            ));
        }
        self.company_name = trimmed.to_string();
        self.attendees = self
            .attendees
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        Ok(self)
    }
}

/// Insert payload for a classified brief.
///
/// Carries the request metadata, the classified sections, and the verbatim
/// model output.
#[derive(Debug, Clone)]
pub struct NewBrief {
    pub company_name: String,
    pub meeting_date: Option<DateTime<Utc>>,
    pub attendees: Option<String>,
    pub sections: ClassifiedBrief,
    pub full_brief: String,
}

/// A stored intelligence brief.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brief {
    pub id: Uuid,
    pub company_name: String,
    pub meeting_date: Option<DateTime<Utc>>,
    pub attendees: Option<String>,
    /// Section texts are raw markdown, possibly empty, never null.
    pub company_context: String,
    pub attendee_analysis: String,
    pub tech_stack: String,
    pub competitive_landscape: String,
    pub suggested_questions: String,
    /// Verbatim model output, before classification.
    pub full_brief: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Brief {
    /// Section text by key.
    pub fn section(&self, key: SectionKey) -> &str {
        match key {
            SectionKey::CompanyContext => &self.company_context,
            SectionKey::AttendeeAnalysis => &self.attendee_analysis,
            SectionKey::TechStack => &self.tech_stack,
            SectionKey::CompetitiveLandscape => &self.competitive_landscape,
            SectionKey::SuggestedQuestions => &self.suggested_questions,
        }
    }
}

/// Compact brief row for history listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefSummary {
    pub id: Uuid,
    pub company_name: String,
    pub meeting_date: Option<DateTime<Utc>>,
    pub attendees: Option<String>,
    pub created_at: DateTime<Utc>,
}
