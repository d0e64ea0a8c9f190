//! Brief repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use prepcall_core::{
    Brief, BriefRepository, BriefSummary, Error, NewBrief, Result, SectionKey,
};

/// PostgreSQL implementation of [`BriefRepository`].
pub struct PgBriefRepository {
    pool: Pool<Postgres>,
}

impl PgBriefRepository {
    /// Create a new PgBriefRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_brief(row: &PgRow) -> Brief {
        Brief {
            id: row.get("id"),
            company_name: row.get("company_name"),
            meeting_date: row.get("meeting_date"),
            attendees: row.get("attendees"),
            company_context: row.get("company_context"),
            attendee_analysis: row.get("attendee_analysis"),
            tech_stack: row.get("tech_stack"),
            competitive_landscape: row.get("competitive_landscape"),
            suggested_questions: row.get("suggested_questions"),
            full_brief: row.get("full_brief"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn row_to_summary(row: &PgRow) -> BriefSummary {
        BriefSummary {
            id: row.get("id"),
            company_name: row.get("company_name"),
            meeting_date: row.get("meeting_date"),
            attendees: row.get("attendees"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl BriefRepository for PgBriefRepository {
    async fn insert(&self, brief: NewBrief) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO briefs (
                id, company_name, meeting_date, attendees,
                company_context, attendee_analysis, tech_stack,
                competitive_landscape, suggested_questions,
                full_brief, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(id)
        .bind(&brief.company_name)
        .bind(brief.meeting_date)
        .bind(&brief.attendees)
        .bind(brief.sections.text(SectionKey::CompanyContext))
        .bind(brief.sections.text(SectionKey::AttendeeAnalysis))
        .bind(brief.sections.text(SectionKey::TechStack))
        .bind(brief.sections.text(SectionKey::CompetitiveLandscape))
        .bind(brief.sections.text(SectionKey::SuggestedQuestions))
        .bind(&brief.full_brief)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(
            subsystem = "db",
            op = "insert",
            brief_id = %id,
            company = %brief.company_name,
            "Brief stored"
        );

        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<Brief> {
        let row = sqlx::query(
            r#"
            SELECT id, company_name, meeting_date, attendees,
                   company_context, attendee_analysis, tech_stack,
                   competitive_landscape, suggested_questions,
                   full_brief, created_at, updated_at
            FROM briefs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::row_to_brief(&r))
            .ok_or(Error::BriefNotFound(id))
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<BriefSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, company_name, meeting_date, attendees, created_at
            FROM briefs
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::row_to_summary).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM briefs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::BriefNotFound(id));
        }

        debug!(subsystem = "db", op = "delete", brief_id = %id, "Brief deleted");
        Ok(())
    }
}
