//! Postgres repositories implementing the store traits

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::DbError;
use super::models::{ArtifactRow, ContactRow, SuggestionRow};
use super::store::{ArtifactStore, ContactStore, SuggestionStore};
use crate::model::{
    AiParsingStatus, Artifact, ContactPatch, ContactRecord, ResetOutcome, ReviewState,
    SuggestionRecord,
};

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DbError> {
    serde_json::to_value(value).map_err(|e| DbError::Serialization(e.to_string()))
}

/// Repository for contact rows
#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for ContactRepository {
    async fn get_contact(&self, id: Uuid) -> Result<Option<ContactRecord>, DbError> {
        let row: Option<ContactRow> = sqlx::query_as("SELECT * FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_domain().map_err(DbError::Serialization))
            .transpose()
    }

    /// The row is locked for the duration so concurrent approvals on the
    /// same contact serialize instead of overwriting each other.
    async fn update_contact_fields(
        &self,
        id: Uuid,
        patch: &ContactPatch,
    ) -> Result<ContactRecord, DbError> {
        let mut tx = self.pool.begin().await?;

        let row: ContactRow = sqlx::query_as("SELECT * FROM contacts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::NotFound(id.to_string()))?;

        let mut contact = row.into_domain().map_err(DbError::Serialization)?;
        patch
            .apply_to(&mut contact)
            .map_err(|e| DbError::InvalidPatch(e.to_string()))?;

        let field_sources = to_json(&contact.field_sources)?;

        sqlx::query(
            r#"
            UPDATE contacts SET
                name = $2,
                email = $3,
                phone = $4,
                company = $5,
                title = $6,
                location = $7,
                linkedin_url = $8,
                professional_context = $9,
                personal_context = $10,
                field_sources = $11,
                updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.company)
        .bind(&contact.title)
        .bind(&contact.location)
        .bind(&contact.linkedin_url)
        .bind(&contact.professional_context)
        .bind(&contact.personal_context)
        .bind(&field_sources)
        .bind(contact.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            contact_id = %id,
            writes = patch.writes.len(),
            "Applied contact patch"
        );
        Ok(contact)
    }
}

/// Repository for artifact rows
#[derive(Clone)]
pub struct ArtifactRepository {
    pool: PgPool,
}

impl ArtifactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArtifactStore for ArtifactRepository {
    async fn get_artifact(&self, id: Uuid) -> Result<Option<Artifact>, DbError> {
        let row: Option<ArtifactRow> = sqlx::query_as("SELECT * FROM artifacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_domain().map_err(DbError::Serialization))
            .transpose()
    }

    async fn claim_for_processing(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE artifacts SET
                ai_parsing_status = 'processing',
                ai_processing_started_at = COALESCE(ai_processing_started_at, $2),
                ai_processing_completed_at = NULL
            WHERE id = $1
              AND type = 'voice_memo'
              AND transcription_status = 'completed'
              AND ai_parsing_status = 'pending'
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn finish_processing(
        &self,
        id: Uuid,
        status: AiParsingStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE artifacts SET
                ai_parsing_status = $2,
                ai_processing_completed_at = $3
            WHERE id = $1 AND ai_parsing_status = 'processing'
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn reset_for_reprocessing(&self, id: Uuid) -> Result<ResetOutcome, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE artifacts SET
                ai_parsing_status = 'pending',
                ai_processing_completed_at = NULL
            WHERE id = $1 AND ai_parsing_status <> 'processing'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(ResetOutcome::Reset);
        }

        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM artifacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match exists {
            Some(_) => ResetOutcome::Conflict,
            None => ResetOutcome::NotFound,
        })
    }
}

/// Repository for suggestion records
#[derive(Clone)]
pub struct SuggestionRepository {
    pool: PgPool,
}

impl SuggestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_where(&self, column: &str, id: Uuid) -> Result<Vec<SuggestionRecord>, DbError> {
        let query = format!(
            "SELECT * FROM contact_update_suggestions WHERE {} = $1 ORDER BY created_at DESC",
            column
        );
        let rows: Vec<SuggestionRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|r| r.into_domain().map_err(DbError::Serialization))
            .collect()
    }
}

#[async_trait]
impl SuggestionStore for SuggestionRepository {
    async fn insert_suggestion_record(&self, record: &SuggestionRecord) -> Result<(), DbError> {
        let suggested_updates = to_json(&record.suggested_updates)?;
        let confidence_scores = to_json(&record.confidence_scores)?;
        let applied_indices = to_json(&record.applied_indices)?;

        sqlx::query(
            r#"
            INSERT INTO contact_update_suggestions (
                id, artifact_id, contact_id, user_id,
                suggested_updates, field_paths, confidence_scores,
                status, priority, applied_indices, created_at,
                reviewed_at, applied_at, dismissed_at, viewed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(record.id)
        .bind(record.artifact_id)
        .bind(record.contact_id)
        .bind(record.user_id)
        .bind(&suggested_updates)
        .bind(&record.field_paths)
        .bind(&confidence_scores)
        .bind(record.status.as_str())
        .bind(record.priority.as_str())
        .bind(&applied_indices)
        .bind(record.created_at)
        .bind(record.reviewed_at)
        .bind(record.applied_at)
        .bind(record.dismissed_at)
        .bind(record.viewed_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %record.id, artifact_id = %record.artifact_id, "Inserted suggestion record");
        Ok(())
    }

    async fn get_suggestion_record(&self, id: Uuid) -> Result<Option<SuggestionRecord>, DbError> {
        let row: Option<SuggestionRow> =
            sqlx::query_as("SELECT * FROM contact_update_suggestions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|r| r.into_domain().map_err(DbError::Serialization))
            .transpose()
    }

    async fn update_suggestion_record_status(
        &self,
        id: Uuid,
        expected: &ReviewState,
        state: &ReviewState,
    ) -> Result<bool, DbError> {
        let expected_indices = to_json(&expected.applied_indices)?;
        let applied_indices = to_json(&state.applied_indices)?;

        let result = sqlx::query(
            r#"
            UPDATE contact_update_suggestions SET
                status = $4,
                applied_indices = $5,
                reviewed_at = $6,
                applied_at = $7,
                dismissed_at = $8
            WHERE id = $1 AND status = $2 AND applied_indices = $3
            "#,
        )
        .bind(id)
        .bind(expected.status.as_str())
        .bind(&expected_indices)
        .bind(state.status.as_str())
        .bind(&applied_indices)
        .bind(state.reviewed_at)
        .bind(state.applied_at)
        .bind(state.dismissed_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_suggestion_record(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM contact_update_suggestions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_suggestion_viewed(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, DbError> {
        let result = sqlx::query(
            "UPDATE contact_update_suggestions SET viewed_at = COALESCE(viewed_at, $2) WHERE id = $1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_artifact(&self, artifact_id: Uuid) -> Result<Vec<SuggestionRecord>, DbError> {
        self.list_where("artifact_id", artifact_id).await
    }

    async fn list_for_contact(&self, contact_id: Uuid) -> Result<Vec<SuggestionRecord>, DbError> {
        self.list_where("contact_id", contact_id).await
    }
}
