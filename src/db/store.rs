//! Store traits consumed by the extraction and review services
//!
//! Services take these as `Arc<dyn ...>` so the Postgres repositories can be
//! swapped for the in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DbError;
use crate::model::{
    AiParsingStatus, Artifact, ContactPatch, ContactRecord, ResetOutcome, ReviewState,
    SuggestionRecord,
};

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn get_contact(&self, id: Uuid) -> Result<Option<ContactRecord>, DbError>;

    /// Apply every write and provenance entry of `patch`, or none of them
    async fn update_contact_fields(
        &self,
        id: Uuid,
        patch: &ContactPatch,
    ) -> Result<ContactRecord, DbError>;
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn get_artifact(&self, id: Uuid) -> Result<Option<Artifact>, DbError>;

    /// Move an eligible `pending` artifact to `processing`
    ///
    /// Returns false when the conditional update matched nothing, i.e.
    /// another invocation already owns the artifact.
    async fn claim_for_processing(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, DbError>;

    /// Move a `processing` artifact to `completed` or `failed` and stamp completion
    async fn finish_processing(
        &self,
        id: Uuid,
        status: AiParsingStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, DbError>;

    /// Put a non-processing artifact back to `pending`
    async fn reset_for_reprocessing(&self, id: Uuid) -> Result<ResetOutcome, DbError>;
}

#[async_trait]
pub trait SuggestionStore: Send + Sync {
    async fn insert_suggestion_record(&self, record: &SuggestionRecord) -> Result<(), DbError>;

    async fn get_suggestion_record(&self, id: Uuid) -> Result<Option<SuggestionRecord>, DbError>;

    /// Write `state` if the record's status and applied indices still equal
    /// those of `expected`
    ///
    /// Returns false when another review got there first.
    async fn update_suggestion_record_status(
        &self,
        id: Uuid,
        expected: &ReviewState,
        state: &ReviewState,
    ) -> Result<bool, DbError>;

    /// Drop a record written by an attempt that did not complete
    async fn delete_suggestion_record(&self, id: Uuid) -> Result<bool, DbError>;

    /// Stamp `viewed_at` if unset; returns false if the record does not exist
    async fn mark_suggestion_viewed(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, DbError>;

    /// Newest first
    async fn list_for_artifact(&self, artifact_id: Uuid) -> Result<Vec<SuggestionRecord>, DbError>;

    /// Newest first
    async fn list_for_contact(&self, contact_id: Uuid) -> Result<Vec<SuggestionRecord>, DbError>;
}
