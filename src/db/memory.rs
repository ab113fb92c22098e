//! In-memory implementation of the store traits
//!
//! Backs the test suite; also usable by embedders that do not run Postgres.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DbError;
use super::store::{ArtifactStore, ContactStore, SuggestionStore};
use crate::model::{
    AiParsingStatus, Artifact, ArtifactType, ContactPatch, ContactRecord, ResetOutcome,
    ReviewState, SuggestionRecord, TranscriptionStatus,
};

#[derive(Default)]
pub struct InMemoryStore {
    contacts: Mutex<HashMap<Uuid, ContactRecord>>,
    artifacts: Mutex<HashMap<Uuid, Artifact>>,
    suggestions: Mutex<Vec<SuggestionRecord>>,
}

// A panic while holding a lock leaves plain data behind, still usable
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_contact(&self, contact: ContactRecord) {
        lock(&self.contacts).insert(contact.id, contact);
    }

    pub fn insert_artifact(&self, artifact: Artifact) {
        lock(&self.artifacts).insert(artifact.id, artifact);
    }

    pub fn contact(&self, id: Uuid) -> Option<ContactRecord> {
        lock(&self.contacts).get(&id).cloned()
    }

    pub fn artifact(&self, id: Uuid) -> Option<Artifact> {
        lock(&self.artifacts).get(&id).cloned()
    }

    /// Every stored suggestion record in insertion order
    pub fn suggestion_records(&self) -> Vec<SuggestionRecord> {
        lock(&self.suggestions).clone()
    }

    /// Seed a contact and a transcribed voice memo awaiting extraction
    pub fn seed_voice_memo(&self, transcription: &str) -> (ContactRecord, Artifact) {
        let user_id = Uuid::new_v4();
        let contact = ContactRecord::new(Uuid::new_v4(), user_id);
        let artifact = Artifact {
            id: Uuid::new_v4(),
            contact_id: contact.id,
            user_id,
            artifact_type: ArtifactType::VoiceMemo,
            content: None,
            metadata: serde_json::json!({}),
            transcription: Some(transcription.to_string()),
            transcription_status: TranscriptionStatus::Completed,
            ai_parsing_status: AiParsingStatus::Pending,
            ai_processing_started_at: None,
            ai_processing_completed_at: None,
            created_at: Utc::now(),
        };
        self.insert_contact(contact.clone());
        self.insert_artifact(artifact.clone());
        (contact, artifact)
    }
}

#[async_trait]
impl ContactStore for InMemoryStore {
    async fn get_contact(&self, id: Uuid) -> Result<Option<ContactRecord>, DbError> {
        Ok(self.contact(id))
    }

    async fn update_contact_fields(
        &self,
        id: Uuid,
        patch: &ContactPatch,
    ) -> Result<ContactRecord, DbError> {
        let mut contacts = lock(&self.contacts);
        let contact = contacts
            .get_mut(&id)
            .ok_or_else(|| DbError::NotFound(id.to_string()))?;
        patch
            .apply_to(contact)
            .map_err(|e| DbError::InvalidPatch(e.to_string()))?;
        Ok(contact.clone())
    }
}

#[async_trait]
impl ArtifactStore for InMemoryStore {
    async fn get_artifact(&self, id: Uuid) -> Result<Option<Artifact>, DbError> {
        Ok(self.artifact(id))
    }

    async fn claim_for_processing(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, DbError> {
        let mut artifacts = lock(&self.artifacts);
        let Some(artifact) = artifacts.get_mut(&id) else {
            return Ok(false);
        };
        if artifact.eligibility().is_err() {
            return Ok(false);
        }

        artifact.ai_parsing_status = AiParsingStatus::Processing;
        artifact.ai_processing_started_at.get_or_insert(now);
        artifact.ai_processing_completed_at = None;
        Ok(true)
    }

    async fn finish_processing(
        &self,
        id: Uuid,
        status: AiParsingStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, DbError> {
        let mut artifacts = lock(&self.artifacts);
        match artifacts.get_mut(&id) {
            Some(artifact) if artifact.ai_parsing_status == AiParsingStatus::Processing => {
                artifact.ai_parsing_status = status;
                artifact.ai_processing_completed_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn reset_for_reprocessing(&self, id: Uuid) -> Result<ResetOutcome, DbError> {
        let mut artifacts = lock(&self.artifacts);
        let Some(artifact) = artifacts.get_mut(&id) else {
            return Ok(ResetOutcome::NotFound);
        };
        if artifact.ai_parsing_status == AiParsingStatus::Processing {
            return Ok(ResetOutcome::Conflict);
        }

        artifact.ai_parsing_status = AiParsingStatus::Pending;
        artifact.ai_processing_completed_at = None;
        Ok(ResetOutcome::Reset)
    }
}

#[async_trait]
impl SuggestionStore for InMemoryStore {
    async fn insert_suggestion_record(&self, record: &SuggestionRecord) -> Result<(), DbError> {
        lock(&self.suggestions).push(record.clone());
        Ok(())
    }

    async fn get_suggestion_record(&self, id: Uuid) -> Result<Option<SuggestionRecord>, DbError> {
        Ok(lock(&self.suggestions).iter().find(|r| r.id == id).cloned())
    }

    async fn update_suggestion_record_status(
        &self,
        id: Uuid,
        expected: &ReviewState,
        state: &ReviewState,
    ) -> Result<bool, DbError> {
        let mut records = lock(&self.suggestions);
        match records.iter_mut().find(|r| r.id == id) {
            Some(record)
                if record.status == expected.status
                    && record.applied_indices == expected.applied_indices =>
            {
                record.status = state.status;
                record.applied_indices = state.applied_indices.clone();
                record.reviewed_at = state.reviewed_at;
                record.applied_at = state.applied_at;
                record.dismissed_at = state.dismissed_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_suggestion_record(&self, id: Uuid) -> Result<bool, DbError> {
        let mut records = lock(&self.suggestions);
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }

    async fn mark_suggestion_viewed(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, DbError> {
        let mut records = lock(&self.suggestions);
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.viewed_at.get_or_insert(now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_for_artifact(&self, artifact_id: Uuid) -> Result<Vec<SuggestionRecord>, DbError> {
        Ok(newest_first(
            lock(&self.suggestions)
                .iter()
                .filter(|r| r.artifact_id == artifact_id),
        ))
    }

    async fn list_for_contact(&self, contact_id: Uuid) -> Result<Vec<SuggestionRecord>, DbError> {
        Ok(newest_first(
            lock(&self.suggestions)
                .iter()
                .filter(|r| r.contact_id == contact_id),
        ))
    }
}

fn newest_first<'a>(records: impl Iterator<Item = &'a SuggestionRecord>) -> Vec<SuggestionRecord> {
    // Insertion order breaks ties between equal timestamps
    let mut out: Vec<SuggestionRecord> = records.cloned().collect();
    out.reverse();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}
