//! Test doubles shared by the unit tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::memory::InMemoryStore;
use crate::db::{ArtifactStore, ContactStore, DbError, SuggestionStore};
use crate::model::{
    AiParsingStatus, Artifact, ContactPatch, ContactRecord, ExtractionConfig, ResetOutcome,
    ReviewState, SuggestionRecord,
};
use crate::service::extraction::ExtractionPipeline;
use crate::service::llm::{LlmError, TextCompletion};

/// One scripted completion result
pub enum Scripted {
    Reply(String),
    Fail(String),
    /// Never answers within any test timeout
    Hang,
}

/// Completion client replaying scripted results in order
pub struct ScriptedCompletion {
    script: Mutex<VecDeque<Scripted>>,
    calls: AtomicUsize,
}

impl ScriptedCompletion {
    pub fn new(script: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextCompletion for ScriptedCompletion {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Fail(message)) => Err(LlmError::RequestFailed(message)),
            Some(Scripted::Hang) => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(LlmError::RequestFailed("hung call resumed".to_string()))
            }
            None => Err(LlmError::RequestFailed("script exhausted".to_string())),
        }
    }
}

/// Pipeline over an in-memory store and a scripted LLM
pub fn pipeline(store: &Arc<InMemoryStore>, llm: Arc<ScriptedCompletion>) -> ExtractionPipeline {
    ExtractionPipeline::new(
        store.clone(),
        store.clone(),
        store.clone(),
        llm,
        &ExtractionConfig::default(),
    )
}

/// Contact store whose writes always fail
pub struct FailingContactStore {
    inner: Arc<InMemoryStore>,
}

impl FailingContactStore {
    pub fn new(inner: Arc<InMemoryStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ContactStore for FailingContactStore {
    async fn get_contact(&self, id: Uuid) -> Result<Option<ContactRecord>, DbError> {
        self.inner.get_contact(id).await
    }

    async fn update_contact_fields(
        &self,
        _id: Uuid,
        _patch: &ContactPatch,
    ) -> Result<ContactRecord, DbError> {
        Err(DbError::WriteFailed("contact store unavailable".to_string()))
    }
}

/// Contact store handing control back to the runtime before every call
///
/// Lets concurrently joined reviews interleave at each await point.
pub struct YieldingContactStore {
    inner: Arc<InMemoryStore>,
}

impl YieldingContactStore {
    pub fn new(inner: Arc<InMemoryStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ContactStore for YieldingContactStore {
    async fn get_contact(&self, id: Uuid) -> Result<Option<ContactRecord>, DbError> {
        tokio::task::yield_now().await;
        self.inner.get_contact(id).await
    }

    async fn update_contact_fields(
        &self,
        id: Uuid,
        patch: &ContactPatch,
    ) -> Result<ContactRecord, DbError> {
        tokio::task::yield_now().await;
        self.inner.update_contact_fields(id, patch).await
    }
}

/// Artifact store that cannot record a completed attempt
pub struct FailingArtifactStore {
    inner: Arc<InMemoryStore>,
}

impl FailingArtifactStore {
    pub fn failing_completion(inner: Arc<InMemoryStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ArtifactStore for FailingArtifactStore {
    async fn get_artifact(&self, id: Uuid) -> Result<Option<Artifact>, DbError> {
        self.inner.get_artifact(id).await
    }

    async fn claim_for_processing(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, DbError> {
        self.inner.claim_for_processing(id, now).await
    }

    async fn finish_processing(
        &self,
        id: Uuid,
        status: AiParsingStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, DbError> {
        if status == AiParsingStatus::Completed {
            return Err(DbError::WriteFailed("artifact update rejected".to_string()));
        }
        self.inner.finish_processing(id, status, now).await
    }

    async fn reset_for_reprocessing(&self, id: Uuid) -> Result<ResetOutcome, DbError> {
        self.inner.reset_for_reprocessing(id).await
    }
}

/// Suggestion store failing inserts, or status updates
pub struct FailingSuggestionStore {
    inner: Arc<InMemoryStore>,
    fail_inserts: bool,
    fail_status_updates: bool,
}

impl FailingSuggestionStore {
    pub fn new(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            fail_inserts: true,
            fail_status_updates: false,
        }
    }

    pub fn failing_status_updates(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            fail_inserts: false,
            fail_status_updates: true,
        }
    }
}

#[async_trait]
impl SuggestionStore for FailingSuggestionStore {
    async fn insert_suggestion_record(&self, record: &SuggestionRecord) -> Result<(), DbError> {
        if self.fail_inserts {
            return Err(DbError::WriteFailed("insert rejected".to_string()));
        }
        self.inner.insert_suggestion_record(record).await
    }

    async fn get_suggestion_record(&self, id: Uuid) -> Result<Option<SuggestionRecord>, DbError> {
        self.inner.get_suggestion_record(id).await
    }

    async fn update_suggestion_record_status(
        &self,
        id: Uuid,
        expected: &ReviewState,
        state: &ReviewState,
    ) -> Result<bool, DbError> {
        if self.fail_status_updates {
            return Err(DbError::WriteFailed("status update rejected".to_string()));
        }
        self.inner
            .update_suggestion_record_status(id, expected, state)
            .await
    }

    async fn delete_suggestion_record(&self, id: Uuid) -> Result<bool, DbError> {
        self.inner.delete_suggestion_record(id).await
    }

    async fn mark_suggestion_viewed(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, DbError> {
        self.inner.mark_suggestion_viewed(id, now).await
    }

    async fn list_for_artifact(&self, artifact_id: Uuid) -> Result<Vec<SuggestionRecord>, DbError> {
        self.inner.list_for_artifact(artifact_id).await
    }

    async fn list_for_contact(&self, contact_id: Uuid) -> Result<Vec<SuggestionRecord>, DbError> {
        self.inner.list_for_contact(contact_id).await
    }
}
