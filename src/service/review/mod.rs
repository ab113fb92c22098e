//! Suggestion review lifecycle
//!
//! Owns every status transition of a suggestion record after creation and
//! the write-back of approved values onto the contact.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::{ArtifactStore, ContactStore, SuggestionStore};
use crate::model::{Artifact, ReviewState, SuggestionAction, SuggestionRecord, SuggestionStatus};
use crate::service::review::apply::plan_patch;

pub mod apply;
pub mod error;

pub use error::ReviewError;

/// Where a provenance value was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProvenanceSource {
    /// An applied entry of an approved or partial suggestion record
    Suggestion,
    ArtifactMetadata,
    ArtifactContent,
    /// No source left that carries the value
    Unavailable,
}

/// One field an artifact contributed to a contact
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProvenanceEntry {
    pub field_path: String,
    #[schema(value_type = Object)]
    pub value: Option<Value>,
    pub source: ProvenanceSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion_record_id: Option<Uuid>,
}

/// Service for reviewing suggestion records
pub struct SuggestionReviewService {
    contacts: Arc<dyn ContactStore>,
    artifacts: Arc<dyn ArtifactStore>,
    suggestions: Arc<dyn SuggestionStore>,
}

impl SuggestionReviewService {
    pub fn new(
        contacts: Arc<dyn ContactStore>,
        artifacts: Arc<dyn ArtifactStore>,
        suggestions: Arc<dyn SuggestionStore>,
    ) -> Self {
        Self {
            contacts,
            artifacts,
            suggestions,
        }
    }

    async fn load(&self, id: Uuid) -> Result<SuggestionRecord, ReviewError> {
        self.suggestions
            .get_suggestion_record(id)
            .await?
            .ok_or(ReviewError::NotFound(id))
    }

    /// Apply the selected suggestions of a record to its contact
    ///
    /// `selections` are batch indices; `None` selects every suggestion not
    /// applied yet. The record ends `approved` once every suggestion has been
    /// applied, `partial` otherwise.
    ///
    /// The record is claimed with a conditional update on its status and
    /// applied indices before the contact is written, so only one of several
    /// concurrent reviews of the same record reaches the contact. If the
    /// contact write fails, the record is put back to its previous state.
    pub async fn approve(
        &self,
        id: Uuid,
        selections: Option<Vec<usize>>,
    ) -> Result<SuggestionRecord, ReviewError> {
        let record = self.load(id).await?;
        if record.status.is_terminal() {
            return Err(ReviewError::InvalidTransition {
                id,
                status: record.status,
                action: "approve",
            });
        }

        let selected = resolve_selection(&record, selections)?;
        let contact = self
            .contacts
            .get_contact(record.contact_id)
            .await?
            .ok_or(ReviewError::ContactNotFound(record.contact_id))?;

        let batch = record.suggestions();
        let chosen: Vec<_> = selected.iter().map(|&i| &batch[i]).collect();
        let patch = plan_patch(&contact, &chosen, record.artifact_id)?;

        let now = Utc::now();
        let applied: BTreeSet<usize> = record
            .applied_indices
            .iter()
            .copied()
            .chain(selected.iter().copied())
            .collect();
        let status = if applied.len() == batch.len() {
            SuggestionStatus::Approved
        } else {
            SuggestionStatus::Partial
        };
        let previous = record.review_state();
        let state = ReviewState {
            status,
            applied_indices: applied.into_iter().collect(),
            reviewed_at: record.reviewed_at.or(Some(now)),
            applied_at: record.applied_at.or(Some(now)),
            dismissed_at: record.dismissed_at,
        };

        if !self
            .suggestions
            .update_suggestion_record_status(id, &previous, &state)
            .await?
        {
            tracing::warn!(suggestion_record_id = %id, "Approval lost to a concurrent review");
            return Err(ReviewError::Conflict(id));
        }

        if let Err(e) = self.contacts.update_contact_fields(contact.id, &patch).await {
            self.release(id, &state, &previous).await;
            return Err(ReviewError::WriteBack(e));
        }

        tracing::info!(
            suggestion_record_id = %id,
            contact_id = %contact.id,
            applied = selected.len(),
            status = status.as_str(),
            "Approved suggestions applied to contact"
        );
        Ok(with_state(record, state))
    }

    /// Put a claimed record back after its contact write failed
    async fn release(&self, id: Uuid, claimed: &ReviewState, previous: &ReviewState) {
        match self
            .suggestions
            .update_suggestion_record_status(id, claimed, previous)
            .await
        {
            Ok(true) => tracing::warn!(
                suggestion_record_id = %id,
                status = previous.status.as_str(),
                "Contact write-back failed, record restored"
            ),
            Ok(false) => tracing::error!(
                suggestion_record_id = %id,
                "Contact write-back failed and the record changed before it could be restored"
            ),
            Err(e) => tracing::error!(
                suggestion_record_id = %id,
                error = %e,
                "Failed to restore record after contact write-back failure"
            ),
        }
    }

    /// Decline a pending record; the contact is not touched
    pub async fn reject(&self, id: Uuid) -> Result<SuggestionRecord, ReviewError> {
        self.close(id, SuggestionStatus::Rejected, "reject").await
    }

    /// Dismiss a pending record without reviewing it
    pub async fn skip(&self, id: Uuid) -> Result<SuggestionRecord, ReviewError> {
        self.close(id, SuggestionStatus::Skipped, "skip").await
    }

    async fn close(
        &self,
        id: Uuid,
        target: SuggestionStatus,
        action: &'static str,
    ) -> Result<SuggestionRecord, ReviewError> {
        let record = self.load(id).await?;
        if record.status != SuggestionStatus::Pending {
            return Err(ReviewError::InvalidTransition {
                id,
                status: record.status,
                action,
            });
        }

        let now = Utc::now();
        let mut state = record.review_state();
        state.status = target;
        match target {
            SuggestionStatus::Skipped => state.dismissed_at = Some(now),
            _ => state.reviewed_at = Some(now),
        }

        if !self
            .suggestions
            .update_suggestion_record_status(id, &record.review_state(), &state)
            .await?
        {
            return Err(ReviewError::Conflict(id));
        }

        tracing::info!(
            suggestion_record_id = %id,
            status = target.as_str(),
            "Suggestion record closed"
        );
        Ok(with_state(record, state))
    }

    /// Stamp `viewed_at` once; status is unchanged
    pub async fn mark_viewed(&self, id: Uuid) -> Result<SuggestionRecord, ReviewError> {
        if !self.suggestions.mark_suggestion_viewed(id, Utc::now()).await? {
            return Err(ReviewError::NotFound(id));
        }
        self.load(id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<SuggestionRecord, ReviewError> {
        self.load(id).await
    }

    /// All records produced from an artifact, newest first
    pub async fn list_for_artifact(
        &self,
        artifact_id: Uuid,
    ) -> Result<Vec<SuggestionRecord>, ReviewError> {
        Ok(self.suggestions.list_for_artifact(artifact_id).await?)
    }

    /// All records for a contact, newest first
    pub async fn list_for_contact(
        &self,
        contact_id: Uuid,
    ) -> Result<Vec<SuggestionRecord>, ReviewError> {
        Ok(self.suggestions.list_for_contact(contact_id).await?)
    }

    /// Fields of a contact whose provenance points at `artifact_id`
    ///
    /// Values come from the newest approved or partial record that applied a
    /// suggestion for the path, falling back to the artifact itself.
    pub async fn provenance(
        &self,
        contact_id: Uuid,
        artifact_id: Uuid,
    ) -> Result<Vec<ProvenanceEntry>, ReviewError> {
        let contact = self
            .contacts
            .get_contact(contact_id)
            .await?
            .ok_or(ReviewError::ContactNotFound(contact_id))?;

        let paths = contact.fields_sourced_from(artifact_id);
        if paths.is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<SuggestionRecord> = self
            .suggestions
            .list_for_artifact(artifact_id)
            .await?
            .into_iter()
            .filter(|r| {
                matches!(
                    r.status,
                    SuggestionStatus::Approved | SuggestionStatus::Partial
                )
            })
            .collect();
        let artifact = self.artifacts.get_artifact(artifact_id).await?;

        Ok(paths
            .into_iter()
            .map(|path| resolve_provenance(path, &records, artifact.as_ref()))
            .collect())
    }
}

fn with_state(mut record: SuggestionRecord, state: ReviewState) -> SuggestionRecord {
    record.status = state.status;
    record.applied_indices = state.applied_indices;
    record.reviewed_at = state.reviewed_at;
    record.applied_at = state.applied_at;
    record.dismissed_at = state.dismissed_at;
    record
}

/// Validate selections against the batch; result is sorted and de-duplicated
fn resolve_selection(
    record: &SuggestionRecord,
    selections: Option<Vec<usize>>,
) -> Result<Vec<usize>, ReviewError> {
    let len = record.suggestions().len();

    let Some(selections) = selections else {
        let remaining: Vec<usize> = (0..len)
            .filter(|i| !record.applied_indices.contains(i))
            .collect();
        if remaining.is_empty() {
            return Err(ReviewError::InvalidSelection(
                "no suggestions left to apply".to_string(),
            ));
        }
        return Ok(remaining);
    };

    if selections.is_empty() {
        return Err(ReviewError::InvalidSelection(
            "selection is empty".to_string(),
        ));
    }

    let unique: BTreeSet<usize> = selections.into_iter().collect();
    if let Some(&out_of_range) = unique.iter().find(|&&i| i >= len) {
        return Err(ReviewError::InvalidSelection(format!(
            "index {} is outside the batch of {}",
            out_of_range, len
        )));
    }
    if let Some(&applied) = unique.iter().find(|i| record.applied_indices.contains(i)) {
        return Err(ReviewError::InvalidSelection(format!(
            "index {} was already applied",
            applied
        )));
    }

    Ok(unique.into_iter().collect())
}

fn resolve_provenance(
    path: String,
    records: &[SuggestionRecord],
    artifact: Option<&Artifact>,
) -> ProvenanceEntry {
    for record in records {
        let applied = record
            .applied_indices
            .iter()
            .filter_map(|&i| record.suggestions().get(i))
            .rev()
            .find(|s| s.field_path == path && s.action != SuggestionAction::Remove);
        if let Some(suggestion) = applied {
            return ProvenanceEntry {
                field_path: path,
                value: Some(suggestion.suggested_value.clone()),
                source: ProvenanceSource::Suggestion,
                suggestion_record_id: Some(record.id),
            };
        }
    }

    let from_metadata = artifact.and_then(|a| metadata_value(&a.metadata, &path));
    if let Some(value) = from_metadata {
        return ProvenanceEntry {
            field_path: path,
            value: Some(value),
            source: ProvenanceSource::ArtifactMetadata,
            suggestion_record_id: None,
        };
    }

    match artifact.and_then(|a| a.content.clone()) {
        Some(content) => ProvenanceEntry {
            field_path: path,
            value: Some(Value::String(content)),
            source: ProvenanceSource::ArtifactContent,
            suggestion_record_id: None,
        },
        None => ProvenanceEntry {
            field_path: path,
            value: None,
            source: ProvenanceSource::Unavailable,
            suggestion_record_id: None,
        },
    }
}

/// Look a field path up in artifact metadata, as a flat key or a nested path
fn metadata_value(metadata: &Value, path: &str) -> Option<Value> {
    if let Some(value) = metadata.get(path) {
        return Some(value.clone());
    }
    path.split('.')
        .try_fold(metadata, |node, key| node.get(key))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::InMemoryStore;
    use crate::model::{ContactRecord, Suggestion};
    use crate::testing::{FailingContactStore, FailingSuggestionStore, YieldingContactStore};
    use serde_json::json;

    fn service(store: &Arc<InMemoryStore>) -> SuggestionReviewService {
        SuggestionReviewService::new(store.clone(), store.clone(), store.clone())
    }

    fn suggestion(path: &str, action: SuggestionAction, value: Value) -> Suggestion {
        Suggestion {
            field_path: path.to_string(),
            action,
            suggested_value: value,
            confidence: 0.9,
            reasoning: "from memo".to_string(),
        }
    }

    /// Contact, artifact and a pending record with three suggestions
    async fn seeded() -> (Arc<InMemoryStore>, ContactRecord, SuggestionRecord) {
        let store = Arc::new(InMemoryStore::new());
        let (mut contact, artifact) = store.seed_voice_memo("memo");
        contact.personal_context = json!({"hobbies": ["chess"]});
        store.insert_contact(contact.clone());

        let record = SuggestionRecord::new(
            &artifact,
            vec![
                suggestion(
                    "personal_context.family.partner",
                    SuggestionAction::Update,
                    json!({"name": "Sarah", "relationship": "partner"}),
                ),
                suggestion(
                    "personal_context.upcoming_changes",
                    SuggestionAction::Add,
                    json!("Relocation to Boston next month"),
                ),
                suggestion("personal_context.hobbies", SuggestionAction::Add, json!("golf")),
            ],
            Utc::now(),
        );
        store.insert_suggestion_record(&record).await.unwrap();
        (store, contact, record)
    }

    #[tokio::test]
    async fn test_partial_approval_writes_selected_paths() {
        let (store, contact, record) = seeded().await;

        let updated = service(&store).approve(record.id, Some(vec![0, 1])).await.unwrap();

        assert_eq!(updated.status, SuggestionStatus::Partial);
        assert_eq!(updated.applied_indices, vec![0, 1]);
        assert!(updated.reviewed_at.is_some() && updated.applied_at.is_some());

        let stored = store.contact(contact.id).unwrap();
        assert_eq!(
            stored.personal_context,
            json!({
                "hobbies": ["chess"],
                "family": {"partner": {"name": "Sarah", "relationship": "partner"}},
                "upcoming_changes": ["Relocation to Boston next month"]
            })
        );
        assert_eq!(
            stored.fields_sourced_from(record.artifact_id),
            vec![
                "personal_context.family.partner".to_string(),
                "personal_context.upcoming_changes".to_string()
            ]
        );
        assert_eq!(
            store.get_suggestion_record(record.id).await.unwrap().unwrap().status,
            SuggestionStatus::Partial
        );
    }

    #[tokio::test]
    async fn test_partial_then_rest_becomes_approved() {
        let (store, contact, record) = seeded().await;
        let service = service(&store);

        let first = service.approve(record.id, Some(vec![2])).await.unwrap();
        assert_eq!(first.status, SuggestionStatus::Partial);
        let first_applied_at = first.applied_at;

        let second = service.approve(record.id, None).await.unwrap();
        assert_eq!(second.status, SuggestionStatus::Approved);
        assert_eq!(second.applied_indices, vec![0, 1, 2]);
        assert_eq!(second.applied_at, first_applied_at);

        let stored = store.contact(contact.id).unwrap();
        assert_eq!(stored.personal_context["hobbies"], json!(["chess", "golf"]));

        assert!(matches!(
            service.approve(record.id, None).await,
            Err(ReviewError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_approve_all_at_once() {
        let (store, _, record) = seeded().await;
        let updated = service(&store).approve(record.id, None).await.unwrap();
        assert_eq!(updated.status, SuggestionStatus::Approved);
    }

    #[tokio::test]
    async fn test_invalid_selections_change_nothing() {
        let (store, contact, record) = seeded().await;
        let service = service(&store);

        for selection in [vec![], vec![3], vec![0, 9]] {
            assert!(matches!(
                service.approve(record.id, Some(selection)).await,
                Err(ReviewError::InvalidSelection(_))
            ));
        }

        service.approve(record.id, Some(vec![0])).await.unwrap();
        assert!(matches!(
            service.approve(record.id, Some(vec![0, 1])).await,
            Err(ReviewError::InvalidSelection(_))
        ));

        let stored = store.contact(contact.id).unwrap();
        assert!(stored.personal_context.get("upcoming_changes").is_none());
    }

    #[tokio::test]
    async fn test_write_back_failure_keeps_record_pending() {
        let (store, contact, record) = seeded().await;
        let service = SuggestionReviewService::new(
            Arc::new(FailingContactStore::new(store.clone())),
            store.clone(),
            store.clone(),
        );

        let result = service.approve(record.id, None).await;

        assert!(matches!(result, Err(ReviewError::WriteBack(_))));
        let stored = store.get_suggestion_record(record.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SuggestionStatus::Pending);
        assert!(stored.reviewed_at.is_none() && stored.applied_at.is_none());
        assert_eq!(store.contact(contact.id).unwrap(), contact);
    }

    #[tokio::test]
    async fn test_status_failure_leaves_contact_untouched() {
        let (store, contact, record) = seeded().await;
        let service = SuggestionReviewService::new(
            store.clone(),
            store.clone(),
            Arc::new(FailingSuggestionStore::failing_status_updates(store.clone())),
        );

        let result = service.approve(record.id, Some(vec![0, 2])).await;

        assert!(matches!(result, Err(ReviewError::Persistence(_))));
        assert_eq!(store.contact(contact.id).unwrap(), contact);
        assert_eq!(
            store.get_suggestion_record(record.id).await.unwrap().unwrap().status,
            SuggestionStatus::Pending
        );
    }

    fn yielding_service(store: &Arc<InMemoryStore>) -> SuggestionReviewService {
        SuggestionReviewService::new(
            Arc::new(YieldingContactStore::new(store.clone())),
            store.clone(),
            store.clone(),
        )
    }

    #[tokio::test]
    async fn test_concurrent_approvals_of_same_selection() {
        let (store, contact, record) = seeded().await;
        let service = yielding_service(&store);

        let (a, b) = tokio::join!(
            service.approve(record.id, Some(vec![1])),
            service.approve(record.id, Some(vec![1]))
        );

        let (winner, loser) = if a.is_ok() { (a, b) } else { (b, a) };
        let winner = winner.unwrap();
        assert!(matches!(loser, Err(ReviewError::Conflict(_))));
        assert_eq!(winner.applied_indices, vec![1]);

        let stored = store.get_suggestion_record(record.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SuggestionStatus::Partial);
        assert_eq!(stored.applied_indices, vec![1]);

        let updated = store.contact(contact.id).unwrap();
        assert_eq!(
            updated.personal_context["upcoming_changes"],
            json!(["Relocation to Boston next month"])
        );
        assert_eq!(
            updated.fields_sourced_from(record.artifact_id),
            vec!["personal_context.upcoming_changes".to_string()]
        );
    }

    #[tokio::test]
    async fn test_concurrent_partial_approvals_keep_applied_indices() {
        let (store, contact, record) = seeded().await;
        let service = yielding_service(&store);
        service.approve(record.id, Some(vec![0])).await.unwrap();

        let (a, b) = tokio::join!(
            service.approve(record.id, Some(vec![1])),
            service.approve(record.id, Some(vec![2]))
        );

        assert!(a.is_ok() != b.is_ok());
        let winner = a.or(b).unwrap();
        let stored = store.get_suggestion_record(record.id).await.unwrap().unwrap();
        assert_eq!(stored.applied_indices, winner.applied_indices);
        assert_eq!(stored.status, SuggestionStatus::Partial);

        // The contact carries exactly what the record says was applied
        let updated = store.contact(contact.id).unwrap();
        let relocation_applied = stored.applied_indices.contains(&1);
        let golf_applied = stored.applied_indices.contains(&2);
        assert!(relocation_applied != golf_applied);
        assert_eq!(
            updated.personal_context.get("upcoming_changes").is_some(),
            relocation_applied
        );
        let expected_hobbies = if golf_applied {
            json!(["chess", "golf"])
        } else {
            json!(["chess"])
        };
        assert_eq!(updated.personal_context["hobbies"], expected_hobbies);
    }

    #[tokio::test]
    async fn test_reject_is_terminal() {
        let (store, contact, record) = seeded().await;
        let service = service(&store);

        let rejected = service.reject(record.id).await.unwrap();
        assert_eq!(rejected.status, SuggestionStatus::Rejected);
        assert!(rejected.reviewed_at.is_some());
        assert!(rejected.dismissed_at.is_none());
        assert_eq!(store.contact(contact.id).unwrap(), contact);

        assert!(matches!(
            service.skip(record.id).await,
            Err(ReviewError::InvalidTransition { .. })
        ));
        assert!(matches!(
            service.approve(record.id, None).await,
            Err(ReviewError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_skip_dismisses_without_review() {
        let (store, contact, record) = seeded().await;

        let skipped = service(&store).skip(record.id).await.unwrap();

        assert_eq!(skipped.status, SuggestionStatus::Skipped);
        assert!(skipped.dismissed_at.is_some());
        assert!(skipped.reviewed_at.is_none());
        assert_eq!(store.contact(contact.id).unwrap(), contact);
    }

    #[tokio::test]
    async fn test_partial_cannot_be_rejected() {
        let (store, _, record) = seeded().await;
        let service = service(&store);
        service.approve(record.id, Some(vec![1])).await.unwrap();

        assert!(matches!(
            service.reject(record.id).await,
            Err(ReviewError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_mark_viewed_once() {
        let (store, _, record) = seeded().await;
        let service = service(&store);

        let first = service.mark_viewed(record.id).await.unwrap();
        let viewed_at = first.viewed_at;
        assert!(viewed_at.is_some());
        assert_eq!(first.status, SuggestionStatus::Pending);

        let second = service.mark_viewed(record.id).await.unwrap();
        assert_eq!(second.viewed_at, viewed_at);

        assert!(matches!(
            service.mark_viewed(Uuid::new_v4()).await,
            Err(ReviewError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_provenance_prefers_suggestion_records() {
        let (store, contact, record) = seeded().await;
        let service = service(&store);
        service.approve(record.id, Some(vec![0])).await.unwrap();

        // A field imported by another path, tagged to the same artifact
        let mut artifact = store.artifact(record.artifact_id).unwrap();
        artifact.metadata = json!({"title": "Head of Sales"});
        store.insert_artifact(artifact);
        let mut c = store.contact(contact.id).unwrap();
        c.title = Some("Head of Sales".to_string());
        c.field_sources.insert("title".to_string(), record.artifact_id);
        store.insert_contact(c);

        let entries = service.provenance(contact.id, record.artifact_id).await.unwrap();

        assert_eq!(entries.len(), 2);
        let partner = entries
            .iter()
            .find(|e| e.field_path == "personal_context.family.partner")
            .unwrap();
        assert_eq!(partner.source, ProvenanceSource::Suggestion);
        assert_eq!(partner.suggestion_record_id, Some(record.id));
        assert_eq!(
            partner.value,
            Some(json!({"name": "Sarah", "relationship": "partner"}))
        );

        let title = entries.iter().find(|e| e.field_path == "title").unwrap();
        assert_eq!(title.source, ProvenanceSource::ArtifactMetadata);
        assert_eq!(title.value, Some(json!("Head of Sales")));
    }

    #[tokio::test]
    async fn test_provenance_falls_back_to_artifact_content() {
        let (store, contact, record) = seeded().await;
        let mut c = store.contact(contact.id).unwrap();
        c.company = Some("Acme".to_string());
        c.field_sources.insert("company".to_string(), record.artifact_id);
        store.insert_contact(c);
        let service = service(&store);

        let entries = service.provenance(contact.id, record.artifact_id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field_path, "company");
        assert_eq!(entries[0].source, ProvenanceSource::Unavailable);
        assert_eq!(entries[0].value, None);

        let mut artifact = store.artifact(record.artifact_id).unwrap();
        artifact.content = Some("Notes from the Acme call".to_string());
        store.insert_artifact(artifact);

        let entries = service.provenance(contact.id, record.artifact_id).await.unwrap();
        assert_eq!(entries[0].source, ProvenanceSource::ArtifactContent);
        assert_eq!(entries[0].value, Some(json!("Notes from the Acme call")));
        assert_eq!(entries[0].suggestion_record_id, None);
    }

    #[tokio::test]
    async fn test_provenance_for_untouched_artifact_is_empty() {
        let (store, contact, _) = seeded().await;
        let entries = service(&store)
            .provenance(contact.id, Uuid::new_v4())
            .await
            .unwrap();
        assert!(entries.is_empty());
    }
}
