//! Contact profile extraction pipeline
//!
//! Drives one voice-memo artifact from `pending` through `processing` to
//! `completed` or `failed`: claim, build prompt, call the LLM, normalize and
//! validate its answer, persist a single suggestion record.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::{ArtifactStore, ContactStore, SuggestionStore};
use crate::model::{AiParsingStatus, Artifact, ExtractionConfig, Suggestion, SuggestionRecord};
use crate::service::extraction::normalize::parse_response;
use crate::service::extraction::prompts::build_extraction_prompt;
use crate::service::extraction::validation::filter_valid;
use crate::service::llm::{LlmError, TextCompletion};

pub mod error;
pub mod normalize;
pub mod prompts;
pub mod validation;

pub use error::ExtractionError;

/// Characters of a raw LLM response kept in failure logs
const RAW_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Completed,
    Failed,
    /// Artifact not eligible; nothing was touched
    Skipped,
}

/// Result of one `run_extraction` call
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ExtractionOutcome {
    pub status: ExtractionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion_record_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Why the artifact was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExtractionOutcome {
    fn completed(suggestion_count: usize, suggestion_record_id: Option<Uuid>) -> Self {
        Self {
            status: ExtractionStatus::Completed,
            suggestion_count: Some(suggestion_count),
            suggestion_record_id,
            error: None,
            reason: None,
        }
    }

    fn failed(error: impl ToString) -> Self {
        Self {
            status: ExtractionStatus::Failed,
            suggestion_count: None,
            suggestion_record_id: None,
            error: Some(error.to_string()),
            reason: None,
        }
    }

    fn skipped(reason: impl ToString) -> Self {
        Self {
            status: ExtractionStatus::Skipped,
            suggestion_count: None,
            suggestion_record_id: None,
            error: None,
            reason: Some(reason.to_string()),
        }
    }
}

/// Successful end of the processing stage
struct Extracted {
    count: usize,
    record_id: Option<Uuid>,
}

/// Orchestrates extraction runs against injected stores and LLM
pub struct ExtractionPipeline {
    artifacts: Arc<dyn ArtifactStore>,
    contacts: Arc<dyn ContactStore>,
    suggestions: Arc<dyn SuggestionStore>,
    llm: Arc<dyn TextCompletion>,
    timeout: Duration,
}

impl ExtractionPipeline {
    pub fn new(
        artifacts: Arc<dyn ArtifactStore>,
        contacts: Arc<dyn ContactStore>,
        suggestions: Arc<dyn SuggestionStore>,
        llm: Arc<dyn TextCompletion>,
        config: &ExtractionConfig,
    ) -> Self {
        tracing::info!(
            model = %llm.model(),
            timeout_secs = config.timeout().as_secs(),
            "Extraction pipeline initialized"
        );
        Self {
            artifacts,
            contacts,
            suggestions,
            llm,
            timeout: config.timeout(),
        }
    }

    /// Override the LLM call bound
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the pipeline for one artifact
    ///
    /// Never returns an error: failures are reported in the outcome and, once
    /// the artifact has been claimed, recorded as `ai_parsing_status = failed`.
    pub async fn run_extraction(&self, artifact_id: Uuid) -> ExtractionOutcome {
        let artifact = match self.artifacts.get_artifact(artifact_id).await {
            Ok(Some(artifact)) => artifact,
            Ok(None) => {
                tracing::warn!(artifact_id = %artifact_id, "Extraction requested for unknown artifact");
                return ExtractionOutcome::failed(ExtractionError::ArtifactNotFound(artifact_id));
            }
            Err(e) => {
                tracing::error!(artifact_id = %artifact_id, error = %e, "Failed to load artifact");
                return ExtractionOutcome::failed(ExtractionError::Persistence(e));
            }
        };

        if let Err(reason) = artifact.eligibility() {
            tracing::debug!(
                artifact_id = %artifact_id,
                reason = %reason,
                "Artifact not eligible for extraction"
            );
            return ExtractionOutcome::skipped(reason);
        }

        match self.artifacts.claim_for_processing(artifact_id, Utc::now()).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(artifact_id = %artifact_id, "Artifact already claimed");
                return ExtractionOutcome::skipped("artifact claimed by another run");
            }
            Err(e) => {
                tracing::error!(artifact_id = %artifact_id, error = %e, "Failed to claim artifact");
                return ExtractionOutcome::failed(ExtractionError::Persistence(e));
            }
        }

        let start_time = Instant::now();
        let result = self.process(&artifact).await;

        let (status, outcome) = match result {
            Ok(extracted) => {
                tracing::info!(
                    artifact_id = %artifact_id,
                    suggestion_count = extracted.count,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    "Extraction completed"
                );
                (
                    AiParsingStatus::Completed,
                    ExtractionOutcome::completed(extracted.count, extracted.record_id),
                )
            }
            Err(e) => {
                tracing::error!(
                    artifact_id = %artifact_id,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    error = %e,
                    "Extraction failed"
                );
                (AiParsingStatus::Failed, ExtractionOutcome::failed(&e))
            }
        };

        self.finalize(artifact_id, status, outcome).await
    }

    /// Move the claimed artifact to its terminal status
    async fn finalize(
        &self,
        artifact_id: Uuid,
        status: AiParsingStatus,
        outcome: ExtractionOutcome,
    ) -> ExtractionOutcome {
        match self
            .artifacts
            .finish_processing(artifact_id, status, Utc::now())
            .await
        {
            Ok(true) => outcome,
            Ok(false) => {
                tracing::warn!(
                    artifact_id = %artifact_id,
                    status = status.as_str(),
                    "Artifact left processing state before finalization"
                );
                outcome
            }
            Err(e) => {
                tracing::error!(
                    artifact_id = %artifact_id,
                    status = status.as_str(),
                    error = %e,
                    "Failed to finalize artifact status"
                );
                if status == AiParsingStatus::Completed {
                    // Best effort so the artifact is not stuck in processing
                    let _ = self
                        .artifacts
                        .finish_processing(artifact_id, AiParsingStatus::Failed, Utc::now())
                        .await;
                    if let Some(record_id) = outcome.suggestion_record_id {
                        self.discard_record(artifact_id, record_id).await;
                    }
                }
                ExtractionOutcome::failed(ExtractionError::Persistence(e))
            }
        }
    }

    /// A failed attempt leaves no suggestion record behind
    async fn discard_record(&self, artifact_id: Uuid, record_id: Uuid) {
        match self.suggestions.delete_suggestion_record(record_id).await {
            Ok(_) => tracing::warn!(
                artifact_id = %artifact_id,
                suggestion_record_id = %record_id,
                "Discarded suggestion record of failed attempt"
            ),
            Err(e) => tracing::error!(
                artifact_id = %artifact_id,
                suggestion_record_id = %record_id,
                error = %e,
                "Failed to discard suggestion record of failed attempt"
            ),
        }
    }

    async fn process(&self, artifact: &Artifact) -> Result<Extracted, ExtractionError> {
        let contact = self
            .contacts
            .get_contact(artifact.contact_id)
            .await?
            .ok_or(ExtractionError::ContactNotFound(artifact.contact_id))?;

        let transcription = artifact
            .transcription
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ExtractionError::MissingTranscription(artifact.id))?;

        let prompt = build_extraction_prompt(transcription, &contact);

        tracing::debug!(
            artifact_id = %artifact.id,
            contact_id = %contact.id,
            model = %self.llm.model(),
            prompt_length = prompt.user.len(),
            transcription_length = transcription.len(),
            "Initiating LLM call for profile extraction"
        );

        let start_time = Instant::now();
        let raw = match tokio::time::timeout(
            self.timeout,
            self.llm.complete(&prompt.system, &prompt.user),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(LlmError::Timeout(self.timeout.as_secs()).into()),
        };

        tracing::debug!(
            artifact_id = %artifact.id,
            elapsed_ms = start_time.elapsed().as_millis(),
            response_length = raw.len(),
            "LLM call completed"
        );

        let candidates = parse_response(&raw).inspect_err(|e| {
            tracing::error!(
                artifact_id = %artifact.id,
                error = %e,
                raw_preview = %raw.chars().take(RAW_PREVIEW_CHARS).collect::<String>(),
                "Could not parse LLM response"
            );
        })?;

        let candidate_count = candidates.len();
        let filtered = filter_valid(candidates);
        let suggestions = dedupe(filtered.accepted);

        tracing::debug!(
            artifact_id = %artifact.id,
            candidate_count = candidate_count,
            rejected_count = filtered.rejected.len(),
            accepted_count = suggestions.len(),
            "Validated LLM suggestions"
        );

        if suggestions.is_empty() {
            return Ok(Extracted {
                count: 0,
                record_id: None,
            });
        }

        let count = suggestions.len();
        let record = SuggestionRecord::new(artifact, suggestions, Utc::now());
        self.suggestions.insert_suggestion_record(&record).await?;

        Ok(Extracted {
            count,
            record_id: Some(record.id),
        })
    }
}

/// Collapse suggestions repeating the same path, action and value
fn dedupe(suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    let mut out: Vec<Suggestion> = Vec::with_capacity(suggestions.len());
    for s in suggestions {
        let duplicate = out.iter().any(|kept| {
            kept.field_path == s.field_path
                && kept.action == s.action
                && kept.suggested_value == s.suggested_value
        });
        if duplicate {
            tracing::debug!(field_path = %s.field_path, "Dropping duplicate suggestion");
        } else {
            out.push(s);
        }
    }
    out
}
