//! Profile update suggestions and their review lifecycle

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::artifact::Artifact;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionAction {
    Add,
    Update,
    Remove,
}

impl SuggestionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Remove => "remove",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "add" => Some(Self::Add),
            "update" => Some(Self::Update),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }
}

/// One proposed change to a single field path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Suggestion {
    pub field_path: String,
    pub action: SuggestionAction,
    #[schema(value_type = Object)]
    pub suggested_value: Value,
    pub confidence: f64,
    pub reasoning: String,
}

/// Shape the LLM is asked to produce for each suggestion
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedSuggestion {
    /// Exact field path from the documented list
    pub field_path: String,
    pub action: SuggestionAction,
    /// New value; for array fields with "add", a single element
    pub suggested_value: Value,
    /// 0.0 - 1.0
    pub confidence: f64,
    /// Why the transcription supports this change
    pub reasoning: String,
}

/// Batch payload stored on a suggestion record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SuggestedUpdates {
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Rejected,
    /// Some suggestions of the batch applied, others not yet
    Partial,
    Skipped,
}

impl SuggestionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Partial => "partial",
            Self::Skipped => "skipped",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "partial" => Some(Self::Partial),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Skipped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionPriority {
    High,
    Medium,
    Low,
}

impl SuggestionPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn from_db_value(value: &str) -> Self {
        match value {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }

    /// Derived from the strongest suggestion in a batch
    pub fn from_confidence(max_confidence: f64) -> Self {
        if max_confidence >= 0.9 {
            Self::High
        } else if max_confidence >= 0.7 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// A persisted batch of suggestions from one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SuggestionRecord {
    pub id: Uuid,
    pub artifact_id: Uuid,
    pub contact_id: Uuid,
    pub user_id: Uuid,
    pub suggested_updates: SuggestedUpdates,
    pub field_paths: Vec<String>,
    pub confidence_scores: BTreeMap<String, f64>,
    pub status: SuggestionStatus,
    pub priority: SuggestionPriority,
    /// Batch indices already written to the contact
    pub applied_indices: Vec<usize>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub applied_at: Option<DateTime<Utc>>,
    pub dismissed_at: Option<DateTime<Utc>>,
    pub viewed_at: Option<DateTime<Utc>>,
}

impl SuggestionRecord {
    /// Build a pending record for `artifact`, denormalizing paths and scores
    pub fn new(artifact: &Artifact, suggestions: Vec<Suggestion>, now: DateTime<Utc>) -> Self {
        let mut field_paths: Vec<String> = Vec::new();
        let mut confidence_scores: BTreeMap<String, f64> = BTreeMap::new();

        for s in &suggestions {
            if !field_paths.contains(&s.field_path) {
                field_paths.push(s.field_path.clone());
            }
            confidence_scores
                .entry(s.field_path.clone())
                .and_modify(|c| *c = c.max(s.confidence))
                .or_insert(s.confidence);
        }

        let max_confidence = suggestions
            .iter()
            .map(|s| s.confidence)
            .fold(0.0_f64, f64::max);

        Self {
            id: Uuid::new_v4(),
            artifact_id: artifact.id,
            contact_id: artifact.contact_id,
            user_id: artifact.user_id,
            suggested_updates: SuggestedUpdates { suggestions },
            field_paths,
            confidence_scores,
            status: SuggestionStatus::Pending,
            priority: SuggestionPriority::from_confidence(max_confidence),
            applied_indices: Vec::new(),
            created_at: now,
            reviewed_at: None,
            applied_at: None,
            dismissed_at: None,
            viewed_at: None,
        }
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggested_updates.suggestions
    }

    /// Review fields as currently stored, for building a transition
    pub fn review_state(&self) -> ReviewState {
        ReviewState {
            status: self.status,
            applied_indices: self.applied_indices.clone(),
            reviewed_at: self.reviewed_at,
            applied_at: self.applied_at,
            dismissed_at: self.dismissed_at,
        }
    }
}

/// Mutable review fields of a suggestion record, written together
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewState {
    pub status: SuggestionStatus,
    pub applied_indices: Vec<usize>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub applied_at: Option<DateTime<Utc>>,
    pub dismissed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::artifact::{AiParsingStatus, ArtifactType, TranscriptionStatus};
    use serde_json::json;

    fn artifact() -> Artifact {
        Artifact {
            id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            artifact_type: ArtifactType::VoiceMemo,
            content: None,
            metadata: Value::Null,
            transcription: None,
            transcription_status: TranscriptionStatus::Completed,
            ai_parsing_status: AiParsingStatus::Processing,
            ai_processing_started_at: None,
            ai_processing_completed_at: None,
            created_at: Utc::now(),
        }
    }

    fn suggestion(path: &str, confidence: f64) -> Suggestion {
        Suggestion {
            field_path: path.to_string(),
            action: SuggestionAction::Add,
            suggested_value: json!("x"),
            confidence,
            reasoning: String::new(),
        }
    }

    #[test]
    fn test_new_record_denormalizes_batch() {
        let a = artifact();
        let record = SuggestionRecord::new(
            &a,
            vec![
                suggestion("personal_context.hobbies", 0.6),
                suggestion("personal_context.upcoming_changes", 0.9),
                suggestion("personal_context.hobbies", 0.8),
            ],
            Utc::now(),
        );

        assert_eq!(record.artifact_id, a.id);
        assert_eq!(record.contact_id, a.contact_id);
        assert_eq!(record.status, SuggestionStatus::Pending);
        assert_eq!(
            record.field_paths,
            vec![
                "personal_context.hobbies".to_string(),
                "personal_context.upcoming_changes".to_string()
            ]
        );
        assert_eq!(record.confidence_scores["personal_context.hobbies"], 0.8);
        assert_eq!(record.priority, SuggestionPriority::High);
        assert!(record.reviewed_at.is_none() && record.applied_at.is_none());
    }

    #[test]
    fn test_priority_bands() {
        assert_eq!(SuggestionPriority::from_confidence(0.95), SuggestionPriority::High);
        assert_eq!(SuggestionPriority::from_confidence(0.75), SuggestionPriority::Medium);
        assert_eq!(SuggestionPriority::from_confidence(0.5), SuggestionPriority::Low);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(SuggestionStatus::Approved.is_terminal());
        assert!(SuggestionStatus::Rejected.is_terminal());
        assert!(SuggestionStatus::Skipped.is_terminal());
        assert!(!SuggestionStatus::Pending.is_terminal());
        assert!(!SuggestionStatus::Partial.is_terminal());
    }
}
