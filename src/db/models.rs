//! Database row models for contacts, artifacts and suggestion records

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::model::{
    AiParsingStatus, Artifact, ArtifactType, ContactRecord, SuggestedUpdates, SuggestionPriority,
    SuggestionRecord, SuggestionStatus, TranscriptionStatus,
};

/// Database representation of a contact
#[derive(Debug, Clone, FromRow)]
pub struct ContactRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub professional_context: serde_json::Value,
    pub personal_context: serde_json::Value,
    pub field_sources: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl ContactRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> Result<ContactRecord, String> {
        let field_sources: BTreeMap<String, Uuid> = if self.field_sources.is_null() {
            BTreeMap::new()
        } else {
            serde_json::from_value(self.field_sources)
                .map_err(|e| format!("Invalid field_sources for contact {}: {}", self.id, e))?
        };

        Ok(ContactRecord {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            title: self.title,
            location: self.location,
            linkedin_url: self.linkedin_url,
            professional_context: self.professional_context,
            personal_context: self.personal_context,
            field_sources,
            updated_at: self.updated_at,
        })
    }
}

/// Database representation of an artifact
#[derive(Debug, Clone, FromRow)]
pub struct ArtifactRow {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    pub artifact_type: String,
    pub content: Option<String>,
    pub metadata: serde_json::Value,
    pub transcription: Option<String>,
    pub transcription_status: String,
    pub ai_parsing_status: String,
    pub ai_processing_started_at: Option<DateTime<Utc>>,
    pub ai_processing_completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ArtifactRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> Result<Artifact, String> {
        let transcription_status = TranscriptionStatus::from_db_value(&self.transcription_status)
            .ok_or_else(|| {
                format!(
                    "Invalid transcription_status '{}' on artifact {}",
                    self.transcription_status, self.id
                )
            })?;
        let ai_parsing_status = AiParsingStatus::from_db_value(&self.ai_parsing_status)
            .ok_or_else(|| {
                format!(
                    "Invalid ai_parsing_status '{}' on artifact {}",
                    self.ai_parsing_status, self.id
                )
            })?;

        Ok(Artifact {
            id: self.id,
            contact_id: self.contact_id,
            user_id: self.user_id,
            artifact_type: ArtifactType::from_db_value(&self.artifact_type),
            content: self.content,
            metadata: self.metadata,
            transcription: self.transcription,
            transcription_status,
            ai_parsing_status,
            ai_processing_started_at: self.ai_processing_started_at,
            ai_processing_completed_at: self.ai_processing_completed_at,
            created_at: self.created_at,
        })
    }
}

/// Database representation of a suggestion record
#[derive(Debug, Clone, FromRow)]
pub struct SuggestionRow {
    pub id: Uuid,
    pub artifact_id: Uuid,
    pub contact_id: Uuid,
    pub user_id: Uuid,
    pub suggested_updates: serde_json::Value,
    pub field_paths: Vec<String>,
    pub confidence_scores: serde_json::Value,
    pub status: String,
    pub priority: String,
    pub applied_indices: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub applied_at: Option<DateTime<Utc>>,
    pub dismissed_at: Option<DateTime<Utc>>,
    pub viewed_at: Option<DateTime<Utc>>,
}

impl SuggestionRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> Result<SuggestionRecord, String> {
        let suggested_updates: SuggestedUpdates = serde_json::from_value(self.suggested_updates)
            .map_err(|e| format!("Invalid suggested_updates on record {}: {}", self.id, e))?;
        let confidence_scores: BTreeMap<String, f64> =
            serde_json::from_value(self.confidence_scores)
                .map_err(|e| format!("Invalid confidence_scores on record {}: {}", self.id, e))?;
        let applied_indices: Vec<usize> = serde_json::from_value(self.applied_indices)
            .map_err(|e| format!("Invalid applied_indices on record {}: {}", self.id, e))?;
        let status = SuggestionStatus::from_db_value(&self.status)
            .ok_or_else(|| format!("Invalid status '{}' on record {}", self.status, self.id))?;

        Ok(SuggestionRecord {
            id: self.id,
            artifact_id: self.artifact_id,
            contact_id: self.contact_id,
            user_id: self.user_id,
            suggested_updates,
            field_paths: self.field_paths,
            confidence_scores,
            status,
            priority: SuggestionPriority::from_db_value(&self.priority),
            applied_indices,
            created_at: self.created_at,
            reviewed_at: self.reviewed_at,
            applied_at: self.applied_at,
            dismissed_at: self.dismissed_at,
            viewed_at: self.viewed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_artifact_row_rejects_unknown_status() {
        let row = ArtifactRow {
            id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            artifact_type: "voice_memo".to_string(),
            content: None,
            metadata: json!({}),
            transcription: None,
            transcription_status: "completed".to_string(),
            ai_parsing_status: "queued".to_string(),
            ai_processing_started_at: None,
            ai_processing_completed_at: None,
            created_at: Utc::now(),
        };
        assert!(row.into_domain().unwrap_err().contains("queued"));
    }

    #[test]
    fn test_suggestion_row_into_domain() {
        let row = SuggestionRow {
            id: Uuid::new_v4(),
            artifact_id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            suggested_updates: json!({"suggestions": [{
                "field_path": "personal_context.hobbies",
                "action": "add",
                "suggested_value": "climbing",
                "confidence": 0.9,
                "reasoning": "mentioned climbing every weekend"
            }]}),
            field_paths: vec!["personal_context.hobbies".to_string()],
            confidence_scores: json!({"personal_context.hobbies": 0.9}),
            status: "partial".to_string(),
            priority: "high".to_string(),
            applied_indices: json!([0]),
            created_at: Utc::now(),
            reviewed_at: None,
            applied_at: None,
            dismissed_at: None,
            viewed_at: None,
        };

        let record = row.into_domain().unwrap();
        assert_eq!(record.status, SuggestionStatus::Partial);
        assert_eq!(record.priority, SuggestionPriority::High);
        assert_eq!(record.applied_indices, vec![0]);
        assert_eq!(record.suggestions().len(), 1);
    }
}
