//! Artifacts: captured user input that can be mined for profile updates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    VoiceMemo,
    Note,
    Email,
    Meeting,
    LinkedinProfile,
    LinkedinPost,
    Document,
    Other,
}

impl ArtifactType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VoiceMemo => "voice_memo",
            Self::Note => "note",
            Self::Email => "email",
            Self::Meeting => "meeting",
            Self::LinkedinProfile => "linkedin_profile",
            Self::LinkedinPost => "linkedin_post",
            Self::Document => "document",
            Self::Other => "other",
        }
    }

    pub fn from_db_value(value: &str) -> Self {
        match value {
            "voice_memo" => Self::VoiceMemo,
            "note" => Self::Note,
            "email" => Self::Email,
            "meeting" => Self::Meeting,
            "linkedin_profile" => Self::LinkedinProfile,
            "linkedin_post" => Self::LinkedinPost,
            "document" => Self::Document,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionStatus {
    Pending,
    Completed,
    Failed,
}

impl TranscriptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Extraction state of an artifact: `pending -> processing -> completed | failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AiParsingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl AiParsingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Artifact {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,
    /// Free text content for non-audio artifacts
    pub content: Option<String>,
    /// Source-specific metadata deposited by ingestion
    #[schema(value_type = Object)]
    pub metadata: Value,
    pub transcription: Option<String>,
    pub transcription_status: TranscriptionStatus,
    pub ai_parsing_status: AiParsingStatus,
    pub ai_processing_started_at: Option<DateTime<Utc>>,
    pub ai_processing_completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Why an artifact is not eligible for extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    NotVoiceMemo(ArtifactType),
    TranscriptionNotCompleted(TranscriptionStatus),
    AlreadyParsed(AiParsingStatus),
}

impl std::fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotVoiceMemo(t) => write!(f, "artifact type '{}' is not processed", t.as_str()),
            Self::TranscriptionNotCompleted(s) => {
                write!(f, "transcription status is '{}'", s.as_str())
            }
            Self::AlreadyParsed(s) => write!(f, "ai parsing status is '{}'", s.as_str()),
        }
    }
}

impl Artifact {
    /// Entry guard of the extraction pipeline
    pub fn eligibility(&self) -> Result<(), Ineligibility> {
        if self.artifact_type != ArtifactType::VoiceMemo {
            return Err(Ineligibility::NotVoiceMemo(self.artifact_type));
        }
        if self.transcription_status != TranscriptionStatus::Completed {
            return Err(Ineligibility::TranscriptionNotCompleted(
                self.transcription_status,
            ));
        }
        if self.ai_parsing_status != AiParsingStatus::Pending {
            return Err(Ineligibility::AlreadyParsed(self.ai_parsing_status));
        }
        Ok(())
    }
}

/// Result of a reprocessing reset attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Reset,
    NotFound,
    /// Artifact is mid-flight
    Conflict,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice_memo() -> Artifact {
        Artifact {
            id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            artifact_type: ArtifactType::VoiceMemo,
            content: None,
            metadata: Value::Null,
            transcription: Some("hello".to_string()),
            transcription_status: TranscriptionStatus::Completed,
            ai_parsing_status: AiParsingStatus::Pending,
            ai_processing_started_at: None,
            ai_processing_completed_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_eligible_voice_memo() {
        assert_eq!(voice_memo().eligibility(), Ok(()));
    }

    #[test]
    fn test_ineligible_combinations() {
        let mut a = voice_memo();
        a.artifact_type = ArtifactType::Email;
        assert_eq!(
            a.eligibility(),
            Err(Ineligibility::NotVoiceMemo(ArtifactType::Email))
        );

        let mut a = voice_memo();
        a.transcription_status = TranscriptionStatus::Pending;
        assert!(matches!(
            a.eligibility(),
            Err(Ineligibility::TranscriptionNotCompleted(_))
        ));

        for status in [
            AiParsingStatus::Processing,
            AiParsingStatus::Completed,
            AiParsingStatus::Failed,
        ] {
            let mut a = voice_memo();
            a.ai_parsing_status = status;
            assert_eq!(a.eligibility(), Err(Ineligibility::AlreadyParsed(status)));
        }
    }

    #[test]
    fn test_db_value_round_trip() {
        assert_eq!(ArtifactType::from_db_value("voice_memo"), ArtifactType::VoiceMemo);
        assert_eq!(ArtifactType::from_db_value("fax"), ArtifactType::Other);
        assert_eq!(AiParsingStatus::from_db_value("bogus"), None);
    }
}
