//! Error types for the extraction pipeline

use thiserror::Error;
use uuid::Uuid;

use crate::db::DbError;
use crate::service::llm::LlmError;

/// Fatal failure of one extraction attempt
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractionError {
    #[error("Artifact not found: {0}")]
    ArtifactNotFound(Uuid),

    #[error("Contact not found: {0}")]
    ContactNotFound(Uuid),

    #[error("Artifact {0} has no transcription")]
    MissingTranscription(Uuid),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Unparseable LLM response: {0}")]
    UnparseableResponse(String),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] DbError),
}
