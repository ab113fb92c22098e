//! Re-running extraction for an artifact that already finished
//!
//! Prior suggestion records are never touched; a successful rerun adds a new,
//! independent record for the same artifact.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::db::{ArtifactStore, DbError};
use crate::model::ResetOutcome;
use crate::service::extraction::{ExtractionOutcome, ExtractionPipeline};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReprocessError {
    #[error("Artifact not found: {0}")]
    NotFound(Uuid),

    #[error("Artifact {0} is currently processing")]
    Conflict(Uuid),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] DbError),
}

pub struct ReprocessService {
    artifacts: Arc<dyn ArtifactStore>,
    pipeline: Arc<ExtractionPipeline>,
}

impl ReprocessService {
    pub fn new(artifacts: Arc<dyn ArtifactStore>, pipeline: Arc<ExtractionPipeline>) -> Self {
        Self {
            artifacts,
            pipeline,
        }
    }

    /// Reset the artifact to `pending` and run the pipeline again
    pub async fn reprocess(&self, artifact_id: Uuid) -> Result<ExtractionOutcome, ReprocessError> {
        match self.artifacts.reset_for_reprocessing(artifact_id).await? {
            ResetOutcome::Reset => {
                tracing::info!(artifact_id = %artifact_id, "Artifact reset for reprocessing");
            }
            ResetOutcome::NotFound => return Err(ReprocessError::NotFound(artifact_id)),
            ResetOutcome::Conflict => {
                tracing::warn!(artifact_id = %artifact_id, "Reprocess rejected, artifact is processing");
                return Err(ReprocessError::Conflict(artifact_id));
            }
        }

        Ok(self.pipeline.run_extraction(artifact_id).await)
    }
}
