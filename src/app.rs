//! Application state and service initialization
//!
//! Builds the Postgres-backed stores and wires them into the extraction,
//! review and reprocessing services shared by the HTTP handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::repository::{ArtifactRepository, ContactRepository, SuggestionRepository};
use crate::model::Config;
use crate::service::{ExtractionPipeline, LlmClient, ReprocessService, SuggestionReviewService};

/// Application state containing all services and shared resources
pub struct AppState {
    /// Database connection pool
    pub db_pool: Arc<PgPool>,
    /// Voice-memo extraction pipeline
    pub pipeline: Arc<ExtractionPipeline>,
    /// Suggestion review lifecycle
    pub review_service: Arc<SuggestionReviewService>,
    /// Reset-and-rerun controller
    pub reprocess_service: Arc<ReprocessService>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Database connection and schema initialization
    /// 2. LLM client initialization (requires OPENAI_API_KEY)
    /// 3. Service dependency graph construction
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let db_pool = crate::db::create_pool()
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        crate::db::init_schema(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AppError::MissingConfig("OPENAI_API_KEY"))?;

        let llm_client = LlmClient::new(&api_key, &config.extraction)
            .map_err(|_| AppError::InvalidConfig("Invalid OPENAI_API_KEY"))?;

        let contacts = Arc::new(ContactRepository::new(db_pool.clone()));
        let artifacts = Arc::new(ArtifactRepository::new(db_pool.clone()));
        let suggestions = Arc::new(SuggestionRepository::new(db_pool.clone()));

        let pipeline = Arc::new(ExtractionPipeline::new(
            artifacts.clone(),
            contacts.clone(),
            suggestions.clone(),
            Arc::new(llm_client),
            &config.extraction,
        ));

        let review_service = Arc::new(SuggestionReviewService::new(
            contacts,
            artifacts.clone(),
            suggestions,
        ));

        let reprocess_service = Arc::new(ReprocessService::new(artifacts, Arc::clone(&pipeline)));

        Ok(Self {
            db_pool: Arc::new(db_pool),
            pipeline,
            review_service,
            reprocess_service,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Database initialization failed
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
