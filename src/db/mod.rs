//! Database module for PostgreSQL persistence

pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;

pub use store::{ArtifactStore, ContactStore, SuggestionStore};

// Environment variable names
const ENV_POSTGRES_HOST: &str = "CONTACT_INTEL_POSTGRES_HOST";
const ENV_POSTGRES_PORT: &str = "CONTACT_INTEL_POSTGRES_PORT";
const ENV_POSTGRES_USER: &str = "CONTACT_INTEL_POSTGRES_USER";
const ENV_POSTGRES_PASSWORD: &str = "CONTACT_INTEL_POSTGRES_PASSWORD";
const ENV_POSTGRES_DB: &str = "CONTACT_INTEL_POSTGRES_DB";

// Default values
const DEFAULT_POSTGRES_HOST: &str = "127.0.0.1";
const DEFAULT_POSTGRES_PORT: &str = "5432";
const DEFAULT_POSTGRES_USER: &str = "contact_intel";
const DEFAULT_POSTGRES_PASSWORD: &str = "contact_intel";
const DEFAULT_POSTGRES_DB: &str = "contact_intel";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid contact patch: {0}")]
    InvalidPatch(String),

    /// Injected or backend-specific write failure
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

/// Create a new database connection pool
pub async fn create_pool() -> Result<PgPool, DbError> {
    let host = env::var(ENV_POSTGRES_HOST).unwrap_or_else(|_| DEFAULT_POSTGRES_HOST.to_string());
    let port = env::var(ENV_POSTGRES_PORT).unwrap_or_else(|_| DEFAULT_POSTGRES_PORT.to_string());
    let user = env::var(ENV_POSTGRES_USER).unwrap_or_else(|_| DEFAULT_POSTGRES_USER.to_string());
    let password =
        env::var(ENV_POSTGRES_PASSWORD).unwrap_or_else(|_| DEFAULT_POSTGRES_PASSWORD.to_string());
    let database = env::var(ENV_POSTGRES_DB).unwrap_or_else(|_| DEFAULT_POSTGRES_DB.to_string());

    let database_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        user, password, host, port, database
    );

    tracing::debug!(host = %host, port = %port, database = %database, "Connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    tracing::info!(host = %host, port = %port, "PostgreSQL connection established");

    Ok(pool)
}

/// Initialize database schema
pub async fn init_schema(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL,
            name TEXT,
            email TEXT,
            phone TEXT,
            company TEXT,
            title TEXT,
            location TEXT,
            linkedin_url TEXT,
            professional_context JSONB NOT NULL DEFAULT '{}',
            personal_context JSONB NOT NULL DEFAULT '{}',
            field_sources JSONB NOT NULL DEFAULT '{}',
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artifacts (
            id UUID PRIMARY KEY,
            contact_id UUID NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            user_id UUID NOT NULL,
            type VARCHAR(50) NOT NULL,
            content TEXT,
            metadata JSONB NOT NULL DEFAULT '{}',
            transcription TEXT,
            transcription_status VARCHAR(20) NOT NULL DEFAULT 'pending',
            ai_parsing_status VARCHAR(20) NOT NULL DEFAULT 'pending',
            ai_processing_started_at TIMESTAMPTZ,
            ai_processing_completed_at TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contact_update_suggestions (
            id UUID PRIMARY KEY,
            artifact_id UUID NOT NULL REFERENCES artifacts(id) ON DELETE CASCADE,
            contact_id UUID NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            user_id UUID NOT NULL,
            suggested_updates JSONB NOT NULL,
            field_paths TEXT[] NOT NULL DEFAULT '{}',
            confidence_scores JSONB NOT NULL DEFAULT '{}',
            status VARCHAR(20) NOT NULL DEFAULT 'pending',
            priority VARCHAR(10) NOT NULL DEFAULT 'medium',
            applied_indices JSONB NOT NULL DEFAULT '[]',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            reviewed_at TIMESTAMPTZ,
            applied_at TIMESTAMPTZ,
            dismissed_at TIMESTAMPTZ,
            viewed_at TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes separately
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_artifacts_contact_id ON artifacts(contact_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_suggestions_artifact_id ON contact_update_suggestions(artifact_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_suggestions_contact_id ON contact_update_suggestions(contact_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_suggestions_status ON contact_update_suggestions(status)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database schema initialized");

    Ok(())
}

/// Tables `init_schema` creates
pub const SCHEMA_TABLES: [&str; 3] = ["contacts", "artifacts", "contact_update_suggestions"];

/// Names from `SCHEMA_TABLES` that do not exist in the current search path
pub async fn missing_tables(pool: &PgPool) -> Result<Vec<String>, DbError> {
    let mut missing = Vec::new();
    for table in SCHEMA_TABLES {
        let present: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
            .bind(table)
            .fetch_one(pool)
            .await?;
        if !present {
            missing.push(table.to_string());
        }
    }
    Ok(missing)
}
