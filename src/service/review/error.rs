//! Error types for suggestion review

use thiserror::Error;
use uuid::Uuid;

use crate::db::DbError;
use crate::model::{ContactWriteError, SuggestionStatus};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReviewError {
    #[error("Suggestion record not found: {0}")]
    NotFound(Uuid),

    #[error("Contact not found: {0}")]
    ContactNotFound(Uuid),

    #[error("Cannot {action} suggestion record {id} in status '{}'", status.as_str())]
    InvalidTransition {
        id: Uuid,
        status: SuggestionStatus,
        action: &'static str,
    },

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Suggestion cannot be applied to the contact: {0}")]
    Apply(#[from] ContactWriteError),

    #[error("Contact write-back failed: {0}")]
    WriteBack(DbError),

    /// Status changed between read and conditional update
    #[error("Suggestion record {0} was modified concurrently")]
    Conflict(Uuid),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] DbError),
}
