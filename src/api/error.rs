//! Unified API error handling
//!
//! This module provides a consistent error response format across all API endpoints.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbError;
use crate::service::reprocess::ReprocessError;
use crate::service::review::ReviewError;

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request / validation error (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource state does not allow the operation (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request is well-formed but cannot be applied (422)
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Conflict(_) => "conflict",
            ApiError::Unprocessable(_) => "unprocessable",
            ApiError::Internal(_) => "internal_error",
            ApiError::Database(_) => "database_error",
        };

        if status.is_server_error() {
            tracing::error!(
                error_type = error_type,
                status = status.as_u16(),
                message = %self,
                "API error"
            );
        } else {
            tracing::debug!(
                error_type = error_type,
                status = status.as_u16(),
                message = %self,
                "API request rejected"
            );
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

// ============================================================================
// From conversions for service errors
// ============================================================================

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NotFound(_) | ReviewError::ContactNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            ReviewError::InvalidTransition { .. } | ReviewError::Conflict(_) => {
                ApiError::Conflict(err.to_string())
            }
            ReviewError::InvalidSelection(msg) => ApiError::BadRequest(msg),
            ReviewError::Apply(e) => ApiError::Unprocessable(e.to_string()),
            ReviewError::WriteBack(_) | ReviewError::Persistence(_) => {
                ApiError::Database(err.to_string())
            }
        }
    }
}

impl From<ReprocessError> for ApiError {
    fn from(err: ReprocessError) -> Self {
        match err {
            ReprocessError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ReprocessError::Conflict(_) => ApiError::Conflict(err.to_string()),
            ReprocessError::Persistence(e) => ApiError::Database(e.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(id) => ApiError::NotFound(id),
            _ => ApiError::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SuggestionStatus;

    #[test]
    fn test_review_errors_map_to_status_codes() {
        let id = Uuid::new_v4();
        let cases = [
            (ReviewError::NotFound(id), StatusCode::NOT_FOUND),
            (
                ReviewError::InvalidTransition {
                    id,
                    status: SuggestionStatus::Rejected,
                    action: "approve",
                },
                StatusCode::CONFLICT,
            ),
            (
                ReviewError::InvalidSelection("index 9 out of range".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ReviewError::WriteBack(DbError::WriteFailed("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn test_reprocess_conflict_is_409() {
        let err = ApiError::from(ReprocessError::Conflict(Uuid::new_v4()));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
