//! REST API endpoints for reviewing suggestion records

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::ApiError;
use crate::service::SuggestionReviewService;

/// Body of an approve request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ApproveRequest {
    /// Indices into the record's suggestions; omitted means all not yet applied
    pub selections: Option<Vec<usize>>,
}

/// Get a suggestion record by ID
#[utoipa::path(
    get,
    path = "/v1/suggestions/{id}",
    params(
        ("id" = Uuid, Path, description = "Suggestion record ID")
    ),
    responses(
        (status = 200, description = "Suggestion record", body = crate::model::SuggestionRecord),
        (status = 404, description = "Suggestion record not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "suggestions"
)]
#[get("/v1/suggestions/{id}")]
pub async fn get_suggestion(
    service: web::Data<SuggestionReviewService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let record = service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Apply selected suggestions to the contact
#[utoipa::path(
    post,
    path = "/v1/suggestions/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Suggestion record ID")
    ),
    request_body(content = ApproveRequest, description = "Optional; omit to apply every remaining suggestion"),
    responses(
        (status = 200, description = "Record after approval", body = crate::model::SuggestionRecord),
        (status = 400, description = "Invalid selection", body = crate::api::error::ErrorResponse),
        (status = 404, description = "Suggestion record not found", body = crate::api::error::ErrorResponse),
        (status = 409, description = "Record is not reviewable", body = crate::api::error::ErrorResponse),
        (status = 422, description = "Suggestion cannot be applied to the contact", body = crate::api::error::ErrorResponse),
        (status = 500, description = "Contact write-back failed", body = crate::api::error::ErrorResponse)
    ),
    tag = "suggestions"
)]
#[post("/v1/suggestions/{id}/approve")]
pub async fn approve(
    service: web::Data<SuggestionReviewService>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ApproveRequest>>,
) -> Result<HttpResponse, ApiError> {
    let selections = body.and_then(|b| b.into_inner().selections);
    let record = service.approve(path.into_inner(), selections).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Reject a pending record
#[utoipa::path(
    post,
    path = "/v1/suggestions/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Suggestion record ID")
    ),
    responses(
        (status = 200, description = "Record after rejection", body = crate::model::SuggestionRecord),
        (status = 404, description = "Suggestion record not found", body = crate::api::error::ErrorResponse),
        (status = 409, description = "Record is not pending", body = crate::api::error::ErrorResponse)
    ),
    tag = "suggestions"
)]
#[post("/v1/suggestions/{id}/reject")]
pub async fn reject(
    service: web::Data<SuggestionReviewService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let record = service.reject(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Dismiss a pending record without review
#[utoipa::path(
    post,
    path = "/v1/suggestions/{id}/skip",
    params(
        ("id" = Uuid, Path, description = "Suggestion record ID")
    ),
    responses(
        (status = 200, description = "Record after skipping", body = crate::model::SuggestionRecord),
        (status = 404, description = "Suggestion record not found", body = crate::api::error::ErrorResponse),
        (status = 409, description = "Record is not pending", body = crate::api::error::ErrorResponse)
    ),
    tag = "suggestions"
)]
#[post("/v1/suggestions/{id}/skip")]
pub async fn skip(
    service: web::Data<SuggestionReviewService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let record = service.skip(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Mark a record as viewed
#[utoipa::path(
    post,
    path = "/v1/suggestions/{id}/view",
    params(
        ("id" = Uuid, Path, description = "Suggestion record ID")
    ),
    responses(
        (status = 200, description = "Record with viewed_at set", body = crate::model::SuggestionRecord),
        (status = 404, description = "Suggestion record not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "suggestions"
)]
#[post("/v1/suggestions/{id}/view")]
pub async fn view(
    service: web::Data<SuggestionReviewService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let record = service.mark_viewed(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Configure suggestion routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_suggestion)
        .service(approve)
        .service(reject)
        .service(skip)
        .service(view);
}
