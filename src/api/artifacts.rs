//! REST API endpoints for artifact extraction

use actix_web::{HttpResponse, get, post, web};
use uuid::Uuid;

use crate::api::ApiError;
use crate::service::{ExtractionPipeline, ReprocessService, SuggestionReviewService};

/// Run contact extraction for a transcribed voice memo
///
/// Failures and skipped artifacts are reported in the outcome body, not as
/// HTTP errors.
#[utoipa::path(
    post,
    path = "/v1/artifacts/{id}/extract",
    params(
        ("id" = Uuid, Path, description = "Artifact ID")
    ),
    responses(
        (status = 200, description = "Extraction attempt finished", body = crate::service::ExtractionOutcome)
    ),
    tag = "artifacts"
)]
#[post("/v1/artifacts/{id}/extract")]
pub async fn extract(
    pipeline: web::Data<ExtractionPipeline>,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let outcome = pipeline.run_extraction(path.into_inner()).await;
    HttpResponse::Ok().json(outcome)
}

/// Reset a finished artifact and extract again
#[utoipa::path(
    post,
    path = "/v1/artifacts/{id}/reprocess",
    params(
        ("id" = Uuid, Path, description = "Artifact ID")
    ),
    responses(
        (status = 200, description = "Extraction attempt finished", body = crate::service::ExtractionOutcome),
        (status = 404, description = "Artifact not found", body = crate::api::error::ErrorResponse),
        (status = 409, description = "Artifact is currently processing", body = crate::api::error::ErrorResponse)
    ),
    tag = "artifacts"
)]
#[post("/v1/artifacts/{id}/reprocess")]
pub async fn reprocess(
    service: web::Data<ReprocessService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let outcome = service.reprocess(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// List every suggestion record produced from an artifact
#[utoipa::path(
    get,
    path = "/v1/artifacts/{id}/suggestions",
    params(
        ("id" = Uuid, Path, description = "Artifact ID")
    ),
    responses(
        (status = 200, description = "Suggestion records, newest first", body = [crate::model::SuggestionRecord]),
        (status = 500, description = "Internal server error", body = crate::api::error::ErrorResponse)
    ),
    tag = "artifacts"
)]
#[get("/v1/artifacts/{id}/suggestions")]
pub async fn list_suggestions(
    service: web::Data<SuggestionReviewService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let records = service.list_for_artifact(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Configure artifact routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(extract)
        .service(reprocess)
        .service(list_suggestions);
}
