//! REST API endpoints scoped to a contact

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::ApiError;
use crate::service::SuggestionReviewService;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProvenanceParams {
    /// Artifact whose contributions are listed
    pub artifact_id: Uuid,
}

/// Fields of a contact last supplied by an artifact
#[utoipa::path(
    get,
    path = "/v1/contacts/{id}/provenance",
    params(
        ("id" = Uuid, Path, description = "Contact ID"),
        ProvenanceParams
    ),
    responses(
        (status = 200, description = "Provenance entries", body = [crate::service::review::ProvenanceEntry]),
        (status = 404, description = "Contact not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "contacts"
)]
#[get("/v1/contacts/{id}/provenance")]
pub async fn provenance(
    service: web::Data<SuggestionReviewService>,
    path: web::Path<Uuid>,
    query: web::Query<ProvenanceParams>,
) -> Result<HttpResponse, ApiError> {
    let entries = service
        .provenance(path.into_inner(), query.artifact_id)
        .await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// List suggestion records for a contact
#[utoipa::path(
    get,
    path = "/v1/contacts/{id}/suggestions",
    params(
        ("id" = Uuid, Path, description = "Contact ID")
    ),
    responses(
        (status = 200, description = "Suggestion records, newest first", body = [crate::model::SuggestionRecord]),
        (status = 500, description = "Internal server error", body = crate::api::error::ErrorResponse)
    ),
    tag = "contacts"
)]
#[get("/v1/contacts/{id}/suggestions")]
pub async fn list_suggestions(
    service: web::Data<SuggestionReviewService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let records = service.list_for_contact(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Configure contact routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(provenance).service(list_suggestions);
}
