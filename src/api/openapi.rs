//! OpenAPI specification endpoints

use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

use crate::api::{artifacts, contacts, error, health, suggestions};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Contact Intel API",
        description = "Contact profile suggestions extracted from voice memos"
    ),
    paths(
        artifacts::extract,
        artifacts::reprocess,
        artifacts::list_suggestions,
        suggestions::get_suggestion,
        suggestions::approve,
        suggestions::reject,
        suggestions::skip,
        suggestions::view,
        contacts::provenance,
        contacts::list_suggestions,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        crate::model::SuggestionRecord,
        crate::model::Suggestion,
        crate::model::SuggestionStatus,
        crate::service::ExtractionOutcome,
        crate::service::review::ProvenanceEntry,
        suggestions::ApproveRequest,
        error::ErrorResponse,
    )),
    tags(
        (name = "artifacts", description = "Extraction runs over artifacts"),
        (name = "suggestions", description = "Suggestion review lifecycle"),
        (name = "contacts", description = "Contact provenance and history"),
        (name = "health", description = "Liveness and readiness checks")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> impl Responder {
    match ApiDoc::openapi().to_yaml() {
        Ok(yaml) => HttpResponse::Ok().content_type("text/yaml").body(yaml),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render OpenAPI YAML");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_review_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/v1/artifacts/{id}/extract",
            "/v1/artifacts/{id}/reprocess",
            "/v1/suggestions/{id}/approve",
            "/v1/contacts/{id}/provenance",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
