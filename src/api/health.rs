//! Health check endpoints for Kubernetes liveness and readiness checks

use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::db;

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadinessStatus {
    pub status: String,
    pub version: String,
    pub dependencies: DependencyHealth,
}

#[derive(Serialize, ToSchema)]
pub struct DependencyHealth {
    pub database: String,
    /// `present` once every contact-intel table exists
    pub schema: String,
    /// Tables not found in the connected database
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_tables: Vec<String>,
}

/// Liveness endpoint
///
/// Always returns 200 OK if the service is running.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    ),
    tag = "health"
)]
#[get("/health/live")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness endpoint
///
/// Returns 200 OK once the database answers and holds the contact, artifact and
/// suggestion tables.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessStatus),
        (status = 503, description = "Service is not ready", body = ReadinessStatus)
    ),
    tag = "health"
)]
#[get("/health/ready")]
pub async fn readiness(db_pool: web::Data<PgPool>) -> impl Responder {
    let lookup = db::missing_tables(db_pool.get_ref()).await;
    match &lookup {
        Ok(missing) if missing.is_empty() => tracing::debug!("Readiness check passed"),
        Ok(missing) => tracing::warn!(missing = ?missing, "Schema tables missing"),
        Err(e) => tracing::error!(error = %e, "Database health check failed"),
    }

    let status = readiness_status(lookup.ok());
    if status.status == "ready" {
        HttpResponse::Ok().json(status)
    } else {
        HttpResponse::ServiceUnavailable().json(status)
    }
}

/// Build the readiness body from the missing-table lookup, `None` when the
/// database did not answer
fn readiness_status(missing: Option<Vec<String>>) -> ReadinessStatus {
    let (database, schema, missing_tables) = match missing {
        None => ("unhealthy", "unknown", Vec::new()),
        Some(missing) if missing.is_empty() => ("healthy", "present", missing),
        Some(missing) => ("healthy", "incomplete", missing),
    };
    let ready = schema == "present";

    ReadinessStatus {
        status: if ready { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dependencies: DependencyHealth {
            database: database.to_string(),
            schema: schema.to_string(),
            missing_tables,
        },
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(liveness).service(readiness);
}
