use std::sync::Arc;

use actix_web::{get, web, HttpResponse, Responder};
use tracing::warn;

use crate::api::schemas::HealthResponse;
use crate::modules::storage::application::ports::outgoing::StorageAdapter;

/// Liveness probe
///
/// No I/O; answers as long as the process serves requests.
#[utoipa::path(
    get,
    path = "/health",
    tag = "operations",
    responses((status = 200, description = "Process is alive", body = HealthResponse))
)]
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        storage: None,
    })
}

/// Readiness probe
///
/// Pings the active storage backend.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "operations",
    responses(
        (status = 200, description = "Storage is reachable", body = HealthResponse),
        (status = 503, description = "Storage is unreachable", body = HealthResponse)
    )
)]
#[get("/ready")]
pub async fn readiness(storage: web::Data<Arc<dyn StorageAdapter>>) -> impl Responder {
    let backend = storage.backend().to_string();

    match storage.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: "ok".to_string(),
            storage: Some(backend),
        }),
        Err(e) => {
            warn!(error = %e, backend = %backend, "Readiness check failed");
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "unhealthy".to_string(),
                storage: Some(backend),
            })
        }
    }
}
