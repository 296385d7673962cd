//! Health check endpoints.

use actix_web::{HttpResponse, get, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ErrorResponse;
use crate::services::AssignmentEngine;

/// Health check response.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Readiness check response.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ReadyResponse {
    pub status: String,
    pub store: String,
}

/// Server info response.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ServerInfoResponse {
    pub version: String,
    pub store: String,
    pub reviewers_per_pr: usize,
    pub merge_policy: String,
    pub request_timeout_secs: u64,
}

/// Health check endpoint.
///
/// Returns 200 if the service is running.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check endpoint.
///
/// Returns 200 if the backing store answers a probe.
#[utoipa::path(
    get,
    path = "/api/v1/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service unavailable", body = ErrorResponse)
    )
)]
#[get("/ready")]
pub async fn ready(engine: web::Data<AssignmentEngine>) -> HttpResponse {
    match engine.health_check().await {
        Ok(()) => HttpResponse::Ok().json(ReadyResponse {
            status: "ready".to_string(),
            store: engine.backend_name().to_string(),
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness probe failed");
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "NOT_READY".to_string(),
                message: "Store connection failed".to_string(),
            })
        }
    }
}

/// Version, store backend and assignment settings.
#[utoipa::path(
    get,
    path = "/api/v1/info",
    tag = "Health",
    responses(
        (status = 200, description = "Server info", body = ServerInfoResponse)
    )
)]
#[get("/info")]
pub async fn info(engine: web::Data<AssignmentEngine>) -> HttpResponse {
    let config = engine.config();
    HttpResponse::Ok().json(ServerInfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: engine.backend_name().to_string(),
        reviewers_per_pr: config.reviewers_per_pr,
        merge_policy: config.merge_policy.as_str().to_string(),
        request_timeout_secs: config.call_timeout.as_secs(),
    })
}

/// Configure health routes.
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(ready).service(info);
}
