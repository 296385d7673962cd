//! API endpoint modules.

pub mod health;
pub mod openapi;
pub mod pull_requests;
pub mod stats;
pub mod teams;
pub mod users;

use actix_web::web;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use openapi::configure_routes as configure_openapi_routes;
pub use pull_requests::configure_routes as configure_pull_request_routes;
pub use stats::configure_routes as configure_stats_routes;
pub use teams::configure_routes as configure_team_routes;
pub use users::configure_routes as configure_user_routes;

/// Mount every endpoint under `/api/v1`, with extractor errors rendered as
/// `INVALID_INPUT` bodies.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope("/api/v1")
                .configure(configure_health_routes)
                .configure(configure_openapi_routes)
                .configure(configure_team_routes)
                .configure(configure_user_routes)
                .configure(configure_pull_request_routes)
                .configure(configure_stats_routes),
        );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

pub(crate) fn required(value: Option<String>, field: &str) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::InvalidInput(format!("{} is required", field))),
    }
}

pub(crate) fn parse_uuid(raw: &str, field: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidInput(format!("{} must be a valid UUID", field)))
}
