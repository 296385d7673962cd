//! Review statistics endpoint.

use actix_web::{HttpResponse, get, web};

use crate::error::{AppResult, ErrorResponse};
use crate::models::StatsResponse;
use crate::services::AssignmentEngine;

/// Configure statistics routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(review_stats);
}

/// Review assignment counts per user, highest first.
///
/// GET /api/v1/stats
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    tag = "Stats",
    responses(
        (status = 200, description = "Assignment counts", body = StatsResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
#[get("/stats")]
pub async fn review_stats(engine: web::Data<AssignmentEngine>) -> AppResult<HttpResponse> {
    let stats = engine.get_review_stats().await?;
    Ok(HttpResponse::Ok().json(StatsResponse::from(stats)))
}
