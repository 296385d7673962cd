//! OpenAPI documentation configuration.

use actix_web::{HttpResponse, get, web};
use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PR Reviewer Service",
        version = "0.1.0",
        description = "Assigns pull request reviewers from the author's team and manages reassignment and merge"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        api::health::info,
        // Team endpoints
        api::teams::create_team,
        api::teams::get_team,
        // User endpoints
        api::users::set_is_active,
        api::users::get_reviews,
        // Pull request endpoints
        api::pull_requests::create_pull_request,
        api::pull_requests::merge_pull_request,
        api::pull_requests::reassign_reviewer,
        // Stats
        api::stats::review_stats,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            api::health::ServerInfoResponse,
            // Teams and users
            models::TeamMember,
            models::TeamPayload,
            models::SetIsActiveRequest,
            models::UserResponse,
            // Pull requests
            models::PrStatus,
            models::CreatePullRequestRequest,
            models::MergePullRequestRequest,
            models::ReassignRequest,
            models::PullRequestResponse,
            models::ReassignResponse,
            models::PullRequestShort,
            models::UserReviewsResponse,
            // Stats
            models::UserStatResponse,
            models::StatsResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Teams", description = "Team directory"),
        (name = "Users", description = "User activity and review assignments"),
        (name = "Pull Requests", description = "Pull request creation, merge and reviewer reassignment"),
        (name = "Stats", description = "Review assignment statistics")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document.
#[get("/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Configure documentation routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi_json);
}
