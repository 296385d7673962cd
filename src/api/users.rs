//! User endpoints.

use actix_web::{HttpResponse, get, post, web};

use super::{parse_uuid, required};
use crate::error::{AppResult, ErrorResponse};
use crate::models::{
    PullRequestShort, SetIsActiveRequest, UserResponse, UserReviewsQuery, UserReviewsResponse,
};
use crate::services::AssignmentEngine;

/// Configure user routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(set_is_active).service(get_reviews);
}

/// Activate or deactivate a user.
///
/// POST /api/v1/users/setIsActive
#[utoipa::path(
    post,
    path = "/api/v1/users/setIsActive",
    tag = "Users",
    request_body = SetIsActiveRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[post("/users/setIsActive")]
pub async fn set_is_active(
    engine: web::Data<AssignmentEngine>,
    body: web::Json<SetIsActiveRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let user_id = parse_uuid(&body.user_id, "user_id")?;
    let user = engine.set_user_active(user_id, body.is_active).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Pull requests the user is assigned to review.
///
/// GET /api/v1/users/getReview?user_id=...
#[utoipa::path(
    get,
    path = "/api/v1/users/getReview",
    tag = "Users",
    params(
        ("user_id" = String, Query, description = "Reviewer id (UUID)")
    ),
    responses(
        (status = 200, description = "Assigned pull requests", body = UserReviewsResponse),
        (status = 400, description = "Invalid user_id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[get("/users/getReview")]
pub async fn get_reviews(
    engine: web::Data<AssignmentEngine>,
    query: web::Query<UserReviewsQuery>,
) -> AppResult<HttpResponse> {
    let raw = required(query.into_inner().user_id, "user_id")?;
    let user_id = parse_uuid(&raw, "user_id")?;
    let prs = engine.get_reviews_for_user(user_id).await?;

    Ok(HttpResponse::Ok().json(UserReviewsResponse {
        user_id,
        pull_requests: prs.into_iter().map(PullRequestShort::from).collect(),
    }))
}
