//! Pull request endpoints: creation, merge and reviewer reassignment.

use actix_web::{HttpResponse, post, web};

use super::parse_uuid;
use crate::error::{AppResult, ErrorResponse};
use crate::models::{
    CreatePullRequestRequest, MergePullRequestRequest, PullRequestResponse, ReassignRequest,
    ReassignResponse,
};
use crate::services::AssignmentEngine;

/// Configure pull request routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_pull_request)
        .service(merge_pull_request)
        .service(reassign_reviewer);
}

/// Create a pull request and auto-assign reviewers from the author's team.
///
/// POST /api/v1/pullRequest/create
#[utoipa::path(
    post,
    path = "/api/v1/pullRequest/create",
    tag = "Pull Requests",
    request_body = CreatePullRequestRequest,
    responses(
        (status = 201, description = "Pull request created", body = PullRequestResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Author is inactive", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse),
        (status = 409, description = "Pull request already exists", body = ErrorResponse)
    )
)]
#[post("/pullRequest/create")]
pub async fn create_pull_request(
    engine: web::Data<AssignmentEngine>,
    body: web::Json<CreatePullRequestRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let author_id = parse_uuid(&body.author_id, "author_id")?;
    let pr = engine
        .create_pr(&body.pull_request_id, &body.pull_request_name, author_id)
        .await?;
    Ok(HttpResponse::Created().json(PullRequestResponse::from(pr)))
}

/// Mark a pull request as merged.
///
/// POST /api/v1/pullRequest/merge
#[utoipa::path(
    post,
    path = "/api/v1/pullRequest/merge",
    tag = "Pull Requests",
    request_body = MergePullRequestRequest,
    responses(
        (status = 200, description = "Pull request merged", body = PullRequestResponse),
        (status = 404, description = "Pull request not found", body = ErrorResponse),
        (status = 409, description = "Already merged (reject policy)", body = ErrorResponse)
    )
)]
#[post("/pullRequest/merge")]
pub async fn merge_pull_request(
    engine: web::Data<AssignmentEngine>,
    body: web::Json<MergePullRequestRequest>,
) -> AppResult<HttpResponse> {
    let pr = engine.set_merge(&body.pull_request_id).await?;
    Ok(HttpResponse::Ok().json(PullRequestResponse::from(pr)))
}

/// Replace one reviewer with another active member of the author's team.
///
/// POST /api/v1/pullRequest/reassign
#[utoipa::path(
    post,
    path = "/api/v1/pullRequest/reassign",
    tag = "Pull Requests",
    request_body = ReassignRequest,
    responses(
        (status = 200, description = "Reviewer replaced", body = ReassignResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Pull request or author not found", body = ErrorResponse),
        (status = 409, description = "Merged, not assigned, or no candidate", body = ErrorResponse)
    )
)]
#[post("/pullRequest/reassign")]
pub async fn reassign_reviewer(
    engine: web::Data<AssignmentEngine>,
    body: web::Json<ReassignRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let old_user_id = parse_uuid(&body.old_user_id, "old_user_id")?;
    let (pr, replaced_by) = engine
        .reassign_reviewer(&body.pull_request_id, old_user_id)
        .await?;

    Ok(HttpResponse::Ok().json(ReassignResponse {
        pr: PullRequestResponse::from(pr),
        replaced_by,
    }))
}
