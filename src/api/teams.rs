//! Team endpoints.

use actix_web::{HttpResponse, get, post, web};

use super::required;
use crate::error::{AppResult, ErrorResponse};
use crate::models::{TeamPayload, TeamQuery};
use crate::services::AssignmentEngine;

/// Configure team routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_team).service(get_team);
}

/// Create a team with its members.
///
/// POST /api/v1/team/add
#[utoipa::path(
    post,
    path = "/api/v1/team/add",
    tag = "Teams",
    request_body = TeamPayload,
    responses(
        (status = 201, description = "Team created", body = TeamPayload),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Team already exists", body = ErrorResponse)
    )
)]
#[post("/team/add")]
pub async fn create_team(
    engine: web::Data<AssignmentEngine>,
    body: web::Json<TeamPayload>,
) -> AppResult<HttpResponse> {
    let team = engine.create_team(body.into_inner().into_team()).await?;
    Ok(HttpResponse::Created().json(TeamPayload::from(team)))
}

/// Get a team and all of its members.
///
/// GET /api/v1/team/get?team_name=...
#[utoipa::path(
    get,
    path = "/api/v1/team/get",
    tag = "Teams",
    params(
        ("team_name" = String, Query, description = "Team name")
    ),
    responses(
        (status = 200, description = "Team", body = TeamPayload),
        (status = 400, description = "Missing team_name", body = ErrorResponse),
        (status = 404, description = "Team not found", body = ErrorResponse)
    )
)]
#[get("/team/get")]
pub async fn get_team(
    engine: web::Data<AssignmentEngine>,
    query: web::Query<TeamQuery>,
) -> AppResult<HttpResponse> {
    let name = required(query.into_inner().team_name, "team_name")?;
    let team = engine.get_team(&name).await?;
    Ok(HttpResponse::Ok().json(TeamPayload::from(team)))
}
