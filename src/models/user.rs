//! User models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Team member as stored in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub is_active: bool,
    /// Every user belongs to exactly one team.
    pub team_name: String,
}

/// Request body for POST /users/setIsActive.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetIsActiveRequest {
    pub user_id: String,
    pub is_active: bool,
}

/// Query parameters for GET /users/getReview.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UserReviewsQuery {
    pub user_id: Option<String>,
}

/// User returned by the directory endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub username: String,
    pub is_active: bool,
    pub team_name: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            user_id: u.id,
            username: u.username,
            is_active: u.is_active,
            team_name: u.team_name,
        }
    }
}
