//! Review statistics models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Number of pull requests a user currently reviews, across all statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserReviewStat {
    pub user_id: Uuid,
    pub username: String,
    pub is_active: bool,
    pub review_count: i64,
}

/// One row of GET /stats.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserStatResponse {
    pub user_id: Uuid,
    pub username: String,
    pub is_active: bool,
    pub review_assignments_count: i64,
}

/// Response of GET /stats, ranked by assignment count.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub stats: Vec<UserStatResponse>,
}

impl From<UserReviewStat> for UserStatResponse {
    fn from(s: UserReviewStat) -> Self {
        Self {
            user_id: s.user_id,
            username: s.username,
            is_active: s.is_active,
            review_assignments_count: s.review_count,
        }
    }
}

impl From<Vec<UserReviewStat>> for StatsResponse {
    fn from(stats: Vec<UserReviewStat>) -> Self {
        Self {
            stats: stats.into_iter().map(UserStatResponse::from).collect(),
        }
    }
}
