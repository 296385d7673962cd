//! Review statistics query.

use async_trait::async_trait;
use sea_orm::*;
use uuid::Uuid;

use super::{DbPool, StatsRepository, db_err};
use crate::error::AppResult;
use crate::models::UserReviewStat;

const REVIEW_STATS_SQL: &str = r#"
SELECT u.id AS user_id,
       u.username,
       u.is_active,
       COUNT(prr.reviewer_id) AS review_count
FROM users u
LEFT JOIN pull_request_reviewers prr ON prr.reviewer_id = u.id
GROUP BY u.id, u.username, u.is_active
ORDER BY review_count DESC, u.username ASC
"#;

#[derive(Debug, FromQueryResult)]
struct ReviewStatRow {
    user_id: Uuid,
    username: String,
    is_active: bool,
    review_count: i64,
}

#[async_trait]
impl StatsRepository for DbPool {
    async fn review_stats(&self) -> AppResult<Vec<UserReviewStat>> {
        let rows = ReviewStatRow::find_by_statement(Statement::from_string(
            DbBackend::Postgres,
            REVIEW_STATS_SQL,
        ))
        .all(self.connection())
        .await
        .map_err(db_err("Failed to compute review stats"))?;

        Ok(rows
            .into_iter()
            .map(|r| UserReviewStat {
                user_id: r.user_id,
                username: r.username,
                is_active: r.is_active,
                review_count: r.review_count,
            })
            .collect())
    }
}
