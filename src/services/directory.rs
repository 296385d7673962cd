//! Team and user directory commands, and reviewer-centric reads.

use std::collections::HashSet;

use tracing::info;
use uuid::Uuid;

use super::{AssignmentEngine, check_len};
use crate::error::{AppError, AppResult};
use crate::models::{MAX_NAME_LEN, PullRequest, Team, User, UserReviewStat};

impl AssignmentEngine {
    /// Create a team and upsert its members into it.
    pub async fn create_team(&self, team: Team) -> AppResult<Team> {
        self.bounded("create_team", self.create_team_inner(team))
            .await
    }

    async fn create_team_inner(&self, team: Team) -> AppResult<Team> {
        validate_team(&team)?;

        if self.teams.team_exists(&team.name).await? {
            return Err(AppError::TeamExists(team.name));
        }

        self.teams.create_team_with_members(&team).await?;

        info!(team = %team.name, members = team.members.len(), "Team created");
        Ok(team)
    }

    pub async fn get_team(&self, name: &str) -> AppResult<Team> {
        self.bounded("get_team", async {
            if name.trim().is_empty() {
                return Err(AppError::InvalidInput("team_name is required".to_string()));
            }
            self.teams
                .get_team(name)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Team {}", name)))
        })
        .await
    }

    /// Flip a user's activity flag. Inactive users are never picked as reviewers but
    /// keep the assignments they already have.
    pub async fn set_user_active(&self, user_id: Uuid, is_active: bool) -> AppResult<User> {
        self.bounded("set_user_active", async {
            if user_id.is_nil() {
                return Err(AppError::InvalidInput("user_id is required".to_string()));
            }
            let user = self
                .users
                .set_active(user_id, is_active)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))?;

            info!(user = %user_id, is_active, "User activity updated");
            Ok(user)
        })
        .await
    }

    /// Pull requests the user currently reviews, newest first.
    pub async fn get_reviews_for_user(&self, user_id: Uuid) -> AppResult<Vec<PullRequest>> {
        self.bounded("get_reviews_for_user", async {
            if self.users.get_user(user_id).await?.is_none() {
                return Err(AppError::NotFound(format!("User {}", user_id)));
            }
            self.pull_requests.get_prs_by_reviewer(user_id).await
        })
        .await
    }

    /// Per-user assignment counts across all pull requests, merged ones included.
    pub async fn get_review_stats(&self) -> AppResult<Vec<UserReviewStat>> {
        self.bounded("get_review_stats", self.stats.review_stats())
            .await
    }
}

fn validate_team(team: &Team) -> AppResult<()> {
    if team.name.trim().is_empty() {
        return Err(AppError::InvalidInput("team_name is required".to_string()));
    }
    check_len("team_name", &team.name, MAX_NAME_LEN)?;
    if team.members.is_empty() {
        return Err(AppError::InvalidInput(
            "team must have at least one member".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(team.members.len());
    for member in &team.members {
        if member.id.is_nil() {
            return Err(AppError::InvalidInput("user_id is required".to_string()));
        }
        if member.username.trim().is_empty() {
            return Err(AppError::InvalidInput(format!(
                "username is required for user {}",
                member.id
            )));
        }
        check_len("username", &member.username, MAX_NAME_LEN)?;
        if !seen.insert(member.id) {
            return Err(AppError::InvalidInput(format!(
                "user {} is listed twice",
                member.id
            )));
        }
    }
    Ok(())
}
