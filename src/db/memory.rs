//! In-memory implementation of every repository.
//!
//! Not durable: all state is lost on restart. One `RwLock` guards the whole state, so
//! each multi-row write (team plus members, pull request plus reviewers, reviewer swap)
//! happens under a single write lock. Writes that can fail midway operate on a staged
//! copy and publish it only once every step has succeeded, which gives the same
//! all-or-nothing outcome as the PostgreSQL transactions.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    HealthCheck, MergeOutcome, PullRequestRepository, StatsRepository, TeamRepository,
    UserRepository,
};
use crate::error::{AppError, AppResult};
use crate::models::{PrStatus, PullRequest, Reassignment, Team, User, UserReviewStat};

#[derive(Debug, Default)]
struct State {
    teams: BTreeMap<String, DateTime<Utc>>,
    users: HashMap<Uuid, User>,
    pull_requests: HashMap<String, PullRequest>,
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn get_active_team_members(
        &self,
        team_name: &str,
        exclude: &[Uuid],
    ) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        let mut members: Vec<User> = state
            .users
            .values()
            .filter(|u| u.team_name == team_name && u.is_active && !exclude.contains(&u.id))
            .cloned()
            .collect();
        members.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(members)
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<Option<User>> {
        let mut state = self.state.write().await;
        Ok(state.users.get_mut(&id).map(|u| {
            u.is_active = is_active;
            u.clone()
        }))
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn team_exists(&self, name: &str) -> AppResult<bool> {
        Ok(self.state.read().await.teams.contains_key(name))
    }

    async fn get_team(&self, name: &str) -> AppResult<Option<Team>> {
        let state = self.state.read().await;
        if !state.teams.contains_key(name) {
            return Ok(None);
        }

        let mut members: Vec<User> = state
            .users
            .values()
            .filter(|u| u.team_name == name)
            .cloned()
            .collect();
        members.sort_by(|a, b| a.username.cmp(&b.username));

        Ok(Some(Team {
            name: name.to_string(),
            members,
        }))
    }

    async fn create_team_with_members(&self, team: &Team) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.teams.contains_key(&team.name) {
            return Err(AppError::TeamExists(team.name.clone()));
        }

        state.teams.insert(team.name.clone(), Utc::now());
        for member in &team.members {
            let user = User {
                team_name: team.name.clone(),
                ..member.clone()
            };
            state.users.insert(user.id, user);
        }
        Ok(())
    }
}

#[async_trait]
impl PullRequestRepository for InMemoryStore {
    async fn pr_exists(&self, id: &str) -> AppResult<bool> {
        Ok(self.state.read().await.pull_requests.contains_key(id))
    }

    async fn create_pr(&self, pr: &PullRequest) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.pull_requests.contains_key(&pr.id) {
            return Err(AppError::PrExists(pr.id.clone()));
        }
        state.pull_requests.insert(pr.id.clone(), pr.clone());
        Ok(())
    }

    async fn get_pr(&self, id: &str) -> AppResult<Option<PullRequest>> {
        Ok(self.state.read().await.pull_requests.get(id).cloned())
    }

    async fn reassign_reviewer(&self, r: &Reassignment) -> AppResult<()> {
        let mut state = self.state.write().await;
        let pr = state
            .pull_requests
            .get_mut(&r.pull_request_id)
            .ok_or_else(|| AppError::PrNotFound(r.pull_request_id.clone()))?;

        if pr.is_merged() {
            return Err(AppError::PrMerged(r.pull_request_id.clone()));
        }

        let mut staged = pr.assigned_reviewers.clone();

        let Some(pos) = staged.iter().position(|id| *id == r.old_reviewer_id) else {
            return Err(AppError::UserNotAssigned {
                pr: r.pull_request_id.clone(),
                user: r.old_reviewer_id.to_string(),
            });
        };
        staged.remove(pos);

        // Same outcome as the (pull_request_id, reviewer_id) primary key rejecting the insert.
        if staged.contains(&r.new_reviewer_id) {
            return Err(AppError::ReviewerConflict(r.pull_request_id.clone()));
        }
        staged.insert(pos, r.new_reviewer_id);

        pr.assigned_reviewers = staged;
        Ok(())
    }

    async fn set_merged(
        &self,
        id: &str,
        merged_at: DateTime<Utc>,
        restamp: bool,
    ) -> AppResult<Option<MergeOutcome>> {
        let mut state = self.state.write().await;
        let Some(pr) = state.pull_requests.get_mut(id) else {
            return Ok(None);
        };

        if pr.is_merged() && !restamp {
            return Ok(Some(MergeOutcome::AlreadyMerged(pr.clone())));
        }

        pr.status = PrStatus::Merged;
        pr.merged_at = Some(merged_at);
        Ok(Some(MergeOutcome::Merged(pr.clone())))
    }

    async fn get_prs_by_reviewer(&self, user_id: Uuid) -> AppResult<Vec<PullRequest>> {
        let state = self.state.read().await;
        let mut prs: Vec<PullRequest> = state
            .pull_requests
            .values()
            .filter(|pr| pr.has_reviewer(user_id))
            .cloned()
            .collect();
        prs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(prs)
    }
}

#[async_trait]
impl StatsRepository for InMemoryStore {
    async fn review_stats(&self) -> AppResult<Vec<UserReviewStat>> {
        let state = self.state.read().await;
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for reviewer in state
            .pull_requests
            .values()
            .flat_map(|pr| pr.assigned_reviewers.iter())
        {
            *counts.entry(*reviewer).or_insert(0) += 1;
        }

        let mut stats: Vec<UserReviewStat> = state
            .users
            .values()
            .map(|u| UserReviewStat {
                user_id: u.id,
                username: u.username.clone(),
                is_active: u.is_active,
                review_count: counts.get(&u.id).copied().unwrap_or(0),
            })
            .collect();
        stats.sort_by(|a, b| {
            b.review_count
                .cmp(&a.review_count)
                .then_with(|| a.username.cmp(&b.username))
        });
        Ok(stats)
    }
}

#[async_trait]
impl HealthCheck for InMemoryStore {
    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
