//! Shared test helpers for integration tests.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, dev::ServiceResponse, test, web};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use pr_reviewer_lib::config::EngineConfig;
use pr_reviewer_lib::db::memory::InMemoryStore;
use pr_reviewer_lib::db::{
    HealthCheck, MergeOutcome, PullRequestRepository, StatsRepository, TeamRepository,
    UserRepository,
};
use pr_reviewer_lib::error::AppResult;
use pr_reviewer_lib::models::{PullRequest, Reassignment, Team, User, UserReviewStat};
use pr_reviewer_lib::services::{AssignmentEngine, CandidateSelector, MergePolicy};

pub const TEAM: &str = "T";

/// Team "T" with active members A (usually the author), B, C and D.
pub struct TeamFixture {
    pub a: Uuid,
    pub b: Uuid,
    pub c: Uuid,
    pub d: Uuid,
}

impl TeamFixture {
    /// Everyone but A.
    pub fn others(&self) -> HashSet<Uuid> {
        HashSet::from([self.b, self.c, self.d])
    }
}

pub fn engine_config(merge_policy: MergePolicy) -> EngineConfig {
    EngineConfig {
        reviewers_per_pr: 2,
        merge_policy,
        call_timeout: Duration::from_secs(5),
    }
}

/// Engine over a fresh in-memory store with a seeded selector.
pub fn new_engine(seed: u64) -> (Arc<InMemoryStore>, AssignmentEngine) {
    new_engine_with(seed, engine_config(MergePolicy::Restamp))
}

pub fn new_engine_with(seed: u64, config: EngineConfig) -> (Arc<InMemoryStore>, AssignmentEngine) {
    let store = Arc::new(InMemoryStore::new());
    let engine = AssignmentEngine::new(store.clone(), CandidateSelector::seeded(seed), config);
    (store, engine)
}

pub fn member(name: &str) -> User {
    User {
        id: Uuid::new_v4(),
        username: name.to_string(),
        is_active: true,
        team_name: TEAM.to_string(),
    }
}

/// Create team "T" with members A, B, C, D.
pub async fn seed_team(engine: &AssignmentEngine) -> TeamFixture {
    let members = vec![member("a"), member("b"), member("c"), member("d")];
    let fixture = TeamFixture {
        a: members[0].id,
        b: members[1].id,
        c: members[2].id,
        d: members[3].id,
    };
    engine
        .create_team(Team {
            name: TEAM.to_string(),
            members,
        })
        .await
        .expect("Failed to create team");
    fixture
}

/// Create a team with the given member names; returns their ids in order.
pub async fn seed_named_team(engine: &AssignmentEngine, team: &str, names: &[&str]) -> Vec<Uuid> {
    let members: Vec<User> = names
        .iter()
        .map(|n| User {
            team_name: team.to_string(),
            ..member(n)
        })
        .collect();
    let ids = members.iter().map(|m| m.id).collect();
    engine
        .create_team(Team {
            name: team.to_string(),
            members,
        })
        .await
        .expect("Failed to create team");
    ids
}

/// Asserts reviewer-set invariants: no author, no duplicates.
pub fn assert_reviewer_invariants(pr: &PullRequest) {
    assert!(
        !pr.assigned_reviewers.contains(&pr.author_id),
        "author assigned as reviewer: {:?}",
        pr
    );
    let distinct: HashSet<&Uuid> = pr.assigned_reviewers.iter().collect();
    assert_eq!(
        distinct.len(),
        pr.assigned_reviewers.len(),
        "duplicate reviewers: {:?}",
        pr
    );
}

/// Create a test app wired to `engine`.
pub async fn create_test_app(
    engine: AssignmentEngine,
) -> impl actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(engine))
            .configure(pr_reviewer_lib::api::configure_routes),
    )
    .await
}

/// In-memory store whose pull request writes stall, for deadline tests.
pub struct SlowStore {
    pub inner: InMemoryStore,
    pub delay: Duration,
}

#[async_trait]
impl UserRepository for SlowStore {
    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>> {
        self.inner.get_user(id).await
    }

    async fn get_active_team_members(
        &self,
        team_name: &str,
        exclude: &[Uuid],
    ) -> AppResult<Vec<User>> {
        self.inner.get_active_team_members(team_name, exclude).await
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<Option<User>> {
        self.inner.set_active(id, is_active).await
    }
}

#[async_trait]
impl TeamRepository for SlowStore {
    async fn team_exists(&self, name: &str) -> AppResult<bool> {
        self.inner.team_exists(name).await
    }

    async fn get_team(&self, name: &str) -> AppResult<Option<Team>> {
        self.inner.get_team(name).await
    }

    async fn create_team_with_members(&self, team: &Team) -> AppResult<()> {
        self.inner.create_team_with_members(team).await
    }
}

#[async_trait]
impl PullRequestRepository for SlowStore {
    async fn pr_exists(&self, id: &str) -> AppResult<bool> {
        self.inner.pr_exists(id).await
    }

    async fn create_pr(&self, pr: &PullRequest) -> AppResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.create_pr(pr).await
    }

    async fn get_pr(&self, id: &str) -> AppResult<Option<PullRequest>> {
        self.inner.get_pr(id).await
    }

    async fn reassign_reviewer(&self, reassignment: &Reassignment) -> AppResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.reassign_reviewer(reassignment).await
    }

    async fn set_merged(
        &self,
        id: &str,
        merged_at: DateTime<Utc>,
        restamp: bool,
    ) -> AppResult<Option<MergeOutcome>> {
        tokio::time::sleep(self.delay).await;
        self.inner.set_merged(id, merged_at, restamp).await
    }

    async fn get_prs_by_reviewer(&self, user_id: Uuid) -> AppResult<Vec<PullRequest>> {
        self.inner.get_prs_by_reviewer(user_id).await
    }
}

#[async_trait]
impl StatsRepository for SlowStore {
    async fn review_stats(&self) -> AppResult<Vec<UserReviewStat>> {
        self.inner.review_stats().await
    }
}

#[async_trait]
impl HealthCheck for SlowStore {
    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "slow-memory"
    }
}
