//! Storage layer: connection management, migrations, and the repository seams
//! the assignment engine is written against.
//!
//! Two backends implement every repository: [`DbPool`] (PostgreSQL through SeaORM)
//! and [`memory::InMemoryStore`] (process-local, used by tests and `PRR_STORE=memory`).

pub mod memory;
pub mod pull_requests;
pub mod stats;
pub mod teams;
pub mod users;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;
use crate::models::{PullRequest, Reassignment, Team, User, UserReviewStat};

/// Read and activity-flag access to users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Active members of `team_name` whose ids are not in `exclude`.
    async fn get_active_team_members(
        &self,
        team_name: &str,
        exclude: &[Uuid],
    ) -> AppResult<Vec<User>>;

    /// Returns the updated user, or `None` if it does not exist.
    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<Option<User>>;
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn team_exists(&self, name: &str) -> AppResult<bool>;

    /// Team with members ordered by username.
    async fn get_team(&self, name: &str) -> AppResult<Option<Team>>;

    /// Inserts the team and upserts every member into it, all or nothing.
    /// A concurrent insert of the same name fails with `TeamExists`.
    async fn create_team_with_members(&self, team: &Team) -> AppResult<()>;
}

/// Result of a merge request against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Status was written (first merge, or a restamp).
    Merged(PullRequest),
    /// Already merged and the caller asked not to restamp; row untouched.
    AlreadyMerged(PullRequest),
}

#[async_trait]
pub trait PullRequestRepository: Send + Sync {
    async fn pr_exists(&self, id: &str) -> AppResult<bool>;

    /// Persists the pull request and its reviewer rows atomically.
    /// A concurrent insert of the same id fails with `PrExists`.
    async fn create_pr(&self, pr: &PullRequest) -> AppResult<()>;

    async fn get_pr(&self, id: &str) -> AppResult<Option<PullRequest>>;

    /// Replaces one reviewer with another in a single transaction.
    ///
    /// The pull request row is locked and its status rechecked first. Fails with
    /// `PrNotFound`, `PrMerged`, `UserNotAssigned` if the old reviewer is absent, or
    /// `ReviewerConflict` if the new reviewer is already present. Nothing is written
    /// on failure.
    async fn reassign_reviewer(&self, reassignment: &Reassignment) -> AppResult<()>;

    /// Marks the pull request MERGED. When it is already merged, `restamp` decides
    /// whether `merged_at` is overwritten. `None` if the pull request does not exist.
    async fn set_merged(
        &self,
        id: &str,
        merged_at: DateTime<Utc>,
        restamp: bool,
    ) -> AppResult<Option<MergeOutcome>>;

    /// Pull requests where `user_id` is a reviewer, newest first.
    async fn get_prs_by_reviewer(&self, user_id: Uuid) -> AppResult<Vec<PullRequest>>;
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Assignment count for every user, zero included, highest count first.
    async fn review_stats(&self) -> AppResult<Vec<UserReviewStat>>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn health_check(&self) -> AppResult<()>;

    fn backend_name(&self) -> &'static str;
}

/// PostgreSQL connection pool.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Connect using the pool settings from configuration.
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        let mut opts = ConnectOptions::new(config.url.clone());
        opts.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .sqlx_logging(false);

        let conn = Database::connect(opts)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connected to PostgreSQL"
        );

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Apply all pending schema migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl HealthCheck for DbPool {
    async fn health_check(&self) -> AppResult<()> {
        self.conn
            .ping()
            .await
            .map_err(|e| AppError::Database(format!("Database ping failed: {}", e)))
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// Wrap a driver error with the operation that failed.
pub(crate) fn db_err(context: &'static str) -> impl Fn(DbErr) -> AppError {
    move |e| AppError::Database(format!("{}: {}", context, e))
}

/// True when the error is a primary key or unique index violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}
