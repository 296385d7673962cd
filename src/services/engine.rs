//! Reviewer assignment engine: pull request creation, reviewer reassignment, and the
//! merge lifecycle.
//!
//! Every command runs under the configured per-call deadline. Errors from the
//! repositories propagate unchanged and nothing is retried here.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{CandidateSelector, check_len};
use crate::config::EngineConfig;
use crate::db::{
    HealthCheck, MergeOutcome, PullRequestRepository, StatsRepository, TeamRepository,
    UserRepository,
};
use crate::error::{AppError, AppResult};
use crate::models::{MAX_NAME_LEN, MAX_TITLE_LEN, PrStatus, PullRequest, Reassignment};

/// What a merge does to a pull request that is already merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Succeed and overwrite `merged_at` with the current time.
    #[default]
    Restamp,
    /// Succeed and keep the original `merged_at`.
    Keep,
    /// Fail with `PrMerged`.
    Reject,
}

impl MergePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restamp => "restamp",
            Self::Keep => "keep",
            Self::Reject => "reject",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "restamp" => Some(Self::Restamp),
            "keep" => Some(Self::Keep),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// Coordinates the directory, the pull request store and the selector.
pub struct AssignmentEngine {
    pub(super) users: Arc<dyn UserRepository>,
    pub(super) teams: Arc<dyn TeamRepository>,
    pub(super) pull_requests: Arc<dyn PullRequestRepository>,
    pub(super) stats: Arc<dyn StatsRepository>,
    health: Arc<dyn HealthCheck>,
    selector: CandidateSelector,
    config: EngineConfig,
}

impl AssignmentEngine {
    /// Build an engine over a store that implements every repository.
    pub fn new<S>(store: Arc<S>, selector: CandidateSelector, config: EngineConfig) -> Self
    where
        S: UserRepository
            + TeamRepository
            + PullRequestRepository
            + StatsRepository
            + HealthCheck
            + 'static,
    {
        Self {
            users: store.clone(),
            teams: store.clone(),
            pull_requests: store.clone(),
            stats: store.clone(),
            health: store,
            selector,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Probe the backing store.
    pub async fn health_check(&self) -> AppResult<()> {
        self.bounded("health_check", self.health.health_check())
            .await
    }

    pub fn backend_name(&self) -> &'static str {
        self.health.backend_name()
    }

    /// Run `fut` under the per-call deadline.
    pub(super) async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.config.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.config.call_timeout.as_millis() as u64,
                    "Deadline exceeded"
                );
                Err(AppError::Timeout(operation.to_string()))
            }
        }
    }

    /// Create an OPEN pull request and assign up to `reviewers_per_pr` active members
    /// of the author's team, never the author.
    ///
    /// Fewer reviewers (possibly none) are assigned when the team is short on active
    /// members.
    pub async fn create_pr(
        &self,
        pr_id: &str,
        title: &str,
        author_id: Uuid,
    ) -> AppResult<PullRequest> {
        self.bounded("create_pr", self.create_pr_inner(pr_id, title, author_id))
            .await
    }

    async fn create_pr_inner(
        &self,
        pr_id: &str,
        title: &str,
        author_id: Uuid,
    ) -> AppResult<PullRequest> {
        if pr_id.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "pull_request_id is required".to_string(),
            ));
        }
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "pull_request_name is required".to_string(),
            ));
        }
        check_len("pull_request_id", pr_id, MAX_NAME_LEN)?;
        check_len("pull_request_name", title, MAX_TITLE_LEN)?;

        if self.pull_requests.pr_exists(pr_id).await? {
            return Err(AppError::PrExists(pr_id.to_string()));
        }

        let author = self
            .users
            .get_user(author_id)
            .await?
            .ok_or_else(|| AppError::AuthorNotFound(author_id.to_string()))?;

        if !author.is_active {
            return Err(AppError::AuthorInactive(author_id.to_string()));
        }

        let candidates = self
            .users
            .get_active_team_members(&author.team_name, &[author_id])
            .await?;
        let exclude = HashSet::from([author_id]);
        let reviewers = self
            .selector
            .select(candidates, &exclude, self.config.reviewers_per_pr);

        if reviewers.len() < self.config.reviewers_per_pr {
            debug!(
                pr_id,
                team = %author.team_name,
                assigned = reviewers.len(),
                wanted = self.config.reviewers_per_pr,
                "Team has fewer eligible reviewers than requested"
            );
        }

        let pr = PullRequest {
            id: pr_id.to_string(),
            name: title.to_string(),
            status: PrStatus::Open,
            author_id,
            assigned_reviewers: reviewers,
            // PostgreSQL keeps microseconds; match it so responses equal later reads.
            created_at: Utc::now().trunc_subsecs(6),
            merged_at: None,
        };

        self.pull_requests.create_pr(&pr).await?;

        info!(
            pr_id,
            author = %author_id,
            reviewers = ?pr.assigned_reviewers,
            "Pull request created"
        );
        Ok(pr)
    }

    /// Replace `old_reviewer_id` with a random active member of the author's team that
    /// is neither the author nor already a reviewer.
    ///
    /// Returns the refreshed pull request and the id of the new reviewer.
    pub async fn reassign_reviewer(
        &self,
        pr_id: &str,
        old_reviewer_id: Uuid,
    ) -> AppResult<(PullRequest, Uuid)> {
        self.bounded(
            "reassign_reviewer",
            self.reassign_reviewer_inner(pr_id, old_reviewer_id),
        )
        .await
    }

    async fn reassign_reviewer_inner(
        &self,
        pr_id: &str,
        old_reviewer_id: Uuid,
    ) -> AppResult<(PullRequest, Uuid)> {
        let pr = self
            .pull_requests
            .get_pr(pr_id)
            .await?
            .ok_or_else(|| AppError::PrNotFound(pr_id.to_string()))?;

        if pr.is_merged() {
            return Err(AppError::PrMerged(pr_id.to_string()));
        }

        let author = self
            .users
            .get_user(pr.author_id)
            .await?
            .ok_or_else(|| AppError::AuthorNotFound(pr.author_id.to_string()))?;

        if old_reviewer_id == author.id {
            return Err(AppError::AuthorCannotBeReassigned(author.id.to_string()));
        }

        let mut exclude: HashSet<Uuid> = pr.assigned_reviewers.iter().copied().collect();
        exclude.insert(author.id);
        let exclude_ids: Vec<Uuid> = exclude.iter().copied().collect();

        let candidates = self
            .users
            .get_active_team_members(&author.team_name, &exclude_ids)
            .await?;

        let Some(new_reviewer_id) = self
            .selector
            .select(candidates, &exclude, 1)
            .into_iter()
            .next()
        else {
            return Err(AppError::NoCandidate(author.team_name));
        };

        self.pull_requests
            .reassign_reviewer(&Reassignment {
                pull_request_id: pr_id.to_string(),
                old_reviewer_id,
                new_reviewer_id,
            })
            .await?;

        let refreshed = self
            .pull_requests
            .get_pr(pr_id)
            .await?
            .ok_or_else(|| AppError::PrNotFound(pr_id.to_string()))?;

        info!(
            pr_id,
            old_reviewer = %old_reviewer_id,
            new_reviewer = %new_reviewer_id,
            "Reviewer reassigned"
        );
        Ok((refreshed, new_reviewer_id))
    }

    /// Mark a pull request MERGED. A repeated merge follows the configured
    /// [`MergePolicy`].
    pub async fn set_merge(&self, pr_id: &str) -> AppResult<PullRequest> {
        self.bounded("set_merge", self.set_merge_inner(pr_id))
            .await
    }

    async fn set_merge_inner(&self, pr_id: &str) -> AppResult<PullRequest> {
        if pr_id.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "pull_request_id is required".to_string(),
            ));
        }

        let policy = self.config.merge_policy;
        let outcome = self
            .pull_requests
            .set_merged(
                pr_id,
                Utc::now().trunc_subsecs(6),
                policy == MergePolicy::Restamp,
            )
            .await?
            .ok_or_else(|| AppError::PrNotFound(pr_id.to_string()))?;

        match outcome {
            MergeOutcome::Merged(pr) => {
                info!(pr_id, merged_at = ?pr.merged_at, "Pull request merged");
                Ok(pr)
            }
            MergeOutcome::AlreadyMerged(pr) => match policy {
                MergePolicy::Reject => Err(AppError::PrMerged(pr_id.to_string())),
                MergePolicy::Keep | MergePolicy::Restamp => {
                    debug!(pr_id, "Pull request already merged");
                    Ok(pr)
                }
            },
        }
    }
}
