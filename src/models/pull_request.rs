//! Pull request domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Pull request lifecycle status.
///
/// OPEN is the only state in which the reviewer set may change. There is no way back from MERGED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrStatus {
    Open,
    Merged,
}

impl PrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Merged => "MERGED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(Self::Open),
            "MERGED" => Some(Self::Merged),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pull request with its reviewer set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub id: String,
    pub name: String,
    pub status: PrStatus,
    pub author_id: Uuid,
    /// Never contains the author and never contains duplicates.
    pub assigned_reviewers: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    /// Set iff status is MERGED.
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    pub fn is_merged(&self) -> bool {
        self.status == PrStatus::Merged
    }

    pub fn has_reviewer(&self, user_id: Uuid) -> bool {
        self.assigned_reviewers.contains(&user_id)
    }
}

/// Swap of one reviewer for another on a single pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub pull_request_id: String,
    pub old_reviewer_id: Uuid,
    pub new_reviewer_id: Uuid,
}

/// Request body for POST /pullRequest/create.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePullRequestRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

/// Request body for POST /pullRequest/merge.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MergePullRequestRequest {
    pub pull_request_id: String,
}

/// Request body for POST /pullRequest/reassign.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReassignRequest {
    pub pull_request_id: String,
    pub old_user_id: String,
}

/// Full pull request representation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PullRequestResponse {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub status: PrStatus,
    pub author_id: Uuid,
    pub assigned_reviewers: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<PullRequest> for PullRequestResponse {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            status: pr.status,
            author_id: pr.author_id,
            assigned_reviewers: pr.assigned_reviewers,
            created_at: pr.created_at,
            merged_at: pr.merged_at,
        }
    }
}

/// Response of POST /pullRequest/reassign.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReassignResponse {
    pub pr: PullRequestResponse,
    pub replaced_by: Uuid,
}

/// Pull request summary used in per-reviewer listings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PullRequestShort {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: Uuid,
    pub status: PrStatus,
}

impl From<PullRequest> for PullRequestShort {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status: pr.status,
        }
    }
}

/// Response of GET /users/getReview.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserReviewsResponse {
    pub user_id: Uuid,
    pub pull_requests: Vec<PullRequestShort>,
}
