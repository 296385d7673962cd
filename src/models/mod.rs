//! Domain models for the reviewer assignment service.

pub mod pull_request;
pub mod stats;
pub mod team;
pub mod user;

// Re-export commonly used types
pub use pull_request::{
    CreatePullRequestRequest, MergePullRequestRequest, PrStatus, PullRequest,
    PullRequestResponse, PullRequestShort, ReassignRequest, ReassignResponse, Reassignment,
    UserReviewsResponse,
};
pub use stats::{StatsResponse, UserReviewStat, UserStatResponse};
pub use team::{Team, TeamMember, TeamPayload, TeamQuery};
pub use user::{SetIsActiveRequest, User, UserResponse, UserReviewsQuery};

/// Longest pull request id, team name or username, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Longest pull request title, in characters.
pub const MAX_TITLE_LEN: usize = 500;
