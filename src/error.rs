//! Domain error types for the reviewer assignment service.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.
//! Every kind stays distinguishable at the HTTP boundary through its machine-readable code.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// User or team not found
    #[error("{0} not found")]
    NotFound(String),

    /// Pull request author does not exist
    #[error("Author {0} not found")]
    AuthorNotFound(String),

    /// Pull request does not exist
    #[error("Pull request {0} not found")]
    PrNotFound(String),

    /// Team name already taken
    #[error("Team {0} already exists")]
    TeamExists(String),

    /// Pull request id already taken
    #[error("Pull request {0} already exists")]
    PrExists(String),

    /// Inactive users cannot open pull requests
    #[error("Author {0} is inactive and cannot create pull requests")]
    AuthorInactive(String),

    /// The author is never a reviewer, so it cannot be replaced as one
    #[error("Author {0} of the pull request cannot be reassigned")]
    AuthorCannotBeReassigned(String),

    /// Reviewer set of a merged pull request is frozen
    #[error("Cannot reassign on merged pull request {0}")]
    PrMerged(String),

    /// The reviewer to replace is not in the reviewer set
    #[error("User {user} is not a reviewer of pull request {pr}")]
    UserNotAssigned { pr: String, user: String },

    /// No eligible replacement in the author's team
    #[error("No active replacement candidate in team {0}")]
    NoCandidate(String),

    /// The reviewer set changed underneath a reassignment
    #[error("Reviewer set of pull request {0} changed concurrently")]
    ReviewerConflict(String),

    /// Per-call deadline elapsed
    #[error("{0} timed out")]
    Timeout(String),
}

impl AppError {
    /// Machine-readable error code exposed to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AuthorNotFound(_) => "AUTHOR_NOT_FOUND",
            AppError::PrNotFound(_) => "PR_NOT_FOUND",
            AppError::TeamExists(_) => "TEAM_EXISTS",
            AppError::PrExists(_) => "PR_EXISTS",
            AppError::AuthorInactive(_) => "AUTHOR_INACTIVE",
            AppError::AuthorCannotBeReassigned(_) => "AUTHOR_NOT_REVIEWER",
            AppError::PrMerged(_) => "PR_MERGED",
            AppError::UserNotAssigned { .. } => "NOT_ASSIGNED",
            AppError::NoCandidate(_) => "NO_CANDIDATE",
            AppError::ReviewerConflict(_) => "REVIEWER_CONFLICT",
            AppError::Timeout(_) => "DEADLINE_EXCEEDED",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::AuthorNotFound(_) | AppError::PrNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::AuthorInactive(_) => StatusCode::FORBIDDEN,
            AppError::TeamExists(_)
            | AppError::PrExists(_)
            | AppError::AuthorCannotBeReassigned(_)
            | AppError::PrMerged(_)
            | AppError::UserNotAssigned { .. }
            | AppError::NoCandidate(_)
            | AppError::ReviewerConflict(_) => StatusCode::CONFLICT,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let response_message = match self {
            AppError::Database(err_str) => {
                tracing::error!("Database error: {}", err_str);
                "An internal database error occurred".to_string()
            }
            _ => self.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.code().to_string(),
            message: response_message,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("Invalid UUID: {}", err))
    }
}
