//! Business logic services.

pub mod directory;
pub mod engine;
pub mod selector;

pub use engine::{AssignmentEngine, MergePolicy};
pub use selector::CandidateSelector;

use crate::error::{AppError, AppResult};

/// Reject values the storage columns cannot hold.
pub(crate) fn check_len(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(AppError::InvalidInput(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}
