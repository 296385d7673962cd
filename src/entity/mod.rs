//! SeaORM entity definitions for PostgreSQL database.

pub mod pull_request;
pub mod pull_request_reviewer;
pub mod team;
pub mod user;
