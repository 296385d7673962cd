//! PR Reviewer Service library.
//!
//! Assigns pull request reviewers from the author's team, handles reviewer
//! reassignment and the merge lifecycle, and exposes it all over HTTP.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
