//! Merge lifecycle and repeated-merge policies.

use std::time::Duration;

use pr_reviewer_lib::error::AppError;
use pr_reviewer_lib::models::PrStatus;
use pr_reviewer_lib::services::MergePolicy;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_merge_sets_status_and_timestamp() {
    let (_, engine) = new_engine(1);
    let team = seed_team(&engine).await;
    let created = engine.create_pr("pr-1", "Add feature", team.a).await.unwrap();

    let merged = engine.set_merge("pr-1").await.unwrap();

    assert_eq!(merged.status, PrStatus::Merged);
    let merged_at = merged.merged_at.expect("merged_at set");
    assert!(merged_at >= created.created_at);
    assert_eq!(merged.assigned_reviewers, created.assigned_reviewers);
}

#[actix_rt::test]
async fn test_merge_unknown_pull_request() {
    let (_, engine) = new_engine(1);
    let err = engine.set_merge("missing").await.unwrap_err();
    assert!(matches!(err, AppError::PrNotFound(_)), "got {:?}", err);
}

#[actix_rt::test]
async fn test_restamp_policy_overwrites_timestamp() {
    let (_, engine) = new_engine_with(1, engine_config(MergePolicy::Restamp));
    let team = seed_team(&engine).await;
    engine.create_pr("pr-1", "Add feature", team.a).await.unwrap();

    let first = engine.set_merge("pr-1").await.unwrap().merged_at.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = engine.set_merge("pr-1").await.unwrap();

    assert_eq!(second.status, PrStatus::Merged);
    assert!(second.merged_at.unwrap() > first);
}

#[actix_rt::test]
async fn test_keep_policy_preserves_timestamp() {
    let (_, engine) = new_engine_with(1, engine_config(MergePolicy::Keep));
    let team = seed_team(&engine).await;
    engine.create_pr("pr-1", "Add feature", team.a).await.unwrap();

    let first = engine.set_merge("pr-1").await.unwrap().merged_at;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = engine.set_merge("pr-1").await.unwrap();

    assert_eq!(second.status, PrStatus::Merged);
    assert_eq!(second.merged_at, first);
}

#[actix_rt::test]
async fn test_reject_policy_fails_second_merge() {
    let (_, engine) = new_engine_with(1, engine_config(MergePolicy::Reject));
    let team = seed_team(&engine).await;
    engine.create_pr("pr-1", "Add feature", team.a).await.unwrap();

    engine.set_merge("pr-1").await.unwrap();
    let err = engine.set_merge("pr-1").await.unwrap_err();
    assert!(matches!(err, AppError::PrMerged(_)), "got {:?}", err);
}

#[actix_rt::test]
async fn test_blank_id_rejected() {
    let (_, engine) = new_engine(1);
    let err = engine.set_merge(" ").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)), "got {:?}", err);
}
