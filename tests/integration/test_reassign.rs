//! Reviewer reassignment.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use pr_reviewer_lib::db::PullRequestRepository;
use pr_reviewer_lib::db::memory::InMemoryStore;
use pr_reviewer_lib::error::AppError;
use pr_reviewer_lib::services::{AssignmentEngine, CandidateSelector, MergePolicy};
use uuid::Uuid;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_replacement_is_eligible_and_set_size_preserved() {
    for seed in 0..20 {
        let (_, engine) = new_engine(seed);
        let team = seed_team(&engine).await;
        let created = engine.create_pr("pr-1", "Add feature", team.a).await.unwrap();
        let before: HashSet<Uuid> = created.assigned_reviewers.iter().copied().collect();
        let old = created.assigned_reviewers[0];

        let (pr, new_reviewer) = engine.reassign_reviewer("pr-1", old).await.unwrap();

        assert!(!before.contains(&new_reviewer));
        assert_ne!(new_reviewer, team.a);
        assert!(team.others().contains(&new_reviewer));
        assert!(!pr.has_reviewer(old));
        assert!(pr.has_reviewer(new_reviewer));
        assert_eq!(pr.assigned_reviewers.len(), before.len());
        assert_reviewer_invariants(&pr);
    }
}

#[actix_rt::test]
async fn test_inactive_members_not_chosen_as_replacement() {
    let (_, engine) = new_engine(4);
    let ids = seed_named_team(&engine, "T", &["a", "b", "c", "d", "e"]).await;
    let (a, b, c, d, e) = (ids[0], ids[1], ids[2], ids[3], ids[4]);
    engine.set_user_active(c, false).await.unwrap();
    engine.set_user_active(d, false).await.unwrap();
    engine.set_user_active(e, false).await.unwrap();

    let pr = engine.create_pr("pr-1", "Add feature", a).await.unwrap();
    assert_eq!(pr.assigned_reviewers, vec![b]);

    // Only D becomes eligible again.
    engine.set_user_active(d, true).await.unwrap();
    let (pr, new_reviewer) = engine.reassign_reviewer("pr-1", b).await.unwrap();
    assert_eq!(new_reviewer, d);
    assert_eq!(pr.assigned_reviewers, vec![d]);
}

#[actix_rt::test]
async fn test_deactivation_keeps_existing_assignment() {
    let (store, engine) = new_engine(8);
    let team = seed_team(&engine).await;
    let pr = engine.create_pr("pr-1", "Add feature", team.a).await.unwrap();
    let reviewer = pr.assigned_reviewers[0];

    engine.set_user_active(reviewer, false).await.unwrap();

    let stored = store.get_pr("pr-1").await.unwrap().unwrap();
    assert!(stored.has_reviewer(reviewer));

    // The inactive reviewer can still be replaced.
    let (pr, _) = engine.reassign_reviewer("pr-1", reviewer).await.unwrap();
    assert!(!pr.has_reviewer(reviewer));
}

#[actix_rt::test]
async fn test_no_candidate_leaves_reviewers_unchanged() {
    let (store, engine) = new_engine(9);
    let ids = seed_named_team(&engine, "T", &["a", "b", "c"]).await;

    let pr = engine.create_pr("pr-1", "Add feature", ids[0]).await.unwrap();
    let before = pr.assigned_reviewers.clone();
    assert_eq!(before.len(), 2);

    let err = engine.reassign_reviewer("pr-1", before[0]).await.unwrap_err();
    assert!(matches!(err, AppError::NoCandidate(_)), "got {:?}", err);

    let stored = store.get_pr("pr-1").await.unwrap().unwrap();
    assert_eq!(stored.assigned_reviewers, before);
}

#[actix_rt::test]
async fn test_author_cannot_be_reassigned() {
    let (_, engine) = new_engine(2);
    let team = seed_team(&engine).await;
    engine.create_pr("pr-1", "Add feature", team.a).await.unwrap();

    let err = engine.reassign_reviewer("pr-1", team.a).await.unwrap_err();
    assert!(
        matches!(err, AppError::AuthorCannotBeReassigned(_)),
        "got {:?}",
        err
    );
}

#[actix_rt::test]
async fn test_unassigned_user_rejected_without_mutation() {
    let mut config = engine_config(MergePolicy::Restamp);
    config.reviewers_per_pr = 1;
    let (store, engine) = new_engine_with(6, config);
    let team = seed_team(&engine).await;

    let pr = engine.create_pr("pr-1", "Add feature", team.a).await.unwrap();
    let reviewer = pr.assigned_reviewers[0];
    let bystander = *team
        .others()
        .iter()
        .find(|id| **id != reviewer)
        .unwrap();

    let err = engine.reassign_reviewer("pr-1", bystander).await.unwrap_err();
    assert!(
        matches!(err, AppError::UserNotAssigned { .. }),
        "got {:?}",
        err
    );

    let stored = store.get_pr("pr-1").await.unwrap().unwrap();
    assert_eq!(stored.assigned_reviewers, vec![reviewer]);
}

#[actix_rt::test]
async fn test_unknown_pull_request() {
    let (_, engine) = new_engine(2);
    let team = seed_team(&engine).await;

    let err = engine.reassign_reviewer("missing", team.b).await.unwrap_err();
    assert!(matches!(err, AppError::PrNotFound(_)), "got {:?}", err);
}

#[actix_rt::test]
async fn test_merged_pull_request_is_frozen() {
    let (store, engine) = new_engine(2);
    let team = seed_team(&engine).await;
    let pr = engine.create_pr("pr-1", "Add feature", team.a).await.unwrap();
    engine.set_merge("pr-1").await.unwrap();

    let err = engine
        .reassign_reviewer("pr-1", pr.assigned_reviewers[0])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PrMerged(_)), "got {:?}", err);

    let stored = store.get_pr("pr-1").await.unwrap().unwrap();
    assert_eq!(stored.assigned_reviewers, pr.assigned_reviewers);
}

#[actix_rt::test]
async fn test_concurrent_reassignments_keep_invariants() {
    let (store, engine) = new_engine(12);
    let ids = seed_named_team(&engine, "T", &["a", "b", "c", "d", "e", "f"]).await;
    let pr = engine.create_pr("pr-1", "Add feature", ids[0]).await.unwrap();
    let (first, second) = (pr.assigned_reviewers[0], pr.assigned_reviewers[1]);

    let (r1, r2, r3) = tokio::join!(
        engine.reassign_reviewer("pr-1", first),
        engine.reassign_reviewer("pr-1", second),
        engine.reassign_reviewer("pr-1", first),
    );

    for result in [r1, r2, r3] {
        if let Err(err) = result {
            assert!(
                matches!(
                    err,
                    AppError::UserNotAssigned { .. }
                        | AppError::ReviewerConflict(_)
                        | AppError::NoCandidate(_)
                ),
                "unexpected error {:?}",
                err
            );
        }
    }

    let stored = store.get_pr("pr-1").await.unwrap().unwrap();
    assert_eq!(stored.assigned_reviewers.len(), 2);
    assert_reviewer_invariants(&stored);
}

#[actix_rt::test]
async fn test_deadline_exceeded_leaves_reviewers_unchanged() {
    let inner = InMemoryStore::new();
    let store = Arc::new(SlowStore {
        inner,
        delay: Duration::from_millis(300),
    });
    let mut config = engine_config(MergePolicy::Restamp);
    config.call_timeout = Duration::from_millis(1000);
    let setup = AssignmentEngine::new(store.clone(), CandidateSelector::seeded(1), config.clone());
    let team = seed_team(&setup).await;
    let pr = setup.create_pr("pr-1", "Add feature", team.a).await.unwrap();

    config.call_timeout = Duration::from_millis(50);
    let engine = AssignmentEngine::new(store.clone(), CandidateSelector::seeded(1), config);

    let err = engine
        .reassign_reviewer("pr-1", pr.assigned_reviewers[0])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Timeout(_)), "got {:?}", err);

    tokio::time::sleep(Duration::from_millis(400)).await;
    let stored = store.get_pr("pr-1").await.unwrap().unwrap();
    assert_eq!(stored.assigned_reviewers, pr.assigned_reviewers);
}
