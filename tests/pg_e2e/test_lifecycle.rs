//! E2E tests: engine commands against PostgreSQL.

use std::collections::HashSet;

use pr_reviewer_lib::db::PullRequestRepository;
use pr_reviewer_lib::error::AppError;
use pr_reviewer_lib::models::{MAX_NAME_LEN, MAX_TITLE_LEN, PrStatus, Team, User};
use uuid::Uuid;

use super::test_helpers::*;

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_reassign_merge() {
    let pool = create_test_pool().await;
    let engine = create_engine(pool, 7);
    let (_, ids) = seed_team(&engine, &["a", "b", "c", "d"]).await;
    let pr_id = unique_name("pr");

    let pr = engine.create_pr(&pr_id, "Add feature", ids[0]).await.unwrap();
    assert_eq!(pr.status, PrStatus::Open);
    assert_eq!(pr.assigned_reviewers.len(), 2);

    let stored = engine.get_reviews_for_user(pr.assigned_reviewers[0]).await.unwrap();
    let found = stored.iter().find(|p| p.id == pr_id).expect("listed for reviewer");
    assert_eq!(found.created_at, pr.created_at);

    let before: HashSet<Uuid> = pr.assigned_reviewers.iter().copied().collect();
    let (after, replaced_by) = engine
        .reassign_reviewer(&pr_id, pr.assigned_reviewers[0])
        .await
        .unwrap();
    assert!(!before.contains(&replaced_by));
    assert_ne!(replaced_by, ids[0]);
    assert_eq!(after.assigned_reviewers.len(), 2);

    let merged = engine.set_merge(&pr_id).await.unwrap();
    assert_eq!(merged.status, PrStatus::Merged);
    assert!(merged.merged_at.is_some());

    let err = engine
        .reassign_reviewer(&pr_id, replaced_by)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PrMerged(_)), "got {:?}", err);
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicates_rejected() {
    let pool = create_test_pool().await;
    let engine = create_engine(pool, 1);
    let (team_name, ids) = seed_team(&engine, &["a", "b"]).await;
    let pr_id = unique_name("pr");

    engine.create_pr(&pr_id, "First", ids[0]).await.unwrap();
    let err = engine.create_pr(&pr_id, "Second", ids[1]).await.unwrap_err();
    assert!(matches!(err, AppError::PrExists(_)), "got {:?}", err);

    let err = engine
        .create_team(Team {
            name: team_name.clone(),
            members: vec![User {
                id: Uuid::new_v4(),
                username: unique_name("late"),
                is_active: true,
                team_name,
            }],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TeamExists(_)), "got {:?}", err);
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_concurrent_creation_single_winner() {
    let pool = create_test_pool().await;
    let engine = create_engine(pool, 3);
    let (_, ids) = seed_team(&engine, &["a", "b", "c"]).await;
    let pr_id = unique_name("pr");

    let (r1, r2) = tokio::join!(
        engine.create_pr(&pr_id, "One", ids[0]),
        engine.create_pr(&pr_id, "Two", ids[1]),
    );

    let successes = [&r1, &r2].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    for result in [r1, r2] {
        if let Err(err) = result {
            assert!(matches!(err, AppError::PrExists(_)), "got {:?}", err);
        }
    }
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_stats_include_zero_counts() {
    let pool = create_test_pool().await;
    let engine = create_engine(pool, 5);
    let (_, ids) = seed_team(&engine, &["a", "b", "c"]).await;
    engine.set_user_active(ids[2], false).await.unwrap();
    engine
        .create_pr(&unique_name("pr"), "Stats", ids[0])
        .await
        .unwrap();

    let stats = engine.get_review_stats().await.unwrap();
    let count_of = |id: Uuid| {
        stats
            .iter()
            .find(|s| s.user_id == id)
            .map(|s| s.review_count)
            .expect("user in stats")
    };
    assert_eq!(count_of(ids[0]), 0);
    assert_eq!(count_of(ids[1]), 1);
    assert_eq!(count_of(ids[2]), 0);
}

/// Pad a unique name up to exactly `len` characters.
fn unique_name_of_len(prefix: &str, len: usize) -> String {
    let mut name = unique_name(prefix);
    while name.chars().count() < len {
        name.push('é');
    }
    name
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_length_limits_match_columns() {
    let pool = create_test_pool().await;
    let engine = create_engine(pool, 4);

    let team_name = unique_name_of_len("team", MAX_NAME_LEN);
    let author = User {
        id: Uuid::new_v4(),
        username: unique_name_of_len("author", MAX_NAME_LEN),
        is_active: true,
        team_name: team_name.clone(),
    };
    let author_id = author.id;
    engine
        .create_team(Team {
            name: team_name.clone(),
            members: vec![author],
        })
        .await
        .unwrap();

    let pr_id = unique_name_of_len("pr", MAX_NAME_LEN);
    let title = "t".repeat(MAX_TITLE_LEN);
    let pr = engine.create_pr(&pr_id, &title, author_id).await.unwrap();
    assert_eq!(pr.id, pr_id);

    let err = engine
        .create_pr(&unique_name_of_len("pr", MAX_NAME_LEN + 1), "Long id", author_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)), "got {:?}", err);

    let err = engine
        .create_pr(&unique_name("pr"), &"t".repeat(MAX_TITLE_LEN + 1), author_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)), "got {:?}", err);

    let err = engine
        .create_team(Team {
            name: unique_name_of_len("team", MAX_NAME_LEN + 1),
            members: vec![User {
                id: Uuid::new_v4(),
                username: unique_name("m"),
                is_active: true,
                team_name,
            }],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)), "got {:?}", err);
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_concurrent_reassignments_on_one_pr() {
    let pool = create_test_pool().await;
    let engine = create_engine(pool.clone(), 13);
    let (_, ids) = seed_team(&engine, &["a", "b", "c", "d", "e", "f"]).await;
    let author = ids[0];

    for round in 0..10 {
        let pr_id = unique_name(&format!("pr{}", round));
        let pr = engine.create_pr(&pr_id, "Race", author).await.unwrap();
        let (first, second) = (pr.assigned_reviewers[0], pr.assigned_reviewers[1]);

        let (r1, r2) = tokio::join!(
            engine.reassign_reviewer(&pr_id, first),
            engine.reassign_reviewer(&pr_id, second),
        );

        for result in [r1, r2] {
            if let Err(err) = result {
                assert!(
                    matches!(err, AppError::ReviewerConflict(_)),
                    "round {}: unexpected error {:?}",
                    round,
                    err
                );
            }
        }

        let stored = pool.get_pr(&pr_id).await.unwrap().unwrap();
        let unique: HashSet<Uuid> = stored.assigned_reviewers.iter().copied().collect();
        assert_eq!(stored.assigned_reviewers.len(), 2, "round {}", round);
        assert_eq!(unique.len(), 2, "round {}", round);
        assert!(!unique.contains(&author), "round {}", round);
    }
}
