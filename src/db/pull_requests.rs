//! Pull request and reviewer-assignment queries using SeaORM.
//!
//! Every write that touches both the pull request row and its reviewer rows runs in
//! one transaction. Reassignment and merge lock the pull request row
//! (`SELECT ... FOR UPDATE`) so status checks and reviewer changes serialize per PR.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::*;
use uuid::Uuid;

use super::{DbPool, MergeOutcome, PullRequestRepository, db_err, is_unique_violation};
use crate::entity::{pull_request, pull_request_reviewer};
use crate::error::{AppError, AppResult};
use crate::models::{PrStatus, PullRequest, Reassignment};

const PRS_BY_REVIEWER_SQL: &str = r#"
SELECT pr.id,
       pr.name,
       pr.status,
       pr.author_id,
       pr.created_at,
       pr.merged_at,
       r.reviewer_id
FROM pull_requests pr
JOIN pull_request_reviewers mine
  ON mine.pull_request_id = pr.id AND mine.reviewer_id = $1
JOIN pull_request_reviewers r ON r.pull_request_id = pr.id
ORDER BY pr.created_at DESC, pr.id ASC, r.reviewer_id ASC
"#;

/// A pull request joined with one of its reviewers.
#[derive(Debug, FromQueryResult)]
struct ReviewerListingRow {
    id: String,
    name: String,
    status: String,
    author_id: Uuid,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
    reviewer_id: Uuid,
}

impl ReviewerListingRow {
    fn into_model(self) -> pull_request::Model {
        pull_request::Model {
            id: self.id,
            name: self.name,
            status: self.status,
            author_id: self.author_id,
            created_at: self.created_at,
            merged_at: self.merged_at,
        }
    }
}

#[async_trait]
impl PullRequestRepository for DbPool {
    async fn pr_exists(&self, id: &str) -> AppResult<bool> {
        let found = pull_request::Entity::find_by_id(id.to_string())
            .one(self.connection())
            .await
            .map_err(db_err("Failed to check pull request"))?;

        Ok(found.is_some())
    }

    async fn create_pr(&self, pr: &PullRequest) -> AppResult<()> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let model = pull_request::ActiveModel {
            id: Set(pr.id.clone()),
            name: Set(pr.name.clone()),
            status: Set(pr.status.as_str().to_string()),
            author_id: Set(pr.author_id),
            created_at: Set(pr.created_at),
            merged_at: Set(pr.merged_at),
        };
        pull_request::Entity::insert(model)
            .exec_without_returning(&txn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::PrExists(pr.id.clone())
                } else {
                    AppError::Database(format!("Failed to insert pull request: {}", e))
                }
            })?;

        for reviewer_id in &pr.assigned_reviewers {
            let row = pull_request_reviewer::ActiveModel {
                pull_request_id: Set(pr.id.clone()),
                reviewer_id: Set(*reviewer_id),
            };
            pull_request_reviewer::Entity::insert(row)
                .exec_without_returning(&txn)
                .await
                .map_err(db_err("Failed to insert reviewer"))?;
        }

        txn.commit()
            .await
            .map_err(db_err("Failed to commit pull request"))?;
        Ok(())
    }

    async fn get_pr(&self, id: &str) -> AppResult<Option<PullRequest>> {
        let db = self.connection();
        let Some(model) = pull_request::Entity::find_by_id(id.to_string())
            .one(db)
            .await
            .map_err(db_err("Failed to get pull request"))?
        else {
            return Ok(None);
        };

        let reviewers = load_reviewers(db, &model.id).await?;
        model_to_pull_request(model, reviewers).map(Some)
    }

    async fn reassign_reviewer(&self, r: &Reassignment) -> AppResult<()> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        // Dropping `txn` on any early return rolls the transaction back.
        let locked = pull_request::Entity::find_by_id(r.pull_request_id.clone())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err("Failed to lock pull request"))?
            .ok_or_else(|| AppError::PrNotFound(r.pull_request_id.clone()))?;

        if parse_status(&locked.status)? == PrStatus::Merged {
            return Err(AppError::PrMerged(r.pull_request_id.clone()));
        }

        let deleted = pull_request_reviewer::Entity::delete_many()
            .filter(pull_request_reviewer::Column::PullRequestId.eq(r.pull_request_id.as_str()))
            .filter(pull_request_reviewer::Column::ReviewerId.eq(r.old_reviewer_id))
            .exec(&txn)
            .await
            .map_err(db_err("Failed to remove reviewer"))?;

        if deleted.rows_affected == 0 {
            return Err(AppError::UserNotAssigned {
                pr: r.pull_request_id.clone(),
                user: r.old_reviewer_id.to_string(),
            });
        }

        let row = pull_request_reviewer::ActiveModel {
            pull_request_id: Set(r.pull_request_id.clone()),
            reviewer_id: Set(r.new_reviewer_id),
        };
        pull_request_reviewer::Entity::insert(row)
            .exec_without_returning(&txn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::ReviewerConflict(r.pull_request_id.clone())
                } else {
                    AppError::Database(format!("Failed to add reviewer: {}", e))
                }
            })?;

        txn.commit()
            .await
            .map_err(db_err("Failed to commit reassignment"))?;
        Ok(())
    }

    async fn set_merged(
        &self,
        id: &str,
        merged_at: DateTime<Utc>,
        restamp: bool,
    ) -> AppResult<Option<MergeOutcome>> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let Some(locked) = pull_request::Entity::find_by_id(id.to_string())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err("Failed to lock pull request"))?
        else {
            return Ok(None);
        };

        let reviewers = load_reviewers(&txn, id).await?;

        if parse_status(&locked.status)? == PrStatus::Merged && !restamp {
            let pr = model_to_pull_request(locked, reviewers)?;
            return Ok(Some(MergeOutcome::AlreadyMerged(pr)));
        }

        let mut active: pull_request::ActiveModel = locked.into();
        active.status = Set(PrStatus::Merged.as_str().to_string());
        active.merged_at = Set(Some(merged_at));
        let updated = active
            .update(&txn)
            .await
            .map_err(db_err("Failed to mark pull request merged"))?;

        txn.commit()
            .await
            .map_err(db_err("Failed to commit merge"))?;

        model_to_pull_request(updated, reviewers).map(|pr| Some(MergeOutcome::Merged(pr)))
    }

    async fn get_prs_by_reviewer(&self, user_id: Uuid) -> AppResult<Vec<PullRequest>> {
        // One statement, so the listing and each reviewer set come from the same snapshot.
        let rows = ReviewerListingRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            PRS_BY_REVIEWER_SQL,
            [user_id.into()],
        ))
        .all(self.connection())
        .await
        .map_err(db_err("Failed to list pull requests for reviewer"))?;

        let mut listed: Vec<(pull_request::Model, Vec<Uuid>)> = Vec::new();
        for row in rows {
            match listed.last_mut() {
                Some((model, reviewers)) if model.id == row.id => reviewers.push(row.reviewer_id),
                _ => {
                    let reviewer_id = row.reviewer_id;
                    listed.push((row.into_model(), vec![reviewer_id]));
                }
            }
        }

        listed
            .into_iter()
            .map(|(model, reviewers)| model_to_pull_request(model, reviewers))
            .collect()
    }
}

async fn load_reviewers<C: ConnectionTrait>(conn: &C, pr_id: &str) -> AppResult<Vec<Uuid>> {
    let rows = pull_request_reviewer::Entity::find()
        .filter(pull_request_reviewer::Column::PullRequestId.eq(pr_id))
        .order_by_asc(pull_request_reviewer::Column::ReviewerId)
        .all(conn)
        .await
        .map_err(db_err("Failed to load reviewers"))?;

    Ok(rows.into_iter().map(|r| r.reviewer_id).collect())
}

fn parse_status(raw: &str) -> AppResult<PrStatus> {
    PrStatus::parse(raw)
        .ok_or_else(|| AppError::Database(format!("Unknown pull request status '{}'", raw)))
}

fn model_to_pull_request(m: pull_request::Model, reviewers: Vec<Uuid>) -> AppResult<PullRequest> {
    Ok(PullRequest {
        status: parse_status(&m.status)?,
        id: m.id,
        name: m.name,
        author_id: m.author_id,
        assigned_reviewers: reviewers,
        created_at: m.created_at,
        merged_at: m.merged_at,
    })
}
