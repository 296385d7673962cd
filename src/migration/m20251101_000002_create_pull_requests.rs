//! Migration: Create pull_requests and pull_request_reviewers tables.

use sea_orm_migration::prelude::*;

use crate::models::{MAX_NAME_LEN, MAX_TITLE_LEN};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!(
                r#"
                CREATE TABLE pull_requests (
                    id VARCHAR({name_len}) PRIMARY KEY CHECK (id <> ''),
                    name VARCHAR({title_len}) NOT NULL,
                    status VARCHAR(10) NOT NULL DEFAULT 'OPEN'
                        CHECK (status IN ('OPEN', 'MERGED')),
                    author_id UUID NOT NULL REFERENCES users(id),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    merged_at TIMESTAMPTZ,

                    -- merged_at is set iff the pull request is merged
                    CONSTRAINT chk_pull_requests_merged_at
                        CHECK ((status = 'MERGED') = (merged_at IS NOT NULL))
                );

                CREATE INDEX idx_pull_requests_author
                    ON pull_requests(author_id);

                CREATE TABLE pull_request_reviewers (
                    pull_request_id VARCHAR({name_len}) NOT NULL
                        REFERENCES pull_requests(id) ON DELETE CASCADE,
                    reviewer_id UUID NOT NULL REFERENCES users(id),
                    PRIMARY KEY (pull_request_id, reviewer_id)
                );

                -- Reverse lookup for per-reviewer listings and stats
                CREATE INDEX idx_pull_request_reviewers_reviewer
                    ON pull_request_reviewers(reviewer_id);
                "#,
                name_len = MAX_NAME_LEN,
                title_len = MAX_TITLE_LEN,
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TABLE IF EXISTS pull_request_reviewers CASCADE;
                DROP TABLE IF EXISTS pull_requests CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
