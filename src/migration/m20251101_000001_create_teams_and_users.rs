//! Migration: Create teams and users tables.
//!
//! Users belong to exactly one team; the team name is the natural key.

use sea_orm_migration::prelude::*;

use crate::models::MAX_NAME_LEN;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!(
                r#"
                CREATE TABLE teams (
                    name VARCHAR({name_len}) PRIMARY KEY CHECK (name <> ''),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE TABLE users (
                    id UUID PRIMARY KEY,
                    username VARCHAR({name_len}) NOT NULL,
                    is_active BOOLEAN NOT NULL DEFAULT TRUE,
                    team_name VARCHAR({name_len}) NOT NULL REFERENCES teams(name)
                );

                -- Candidate lookup: active members of a team
                CREATE INDEX idx_users_team_active
                    ON users(team_name)
                    WHERE is_active;
                "#,
                name_len = MAX_NAME_LEN,
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TABLE IF EXISTS users CASCADE;
                DROP TABLE IF EXISTS teams CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
