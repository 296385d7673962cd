//! Team queries using SeaORM.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use super::users::model_to_user;
use super::{DbPool, TeamRepository, db_err, is_unique_violation};
use crate::entity::{team, user};
use crate::error::{AppError, AppResult};
use crate::models::Team;

#[async_trait]
impl TeamRepository for DbPool {
    async fn team_exists(&self, name: &str) -> AppResult<bool> {
        let found = team::Entity::find_by_id(name.to_string())
            .one(self.connection())
            .await
            .map_err(db_err("Failed to check team"))?;

        Ok(found.is_some())
    }

    async fn get_team(&self, name: &str) -> AppResult<Option<Team>> {
        let db = self.connection();
        let Some(found) = team::Entity::find_by_id(name.to_string())
            .one(db)
            .await
            .map_err(db_err("Failed to get team"))?
        else {
            return Ok(None);
        };

        let members = user::Entity::find()
            .filter(user::Column::TeamName.eq(found.name.as_str()))
            .order_by_asc(user::Column::Username)
            .all(db)
            .await
            .map_err(db_err("Failed to list team members"))?;

        Ok(Some(Team {
            name: found.name,
            members: members.into_iter().map(model_to_user).collect(),
        }))
    }

    async fn create_team_with_members(&self, new_team: &Team) -> AppResult<()> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let model = team::ActiveModel {
            name: Set(new_team.name.clone()),
            created_at: Set(Utc::now()),
        };
        team::Entity::insert(model)
            .exec_without_returning(&txn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::TeamExists(new_team.name.clone())
                } else {
                    AppError::Database(format!("Failed to insert team: {}", e))
                }
            })?;

        // A user that already exists moves to the new team with the given attributes.
        let upsert = OnConflict::column(user::Column::Id)
            .update_columns([
                user::Column::Username,
                user::Column::IsActive,
                user::Column::TeamName,
            ])
            .to_owned();

        for member in &new_team.members {
            let model = user::ActiveModel {
                id: Set(member.id),
                username: Set(member.username.clone()),
                is_active: Set(member.is_active),
                team_name: Set(new_team.name.clone()),
            };
            user::Entity::insert(model)
                .on_conflict(upsert.clone())
                .exec_without_returning(&txn)
                .await
                .map_err(db_err("Failed to upsert team member"))?;
        }

        txn.commit()
            .await
            .map_err(db_err("Failed to commit team creation"))?;

        tracing::debug!(
            team = %new_team.name,
            members = new_team.members.len(),
            "Team persisted"
        );
        Ok(())
    }
}
