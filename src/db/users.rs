//! User queries using SeaORM.

use async_trait::async_trait;
use sea_orm::*;
use uuid::Uuid;

use super::{DbPool, UserRepository, db_err};
use crate::entity::user;
use crate::error::AppResult;
use crate::models::User;

#[async_trait]
impl UserRepository for DbPool {
    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = user::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(db_err("Failed to get user"))?;

        Ok(result.map(model_to_user))
    }

    async fn get_active_team_members(
        &self,
        team_name: &str,
        exclude: &[Uuid],
    ) -> AppResult<Vec<User>> {
        let mut query = user::Entity::find()
            .filter(user::Column::TeamName.eq(team_name))
            .filter(user::Column::IsActive.eq(true));
        if !exclude.is_empty() {
            query = query.filter(user::Column::Id.is_not_in(exclude.iter().copied()));
        }

        let results = query
            .order_by_asc(user::Column::Username)
            .all(self.connection())
            .await
            .map_err(db_err("Failed to list active team members"))?;

        Ok(results.into_iter().map(model_to_user).collect())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<Option<User>> {
        let db = self.connection();
        let Some(existing) = user::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(db_err("Failed to get user"))?
        else {
            return Ok(None);
        };

        if existing.is_active == is_active {
            return Ok(Some(model_to_user(existing)));
        }

        let mut active: user::ActiveModel = existing.into();
        active.is_active = Set(is_active);
        let updated = active
            .update(db)
            .await
            .map_err(db_err("Failed to update user activity"))?;

        Ok(Some(model_to_user(updated)))
    }
}

pub(crate) fn model_to_user(m: user::Model) -> User {
    User {
        id: m.id,
        username: m.username,
        is_active: m.is_active,
        team_name: m.team_name,
    }
}
