//! Pull request entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pull_requests")]
pub struct Model {
    /// Caller-supplied identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    /// OPEN or MERGED
    pub status: String,
    pub author_id: Uuid,
    pub created_at: DateTimeUtc,
    pub merged_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,
    #[sea_orm(has_many = "super::pull_request_reviewer::Entity")]
    Reviewers,
}

impl Related<super::pull_request_reviewer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviewers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
