use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

// created_by/assigned_to hold user ids without a declared relation; users are
// never deleted, and the assignee is checked on write.
#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    pub title: String,
    pub description: Option<String>,
    #[sea_orm(indexed)]
    pub priority_id: Option<i32>,
    #[sea_orm(indexed)]
    pub created_by: i32,
    #[sea_orm(indexed)]
    pub assigned_to: Option<i32>,
    #[sea_orm(indexed)]
    pub due_date: DateTimeWithTimeZone,
    #[sea_orm(default_value = false)]
    pub completed: bool,
    #[sea_orm(belongs_to, from = "priority_id", to = "id")]
    pub priority: HasOne<super::task_priority::Entity>,
    #[sea_orm(has_many)]
    pub comments: HasMany<super::task_comment::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
