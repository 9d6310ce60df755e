use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait,
};

use super::base::stamp_created;
use super::{DaoBase, DaoLayerError, DaoResult, next_updated_at};
use crate::db::entities::prelude::{Task, TaskComment};
use crate::db::entities::task_comment;

#[derive(Clone)]
pub struct CommentDao {
    db: DatabaseConnection,
}

impl DaoBase for CommentDao {
    type Entity = TaskComment;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl CommentDao {
    /// Comments are only addressable through their task: both ids must match.
    pub async fn find_scoped(
        &self,
        task_id: i32,
        comment_id: i32,
    ) -> DaoResult<Option<task_comment::Model>> {
        Ok(scoped(task_id, comment_id).one(&self.db).await?)
    }

    pub async fn list_for_task(&self, task_id: i32) -> DaoResult<Vec<task_comment::Model>> {
        Ok(TaskComment::find()
            .filter(task_comment::Column::TaskId.eq(task_id))
            .order_by_asc(task_comment::Column::CreatedAt)
            .order_by_asc(task_comment::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn create_comment(
        &self,
        task_id: i32,
        description: String,
        created_by: i32,
    ) -> DaoResult<task_comment::Model> {
        let txn = self.db.begin().await?;

        if Task::find_by_id(task_id).one(&txn).await?.is_none() {
            return Err(DaoLayerError::not_found::<Task>(task_id));
        }

        let mut active = task_comment::ActiveModel {
            task_id: Set(task_id),
            description: Set(description),
            created_by: Set(created_by),
            ..Default::default()
        };
        stamp_created(&mut active);
        let model = active.insert(&txn).await?;

        txn.commit().await?;
        Ok(model)
    }

    pub async fn update_comment(
        &self,
        task_id: i32,
        comment_id: i32,
        description: Option<String>,
    ) -> DaoResult<Option<task_comment::Model>> {
        let txn = self.db.begin().await?;

        let Some(current) = scoped(task_id, comment_id).one(&txn).await? else {
            return Ok(None);
        };

        let previous = current.updated_at;
        let mut active = current.into_active_model();
        if let Some(description) = description {
            active.description = Set(description);
        }
        active.updated_at = Set(next_updated_at(Some(previous)));
        let model = active.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(model))
    }

    pub async fn delete_comment(
        &self,
        task_id: i32,
        comment_id: i32,
    ) -> DaoResult<Option<task_comment::Model>> {
        let txn = self.db.begin().await?;

        let Some(current) = scoped(task_id, comment_id).one(&txn).await? else {
            return Ok(None);
        };

        TaskComment::delete_by_id(current.id).exec(&txn).await?;

        txn.commit().await?;
        Ok(Some(current))
    }
}

fn scoped(task_id: i32, comment_id: i32) -> Select<TaskComment> {
    TaskComment::find()
        .filter(task_comment::Column::TaskId.eq(task_id))
        .filter(task_comment::Column::Id.eq(comment_id))
}
