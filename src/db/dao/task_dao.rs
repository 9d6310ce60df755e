use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, Order, PaginatorTrait, QueryFilter, QueryTrait, Select, Set,
    TransactionTrait,
};

use super::base::stamp_created;
use super::{DaoBase, DaoLayerError, DaoResult, PriorityDao, next_updated_at};
use crate::db::entities::prelude::{Task, TaskComment, User};
use crate::db::entities::{task, task_comment};

#[derive(Clone)]
pub struct TaskDao {
    db: DatabaseConnection,
}

impl DaoBase for TaskDao {
    type Entity = Task;
    const MAX_PAGE_SIZE: u64 = 20;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    /// Priority label, resolved to its row id on insert.
    pub priority: Option<String>,
    pub created_by: i32,
    pub assigned_to: Option<i32>,
    pub due_date: DateTimeWithTimeZone,
    pub completed: bool,
}

/// Partial update. `None` leaves a column untouched; for nullable columns
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Option<String>>,
    pub assigned_to: Option<Option<i32>>,
    pub due_date: Option<DateTimeWithTimeZone>,
    pub completed: Option<bool>,
}

/// Row predicate shared by listing and statistics. Ranges are half open:
/// `from` inclusive, `to` exclusive.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub created_by: Option<i32>,
    pub assigned_to: Option<i32>,
    pub completed: Option<bool>,
    pub created_from: Option<DateTimeWithTimeZone>,
    pub created_to: Option<DateTimeWithTimeZone>,
    pub due_from: Option<DateTimeWithTimeZone>,
    pub due_to: Option<DateTimeWithTimeZone>,
}

impl TaskFilter {
    fn apply(&self, query: Select<Task>) -> Select<Task> {
        query
            .apply_if(self.created_by, |q, id| q.filter(task::Column::CreatedBy.eq(id)))
            .apply_if(self.assigned_to, |q, id| {
                q.filter(task::Column::AssignedTo.eq(id))
            })
            .apply_if(self.completed, |q, done| {
                q.filter(task::Column::Completed.eq(done))
            })
            .apply_if(self.created_from, |q, ts| {
                q.filter(task::Column::CreatedAt.gte(ts))
            })
            .apply_if(self.created_to, |q, ts| q.filter(task::Column::CreatedAt.lt(ts)))
            .apply_if(self.due_from, |q, ts| q.filter(task::Column::DueDate.gte(ts)))
            .apply_if(self.due_to, |q, ts| q.filter(task::Column::DueDate.lt(ts)))
    }
}

impl TaskDao {
    pub async fn find_task(&self, id: i32) -> DaoResult<task::Model> {
        self.find_by_id(id).await
    }

    pub async fn list_tasks(
        &self,
        filter: &TaskFilter,
        offset: u64,
        limit: u64,
    ) -> DaoResult<Vec<task::Model>> {
        let filter = filter.clone();
        self.find(offset, limit, (task::Column::Id, Order::Asc), move |query| {
            filter.apply(query)
        })
        .await
    }

    pub async fn count_tasks(&self, filter: &TaskFilter) -> DaoResult<u64> {
        Ok(filter.apply(Task::find()).count(&self.db).await?)
    }

    /// Resolves the priority label and inserts the task in one transaction;
    /// nothing is written when the label or assignee does not exist.
    pub async fn create_task(&self, new_task: NewTask) -> DaoResult<task::Model> {
        let txn = self.db.begin().await?;

        let priority_id = match new_task.priority.as_deref() {
            Some(label) => Some(resolve_priority(&txn, label).await?),
            None => None,
        };
        if let Some(user_id) = new_task.assigned_to {
            ensure_user_exists(&txn, user_id).await?;
        }

        let mut active = task::ActiveModel {
            title: Set(new_task.title),
            description: Set(new_task.description),
            priority_id: Set(priority_id),
            created_by: Set(new_task.created_by),
            assigned_to: Set(new_task.assigned_to),
            due_date: Set(new_task.due_date),
            completed: Set(new_task.completed),
            ..Default::default()
        };
        stamp_created(&mut active);
        let model = active.insert(&txn).await?;

        txn.commit().await?;
        Ok(model)
    }

    pub async fn update_task(&self, id: i32, changes: TaskChanges) -> DaoResult<task::Model> {
        let txn = self.db.begin().await?;

        let current = Task::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DaoLayerError::not_found::<Task>(id))?;

        let priority_id = match changes.priority {
            Some(Some(label)) => Some(Some(resolve_priority(&txn, &label).await?)),
            Some(None) => Some(None),
            None => None,
        };
        if let Some(Some(user_id)) = changes.assigned_to {
            ensure_user_exists(&txn, user_id).await?;
        }

        let previous = current.updated_at;
        let mut active = current.into_active_model();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(priority_id) = priority_id {
            active.priority_id = Set(priority_id);
        }
        if let Some(assigned_to) = changes.assigned_to {
            active.assigned_to = Set(assigned_to);
        }
        if let Some(due_date) = changes.due_date {
            active.due_date = Set(due_date);
        }
        if let Some(completed) = changes.completed {
            active.completed = Set(completed);
        }
        active.updated_at = Set(next_updated_at(Some(previous)));
        let model = active.update(&txn).await?;

        txn.commit().await?;
        Ok(model)
    }

    /// Deletes the task together with its comments and returns the task as
    /// it was before deletion.
    pub async fn delete_task(&self, id: i32) -> DaoResult<task::Model> {
        let txn = self.db.begin().await?;

        let task = Task::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DaoLayerError::not_found::<Task>(id))?;

        TaskComment::delete_many()
            .filter(task_comment::Column::TaskId.eq(id))
            .exec(&txn)
            .await?;
        Task::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(task)
    }
}

async fn resolve_priority<C: ConnectionTrait>(conn: &C, label: &str) -> DaoResult<i32> {
    PriorityDao::lookup_label(conn, label)
        .await?
        .map(|row| row.id)
        .ok_or_else(|| DaoLayerError::UnknownPriority {
            label: label.to_string(),
        })
}

async fn ensure_user_exists<C: ConnectionTrait>(conn: &C, id: i32) -> DaoResult<()> {
    match User::find_by_id(id).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(DaoLayerError::UnknownUser { id }),
    }
}
