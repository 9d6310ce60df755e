use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};

use super::DaoResult;
use crate::db::entities::{prelude::TaskPriority, task_priority};

/// Seeded priority rows: `(id, label)`.
pub const PRIORITY_LEVELS: [(i32, &str); 3] = [(0, "Low"), (1, "Medium"), (2, "High")];

/// Read access to the priority dimension. Rows are fixed after seeding, so
/// there is no generic CRUD surface here.
#[derive(Clone)]
pub struct PriorityDao {
    db: DatabaseConnection,
}

impl PriorityDao {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub async fn find_by_label(&self, label: &str) -> DaoResult<Option<task_priority::Model>> {
        Self::lookup_label(&self.db, label).await
    }

    pub(crate) async fn lookup_label<C>(
        conn: &C,
        label: &str,
    ) -> DaoResult<Option<task_priority::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(TaskPriority::find()
            .filter(task_priority::Column::Desc.eq(label))
            .one(conn)
            .await?)
    }

    pub async fn label_for(&self, id: Option<i32>) -> DaoResult<Option<String>> {
        let Some(id) = id else {
            return Ok(None);
        };
        let row = TaskPriority::find_by_id(id).one(&self.db).await?;
        Ok(row.map(|row| row.desc))
    }

    pub async fn labels(&self) -> DaoResult<HashMap<i32, String>> {
        let rows = TaskPriority::find().all(&self.db).await?;
        Ok(rows.into_iter().map(|row| (row.id, row.desc)).collect())
    }

    /// Inserts any missing priority level and returns how many were added.
    pub async fn ensure_seeded(&self) -> DaoResult<u64> {
        let mut inserted = 0;
        for (id, label) in PRIORITY_LEVELS {
            let by_id = TaskPriority::find_by_id(id).one(&self.db).await?;
            if by_id.is_some() || self.find_by_label(label).await?.is_some() {
                continue;
            }

            let row = task_priority::ActiveModel {
                id: Set(id),
                desc: Set(label.to_string()),
                ..Default::default()
            };
            row.insert(&self.db).await?;
            inserted += 1;
        }
        Ok(inserted)
    }
}
