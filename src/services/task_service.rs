use serde::Serialize;

use crate::{
    db::dao::{NewTask, PriorityDao, TaskChanges, TaskDao, TaskFilter},
    db::entities::task,
    error::AppError,
    services::crud_service::{CrudErrors, CrudOp, CrudService},
};

pub const DEFAULT_TASK_LIMIT: u64 = 20;

/// A task together with its priority label.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub task: task::Model,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStatistics {
    pub completed: u64,
    pub no_completed: u64,
    pub total: u64,
}

#[derive(Clone)]
pub struct TaskService {
    tasks: TaskDao,
    priorities: PriorityDao,
}

impl TaskService {
    pub fn new(tasks: TaskDao, priorities: PriorityDao) -> Self {
        Self { tasks, priorities }
    }

    pub async fn require_task(&self, id: i32) -> Result<task::Model, AppError> {
        self.tasks
            .find_task(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))
    }

    pub async fn get_task(&self, id: i32) -> Result<TaskRecord, AppError> {
        let task = self.require_task(id).await?;
        self.describe(task).await
    }

    /// Attaches the priority label to a loaded task.
    pub async fn describe(&self, task: task::Model) -> Result<TaskRecord, AppError> {
        let priority = self
            .priorities
            .label_for(task.priority_id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))?;
        Ok(TaskRecord { task, priority })
    }

    pub async fn list_tasks(
        &self,
        filter: &TaskFilter,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<Vec<TaskRecord>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_TASK_LIMIT);
        let tasks = self
            .tasks
            .list_tasks(filter, offset, limit)
            .await
            .map_err(|err| self.map_error(CrudOp::List, err))?;
        let labels = self
            .priorities
            .labels()
            .await
            .map_err(|err| self.map_error(CrudOp::List, err))?;

        Ok(tasks
            .into_iter()
            .map(|task| {
                let priority = task.priority_id.and_then(|id| labels.get(&id).cloned());
                TaskRecord { task, priority }
            })
            .collect())
    }

    pub async fn create_task(&self, mut new_task: NewTask) -> Result<TaskRecord, AppError> {
        new_task.title = normalize_title(&new_task.title)?;
        let task = self
            .tasks
            .create_task(new_task)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))?;
        self.describe(task).await
    }

    pub async fn update_task(
        &self,
        id: i32,
        mut changes: TaskChanges,
    ) -> Result<TaskRecord, AppError> {
        if let Some(title) = changes.title.as_deref() {
            changes.title = Some(normalize_title(title)?);
        }
        let task = self
            .tasks
            .update_task(id, changes)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))?;
        self.describe(task).await
    }

    /// Removes the task and its comments; returns the task as it was.
    pub async fn delete_task(&self, id: i32) -> Result<TaskRecord, AppError> {
        let task = self
            .tasks
            .delete_task(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Delete, err))?;
        self.describe(task).await
    }

    pub async fn statistics(&self, filter: &TaskFilter) -> Result<TaskStatistics, AppError> {
        let completed = self.count_partition(filter, true).await?;
        let no_completed = self.count_partition(filter, false).await?;
        Ok(TaskStatistics {
            completed,
            no_completed,
            total: completed + no_completed,
        })
    }

    async fn count_partition(&self, filter: &TaskFilter, done: bool) -> Result<u64, AppError> {
        // A completed filter that excludes this partition leaves it empty.
        if filter.completed.is_some_and(|wanted| wanted != done) {
            return Ok(0);
        }
        let partition = TaskFilter {
            completed: Some(done),
            ..filter.clone()
        };
        self.tasks
            .count_tasks(&partition)
            .await
            .map_err(|err| self.map_error(CrudOp::List, err))
    }
}

impl CrudService for TaskService {
    fn errors(&self) -> CrudErrors {
        CrudErrors {
            not_found: "Task not found",
            ..CrudErrors::default()
        }
    }
}

fn normalize_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::invalid_input("Title must not be empty"));
    }
    Ok(title.to_string())
}
