use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use super::params::{double_option, optional_timestamp, timestamp};
use crate::{
    db::dao::{NewTask, TaskChanges, TaskFilter},
    error::AppError,
    response::{ApiResult, Deleted},
    routes::{guards::ActiveUser, resolvers::ResolvedTask},
    services::{
        ServiceContext,
        task_service::{TaskRecord, TaskStatistics},
    },
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub created_by: i32,
    pub assigned_to: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub due_date: DateTimeWithTimeZone,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct DeletedTask {
    pub task: TaskResponse,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<i32>,
    #[serde(deserialize_with = "timestamp")]
    pub due_date: DateTimeWithTimeZone,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub priority: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<i32>>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub due_date: Option<DateTimeWithTimeZone>,
    #[serde(default)]
    pub completed: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    #[serde(default, alias = "createdBy")]
    pub created_by: Option<i32>,
    #[serde(default, alias = "assignedTo")]
    pub assigned_to: Option<i32>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatisticsQuery {
    #[serde(default, alias = "createdBy")]
    pub created_by: Option<i32>,
    #[serde(default, alias = "assignedTo")]
    pub assigned_to: Option<i32>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default, alias = "createdFrom", deserialize_with = "optional_timestamp")]
    pub created_from: Option<DateTimeWithTimeZone>,
    #[serde(default, alias = "createdTo", deserialize_with = "optional_timestamp")]
    pub created_to: Option<DateTimeWithTimeZone>,
    #[serde(default, alias = "dueFrom", deserialize_with = "optional_timestamp")]
    pub due_from: Option<DateTimeWithTimeZone>,
    #[serde(default, alias = "dueTo", deserialize_with = "optional_timestamp")]
    pub due_to: Option<DateTimeWithTimeZone>,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/", get(list_tasks).post(create_task))
        .route("/tasks/statistics", get(statistics))
        .route(
            "/tasks/{task_id}",
            get(get_task)
                .put(update_task)
                .patch(update_task)
                .delete(delete_task),
        )
}

async fn list_tasks(
    State(state): State<Arc<AppState>>,
    _caller: ActiveUser,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Vec<TaskResponse>> {
    let filter = TaskFilter {
        created_by: query.created_by,
        assigned_to: query.assigned_to,
        completed: query.completed,
        ..TaskFilter::default()
    };
    let tasks = ServiceContext::from_state(state.as_ref())
        .task()
        .list_tasks(&filter, query.offset, query.limit)
        .await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    caller: ActiveUser,
    Json(body): Json<CreateTaskRequest>,
) -> ApiResult<TaskResponse> {
    let record = ServiceContext::from_state(state.as_ref())
        .task()
        .create_task(NewTask {
            title: body.title,
            description: body.description,
            priority: body.priority,
            created_by: caller.user.0.id,
            assigned_to: body.assigned_to,
            due_date: body.due_date,
            completed: body.completed,
        })
        .await?;
    Ok(Json(record.into()))
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    ResolvedTask { task, .. }: ResolvedTask,
) -> ApiResult<TaskResponse> {
    let record = ServiceContext::from_state(state.as_ref())
        .task()
        .describe(task)
        .await?;
    Ok(Json(record.into()))
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    ResolvedTask { task, .. }: ResolvedTask,
    Json(body): Json<UpdateTaskRequest>,
) -> ApiResult<TaskResponse> {
    if body.id.is_some_and(|id| id != task.id) {
        return Err(AppError::invalid_input("Task id does not match the path"));
    }

    let changes = TaskChanges {
        title: body.title,
        description: body.description,
        priority: body.priority,
        assigned_to: body.assigned_to,
        due_date: body.due_date,
        completed: body.completed,
    };
    let record = ServiceContext::from_state(state.as_ref())
        .task()
        .update_task(task.id, changes)
        .await?;
    Ok(Json(record.into()))
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    ResolvedTask { task, .. }: ResolvedTask,
) -> ApiResult<Deleted<DeletedTask>> {
    let record = ServiceContext::from_state(state.as_ref())
        .task()
        .delete_task(task.id)
        .await?;
    Ok(Json(Deleted::new(DeletedTask {
        task: record.into(),
    })))
}

async fn statistics(
    State(state): State<Arc<AppState>>,
    _caller: ActiveUser,
    Query(query): Query<StatisticsQuery>,
) -> ApiResult<TaskStatistics> {
    let filter = TaskFilter {
        created_by: query.created_by,
        assigned_to: query.assigned_to,
        completed: query.completed,
        created_from: query.created_from,
        created_to: query.created_to,
        due_from: query.due_from,
        due_to: query.due_to,
    };
    let stats = ServiceContext::from_state(state.as_ref())
        .task()
        .statistics(&filter)
        .await?;
    Ok(Json(stats))
}

impl From<TaskRecord> for TaskResponse {
    fn from(record: TaskRecord) -> Self {
        let TaskRecord { task, priority } = record;
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            priority,
            created_by: task.created_by,
            assigned_to: task.assigned_to,
            created_at: task.created_at,
            updated_at: task.updated_at,
            due_date: task.due_date,
            completed: task.completed,
        }
    }
}
