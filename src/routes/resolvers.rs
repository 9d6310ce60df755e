use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::Deserialize;

use super::guards::ActiveUser;
use crate::{
    auth::AuthenticatedUser,
    db::entities::{task, task_comment},
    error::AppError,
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Deserialize)]
struct TaskPath {
    task_id: i32,
}

#[derive(Debug, Deserialize)]
struct CommentPath {
    comment_id: i32,
}

/// The task named by `{task_id}`, loaded after the caller is authenticated.
pub struct ResolvedTask {
    pub caller: AuthenticatedUser,
    pub task: task::Model,
}

impl FromRequestParts<Arc<AppState>> for ResolvedTask {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let caller = ActiveUser::from_request_parts(parts, state).await?.user;

        let Path(TaskPath { task_id }) = Path::<TaskPath>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::invalid_input("Invalid task id"))?;

        let task = ServiceContext::from_state(state.as_ref())
            .task()
            .require_task(task_id)
            .await?;

        Ok(Self { caller, task })
    }
}

/// A comment addressed as `{task_id}/comments/{comment_id}`. The parent task
/// is resolved first; the comment must belong to it.
pub struct ResolvedComment {
    pub caller: AuthenticatedUser,
    pub task: task::Model,
    pub comment: task_comment::Model,
}

impl FromRequestParts<Arc<AppState>> for ResolvedComment {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let ResolvedTask { caller, task } = ResolvedTask::from_request_parts(parts, state).await?;

        let Path(CommentPath { comment_id }) =
            Path::<CommentPath>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::invalid_input("Invalid comment id"))?;

        let comment = ServiceContext::from_state(state.as_ref())
            .comment()
            .get_comment(task.id, comment_id)
            .await?;

        Ok(Self {
            caller,
            task,
            comment,
        })
    }
}
