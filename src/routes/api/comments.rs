use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{
    db::entities::task_comment,
    response::{ApiResult, Deleted},
    routes::resolvers::{ResolvedComment, ResolvedTask},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i32,
    pub task_id: i32,
    pub description: String,
    pub created_by: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Debug, Serialize)]
pub struct DeletedComment {
    pub comment: CommentResponse,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    #[serde(default)]
    pub description: Option<String>,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/tasks/{task_id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/tasks/{task_id}/comments/",
            get(list_comments).post(create_comment),
        )
        .route(
            "/tasks/{task_id}/comments/{comment_id}",
            get(get_comment)
                .put(update_comment)
                .patch(update_comment)
                .delete(delete_comment),
        )
}

async fn list_comments(
    State(state): State<Arc<AppState>>,
    ResolvedTask { task, .. }: ResolvedTask,
) -> ApiResult<Vec<CommentResponse>> {
    let comments = ServiceContext::from_state(state.as_ref())
        .comment()
        .list_comments(task.id)
        .await?;
    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}

async fn create_comment(
    State(state): State<Arc<AppState>>,
    ResolvedTask { caller, task }: ResolvedTask,
    Json(body): Json<CreateCommentRequest>,
) -> ApiResult<CommentResponse> {
    let comment = ServiceContext::from_state(state.as_ref())
        .comment()
        .create_comment(task.id, &body.description, caller.0.id)
        .await?;
    Ok(Json(comment.into()))
}

async fn get_comment(
    ResolvedComment { comment, .. }: ResolvedComment,
) -> ApiResult<CommentResponse> {
    Ok(Json(comment.into()))
}

async fn update_comment(
    State(state): State<Arc<AppState>>,
    ResolvedComment { task, comment, .. }: ResolvedComment,
    Json(body): Json<UpdateCommentRequest>,
) -> ApiResult<CommentResponse> {
    let comment = ServiceContext::from_state(state.as_ref())
        .comment()
        .update_comment(task.id, comment.id, body.description.as_deref())
        .await?;
    Ok(Json(comment.into()))
}

async fn delete_comment(
    State(state): State<Arc<AppState>>,
    ResolvedComment { task, comment, .. }: ResolvedComment,
) -> ApiResult<Deleted<DeletedComment>> {
    let comment = ServiceContext::from_state(state.as_ref())
        .comment()
        .delete_comment(task.id, comment.id)
        .await?;
    Ok(Json(Deleted::new(DeletedComment {
        comment: comment.into(),
    })))
}

impl From<task_comment::Model> for CommentResponse {
    fn from(comment: task_comment::Model) -> Self {
        Self {
            id: comment.id,
            task_id: comment.task_id,
            description: comment.description,
            created_by: comment.created_by,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}
