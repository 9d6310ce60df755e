use crate::{
    db::dao::{CommentDao, DaoLayerError},
    db::entities::task_comment,
    error::AppError,
    services::crud_service::{CrudErrors, CrudOp, CrudService},
};

#[derive(Clone)]
pub struct CommentService {
    comments: CommentDao,
}

impl CommentService {
    pub fn new(comments: CommentDao) -> Self {
        Self { comments }
    }

    /// Oldest first.
    pub async fn list_comments(&self, task_id: i32) -> Result<Vec<task_comment::Model>, AppError> {
        self.comments
            .list_for_task(task_id)
            .await
            .map_err(|err| self.map_error(CrudOp::List, err))
    }

    pub async fn get_comment(
        &self,
        task_id: i32,
        comment_id: i32,
    ) -> Result<task_comment::Model, AppError> {
        self.comments
            .find_scoped(task_id, comment_id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))?
            .ok_or_else(|| AppError::not_found(self.errors().not_found))
    }

    pub async fn create_comment(
        &self,
        task_id: i32,
        description: &str,
        created_by: i32,
    ) -> Result<task_comment::Model, AppError> {
        let description = normalize_description(description)?;
        self.comments
            .create_comment(task_id, description, created_by)
            .await
            .map_err(|err| match err {
                // The parent task vanished between resolution and insert.
                DaoLayerError::NotFound { .. } => AppError::not_found("Task not found"),
                other => self.map_error(CrudOp::Create, other),
            })
    }

    pub async fn update_comment(
        &self,
        task_id: i32,
        comment_id: i32,
        description: Option<&str>,
    ) -> Result<task_comment::Model, AppError> {
        let description = description.map(normalize_description).transpose()?;
        self.comments
            .update_comment(task_id, comment_id, description)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))?
            .ok_or_else(|| AppError::not_found(self.errors().not_found))
    }

    pub async fn delete_comment(
        &self,
        task_id: i32,
        comment_id: i32,
    ) -> Result<task_comment::Model, AppError> {
        self.comments
            .delete_comment(task_id, comment_id)
            .await
            .map_err(|err| self.map_error(CrudOp::Delete, err))?
            .ok_or_else(|| AppError::not_found(self.errors().not_found))
    }
}

impl CrudService for CommentService {
    fn errors(&self) -> CrudErrors {
        CrudErrors {
            not_found: "Comment not found",
            ..CrudErrors::default()
        }
    }
}

fn normalize_description(description: &str) -> Result<String, AppError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(AppError::invalid_input("Description must not be empty"));
    }
    Ok(description.to_string())
}
