use thiserror::Error;

use crate::db::dao::DaoLayerError;

/// Failure taxonomy surfaced to HTTP clients. Every variant renders as a
/// `{"detail": ...}` body; see `response.rs` for the status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    InactiveAccount(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    DuplicateIdentity(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("Too many requests")]
    TooManyRequests { retry_after_secs: u64 },
    #[error("{0}")]
    Internal(String),
}

pub const CREDENTIALS_MESSAGE: &str = "Could not validate credentials";
pub const PERMISSION_MESSAGE: &str = "Not enough permissions";
pub const LOGIN_MESSAGE: &str = "Incorrect username or password";

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn invalid_credentials() -> Self {
        Self::Unauthorized(CREDENTIALS_MESSAGE.to_string())
    }

    pub fn bad_login() -> Self {
        Self::Unauthorized(LOGIN_MESSAGE.to_string())
    }

    pub fn inactive() -> Self {
        Self::InactiveAccount("Inactive user".to_string())
    }

    pub fn forbidden() -> Self {
        Self::Forbidden(PERMISSION_MESSAGE.to_string())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::DuplicateIdentity(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn too_many_requests(retry_after_secs: u64) -> Self {
        Self::TooManyRequests { retry_after_secs }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<DaoLayerError> for AppError {
    fn from(err: DaoLayerError) -> Self {
        match err {
            DaoLayerError::NotFound { .. } => AppError::not_found("Resource not found"),
            DaoLayerError::UniqueViolation(_) => {
                AppError::duplicate("Username, email or phone already exists")
            }
            DaoLayerError::UnknownPriority { .. } => AppError::not_found("Priority not found"),
            DaoLayerError::UnknownUser { .. } => AppError::not_found("Assignee not found"),
            DaoLayerError::InvalidPagination { .. } => AppError::invalid_input(err.to_string()),
            DaoLayerError::Db(db_err) => {
                tracing::error!(error = %db_err, "storage failure");
                AppError::internal("Internal server error")
            }
        }
    }
}
