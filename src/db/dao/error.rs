use sea_orm::{DbErr, EntityName, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: i32 },
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("Unknown priority label: {label}")]
    UnknownPriority { label: String },
    #[error("Unknown user (id={id})")]
    UnknownUser { id: i32 },
    #[error("Invalid pagination: offset={offset} limit={limit}")]
    InvalidPagination { offset: u64, limit: u64 },
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

impl DaoLayerError {
    pub fn not_found<E: sea_orm::EntityTrait>(id: i32) -> Self {
        Self::NotFound {
            entity: E::default().table_name(),
            id,
        }
    }
}

impl From<DbErr> for DaoLayerError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::UniqueViolation(detail),
            _ => Self::Db(err),
        }
    }
}
