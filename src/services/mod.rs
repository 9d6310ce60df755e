pub mod auth_service;
pub mod comment_service;
mod context;
pub mod crud_service;
pub mod task_service;
pub mod user_service;

pub use context::ServiceContext;
