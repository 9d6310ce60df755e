pub mod base;
pub mod base_traits;
mod comment_dao;
mod context;
pub mod error;
mod priority_dao;
mod task_dao;
mod user_dao;

pub use base::{DaoBase, next_updated_at};
pub use base_traits::TimestampedActiveModel;
pub use comment_dao::CommentDao;
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use priority_dao::{PRIORITY_LEVELS, PriorityDao};
pub use task_dao::{NewTask, TaskChanges, TaskDao, TaskFilter};
pub use user_dao::{NewUser, UserChanges, UserDao};
