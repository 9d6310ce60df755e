#[allow(unused_imports)]
pub mod prelude {
    pub use super::task::Entity as Task;
    pub use super::task_comment::Entity as TaskComment;
    pub use super::task_priority::Entity as TaskPriority;
    pub use super::user::Entity as User;
}

pub mod task;
pub mod task_comment;
pub mod task_priority;
pub mod user;
