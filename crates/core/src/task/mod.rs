//! Task management

mod file_store;
mod model;
mod repository;

pub use file_store::FileTaskStore;
pub use model::{
    validate_description, validate_title, Task, TaskPriority, TaskStatus, MAX_DESCRIPTION_LEN,
    MAX_TITLE_LEN,
};
pub use repository::{
    TaskOwnerActivity, TaskQuery, TaskRecentActivity, TaskRepository, TaskStats, TasksByPriority,
    TasksByStatus,
};
