//! Project management

mod file_store;
mod model;
mod repository;

pub use file_store::FileProjectStore;
pub use model::{validate_description, validate_name, Project};
pub use repository::{
    MemberDistribution, ProjectQuery, ProjectRecentActivity, ProjectRepository, ProjectStats,
};
