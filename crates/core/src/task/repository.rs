//! Task repository trait
//!
//! Defines the interface for task storage operations. Collection reads are
//! owner-scoped at the query level; callers never filter an unrestricted
//! fetch.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{Task, TaskPriority, TaskStatus};
use crate::page::{Page, PageQuery};
use crate::Result;

/// Filters accepted by the task collection endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    /// Case-insensitive substring match over title and description.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl TaskQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total_tasks: usize,
    pub tasks_by_status: TasksByStatus,
    pub tasks_by_priority: TasksByPriority,
    pub recent_activity: TaskRecentActivity,
    pub top_users: Vec<TaskOwnerActivity>,
    /// Completed share of all tasks, as a percentage with two decimals.
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TasksByStatus {
    pub pending: usize,
    #[serde(rename = "in-progress")]
    pub in_progress: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TasksByPriority {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecentActivity {
    pub tasks_this_month: usize,
    pub tasks_this_week: usize,
    pub overdue_tasks: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOwnerActivity {
    pub owner_id: String,
    pub task_count: usize,
    pub completed_tasks: usize,
}

/// Repository interface for task CRUD operations
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a new task
    async fn create(&self, task: Task) -> Result<Task>;

    /// Get a task by ID
    async fn get(&self, id: Uuid) -> Result<Option<Task>>;

    /// List one page of the owner's tasks matching the query
    async fn list_for_owner(&self, owner_id: &str, query: &TaskQuery) -> Result<Page<Task>>;

    /// Update an existing task
    async fn update(&self, task: Task) -> Result<Task>;

    /// Delete a task by ID
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Service-wide statistics (admin surface)
    async fn stats(&self) -> Result<TaskStats>;
}
