//! Task model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::principal::Principal;
use crate::{Error, Result};

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

/// A task, owned exclusively by the principal that created it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub owner_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task with defaults (`pending`, `medium`).
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        owner_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
            owner_id: owner_id.into(),
            project_id: None,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into());
        self
    }

    /// Tasks have no membership sharing: only the owner may read or mutate.
    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        self.owner_id == principal.id
    }

    /// A task counts as overdue when its due date has passed and it is not
    /// completed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Completed && self.due_date.is_some_and(|due| due < now)
    }
}

pub fn validate_title(title: &str) -> Result<()> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("Task title is required".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(Error::Validation(format!(
            "Task title cannot exceed {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<()> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(
            "Task description is required".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(Error::Validation(format!(
            "Task description cannot exceed {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(())
}
