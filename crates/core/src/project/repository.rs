//! Project repository trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Project;
use crate::page::{Page, PageQuery};
use crate::Result;

/// Filters accepted by the project collection endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectQuery {
    /// Case-insensitive substring match over name and description.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ProjectQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total_projects: usize,
    pub recent_activity: ProjectRecentActivity,
    pub member_distribution: MemberDistribution,
    pub avg_members_per_project: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecentActivity {
    pub projects_this_month: usize,
    pub projects_this_week: usize,
}

/// Project counts bucketed by member-list size.
#[derive(Debug, Clone, Serialize)]
pub struct MemberDistribution {
    #[serde(rename = "0")]
    pub none: usize,
    #[serde(rename = "1-2")]
    pub small: usize,
    #[serde(rename = "3-5")]
    pub medium: usize,
    #[serde(rename = "6-10")]
    pub large: usize,
    #[serde(rename = "10+")]
    pub huge: usize,
}

/// Repository interface for project CRUD operations
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Create a new project
    async fn create(&self, project: Project) -> Result<Project>;

    /// Get a project by ID
    async fn get(&self, id: Uuid) -> Result<Option<Project>>;

    /// List one page of the projects visible to the principal: owned by
    /// `owner_id` or carrying `email` on the member list.
    async fn list_visible(
        &self,
        owner_id: &str,
        email: &str,
        query: &ProjectQuery,
    ) -> Result<Page<Project>>;

    /// Update an existing project
    async fn update(&self, project: Project) -> Result<Project>;

    /// Delete a project by ID
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Service-wide statistics (admin surface)
    async fn stats(&self) -> Result<ProjectStats>;
}
