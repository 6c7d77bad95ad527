//! File-based project storage implementation

use async_trait::async_trait;
use chrono::{Datelike, Duration, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::Project;
use super::repository::{
    MemberDistribution, ProjectQuery, ProjectRecentActivity, ProjectRepository, ProjectStats,
};
use crate::page::Page;
use crate::{Error, Result};

/// File-based project store using JSON
pub struct FileProjectStore {
    path: PathBuf,
    cache: RwLock<HashMap<Uuid, Project>>,
}

impl FileProjectStore {
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            let projects: Vec<Project> = serde_json::from_str(&content)?;
            projects.into_iter().map(|p| (p.id, p)).collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    async fn persist(&self) -> Result<()> {
        let cache = self.cache.read().await;
        let projects: Vec<&Project> = cache.values().collect();
        let content = serde_json::to_string_pretty(&projects)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

fn matches_query(project: &Project, query: &ProjectQuery) -> bool {
    if let Some(search) = query.search.as_deref() {
        let needle = search.to_lowercase();
        if !project.name.to_lowercase().contains(&needle)
            && !project.description.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    true
}

#[async_trait]
impl ProjectRepository for FileProjectStore {
    async fn create(&self, project: Project) -> Result<Project> {
        {
            let mut cache = self.cache.write().await;
            if cache.contains_key(&project.id) {
                return Err(Error::Storage(format!(
                    "Project with ID {} already exists",
                    project.id
                )));
            }
            cache.insert(project.id, project.clone());
        }
        self.persist().await?;
        Ok(project)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Project>> {
        let cache = self.cache.read().await;
        Ok(cache.get(&id).cloned())
    }

    async fn list_visible(
        &self,
        owner_id: &str,
        email: &str,
        query: &ProjectQuery,
    ) -> Result<Page<Project>> {
        let cache = self.cache.read().await;
        let mut projects: Vec<Project> = cache
            .values()
            .filter(|project| {
                (project.owner_id == owner_id
                    || (!email.is_empty() && project.members.iter().any(|m| m == email)))
                    && matches_query(project, query)
            })
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Page::from_filtered(projects, query.page_query()))
    }

    async fn update(&self, mut project: Project) -> Result<Project> {
        project.updated_at = Utc::now();
        {
            let mut cache = self.cache.write().await;
            if !cache.contains_key(&project.id) {
                return Err(Error::NotFound(format!("Project {} not found", project.id)));
            }
            cache.insert(project.id, project.clone());
        }
        self.persist().await?;
        Ok(project)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let removed = {
            let mut cache = self.cache.write().await;
            cache.remove(&id).is_some()
        };
        if removed {
            self.persist().await?;
        }
        Ok(removed)
    }

    async fn stats(&self) -> Result<ProjectStats> {
        let cache = self.cache.read().await;
        let now = Utc::now();
        let month_start = now
            .date_naive()
            .with_day(1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .unwrap_or(now);
        let week_start = now - Duration::days(7);

        let total_projects = cache.len();
        let mut recent = ProjectRecentActivity {
            projects_this_month: 0,
            projects_this_week: 0,
        };
        let mut distribution = MemberDistribution {
            none: 0,
            small: 0,
            medium: 0,
            large: 0,
            huge: 0,
        };
        let mut total_members = 0usize;

        for project in cache.values() {
            if project.created_at >= month_start {
                recent.projects_this_month += 1;
            }
            if project.created_at >= week_start {
                recent.projects_this_week += 1;
            }
            let members = project.members.len();
            total_members += members;
            match members {
                0 => distribution.none += 1,
                1..=2 => distribution.small += 1,
                3..=5 => distribution.medium += 1,
                6..=10 => distribution.large += 1,
                _ => distribution.huge += 1,
            }
        }

        let avg_members_per_project = if total_projects > 0 {
            (total_members as f64 / total_projects as f64 * 100.0).round() / 100.0
        } else {
            0.0
        };

        Ok(ProjectStats {
            total_projects,
            recent_activity: recent,
            member_distribution: distribution,
            avg_members_per_project,
        })
    }
}
