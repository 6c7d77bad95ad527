//! File-based task storage implementation
//!
//! Stores tasks as JSON in a file on disk. Stands in for the document store,
//! which is an external collaborator of this system.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{Task, TaskPriority, TaskStatus};
use super::repository::{
    TaskOwnerActivity, TaskQuery, TaskRecentActivity, TaskRepository, TaskStats, TasksByPriority,
    TasksByStatus,
};
use crate::page::Page;
use crate::{Error, Result};

const TOP_USERS_LIMIT: usize = 10;

/// File-based task store using JSON
pub struct FileTaskStore {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory cache of tasks
    cache: RwLock<HashMap<Uuid, Task>>,
}

impl FileTaskStore {
    /// Create a new FileTaskStore
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            let tasks: Vec<Task> = serde_json::from_str(&content)?;
            tasks.into_iter().map(|t| (t.id, t)).collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Persist the cache to disk
    async fn persist(&self) -> Result<()> {
        let cache = self.cache.read().await;
        let tasks: Vec<&Task> = cache.values().collect();
        let content = serde_json::to_string_pretty(&tasks)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

fn matches_query(task: &Task, query: &TaskQuery) -> bool {
    if let Some(project_id) = query.project_id.as_deref() {
        if task.project_id.as_deref() != Some(project_id) {
            return false;
        }
    }
    if let Some(status) = query.status {
        if task.status != status {
            return false;
        }
    }
    if let Some(priority) = query.priority {
        if task.priority != priority {
            return false;
        }
    }
    if let Some(search) = query.search.as_deref() {
        let needle = search.to_lowercase();
        if !task.title.to_lowercase().contains(&needle)
            && !task.description.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    true
}

fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(now)
}

#[async_trait]
impl TaskRepository for FileTaskStore {
    async fn create(&self, task: Task) -> Result<Task> {
        {
            let mut cache = self.cache.write().await;
            if cache.contains_key(&task.id) {
                return Err(Error::Storage(format!(
                    "Task with ID {} already exists",
                    task.id
                )));
            }
            cache.insert(task.id, task.clone());
        }
        self.persist().await?;
        Ok(task)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        let cache = self.cache.read().await;
        Ok(cache.get(&id).cloned())
    }

    async fn list_for_owner(&self, owner_id: &str, query: &TaskQuery) -> Result<Page<Task>> {
        let cache = self.cache.read().await;
        let mut tasks: Vec<Task> = cache
            .values()
            .filter(|task| task.owner_id == owner_id && matches_query(task, query))
            .cloned()
            .collect();
        // Sort by created_at descending (newest first)
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Page::from_filtered(tasks, query.page_query()))
    }

    async fn update(&self, mut task: Task) -> Result<Task> {
        task.updated_at = Utc::now();
        {
            let mut cache = self.cache.write().await;
            if !cache.contains_key(&task.id) {
                return Err(Error::NotFound(format!("Task {} not found", task.id)));
            }
            cache.insert(task.id, task.clone());
        }
        self.persist().await?;
        Ok(task)
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

    async fn stats(&self) -> Result<TaskStats> {
        let cache = self.cache.read().await;
        let now = Utc::now();
        let month_start = start_of_month(now);
        let week_start = now - Duration::days(7);

        let total_tasks = cache.len();
        let mut by_status = TasksByStatus {
            pending: 0,
            in_progress: 0,
            completed: 0,
        };
        let mut by_priority = TasksByPriority {
            low: 0,
            medium: 0,
            high: 0,
        };
        let mut recent = TaskRecentActivity {
            tasks_this_month: 0,
            tasks_this_week: 0,
            overdue_tasks: 0,
        };
        let mut per_owner: HashMap<&str, (usize, usize)> = HashMap::new();

        for task in cache.values() {
            match task.status {
                TaskStatus::Pending => by_status.pending += 1,
                TaskStatus::InProgress => by_status.in_progress += 1,
                TaskStatus::Completed => by_status.completed += 1,
            }
            match task.priority {
                TaskPriority::Low => by_priority.low += 1,
                TaskPriority::Medium => by_priority.medium += 1,
                TaskPriority::High => by_priority.high += 1,
            }
            if task.created_at >= month_start {
                recent.tasks_this_month += 1;
            }
            if task.created_at >= week_start {
                recent.tasks_this_week += 1;
            }
            if task.is_overdue(now) {
                recent.overdue_tasks += 1;
            }
            let entry = per_owner.entry(task.owner_id.as_str()).or_default();
            entry.0 += 1;
            if task.status == TaskStatus::Completed {
                entry.1 += 1;
            }
        }

        let mut top_users: Vec<TaskOwnerActivity> = per_owner
            .into_iter()
            .map(|(owner_id, (task_count, completed_tasks))| TaskOwnerActivity {
                owner_id: owner_id.to_string(),
                task_count,
                completed_tasks,
            })
            .collect();
        top_users.sort_by(|a, b| b.task_count.cmp(&a.task_count).then(a.owner_id.cmp(&b.owner_id)));
        top_users.truncate(TOP_USERS_LIMIT);

        let completion_rate = if total_tasks > 0 {
            (by_status.completed as f64 / total_tasks as f64 * 10_000.0).round() / 100.0
        } else {
            0.0
        };

        Ok(TaskStats {
            total_tasks,
            tasks_by_status: by_status,
            tasks_by_priority: by_priority,
            recent_activity: recent,
            top_users,
            completion_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (FileTaskStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");
        let store = FileTaskStore::new(&path).await.unwrap();
        (store, temp_dir)
    }

    fn query() -> TaskQuery {
        TaskQuery::default()
    }

    #[tokio::test]
    async fn test_create_and_get_task() {
        let (store, _temp) = create_test_store().await;

        let task = Task::new("Test task", "A test description", "u1");
        let id = task.id;
        let created = store.create(task).await.unwrap();
        assert_eq!(created.id, id);

        let retrieved = store.get(id).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().owner_id, "u1");

        let non_existent = store.get(Uuid::new_v4()).await.unwrap();
        assert!(non_existent.is_none());
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped() {
        let (store, _temp) = create_test_store().await;

        store.create(Task::new("Mine 1", "d", "u1")).await.unwrap();
        store.create(Task::new("Mine 2", "d", "u1")).await.unwrap();
        store.create(Task::new("Theirs", "d", "u2")).await.unwrap();

        let page = store.list_for_owner("u1", &query()).await.unwrap();
        assert_eq!(page.total_items, 2);
        assert!(page.items.iter().all(|task| task.owner_id == "u1"));
    }

    #[tokio::test]
    async fn test_list_filters_and_search() {
        let (store, _temp) = create_test_store().await;

        store
            .create(Task::new("Write report", "quarterly numbers", "u1"))
            .await
            .unwrap();
        store
            .create(
                Task::new("Fix login", "auth bug", "u1")
                    .with_status(TaskStatus::InProgress)
                    .with_priority(TaskPriority::High)
                    .with_project_id("p1"),
            )
            .await
            .unwrap();

        let mut by_status = query();
        by_status.status = Some(TaskStatus::InProgress);
        let page = store.list_for_owner("u1", &by_status).await.unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].title, "Fix login");

        let mut by_priority = query();
        by_priority.priority = Some(TaskPriority::High);
        assert_eq!(
            store
                .list_for_owner("u1", &by_priority)
                .await
                .unwrap()
                .total_items,
            1
        );

        let mut by_project = query();
        by_project.project_id = Some("p1".to_string());
        assert_eq!(
            store
                .list_for_owner("u1", &by_project)
                .await
                .unwrap()
                .total_items,
            1
        );

        let mut by_search = query();
        by_search.search = Some("QUARTERLY".to_string());
        let page = store.list_for_owner("u1", &by_search).await.unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].title, "Write report");
    }

    #[tokio::test]
    async fn test_list_paginates() {
        let (store, _temp) = create_test_store().await;

        for i in 0..15 {
            store
                .create(Task::new(format!("Task {}", i), "d", "u1"))
                .await
                .unwrap();
        }

        let mut first = query();
        first.limit = Some(10);
        let page = store.list_for_owner("u1", &first).await.unwrap();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_items, 15);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.current_page, 1);

        let mut second = first.clone();
        second.page = Some(2);
        let page = store.list_for_owner("u1", &second).await.unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.current_page, 2);
    }

    #[tokio::test]
    async fn test_update_task() {
        let (store, _temp) = create_test_store().await;

        let task = Task::new("Original", "d", "u1");
        let id = task.id;
        store.create(task).await.unwrap();

        let mut updated = store.get(id).await.unwrap().unwrap();
        updated.status = TaskStatus::Completed;
        let result = store.update(updated).await.unwrap();
        assert_eq!(result.status, TaskStatus::Completed);

        let retrieved = store.get(id).await.unwrap().unwrap();
        assert_eq!(retrieved.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_update_nonexistent_task() {
        let (store, _temp) = create_test_store().await;

        let result = store.update(Task::new("Ghost", "d", "u1")).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_task() {
        let (store, _temp) = create_test_store().await;

        let task = Task::new("Task to delete", "d", "u1");
        let id = task.id;
        store.create(task).await.unwrap();

        assert!(store.delete(id).await.unwrap());
        assert!(store.get(id).await.unwrap().is_none());
        assert!(!store.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_stats() {
        let (store, _temp) = create_test_store().await;

        store.create(Task::new("A", "d", "u1")).await.unwrap();
        store
            .create(Task::new("B", "d", "u1").with_status(TaskStatus::Completed))
            .await
            .unwrap();
        store
            .create(
                Task::new("C", "d", "u2")
                    .with_priority(TaskPriority::High)
                    .with_due_date(Utc::now() - Duration::hours(2)),
            )
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.tasks_by_status.pending, 2);
        assert_eq!(stats.tasks_by_status.completed, 1);
        assert_eq!(stats.tasks_by_priority.high, 1);
        assert_eq!(stats.recent_activity.overdue_tasks, 1);
        assert_eq!(stats.recent_activity.tasks_this_week, 3);
        assert!((stats.completion_rate - 33.33).abs() < 0.01);
        assert_eq!(stats.top_users[0].owner_id, "u1");
        assert_eq!(stats.top_users[0].task_count, 2);
    }

    #[tokio::test]
    async fn test_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");

        let task_id;
        {
            let store = FileTaskStore::new(&path).await.unwrap();
            let task = Task::new("Persistent task", "Should survive reload", "u1")
                .with_priority(TaskPriority::High)
                .with_assigned_to("u2");
            task_id = task.id;
            store.create(task).await.unwrap();
        }

        {
            let store = FileTaskStore::new(&path).await.unwrap();
            let task = store.get(task_id).await.unwrap().unwrap();
            assert_eq!(task.title, "Persistent task");
            assert_eq!(task.priority, TaskPriority::High);
            assert_eq!(task.assigned_to, Some("u2".to_string()));
        }
    }
}
