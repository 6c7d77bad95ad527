//! File-based user storage implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::User;
use super::repository::{UserRepository, UserStats};
use crate::{Error, Result};

/// File-based user store using JSON
pub struct FileUserStore {
    path: PathBuf,
    cache: RwLock<HashMap<Uuid, User>>,
}

impl FileUserStore {
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            let users: Vec<User> = serde_json::from_str(&content)?;
            users.into_iter().map(|u| (u.id, u)).collect()
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
        let users: Vec<&User> = cache.values().collect();
        let content = serde_json::to_string_pretty(&users)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FileUserStore {
    async fn ensure(&self, user: User) -> Result<(User, bool)> {
        {
            let mut cache = self.cache.write().await;
            if let Some(existing) = cache
                .values()
                .find(|candidate| candidate.external_id == user.external_id)
            {
                return Ok((existing.clone(), false));
            }
            cache.insert(user.id, user.clone());
        }
        self.persist().await?;
        Ok((user, true))
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let cache = self.cache.read().await;
        Ok(cache.get(&id).cloned())
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>> {
        let cache = self.cache.read().await;
        Ok(cache
            .values()
            .find(|user| user.external_id == external_id)
            .cloned())
    }

    async fn update(&self, mut user: User) -> Result<User> {
        user.updated_at = Utc::now();
        {
            let mut cache = self.cache.write().await;
            if !cache.contains_key(&user.id) {
                return Err(Error::NotFound(format!("User {} not found", user.id)));
            }
            cache.insert(user.id, user.clone());
        }
        self.persist().await?;
        Ok(user)
    }

    async fn stats(&self) -> Result<UserStats> {
        let cache = self.cache.read().await;
        Ok(UserStats {
            total_users: cache.len(),
        })
    }
}
