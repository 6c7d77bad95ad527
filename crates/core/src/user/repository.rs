//! User repository trait

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use super::model::User;
use crate::Result;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: usize,
}

/// Repository interface for user profiles
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the profile unless one already exists for its `external_id`.
    /// Returns the stored profile and whether it was newly created.
    async fn ensure(&self, user: User) -> Result<(User, bool)>;

    /// Get a user by internal ID
    async fn get(&self, id: Uuid) -> Result<Option<User>>;

    /// Get a user by identity-provider subject id
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>>;

    /// Update an existing user
    async fn update(&self, user: User) -> Result<User>;

    /// Service-wide statistics (admin surface)
    async fn stats(&self) -> Result<UserStats>;
}
