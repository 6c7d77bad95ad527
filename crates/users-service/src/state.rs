//! Application state

use std::path::PathBuf;
use std::sync::Arc;

use th_core::user::FileUserStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    user_store: FileUserStore,
}

impl AppState {
    pub async fn new(data_dir: PathBuf) -> th_core::Result<Self> {
        let users_path = data_dir.join("users.json");
        let user_store = FileUserStore::new(users_path).await?;

        Ok(Self {
            inner: Arc::new(AppStateInner { user_store }),
        })
    }

    pub fn user_store(&self) -> &FileUserStore {
        &self.inner.user_store
    }
}
