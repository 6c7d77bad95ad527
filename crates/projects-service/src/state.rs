//! Application state

use std::path::PathBuf;
use std::sync::Arc;

use th_core::project::FileProjectStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    project_store: FileProjectStore,
}

impl AppState {
    pub async fn new(data_dir: PathBuf) -> th_core::Result<Self> {
        let projects_path = data_dir.join("projects.json");
        let project_store = FileProjectStore::new(projects_path).await?;

        Ok(Self {
            inner: Arc::new(AppStateInner { project_store }),
        })
    }

    pub fn project_store(&self) -> &FileProjectStore {
        &self.inner.project_store
    }
}
