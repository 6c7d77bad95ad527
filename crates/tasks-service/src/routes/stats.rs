//! Admin-only task statistics

use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use th_core::task::{TaskRepository, TaskStats};

use crate::auth::{principal_from_headers, require_admin};
use crate::routes::{map_core_error, RouteError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: TaskStats,
    pub timestamp: String,
}

/// GET /api/tasks/stats - Service-wide task statistics
async fn task_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, RouteError> {
    let principal = principal_from_headers(&headers)?;
    require_admin(&principal)?;

    let stats = state.task_store().stats().await.map_err(map_core_error)?;

    Ok(Json(StatsResponse {
        success: true,
        stats,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/tasks/stats", get(task_stats))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use th_core::principal::{USER_EMAIL_HEADER, USER_ID_HEADER, USER_ROLE_HEADER};
    use th_core::task::{Task, TaskRepository, TaskStatus};

    use crate::state::AppState;

    async fn build_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let state = AppState::new(temp_dir.path().to_path_buf()).await.unwrap();
        (state, temp_dir)
    }

    fn stats_request(role: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri("/api/tasks/stats")
            .header(USER_ID_HEADER, "admin-1")
            .header(USER_EMAIL_HEADER, "admin@x.com")
            .header(USER_ROLE_HEADER, role)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn stats_require_admin_role() {
        let (state, _temp) = build_state().await;
        let response = super::router()
            .with_state(state)
            .oneshot(stats_request("user"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn stats_report_totals() {
        let (state, _temp) = build_state().await;
        state
            .task_store()
            .create(Task::new("A", "d", "u1"))
            .await
            .unwrap();
        state
            .task_store()
            .create(Task::new("B", "d", "u2").with_status(TaskStatus::Completed))
            .await
            .unwrap();

        let response = super::router()
            .with_state(state)
            .oneshot(stats_request("admin"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload["success"], true);
        assert_eq!(payload["stats"]["totalTasks"], 2);
        assert_eq!(payload["stats"]["tasksByStatus"]["completed"], 1);
        assert!(payload["timestamp"].is_string());
    }
}
