//! Cross-service statistics aggregation
//!
//! Both endpoints fan out to the services concurrently and tolerate partial
//! failure: a leg that cannot be reached (or answers with an error status)
//! contributes zeros and is reported as offline, but never fails the
//! aggregate response.

use axum::{extract::State, http::StatusCode, routing::get, Extension, Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use th_core::principal::Principal;

use crate::client::fetch_json;
use crate::routes::{failure, RouteError};
use crate::state::AppState;

/// One leg of the service fan-out, as reported under `detailed`.
#[derive(Debug, Serialize)]
struct ServiceProbe {
    available: bool,
    data: Option<Value>,
    error: Option<String>,
}

impl ServiceProbe {
    fn from_result(result: Result<Value, String>) -> Self {
        match result {
            Ok(data) => Self {
                available: true,
                data: Some(data),
                error: None,
            },
            Err(error) => Self {
                available: false,
                data: None,
                error: Some(error),
            },
        }
    }

    fn status(&self) -> &'static str {
        if self.available {
            "online"
        } else {
            "offline"
        }
    }

    fn total(&self, key: &str) -> u64 {
        self.data
            .as_ref()
            .and_then(|data| data["stats"][key].as_u64())
            .unwrap_or(0)
    }
}

/// GET /api/stats/service - Admin overview across all three services
async fn service_stats(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, RouteError> {
    if !principal.is_admin() {
        return Err(failure(
            StatusCode::FORBIDDEN,
            "Access denied - admin privileges required",
        ));
    }

    let config = state.config();
    let users_url = format!("{}/api/users/stats", config.users_service_url);
    let tasks_url = format!("{}/api/tasks/stats", config.tasks_service_url);
    let projects_url = format!("{}/api/projects/stats", config.projects_service_url);
    let (users, tasks, projects) = tokio::join!(
        fetch_json(state.http(), &users_url, &principal),
        fetch_json(state.http(), &tasks_url, &principal),
        fetch_json(state.http(), &projects_url, &principal),
    );

    let users = ServiceProbe::from_result(users);
    let tasks = ServiceProbe::from_result(tasks);
    let projects = ServiceProbe::from_result(projects);

    let summary = json!({
        "totalUsers": users.total("totalUsers"),
        "totalTasks": tasks.total("totalTasks"),
        "totalProjects": projects.total("totalProjects"),
        "servicesStatus": {
            "usersService": users.status(),
            "tasksService": tasks.status(),
            "projectsService": projects.status(),
        },
    });

    Ok(Json(json!({
        "success": true,
        "summary": summary,
        "detailed": {
            "users": users,
            "tasks": tasks,
            "projects": projects,
        },
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

/// GET /api/stats/user - The caller's own activity across tasks and projects
async fn user_stats(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, RouteError> {
    let config = state.config();
    let tasks_url = format!("{}/api/tasks?limit=100", config.tasks_service_url);
    let projects_url = format!("{}/api/projects?limit=100", config.projects_service_url);
    let (tasks, projects) = tokio::join!(
        fetch_json(state.http(), &tasks_url, &principal),
        fetch_json(state.http(), &projects_url, &principal),
    );

    let mut total_tasks = 0u64;
    let mut completed_tasks = 0u64;
    let mut pending_tasks = 0u64;
    let mut in_progress_tasks = 0u64;
    let mut low = 0u64;
    let mut medium = 0u64;
    let mut high = 0u64;

    if let Ok(payload) = &tasks {
        total_tasks = payload["totalItems"].as_u64().unwrap_or(0);
        if let Some(items) = payload["items"].as_array() {
            for task in items {
                match task["status"].as_str() {
                    Some("completed") => completed_tasks += 1,
                    Some("pending") => pending_tasks += 1,
                    Some("in-progress") => in_progress_tasks += 1,
                    _ => {}
                }
                match task["priority"].as_str() {
                    Some("low") => low += 1,
                    Some("medium") => medium += 1,
                    Some("high") => high += 1,
                    _ => {}
                }
            }
        }
    }

    let total_projects = projects
        .ok()
        .and_then(|payload| payload["totalItems"].as_u64())
        .unwrap_or(0);

    Ok(Json(json!({
        "success": true,
        "userStats": {
            "totalTasks": total_tasks,
            "completedTasks": completed_tasks,
            "pendingTasks": pending_tasks,
            "inProgressTasks": in_progress_tasks,
            "totalProjects": total_projects,
            "tasksByPriority": { "low": low, "medium": medium, "high": high },
        },
        "userId": principal.id,
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stats/service", get(service_stats))
        .route("/api/stats/user", get(user_stats))
}
