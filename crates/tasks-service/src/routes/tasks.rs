//! Task API endpoints
//!
//! RESTful CRUD for tasks. Every operation is authorized against the request
//! principal: tasks are visible and mutable only to their owner.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use th_core::page::Page;
use th_core::task::{
    validate_description, validate_title, Task, TaskPriority, TaskQuery, TaskRepository,
    TaskStatus,
};

use crate::auth::principal_from_headers;
use crate::routes::{failure, map_core_error, RouteError};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

/// Patch semantics: omitted (or null) fields keep their previous values.
/// Optional fields cannot be cleared through this endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateTaskResponse {
    pub success: bool,
    pub message: String,
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/tasks - Create a task owned by the authenticated principal
async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<CreateTaskResponse>), RouteError> {
    let principal = principal_from_headers(&headers)?;

    validate_title(&req.title).map_err(map_core_error)?;
    validate_description(&req.description).map_err(map_core_error)?;

    let mut task = Task::new(req.title.trim(), req.description.trim(), &principal.id);
    if let Some(status) = req.status {
        task.status = status;
    }
    if let Some(priority) = req.priority {
        task.priority = priority;
    }
    task.due_date = req.due_date;
    task.project_id = req.project_id;
    task.assigned_to = req.assigned_to;

    let created = state
        .task_store()
        .create(task)
        .await
        .map_err(map_core_error)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTaskResponse {
            success: true,
            message: "Task created successfully".to_string(),
            task: created,
        }),
    ))
}

/// GET /api/tasks - List the principal's tasks, filtered at the query level
async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Page<Task>>, RouteError> {
    let principal = principal_from_headers(&headers)?;

    let page = state
        .task_store()
        .list_for_owner(&principal.id, &query)
        .await
        .map_err(map_core_error)?;

    Ok(Json(page))
}

/// GET /api/tasks/:id - Get a single task
async fn get_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, RouteError> {
    let principal = principal_from_headers(&headers)?;

    let task = state
        .task_store()
        .get(id)
        .await
        .map_err(map_core_error)?
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Task not found"))?;

    if !task.is_owned_by(&principal) {
        return Err(failure(
            StatusCode::FORBIDDEN,
            "You are not authorized to view this task",
        ));
    }

    Ok(Json(task))
}

/// PATCH /api/tasks/:id - Partially update a task
async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, RouteError> {
    let principal = principal_from_headers(&headers)?;

    let mut task = state
        .task_store()
        .get(id)
        .await
        .map_err(map_core_error)?
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Task not found"))?;

    if !task.is_owned_by(&principal) {
        return Err(failure(
            StatusCode::FORBIDDEN,
            "You are not authorized to update this task",
        ));
    }

    if let Some(title) = req.title {
        validate_title(&title).map_err(map_core_error)?;
        task.title = title.trim().to_string();
    }
    if let Some(description) = req.description {
        validate_description(&description).map_err(map_core_error)?;
        task.description = description.trim().to_string();
    }
    if let Some(status) = req.status {
        task.status = status;
    }
    if let Some(priority) = req.priority {
        task.priority = priority;
    }
    if let Some(due_date) = req.due_date {
        task.due_date = Some(due_date);
    }
    if let Some(project_id) = req.project_id {
        task.project_id = Some(project_id);
    }
    if let Some(assigned_to) = req.assigned_to {
        task.assigned_to = Some(assigned_to);
    }

    let updated = state
        .task_store()
        .update(task)
        .await
        .map_err(map_core_error)?;

    Ok(Json(updated))
}

/// DELETE /api/tasks/:id - Delete a task
async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteTaskResponse>, RouteError> {
    let principal = principal_from_headers(&headers)?;

    let task = state
        .task_store()
        .get(id)
        .await
        .map_err(map_core_error)?
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Task not found"))?;

    if !task.is_owned_by(&principal) {
        return Err(failure(
            StatusCode::FORBIDDEN,
            "You are not authorized to delete this task",
        ));
    }

    state
        .task_store()
        .delete(id)
        .await
        .map_err(map_core_error)?;

    Ok(Json(DeleteTaskResponse {
        success: true,
        message: "Task deleted successfully".to_string(),
    }))
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
}
