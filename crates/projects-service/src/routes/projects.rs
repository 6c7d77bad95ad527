//! Project API endpoints
//!
//! CRUD for projects. Reads are shared with member emails; edits and deletes
//! stay with the owner. The admin role does not bypass ownership here.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use th_core::page::Page;
use th_core::project::{
    validate_description, validate_name, Project, ProjectQuery, ProjectRepository,
};

use crate::auth::principal_from_headers;
use crate::routes::{failure, map_core_error, RouteError};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub members: Option<Vec<String>>,
}

/// Patch semantics: omitted (or null) fields keep their previous values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub members: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ProjectEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub project: Project,
}

#[derive(Debug, Serialize)]
pub struct DeleteProjectResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/projects - Create a project owned by the authenticated principal
async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectEnvelope>), RouteError> {
    let principal = principal_from_headers(&headers)?;

    validate_name(&req.name).map_err(map_core_error)?;
    validate_description(&req.description).map_err(map_core_error)?;

    let mut project = Project::new(req.name.trim(), req.description.trim(), &principal.id);
    if let Some(members) = req.members {
        project.members = members;
    }

    let created = state
        .project_store()
        .create(project)
        .await
        .map_err(map_core_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectEnvelope {
            success: true,
            message: Some("Project created successfully".to_string()),
            project: created,
        }),
    ))
}

/// GET /api/projects - List projects visible to the principal
async fn list_projects(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<Page<Project>>, RouteError> {
    let principal = principal_from_headers(&headers)?;

    let page = state
        .project_store()
        .list_visible(&principal.id, &principal.email, &query)
        .await
        .map_err(map_core_error)?;

    Ok(Json(page))
}

/// GET /api/projects/:id - Get a single project (owner or member)
async fn get_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectEnvelope>, RouteError> {
    let principal = principal_from_headers(&headers)?;

    let project = state
        .project_store()
        .get(id)
        .await
        .map_err(map_core_error)?
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Project not found"))?;

    if !project.can_view(&principal) {
        return Err(failure(
            StatusCode::FORBIDDEN,
            "You are not authorized to view this project",
        ));
    }

    Ok(Json(ProjectEnvelope {
        success: true,
        message: None,
        project,
    }))
}

/// PATCH /api/projects/:id - Partially update a project (owner only)
async fn update_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectEnvelope>, RouteError> {
    let principal = principal_from_headers(&headers)?;

    let mut project = state
        .project_store()
        .get(id)
        .await
        .map_err(map_core_error)?
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Project not found"))?;

    if !project.can_modify(&principal) {
        return Err(failure(
            StatusCode::FORBIDDEN,
            "You are not authorized to update this project",
        ));
    }

    if let Some(name) = req.name {
        validate_name(&name).map_err(map_core_error)?;
        project.name = name.trim().to_string();
    }
    if let Some(description) = req.description {
        validate_description(&description).map_err(map_core_error)?;
        project.description = description.trim().to_string();
    }
    if let Some(members) = req.members {
        project.members = members;
    }

    let updated = state
        .project_store()
        .update(project)
        .await
        .map_err(map_core_error)?;

    Ok(Json(ProjectEnvelope {
        success: true,
        message: Some("Project updated successfully".to_string()),
        project: updated,
    }))
}

/// DELETE /api/projects/:id - Delete a project (owner only)
async fn delete_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteProjectResponse>, RouteError> {
    let principal = principal_from_headers(&headers)?;

    let project = state
        .project_store()
        .get(id)
        .await
        .map_err(map_core_error)?
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Project not found"))?;

    if !project.can_modify(&principal) {
        return Err(failure(
            StatusCode::FORBIDDEN,
            "You are not authorized to delete this project",
        ));
    }

    state
        .project_store()
        .delete(id)
        .await
        .map_err(map_core_error)?;

    Ok(Json(DeleteProjectResponse {
        success: true,
        message: "Project deleted successfully".to_string(),
    }))
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/{id}",
            get(get_project).patch(update_project).delete(delete_project),
        )
}
