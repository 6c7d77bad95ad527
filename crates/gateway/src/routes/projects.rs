//! Project route forwarding

use axum::{
    extract::{Path, RawQuery, State},
    http::{Method, StatusCode},
    routing::get,
    Extension, Json, Router,
};
use serde_json::Value;

use th_core::principal::Principal;

use crate::client::{forward, with_query};
use crate::routes::RouteError;
use crate::state::AppState;

async fn create_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let url = format!("{}/api/projects", state.config().projects_service_url);
    forward(state.http(), Method::POST, url, &principal, Some(body)).await
}

async fn list_projects(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    RawQuery(query): RawQuery,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let url = with_query(
        format!("{}/api/projects", state.config().projects_service_url),
        query,
    );
    forward(state.http(), Method::GET, url, &principal, None).await
}

async fn get_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let url = format!("{}/api/projects/{}", state.config().projects_service_url, id);
    forward(state.http(), Method::GET, url, &principal, None).await
}

async fn update_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let url = format!("{}/api/projects/{}", state.config().projects_service_url, id);
    forward(state.http(), Method::PATCH, url, &principal, Some(body)).await
}

async fn delete_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let url = format!("{}/api/projects/{}", state.config().projects_service_url, id);
    forward(state.http(), Method::DELETE, url, &principal, None).await
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/{id}",
            get(get_project).patch(update_project).delete(delete_project),
        )
}
