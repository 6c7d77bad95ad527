//! User route forwarding
//!
//! Registration is forwarded like everything else; the users service ignores
//! identity headers on that one path and dedupes on `externalId`.

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::Value;

use th_core::principal::Principal;

use crate::client::forward;
use crate::routes::RouteError;
use crate::state::AppState;

async fn create_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let url = format!("{}/api/users", state.config().users_service_url);
    forward(state.http(), Method::POST, url, &principal, Some(body)).await
}

async fn get_me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let url = format!("{}/api/users/me", state.config().users_service_url);
    forward(state.http(), Method::GET, url, &principal, None).await
}

async fn update_me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let url = format!("{}/api/users/me", state.config().users_service_url);
    forward(state.http(), Method::PATCH, url, &principal, Some(body)).await
}

async fn get_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let url = format!("{}/api/users/{}", state.config().users_service_url, id);
    forward(state.http(), Method::GET, url, &principal, None).await
}

async fn update_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let url = format!("{}/api/users/{}", state.config().users_service_url, id);
    forward(state.http(), Method::PATCH, url, &principal, Some(body)).await
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/me", get(get_me).patch(update_me))
        .route("/api/users/{id}", get(get_user).patch(update_user))
}
