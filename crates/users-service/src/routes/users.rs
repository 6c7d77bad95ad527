//! User profile endpoints
//!
//! Profile creation is called by the gateway right after token verification,
//! so it carries no identity headers and is idempotent on `externalId`.
//! Everything else requires the stamped identity.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use th_core::user::{validate_name_field, User, UserRepository};

use crate::auth::principal_from_headers;
use crate::routes::{failure, map_core_error, RouteError};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub external_id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Patch semantics: omitted (or null) fields keep their previous values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: User,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/users - Register a profile, idempotent on externalId
async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>), RouteError> {
    if req.external_id.trim().is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "externalId is required"));
    }
    if req.email.trim().is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "email is required"));
    }
    if let Some(first_name) = &req.first_name {
        validate_name_field("First name", first_name).map_err(map_core_error)?;
    }
    if let Some(last_name) = &req.last_name {
        validate_name_field("Last name", last_name).map_err(map_core_error)?;
    }

    let mut user = User::new(req.external_id.trim(), req.email.trim());
    user.first_name = req.first_name;
    user.last_name = req.last_name;

    let (user, created) = state
        .user_store()
        .ensure(user)
        .await
        .map_err(map_core_error)?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let message = if created {
        "User created successfully"
    } else {
        "User already exists"
    };

    Ok((
        status,
        Json(UserEnvelope {
            success: true,
            message: Some(message.to_string()),
            user,
        }),
    ))
}

/// GET /api/users/me - The caller's own profile
async fn get_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserEnvelope>, RouteError> {
    let principal = principal_from_headers(&headers)?;

    let user = state
        .user_store()
        .find_by_external_id(&principal.id)
        .await
        .map_err(map_core_error)?
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "User not found"))?;

    Ok(Json(UserEnvelope {
        success: true,
        message: None,
        user,
    }))
}

/// PATCH /api/users/me - Update the caller's own profile
async fn update_me(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserEnvelope>, RouteError> {
    let principal = principal_from_headers(&headers)?;

    let user = state
        .user_store()
        .find_by_external_id(&principal.id)
        .await
        .map_err(map_core_error)?
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "User not found"))?;

    let updated = apply_update(&state, user, req).await?;

    Ok(Json(UserEnvelope {
        success: true,
        message: Some("User updated successfully".to_string()),
        user: updated,
    }))
}

/// GET /api/users/:id - Any authenticated caller may read any profile
async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<UserEnvelope>, RouteError> {
    principal_from_headers(&headers)?;

    let user = state
        .user_store()
        .get(id)
        .await
        .map_err(map_core_error)?
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "User not found"))?;

    Ok(Json(UserEnvelope {
        success: true,
        message: None,
        user,
    }))
}

/// PATCH /api/users/:id - Update a profile (self or admin)
async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserEnvelope>, RouteError> {
    let principal = principal_from_headers(&headers)?;

    let user = state
        .user_store()
        .get(id)
        .await
        .map_err(map_core_error)?
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "User not found"))?;

    if !user.can_be_updated_by(&principal) {
        return Err(failure(
            StatusCode::FORBIDDEN,
            "Forbidden - you can only update your own profile",
        ));
    }

    let updated = apply_update(&state, user, req).await?;

    Ok(Json(UserEnvelope {
        success: true,
        message: Some("User updated successfully".to_string()),
        user: updated,
    }))
}

async fn apply_update(
    state: &AppState,
    mut user: User,
    req: UpdateUserRequest,
) -> Result<User, RouteError> {
    if let Some(first_name) = req.first_name {
        validate_name_field("First name", &first_name).map_err(map_core_error)?;
        user.first_name = Some(first_name.trim().to_string());
    }
    if let Some(last_name) = req.last_name {
        validate_name_field("Last name", &last_name).map_err(map_core_error)?;
        user.last_name = Some(last_name.trim().to_string());
    }
    if let Some(avatar_url) = req.avatar_url {
        user.avatar_url = Some(avatar_url);
    }

    state.user_store().update(user).await.map_err(map_core_error)
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/me", get(get_me).patch(update_me))
        .route("/api/users/{id}", get(get_user).patch(update_user))
}
