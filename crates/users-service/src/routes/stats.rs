//! Admin-only user statistics

use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use th_core::user::{UserRepository, UserStats};

use crate::auth::{principal_from_headers, require_admin};
use crate::routes::{map_core_error, RouteError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: UserStats,
    pub timestamp: String,
}

/// GET /api/users/stats - Service-wide user statistics
async fn user_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, RouteError> {
    let principal = principal_from_headers(&headers)?;
    require_admin(&principal)?;

    let stats = state.user_store().stats().await.map_err(map_core_error)?;

    Ok(Json(StatsResponse {
        success: true,
        stats,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/users/stats", get(user_stats))
}
