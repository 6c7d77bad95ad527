//! Route handlers

pub mod health;
pub mod projects;
pub mod stats;
pub mod tasks;
pub mod users;

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub success: bool,
    pub message: String,
}

pub type RouteError = (StatusCode, Json<FailureResponse>);

pub fn failure(status: StatusCode, message: impl Into<String>) -> RouteError {
    (
        status,
        Json(FailureResponse {
            success: false,
            message: message.into(),
        }),
    )
}
