//! Route handlers

pub mod health;
pub mod stats;
pub mod tasks;

use axum::{http::StatusCode, Json};
use serde::Serialize;
use th_core::Error;

/// Structured failure payload returned by every non-success outcome.
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

pub fn map_core_error(err: Error) -> RouteError {
    match err {
        Error::Unauthorized(message) => failure(StatusCode::UNAUTHORIZED, message),
        Error::Forbidden(message) => failure(StatusCode::FORBIDDEN, message),
        Error::NotFound(message) => failure(StatusCode::NOT_FOUND, message),
        Error::Validation(message) => failure(StatusCode::BAD_REQUEST, message),
        Error::Upstream(message) => failure(StatusCode::BAD_GATEWAY, message),
        other => failure(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}
