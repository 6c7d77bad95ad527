//! Internal auth adapter
//!
//! Identity arrives as the three headers the gateway stamps on every
//! forwarded request; they are trusted without re-verification. Only the
//! gateway may reach this service on the network.

use axum::http::{HeaderMap, StatusCode};

use th_core::principal::{Principal, USER_EMAIL_HEADER, USER_ID_HEADER, USER_ROLE_HEADER};

use crate::routes::{failure, RouteError};

pub fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, RouteError> {
    let value = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());

    Principal::from_header_values(
        value(USER_ID_HEADER),
        value(USER_EMAIL_HEADER),
        value(USER_ROLE_HEADER),
    )
    .map_err(|_| failure(StatusCode::UNAUTHORIZED, "Unauthorized - User ID missing"))
}

pub fn require_admin(principal: &Principal) -> Result<(), RouteError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(failure(
            StatusCode::FORBIDDEN,
            "Access denied - admin privileges required",
        ))
    }
}
