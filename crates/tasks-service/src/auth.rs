//! Internal auth adapter
//!
//! Rebuilds the request principal from the identity headers stamped by the
//! gateway. The headers are trusted as-is: this service must only be
//! reachable from the gateway's network.

use axum::http::HeaderMap;
use axum::http::StatusCode;

use th_core::principal::{Principal, USER_EMAIL_HEADER, USER_ID_HEADER, USER_ROLE_HEADER};

use crate::routes::{failure, RouteError};

/// The sole authentication check inside this service: the user-id header
/// must be present. No signature or freshness verification happens here.
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
