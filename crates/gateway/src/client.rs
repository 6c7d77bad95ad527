//! Downstream HTTP plumbing
//!
//! Identity travels on three plain headers; downstream status codes and JSON
//! bodies are relayed verbatim. Only a transport failure becomes a gateway
//! error (502) - an HTTP error status from a service is passed through.

use axum::http::{Method, StatusCode};
use axum::Json;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

use th_core::principal::{Principal, USER_EMAIL_HEADER, USER_ID_HEADER, USER_ROLE_HEADER};

use crate::routes::{failure, RouteError};

pub fn identity_headers(principal: &Principal) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&principal.id) {
        headers.insert(USER_ID_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&principal.email) {
        headers.insert(USER_EMAIL_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&principal.roles_header_value()) {
        headers.insert(USER_ROLE_HEADER, value);
    }
    headers
}

pub fn with_query(url: String, query: Option<String>) -> String {
    match query {
        Some(query) if !query.is_empty() => format!("{}?{}", url, query),
        _ => url,
    }
}

/// Relay one request to a service and hand its response back unchanged.
pub async fn forward(
    http: &reqwest::Client,
    method: Method,
    url: String,
    principal: &Principal,
    body: Option<Value>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let mut request = http
        .request(method, &url)
        .headers(identity_headers(principal));
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await.map_err(|err| {
        tracing::error!("Request to {} failed: {}", url, err);
        failure(StatusCode::BAD_GATEWAY, "Service unavailable")
    })?;

    let status = response.status();
    let payload = response.json::<Value>().await.unwrap_or(Value::Null);
    Ok((status, Json(payload)))
}

/// GET a JSON document from a service, treating any HTTP error status as a
/// failure too. Used by the aggregation endpoints, where a failed leg is
/// converted to data instead of failing the response.
pub async fn fetch_json(
    http: &reqwest::Client,
    url: &str,
    principal: &Principal,
) -> Result<Value, String> {
    let response = http
        .get(url)
        .headers(identity_headers(principal))
        .send()
        .await
        .map_err(|err| err.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("Request failed with status code {}", status.as_u16()));
    }

    response.json::<Value>().await.map_err(|err| err.to_string())
}
