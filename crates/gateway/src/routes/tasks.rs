//! Task route forwarding

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

async fn create_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let url = format!("{}/api/tasks", state.config().tasks_service_url);
    forward(state.http(), Method::POST, url, &principal, Some(body)).await
}

async fn list_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    RawQuery(query): RawQuery,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let url = with_query(
        format!("{}/api/tasks", state.config().tasks_service_url),
        query,
    );
    forward(state.http(), Method::GET, url, &principal, None).await
}

async fn get_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let url = format!("{}/api/tasks/{}", state.config().tasks_service_url, id);
    forward(state.http(), Method::GET, url, &principal, None).await
}

async fn update_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let url = format!("{}/api/tasks/{}", state.config().tasks_service_url, id);
    forward(state.http(), Method::PATCH, url, &principal, Some(body)).await
}

async fn delete_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let url = format!("{}/api/tasks/{}", state.config().tasks_service_url, id);
    forward(state.http(), Method::DELETE, url, &principal, None).await
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        extract::RawQuery,
        http::{HeaderMap, Request, StatusCode},
        routing::{get, post},
        Extension, Json, Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use th_core::principal::{
        Principal, Role, USER_EMAIL_HEADER, USER_ID_HEADER, USER_ROLE_HEADER,
    };

    use crate::state::{AppState, GatewayConfig};

    fn principal() -> Principal {
        Principal {
            id: "sub-1".to_string(),
            email: "sub-1@x.com".to_string(),
            roles: vec![Role::User],
        }
    }

    async fn spawn_mock(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// A bound-then-dropped port: connecting to it is refused.
    async fn dead_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn app(tasks_service_url: String) -> Router {
        let state = AppState::new(GatewayConfig {
            users_service_url: "http://localhost:1".to_string(),
            tasks_service_url,
            projects_service_url: "http://localhost:1".to_string(),
            jwt_secret: "s".to_string(),
        })
        .unwrap();
        super::router()
            .layer(Extension(principal()))
            .with_state(state)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn relay_stamps_identity_headers_and_passes_status_through() {
        // The mock echoes the identity headers it received and answers 403,
        // so one round trip checks both header stamping and verbatim
        // status/body pass-through.
        let downstream = spawn_mock(Router::new().route(
            "/api/tasks/{id}",
            get(|headers: HeaderMap| async move {
                let header = |name: &str| {
                    headers
                        .get(name)
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("")
                        .to_string()
                };
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({
                        "success": false,
                        "message": "You are not authorized to view this task",
                        "seenUserId": header(USER_ID_HEADER),
                        "seenEmail": header(USER_EMAIL_HEADER),
                        "seenRole": header(USER_ROLE_HEADER),
                    })),
                )
            }),
        ))
        .await;

        let response = app(downstream)
            .oneshot(
                Request::builder()
                    .uri("/api/tasks/t-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let payload = json_body(response).await;
        assert_eq!(payload["success"], false);
        assert_eq!(payload["message"], "You are not authorized to view this task");
        assert_eq!(payload["seenUserId"], "sub-1");
        assert_eq!(payload["seenEmail"], "sub-1@x.com");
        assert_eq!(payload["seenRole"], "user");
    }

    #[tokio::test]
    async fn relay_passes_request_body_and_created_status_through() {
        let downstream = spawn_mock(Router::new().route(
            "/api/tasks",
            post(|Json(body): Json<Value>| async move {
                (
                    StatusCode::CREATED,
                    Json(json!({"success": true, "echoed": body})),
                )
            }),
        ))
        .await;

        let response = app(downstream)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/tasks")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"title": "Ship it", "description": "d"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let payload = json_body(response).await;
        assert_eq!(payload["echoed"]["title"], "Ship it");
        assert_eq!(payload["echoed"]["description"], "d");
    }

    #[tokio::test]
    async fn relay_passes_query_string_through() {
        let downstream = spawn_mock(Router::new().route(
            "/api/tasks",
            get(|RawQuery(query): RawQuery| async move {
                Json(json!({"seenQuery": query.unwrap_or_default()}))
            }),
        ))
        .await;

        let response = app(downstream)
            .oneshot(
                Request::builder()
                    .uri("/api/tasks?status=in-progress&search=report&page=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["seenQuery"], "status=in-progress&search=report&page=2");
    }

    #[tokio::test]
    async fn unreachable_service_maps_to_bad_gateway() {
        let response = app(dead_url().await)
            .oneshot(
                Request::builder()
                    .uri("/api/tasks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let payload = json_body(response).await;
        assert_eq!(payload["success"], false);
        assert_eq!(payload["message"], "Service unavailable");
    }
}
