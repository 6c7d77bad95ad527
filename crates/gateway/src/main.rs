//! API gateway for TaskHub
//!
//! The single public entry point. Verifies bearer tokens, rewrites the
//! verified claims into the internal identity headers, and forwards to the
//! users, tasks and projects services. Also hosts the cross-service
//! statistics aggregation.

mod auth;
mod client;
mod routes;
mod state;

use std::net::SocketAddr;

use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::state::{AppState, GatewayConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env();
    tracing::info!(
        "Forwarding to users={} tasks={} projects={}",
        config.users_service_url,
        config.tasks_service_url,
        config.projects_service_url
    );

    let app_state = AppState::new(config).expect("Failed to initialize application state");

    let protected = Router::new()
        .merge(routes::users::router())
        .merge(routes::tasks::router())
        .merge(routes::projects::router())
        .merge(routes::stats::router())
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::require_auth,
        ));

    let app = Router::new()
        .merge(routes::health::router())
        .merge(protected)
        .with_state(app_state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = std::env::var("TH_GATEWAY_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()
        .expect("Invalid TH_GATEWAY_ADDR");

    tracing::info!("API gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
