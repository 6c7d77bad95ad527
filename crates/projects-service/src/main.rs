//! Projects service for TaskHub
//!
//! Internal CRUD service for projects. Reachable only from the gateway, which
//! stamps the identity headers this service trusts.

mod auth;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "projects_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = std::env::var("TH_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".th-data"));

    tracing::info!("Using data directory: {:?}", data_dir);

    let app_state = AppState::new(data_dir)
        .await
        .expect("Failed to initialize application state");

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::stats::router())
        .merge(routes::projects::router())
        .with_state(app_state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = std::env::var("TH_PROJECTS_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:7003".to_string())
        .parse()
        .expect("Invalid TH_PROJECTS_ADDR");

    tracing::info!("Projects service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
