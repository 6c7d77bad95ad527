//! Application state and configuration

use std::sync::Arc;
use std::time::Duration;

use th_core::Error;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Gateway configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub users_service_url: String,
    pub tasks_service_url: String,
    pub projects_service_url: String,
    pub jwt_secret: String,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            users_service_url: env_or("TH_USERS_SERVICE_URL", "http://localhost:7001"),
            tasks_service_url: env_or("TH_TASKS_SERVICE_URL", "http://localhost:7002"),
            projects_service_url: env_or("TH_PROJECTS_SERVICE_URL", "http://localhost:7003"),
            jwt_secret: env_or("TH_GATEWAY_JWT_SECRET", "taskhub-dev-secret"),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> th_core::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|err| Error::Upstream(err.to_string()))?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, http }),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }
}
