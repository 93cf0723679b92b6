use axum::{extract::State, response::Response, routing::get, Router};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    arguments::is_debug_webserver_enabled,
    logger::{self, LogTag},
    webserver::{state::AppState, utils::success_response},
};

/// Simple health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

/// System status response
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub uptime_seconds: u64,
    pub connected_count: usize,
    pub connected_users: Vec<String>,
}

/// Create status routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(system_status))
}

/// GET /api/health
async fn health_check() -> Response {
    if is_debug_webserver_enabled() {
        logger::debug(LogTag::Webserver, "Health check endpoint called");
    }

    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    success_response(response)
}

/// GET /api/status
async fn system_status(State(state): State<Arc<AppState>>) -> Response {
    let connected_users = state.registry.identities().await;

    if is_debug_webserver_enabled() {
        logger::debug(
            LogTag::Webserver,
            &format!(
                "Status snapshot ready (uptime={}s, connected={})",
                state.uptime_seconds(),
                connected_users.len()
            ),
        );
    }

    let response = StatusResponse {
        uptime_seconds: state.uptime_seconds(),
        connected_count: connected_users.len(),
        connected_users,
    };

    success_response(response)
}
