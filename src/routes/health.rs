//! Health check endpoints
//!
//! - /health, /healthz - Liveness probe
//! - /version          - Build info for deployment verification
//!
//! Liveness returns 200 whenever the server is running; with an
//! in-memory store there is no external dependency to gate readiness on.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::server::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    healthy: bool,
    status: &'static str,
    version: &'static str,
    /// Seconds since startup
    uptime: u64,
    mode: &'static str,
    node_id: String,
    /// Open realtime connections
    connections: usize,
    accounts: usize,
    quests: usize,
    timestamp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VersionResponse {
    version: &'static str,
    commit: &'static str,
    commit_full: &'static str,
    built_at: &'static str,
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap()
}

/// GET /health, /healthz
pub fn health_check(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let stats = state.store.stats();
    json_response(
        StatusCode::OK,
        &HealthResponse {
            healthy: true,
            status: "online",
            version: env!("CARGO_PKG_VERSION"),
            uptime: state.started_at.elapsed().as_secs(),
            mode: if state.args.dev_mode {
                "development"
            } else {
                "production"
            },
            node_id: state.args.node_id.to_string(),
            connections: state.hub.connection_count(),
            accounts: stats.accounts,
            quests: stats.quests,
            timestamp: chrono::Utc::now().to_rfc3339(),
        },
    )
}

/// GET /version
pub fn version_info() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &VersionResponse {
            version: env!("CARGO_PKG_VERSION"),
            commit: env!("GIT_COMMIT_SHORT"),
            commit_full: env!("GIT_COMMIT_FULL"),
            built_at: env!("BUILD_TIMESTAMP"),
        },
    )
}
