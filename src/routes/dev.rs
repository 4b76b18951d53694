//! Development-only routes
//!
//! - POST /api/dev/seed           - Reset the store to the demo dataset
//! - GET  /api/dev/mock/:resource - Raw dump of one collection
//!
//! Both are refused outside development mode.

use hyper::{Request, Response, StatusCode};
use std::sync::Arc;
use tracing::{info, warn};

use crate::routes::helpers::{self, BoxBody};
use crate::server::AppState;
use crate::store::seed;

fn dev_only_guard(state: &AppState) -> Option<Response<BoxBody>> {
    if state.args.dev_mode {
        None
    } else {
        Some(helpers::error(
            StatusCode::FORBIDDEN,
            "DEV_DISABLED",
            "Not available in production",
        ))
    }
}

/// POST /api/dev/seed
pub async fn handle_seed(
    _req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Some(resp) = dev_only_guard(&state) {
        return resp;
    }

    match seed::seed_data() {
        Ok(data) => {
            state.store.apply_seed(data);
            let stats = state.store.stats();
            info!(
                "Store reseeded: {} accounts, {} quests",
                stats.accounts, stats.quests
            );
            helpers::success(&serde_json::json!({
                "message": "Database seeded successfully",
            }))
        }
        Err(e) => {
            warn!("Reseed failed: {}", e);
            helpers::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "SEED_ERROR",
                "Failed to rebuild seed data",
            )
        }
    }
}

/// GET /api/dev/mock/:resource
pub async fn handle_mock_dump(
    _req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    resource: &str,
) -> Response<BoxBody> {
    if let Some(resp) = dev_only_guard(&state) {
        return resp;
    }

    match state.store.dump_collection(resource) {
        Some(value) => helpers::success(&value),
        None => helpers::not_found("RESOURCE_NOT_FOUND", "Resource not found"),
    }
}
