//! Report routes
//!
//! - GET  /api/reports[?type=]    - List reports
//! - POST /api/reports/generate   - Kick off asynchronous generation
//!
//! Generation returns a job id immediately; the finished record lands in
//! the store after a simulated delay and shows up in subsequent listings.

use chrono::Utc;
use hyper::{Request, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::auth::SUPERVISION;
use crate::routes::guard;
use crate::routes::helpers::{self, BoxBody};
use crate::server::AppState;
use crate::store::models::Report;

/// Simulated generation time
const GENERATION_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(rename = "type")]
    kind: String,
    format: String,
    /// Accepted and currently unused; kept for client compatibility
    #[serde(default)]
    #[allow(dead_code)]
    filters: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    job_id: String,
    download_link: String,
    status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListMeta {
    total: usize,
}

/// GET /api/reports
pub async fn handle_list(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(resp) = guard::authorize(&state, &req, SUPERVISION) {
        return resp;
    }

    let kind = helpers::query_param(req.uri().query(), "type").map(str::to_string);
    let reports = state.store.reports_filtered(kind.as_deref());
    let total = reports.len();

    helpers::success_with_meta(&reports, &ListMeta { total })
}

/// POST /api/reports/generate
pub async fn handle_generate(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, SUPERVISION) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let body: GenerateRequest = match helpers::parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return helpers::validation_error(format!("Invalid JSON body: {e}")),
    };

    if body.kind.trim().is_empty() || body.format.trim().is_empty() {
        return helpers::validation_error("Missing required fields: type, format");
    }

    let job_id = format!("job_{}", Uuid::new_v4());
    let download_link = format!("/api/reports/download/{job_id}");

    info!("{} requested {} report ({})", ctx.username, body.kind, body.format);

    // Simulate generation: the record appears once the delay elapses.
    {
        let store = Arc::clone(&state.store);
        let job_id = job_id.clone();
        let download_link = download_link.clone();
        tokio::spawn(async move {
            tokio::time::sleep(GENERATION_DELAY).await;
            let now = Utc::now();
            store.push_report(Report {
                id: job_id,
                name: format!("{} Report - {}", body.kind, now.format("%Y-%m-%d")),
                kind: body.kind,
                format: body.format,
                last_updated: now,
                size: "2.4 MB".into(),
                download_link,
            });
        });
    }

    helpers::success(&GenerateResponse {
        job_id,
        download_link,
        status: "generating",
    })
}
