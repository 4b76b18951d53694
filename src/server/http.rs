//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling; every request is
//! routed through a single `match (Method, path)` table.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::auth::JwtValidator;
use crate::config::Args;
use crate::realtime::{self, EventHub};
use crate::routes::{self, helpers};
use crate::store::{seed, DomainStore};
use crate::types::HelixError;

type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// The in-memory domain store, seeded at startup
    pub store: Arc<DomainStore>,
    /// Realtime notification hub
    pub hub: Arc<EventHub>,
    /// Token issuance/verification service
    pub jwt: JwtValidator,
    pub started_at: Instant,
}

impl AppState {
    /// Create application state with a freshly seeded store.
    pub fn new(args: Args) -> Result<Self, HelixError> {
        let store = Arc::new(DomainStore::new());
        store.apply_seed(seed::seed_data()?);

        let hub = Arc::new(EventHub::new(args.heartbeat_interval_secs));
        let jwt = JwtValidator::new(args.effective_jwt_secret(), args.jwt_expiry_seconds);

        Ok(Self {
            args,
            store,
            hub,
            jwt,
            started_at: Instant::now(),
        })
    }
}

/// Run the server until the process exits.
pub async fn run(state: Arc<AppState>) -> Result<(), HelixError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Helix listening on {} as node {}",
        state.args.listen, state.args.node_id
    );

    if state.args.dev_mode {
        warn!("Development mode enabled - dev routes exposed, fallback JWT secret permitted");
    }

    let stats = state.store.stats();
    info!(
        "Store seeded: {} accounts, {} quests, {} notifications",
        stats.accounts, stats.quests, stats.notifications
    );

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .with_upgrades()
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("{} {}", method, path);

    // Auth routes own their own sub-router
    if path.starts_with("/api/auth") {
        if let Some(response) = routes::handle_auth_request(req, Arc::clone(&state)).await {
            return Ok(response);
        }
        return Ok(not_found_response(&path));
    }

    let response = match (method, path.as_str()) {
        // Liveness probe
        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            to_boxed(routes::health_check(Arc::clone(&state)))
        }

        // Version info for deployment verification
        (Method::GET, "/version") => to_boxed(routes::version_info()),

        // Realtime notification feed
        (Method::GET, "/ws") => {
            to_boxed(realtime::handle_events_ws(Arc::clone(&state), req).await)
        }

        (Method::OPTIONS, _) => helpers::cors_preflight(),

        // ---- Accounts ----
        (Method::GET, "/api/users/me") => routes::users::handle_me(req, state).await,
        (Method::PUT, "/api/users/me/privacy") => {
            routes::users::handle_update_privacy(req, state).await
        }
        (Method::GET, p) if path_param(p, "/api/users/", "/badges").is_some() => {
            let id = path_param(p, "/api/users/", "/badges").unwrap_or_default().to_string();
            routes::badges::handle_user_badges(req, state, &id).await
        }
        (Method::GET, p) if path_param(p, "/api/users/", "").is_some() => {
            let id = path_param(p, "/api/users/", "").unwrap_or_default().to_string();
            routes::users::handle_user_by_id(req, state, &id).await
        }

        // ---- Talent DNA ----
        (Method::GET, "/api/talent-dna/associate") => {
            routes::talent::handle_associate_dna(req, state).await
        }
        (Method::GET, "/api/talent-dna/team") => {
            routes::talent::handle_team_dna(req, state).await
        }
        (Method::POST, p) if path_param(p, "/api/talent-dna/segment/", "/claim").is_some() => {
            let id = path_param(p, "/api/talent-dna/segment/", "/claim")
                .unwrap_or_default()
                .to_string();
            routes::talent::handle_claim_segment(req, state, &id).await
        }

        // ---- Quests ----
        (Method::GET, "/api/quests") => routes::quests::handle_list(req, state).await,
        (Method::POST, p) if path_param(p, "/api/quests/", "/enroll").is_some() => {
            let id = path_param(p, "/api/quests/", "/enroll").unwrap_or_default().to_string();
            routes::quests::handle_enroll(req, state, &id).await
        }
        (Method::POST, p) if path_param(p, "/api/quests/", "/progress").is_some() => {
            let id = path_param(p, "/api/quests/", "/progress").unwrap_or_default().to_string();
            routes::quests::handle_progress(req, state, &id).await
        }
        (Method::POST, p) if path_param(p, "/api/quests/", "/complete").is_some() => {
            let id = path_param(p, "/api/quests/", "/complete").unwrap_or_default().to_string();
            routes::quests::handle_complete(req, state, &id).await
        }
        (Method::POST, p) if path_param(p, "/api/quests/", "/invite").is_some() => {
            let id = path_param(p, "/api/quests/", "/invite").unwrap_or_default().to_string();
            routes::quests::handle_invite(req, state, &id).await
        }
        (Method::GET, p) if path_param(p, "/api/quests/", "").is_some() => {
            let id = path_param(p, "/api/quests/", "").unwrap_or_default().to_string();
            routes::quests::handle_get(req, state, &id).await
        }

        // ---- Mystery boxes ----
        (Method::GET, "/api/mystery-boxes") => routes::boxes::handle_list(req, state).await,
        (Method::POST, p) if path_param(p, "/api/mystery-boxes/", "/open").is_some() => {
            let id = path_param(p, "/api/mystery-boxes/", "/open")
                .unwrap_or_default()
                .to_string();
            routes::boxes::handle_open(req, state, &id).await
        }

        // ---- Wellness ----
        (Method::GET, "/api/pulse/latest") => {
            routes::wellness::handle_pulse_latest(req, state).await
        }
        (Method::POST, "/api/pulse/submit") => {
            routes::wellness::handle_pulse_submit(req, state).await
        }
        (Method::GET, "/api/journals") => {
            routes::wellness::handle_journals_list(req, state).await
        }
        (Method::POST, "/api/journals") => {
            routes::wellness::handle_journal_create(req, state).await
        }

        // ---- Badges ----
        (Method::GET, "/api/badges") => routes::badges::handle_catalog(req, state).await,
        (Method::POST, "/api/badges/award") => routes::badges::handle_award(req, state).await,

        // ---- Leaderboard / social ----
        (Method::GET, "/api/leaderboard") => {
            routes::leaderboard::handle_leaderboard(req, state).await
        }
        (Method::GET, "/api/leaderboard/history") => {
            routes::leaderboard::handle_history(req, state).await
        }
        (Method::POST, "/api/social/share") => routes::social::handle_share(req, state).await,

        // ---- Notifications ----
        (Method::GET, "/api/notifications") => {
            routes::notifications::handle_list(req, state).await
        }
        (Method::POST, "/api/notifications/mark-read") => {
            routes::notifications::handle_mark_read(req, state).await
        }

        // ---- Supervisor analytics ----
        (Method::GET, "/api/supervisor/engagement") => {
            routes::supervisor::handle_engagement(req, state).await
        }
        (Method::GET, "/api/supervisor/skill-gaps") => {
            routes::supervisor::handle_skill_gaps(req, state).await
        }
        (Method::GET, "/api/supervisor/training-uptake") => {
            routes::supervisor::handle_training_uptake(req, state).await
        }
        (Method::GET, "/api/supervisor/alerts") => {
            routes::supervisor::handle_alerts(req, state).await
        }
        (Method::POST, "/api/supervisor/intervention") => {
            routes::supervisor::handle_intervention(req, state).await
        }

        // ---- Reports ----
        (Method::GET, "/api/reports") => routes::reports::handle_list(req, state).await,
        (Method::POST, "/api/reports/generate") => {
            routes::reports::handle_generate(req, state).await
        }

        // ---- Dev routes ----
        (Method::POST, "/api/dev/seed") => routes::dev::handle_seed(req, state).await,
        (Method::GET, p) if path_param(p, "/api/dev/mock/", "").is_some() => {
            let resource = path_param(p, "/api/dev/mock/", "").unwrap_or_default().to_string();
            routes::dev::handle_mock_dump(req, state, &resource).await
        }

        _ => not_found_response(&path),
    };

    Ok(response)
}

/// Extract a single path parameter between a fixed prefix and suffix.
/// Rejects empty captures and captures spanning further segments.
fn path_param<'a>(path: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    let param = rest.strip_suffix(suffix)?;
    if param.is_empty() || param.contains('/') {
        None
    } else {
        Some(param)
    }
}

fn not_found_response(path: &str) -> Response<BoxBody> {
    helpers::error(
        StatusCode::NOT_FOUND,
        "NOT_FOUND",
        format!("No route for {path}"),
    )
}

fn to_boxed(resp: Response<Full<Bytes>>) -> Response<BoxBody> {
    resp.map(|body| body.map_err(|never| match never {}).boxed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_param_simple() {
        assert_eq!(path_param("/api/quests/q1", "/api/quests/", ""), Some("q1"));
        assert_eq!(path_param("/api/quests/", "/api/quests/", ""), None);
    }

    #[test]
    fn test_path_param_with_suffix() {
        assert_eq!(
            path_param("/api/quests/q1/enroll", "/api/quests/", "/enroll"),
            Some("q1")
        );
        assert_eq!(path_param("/api/quests//enroll", "/api/quests/", "/enroll"), None);
    }

    #[test]
    fn test_path_param_rejects_nested_segments() {
        assert_eq!(path_param("/api/quests/q1/enroll", "/api/quests/", ""), None);
        assert_eq!(
            path_param("/api/users/u1/badges", "/api/users/", ""),
            None
        );
    }
}
