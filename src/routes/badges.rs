//! Badge routes
//!
//! - GET  /api/badges            - Badge catalog
//! - GET  /api/users/:id/badges  - Badges held by an account
//! - POST /api/badges/award      - Award a badge (admin)

use chrono::Utc;
use hyper::{Request, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::{ADMIN_ONLY, ANY_ROLE};
use crate::routes::guard;
use crate::routes::helpers::{self, BoxBody};
use crate::server::AppState;
use crate::store::models::{BadgeAward, NotificationEvent};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AwardRequest {
    user_id: String,
    badge_id: String,
}

/// GET /api/badges
pub async fn handle_catalog(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(resp) = guard::authorize(&state, &req, ANY_ROLE) {
        return resp;
    }

    helpers::success(&state.store.all_badges())
}

/// GET /api/users/:id/badges
pub async fn handle_user_badges(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    user_id: &str,
) -> Response<BoxBody> {
    if let Err(resp) = guard::authorize(&state, &req, ANY_ROLE) {
        return resp;
    }

    helpers::success(&state.store.badges_for(user_id))
}

/// POST /api/badges/award
pub async fn handle_award(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ADMIN_ONLY) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let body: AwardRequest = match helpers::parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return helpers::validation_error(format!("Invalid JSON body: {e}")),
    };

    if state.store.account(&body.user_id).is_none() {
        return helpers::not_found("USER_NOT_FOUND", "User not found");
    }
    let Some(badge) = state.store.badge(&body.badge_id) else {
        return helpers::not_found("BADGE_NOT_FOUND", "Badge not found");
    };

    let newly_awarded = state.store.award_badge(BadgeAward {
        id: format!("ub_{}", Uuid::new_v4()),
        user_id: body.user_id.clone(),
        badge_id: body.badge_id.clone(),
        awarded_at: Utc::now(),
    });

    if !newly_awarded {
        return helpers::error(
            StatusCode::CONFLICT,
            "BADGE_ALREADY_AWARDED",
            "User already holds this badge",
        );
    }

    state.store.push_notification(NotificationEvent::new(
        body.user_id.clone(),
        "badge_earned",
        "New Badge Earned!",
        format!("Congratulations! You earned the \"{}\" badge.", badge.name),
    ));

    info!(
        "{} awarded badge {} to {}",
        ctx.username, body.badge_id, body.user_id
    );

    helpers::success(&serde_json::json!({
        "message": "Badge awarded successfully",
    }))
}
