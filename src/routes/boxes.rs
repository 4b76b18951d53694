//! Mystery box routes
//!
//! - GET  /api/mystery-boxes          - List boxes
//! - POST /api/mystery-boxes/:id/open - Open a box for a random reward
//!
//! Reward selection is uniform over the fixed reward table with no
//! seeding or reproducibility guarantee. Drawn rewards are applied:
//! XP is credited immediately, badges are awarded unless already held.

use chrono::Utc;
use hyper::{Request, Response, StatusCode};
use rand::seq::SliceRandom;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::ASSOCIATE_ONLY;
use crate::routes::guard;
use crate::routes::helpers::{self, BoxBody};
use crate::server::AppState;
use crate::store::models::{reward_table, BadgeAward, BoxReward, NotificationEvent};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OpenResponse {
    rewards: Vec<BoxReward>,
}

/// GET /api/mystery-boxes
pub async fn handle_list(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(resp) = guard::authorize(&state, &req, ASSOCIATE_ONLY) {
        return resp;
    }

    helpers::success(&state.store.mystery_boxes())
}

/// POST /api/mystery-boxes/:id/open
pub async fn handle_open(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    box_id: &str,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ASSOCIATE_ONLY) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let Some(mystery_box) = state.store.mystery_box(box_id) else {
        return helpers::not_found("BOX_NOT_FOUND", "Mystery box not found");
    };

    if !mystery_box.available {
        return helpers::error(
            StatusCode::CONFLICT,
            "BOX_UNAVAILABLE",
            format!("Box unlocks via {}", mystery_box.unlock_criteria),
        );
    }

    let table = reward_table();
    let reward = {
        let mut rng = rand::thread_rng();
        table.choose(&mut rng).cloned()
    };
    let Some(reward) = reward else {
        // Empty reward table would be a seed defect
        return helpers::error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "REWARD_ERROR",
            "No rewards configured",
        );
    };

    match &reward {
        BoxReward::Xp { amount } => {
            state.store.grant_xp(&ctx.account_id, *amount);
            info!("{} opened {} (+{} XP)", ctx.username, mystery_box.id, amount);
        }
        BoxReward::Badge { id, name } => {
            let newly_awarded = state.store.award_badge(BadgeAward {
                id: format!("ub_{}", Uuid::new_v4()),
                user_id: ctx.account_id.clone(),
                badge_id: id.clone(),
                awarded_at: Utc::now(),
            });
            if newly_awarded {
                state.store.push_notification(NotificationEvent::new(
                    ctx.account_id.clone(),
                    "badge_earned",
                    "New Badge Earned!",
                    format!("Congratulations! You earned the \"{name}\" badge."),
                ));
            }
            info!(
                "{} opened {} (badge {}, new: {})",
                ctx.username, mystery_box.id, id, newly_awarded
            );
        }
    }

    helpers::success(&OpenResponse {
        rewards: vec![reward],
    })
}
