//! Quest routes
//!
//! - GET  /api/quests[?status=]      - List quests
//! - GET  /api/quests/:id            - Fetch one quest
//! - POST /api/quests/:id/enroll     - Enroll the caller (idempotent)
//! - POST /api/quests/:id/progress   - Apply a progress delta (clamped)
//! - POST /api/quests/:id/complete   - Complete and collect the reward
//! - POST /api/quests/:id/invite     - Invite teammates via notifications

use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::auth::{ANY_ROLE, ASSOCIATE_ONLY};
use crate::realtime::PushEvent;
use crate::routes::guard;
use crate::routes::helpers::{self, BoxBody};
use crate::server::AppState;
use crate::store::models::{NotificationEvent, QuestStatus};
use crate::store::{QuestCompletion, QuestProgress};

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressRequest {
    /// Step the client attributes the progress to; informational only
    #[serde(default)]
    #[allow(dead_code)]
    step_id: Option<String>,
    #[serde(default = "default_progress_delta")]
    progress_delta: u32,
}

fn default_progress_delta() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InviteRequest {
    user_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressResponse {
    quest_id: String,
    current_progress: u32,
    total_steps: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteResponse {
    quest_id: String,
    reward: u64,
    total_xp: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListMeta {
    total: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/quests
pub async fn handle_list(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(resp) = guard::authorize(&state, &req, ANY_ROLE) {
        return resp;
    }

    let status = match helpers::query_param(req.uri().query(), "status") {
        None => None,
        Some("locked") => Some(QuestStatus::Locked),
        Some("active") => Some(QuestStatus::Active),
        Some("completed") => Some(QuestStatus::Completed),
        Some(other) => {
            return helpers::validation_error(format!("Unknown quest status: {other}"));
        }
    };

    let quests = state.store.quests_filtered(status);
    let total = quests.len();
    helpers::success_with_meta(&quests, &ListMeta { total })
}

/// GET /api/quests/:id
pub async fn handle_get(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    quest_id: &str,
) -> Response<BoxBody> {
    if let Err(resp) = guard::authorize(&state, &req, ANY_ROLE) {
        return resp;
    }

    match state.store.quest(quest_id) {
        Some(quest) => helpers::success(&quest),
        None => helpers::not_found("QUEST_NOT_FOUND", "Quest not found"),
    }
}

/// POST /api/quests/:id/enroll
pub async fn handle_enroll(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    quest_id: &str,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ASSOCIATE_ONLY) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let Some(quest) = state.store.enroll_in_quest(quest_id, &ctx.account_id) else {
        return helpers::not_found("QUEST_NOT_FOUND", "Quest not found");
    };

    info!("{} enrolled in quest {}", ctx.username, quest.id);

    helpers::success(&serde_json::json!({
        "message": "Successfully enrolled in quest",
        "questId": quest.id,
    }))
}

/// POST /api/quests/:id/progress
pub async fn handle_progress(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    quest_id: &str,
) -> Response<BoxBody> {
    let _ctx = match guard::authorize(&state, &req, ASSOCIATE_ONLY) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let body: ProgressRequest = match helpers::parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return helpers::validation_error(format!("Invalid JSON body: {e}")),
    };

    if body.progress_delta == 0 {
        return helpers::validation_error("progressDelta must be at least 1");
    }

    match state.store.apply_quest_progress(quest_id, body.progress_delta) {
        QuestProgress::NotFound => helpers::not_found("QUEST_NOT_FOUND", "Quest not found"),
        QuestProgress::Locked => helpers::error(
            StatusCode::CONFLICT,
            "QUEST_LOCKED",
            "Quest is locked; enroll to activate it",
        ),
        QuestProgress::Updated(quest) => helpers::success(&ProgressResponse {
            quest_id: quest.id,
            current_progress: quest.progress,
            total_steps: quest.total_steps,
        }),
    }
}

/// POST /api/quests/:id/complete
///
/// Completion is one-way: the quest snaps to its step bound, the caller
/// collects the reward exactly once, and every open realtime connection
/// observes a broadcast event.
pub async fn handle_complete(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    quest_id: &str,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ASSOCIATE_ONLY) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    match state.store.complete_quest(quest_id, &ctx.account_id) {
        QuestCompletion::NotFound => helpers::not_found("QUEST_NOT_FOUND", "Quest not found"),
        QuestCompletion::NotEnrolled => helpers::error(
            StatusCode::CONFLICT,
            "NOT_ENROLLED",
            "Enroll in the quest before completing it",
        ),
        QuestCompletion::AlreadyCompleted => helpers::error(
            StatusCode::CONFLICT,
            "QUEST_ALREADY_COMPLETED",
            "Quest is already completed",
        ),
        QuestCompletion::Completed { quest, total_xp } => {
            info!(
                "{} completed quest {} (+{} XP)",
                ctx.username, quest.id, quest.reward
            );

            state.hub.publish(PushEvent::QuestComplete {
                user_id: ctx.account_id.clone(),
                quest_id: quest.id.clone(),
                reward: quest.reward,
            });

            helpers::success(&CompleteResponse {
                quest_id: quest.id,
                reward: quest.reward,
                total_xp,
            })
        }
    }
}

/// POST /api/quests/:id/invite
///
/// Creates a quest-invite notification for each existing target account;
/// unknown ids are skipped.
pub async fn handle_invite(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    quest_id: &str,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ASSOCIATE_ONLY) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let body: InviteRequest = match helpers::parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return helpers::validation_error(format!("Invalid JSON body: {e}")),
    };

    if body.user_ids.is_empty() {
        return helpers::validation_error("userIds must not be empty");
    }

    let Some(quest) = state.store.quest(quest_id) else {
        return helpers::not_found("QUEST_NOT_FOUND", "Quest not found");
    };

    let mut invited = 0;
    for user_id in &body.user_ids {
        if state.store.account(user_id).is_none() {
            continue;
        }
        state.store.push_notification(NotificationEvent::new(
            user_id.clone(),
            "quest_invite",
            "Quest Invitation",
            format!("{} invited you to join \"{}\"", ctx.username, quest.title),
        ));
        invited += 1;
    }

    info!(
        "{} invited {} user(s) to quest {}",
        ctx.username, invited, quest.id
    );

    helpers::success(&serde_json::json!({
        "message": format!("Invited {invited} users to quest"),
        "questId": quest.id,
    }))
}
