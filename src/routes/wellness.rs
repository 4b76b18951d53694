//! Pulse survey and journal routes
//!
//! - GET  /api/pulse/latest  - Current pulse survey prompt
//! - POST /api/pulse/submit  - Submit a pulse entry
//! - GET  /api/journals      - List the caller's journal entries
//! - POST /api/journals      - Create a journal entry

use chrono::Utc;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::ASSOCIATE_ONLY;
use crate::routes::guard;
use crate::routes::helpers::{self, BoxBody};
use crate::server::AppState;
use crate::store::models::{JournalEntry, PulseAnswer, PulseEntry};

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PulsePrompt {
    id: String,
    prompt: &'static str,
    questions: Vec<PulseQuestion>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PulseQuestion {
    id: &'static str,
    text: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PulseSubmitRequest {
    answers: Vec<PulseAnswer>,
    mood_score: u32,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct JournalCreateRequest {
    title: String,
    text: String,
    mood: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListMeta {
    total: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/pulse/latest
pub async fn handle_pulse_latest(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(resp) = guard::authorize(&state, &req, ASSOCIATE_ONLY) {
        return resp;
    }

    helpers::success(&PulsePrompt {
        id: format!("pulse_{}", Uuid::new_v4()),
        prompt: "How are you feeling about your work-life balance this week?",
        questions: vec![
            PulseQuestion {
                id: "q1",
                text: "Rate your energy level (1-10)",
                kind: "scale",
            },
            PulseQuestion {
                id: "q2",
                text: "What challenged you most this week?",
                kind: "text",
            },
        ],
    })
}

/// POST /api/pulse/submit
pub async fn handle_pulse_submit(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ASSOCIATE_ONLY) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let body: PulseSubmitRequest = match helpers::parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return helpers::validation_error(format!("Invalid JSON body: {e}")),
    };

    if body.mood_score > 100 {
        return helpers::validation_error("moodScore must be between 0 and 100");
    }
    if body.answers.is_empty() {
        return helpers::validation_error("answers must not be empty");
    }

    state.store.push_pulse_entry(PulseEntry {
        id: format!("pulse_entry_{}", Uuid::new_v4()),
        user_id: ctx.account_id.clone(),
        answers: body.answers,
        mood_score: body.mood_score,
        tags: body.tags,
        timestamp: Utc::now(),
    });

    info!("Pulse entry submitted by {}", ctx.username);

    helpers::success(&serde_json::json!({
        "message": "Pulse entry submitted successfully",
    }))
}

/// GET /api/journals
pub async fn handle_journals_list(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ASSOCIATE_ONLY) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let journals = state.store.journals_for(&ctx.account_id);
    let total = journals.len();
    helpers::success_with_meta(&journals, &ListMeta { total })
}

/// POST /api/journals
pub async fn handle_journal_create(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ASSOCIATE_ONLY) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let body: JournalCreateRequest = match helpers::parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return helpers::validation_error(format!("Invalid JSON body: {e}")),
    };

    if body.title.trim().is_empty() || body.text.trim().is_empty() {
        return helpers::validation_error("Missing required fields: title, text");
    }

    let entry = JournalEntry {
        id: format!("journal_{}", Uuid::new_v4()),
        user_id: ctx.account_id.clone(),
        title: body.title,
        text: body.text,
        mood: body.mood,
        timestamp: Utc::now(),
    };
    state.store.push_journal(entry.clone());

    info!("Journal entry created by {}", ctx.username);

    helpers::success_with_status(StatusCode::CREATED, &entry)
}
