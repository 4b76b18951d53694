//! Notification routes
//!
//! - GET  /api/notifications           - List the caller's notifications
//! - POST /api/notifications/mark-read - Flip read flags on the caller's own

use hyper::{Request, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::ANY_ROLE;
use crate::routes::guard;
use crate::routes::helpers::{self, BoxBody};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkReadRequest {
    notification_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationMeta {
    total: usize,
    unread: usize,
}

/// GET /api/notifications
pub async fn handle_list(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ANY_ROLE) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let notifications = state.store.notifications_for(&ctx.account_id);
    let meta = NotificationMeta {
        total: notifications.len(),
        unread: notifications.iter().filter(|n| !n.read).count(),
    };

    helpers::success_with_meta(&notifications, &meta)
}

/// POST /api/notifications/mark-read
///
/// Ids that belong to other accounts are silently ignored.
pub async fn handle_mark_read(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ANY_ROLE) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let body: MarkReadRequest = match helpers::parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return helpers::validation_error(format!("Invalid JSON body: {e}")),
    };

    if body.notification_ids.is_empty() {
        return helpers::validation_error("notificationIds must not be empty");
    }

    let flipped = state
        .store
        .mark_notifications_read(&ctx.account_id, &body.notification_ids);

    helpers::success(&serde_json::json!({
        "message": "Notifications marked as read",
        "updated": flipped,
    }))
}
