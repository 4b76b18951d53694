//! Social sharing route
//!
//! - POST /api/social/share - Mint a share link for an achievement

use hyper::{Request, Response};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::ANY_ROLE;
use crate::routes::guard;
use crate::routes::helpers::{self, BoxBody};
use crate::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareResponse {
    share_id: String,
    share_url: String,
}

/// POST /api/social/share
pub async fn handle_share(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(resp) = guard::authorize(&state, &req, ANY_ROLE) {
        return resp;
    }

    let share_id = format!("share_{}", Uuid::new_v4());
    let share_url = format!("/share/{share_id}");

    helpers::success(&ShareResponse { share_id, share_url })
}
