//! Account routes
//!
//! - GET /api/users/me           - Caller's own profile
//! - GET /api/users/:id          - Another account (supervisor/admin);
//!                                 veiled when the target restricts sharing
//! - PUT /api/users/me/privacy   - Update the caller's privacy flag

use hyper::{Request, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::auth::{Role, ANY_ROLE, SUPERVISION};
use crate::routes::guard;
use crate::routes::helpers::{self, BoxBody};
use crate::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    id: String,
    name: String,
    role: Role,
    team_id: String,
    avatar: String,
    xp: u64,
    privacy_preferences: PrivacyPreferences,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrivacyPreferences {
    share_profile: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrivacyUpdateRequest {
    share_profile: bool,
}

/// GET /api/users/me
pub async fn handle_me(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ANY_ROLE) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let Some(account) = state.store.account(&ctx.account_id) else {
        return helpers::not_found("USER_NOT_FOUND", "User not found");
    };

    helpers::success(&ProfileResponse {
        id: account.id,
        name: account.name,
        role: account.role,
        team_id: account.team_id,
        avatar: account.avatar,
        xp: account.xp,
        privacy_preferences: PrivacyPreferences {
            share_profile: account.share_profile,
        },
    })
}

/// GET /api/users/:id
///
/// Accounts that restrict profile sharing are veiled for supervisors;
/// admins see through the veil.
pub async fn handle_user_by_id(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    user_id: &str,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, SUPERVISION) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let Some(account) = state.store.account(user_id) else {
        return helpers::not_found("USER_NOT_FOUND", "User not found");
    };

    if !account.share_profile && ctx.role != Role::Admin {
        return helpers::success(&serde_json::json!({
            "sensitive": true,
            "message": "User has restricted profile sharing",
        }));
    }

    helpers::success(&ProfileResponse {
        id: account.id,
        name: account.name,
        role: account.role,
        team_id: account.team_id,
        avatar: account.avatar,
        xp: account.xp,
        privacy_preferences: PrivacyPreferences {
            share_profile: account.share_profile,
        },
    })
}

/// PUT /api/users/me/privacy
pub async fn handle_update_privacy(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ANY_ROLE) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let body: PrivacyUpdateRequest = match helpers::parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return helpers::validation_error(format!("Invalid JSON body: {e}")),
    };

    let Some(share_profile) = state
        .store
        .set_share_profile(&ctx.account_id, body.share_profile)
    else {
        return helpers::not_found("USER_NOT_FOUND", "User not found");
    };

    info!(
        "Privacy updated: {} shareProfile={}",
        ctx.username, share_profile
    );

    helpers::success(&PrivacyPreferences { share_profile })
}
