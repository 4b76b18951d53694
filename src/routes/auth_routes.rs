//! HTTP routes for authentication
//!
//! - POST /api/auth/login   - Authenticate and get a JWT token
//! - POST /api/auth/refresh - Re-issue a token with a reset expiry window
//!
//! Account provisioning happens through seeding; there is no register
//! endpoint. Tokens are stateless: logout is client-side and there is no
//! revocation list, so a token stays valid until its expiry.

use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{verify_password, Role, ANY_ROLE};
use crate::routes::guard;
use crate::routes::helpers::{self, BoxBody};
use crate::server::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Account summary returned alongside a fresh token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub team_id: String,
    pub avatar: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: u64,
    pub user: AccountSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub token: String,
    pub expires_at: u64,
}

// =============================================================================
// Sub-router
// =============================================================================

/// Route /api/auth/* requests. Returns None for paths this module does
/// not own.
pub async fn handle_auth_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match (method, path.as_str()) {
        (Method::POST, "/api/auth/login") => Some(handle_login(req, state).await),
        (Method::POST, "/api/auth/refresh") => Some(handle_refresh(req, state).await),
        (Method::OPTIONS, p) if p.starts_with("/api/auth/") => Some(helpers::cors_preflight()),
        _ => None,
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/auth/login
///
/// Flow:
/// 1. Look up the account by username
/// 2. Verify the password against the stored Argon2 hash
/// 3. Issue a JWT and return it with an account summary
async fn handle_login(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let body: LoginRequest = match helpers::parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return helpers::validation_error(format!("Invalid JSON body: {e}")),
    };

    if body.username.is_empty() || body.password.is_empty() {
        return helpers::validation_error("Missing required fields: username, password");
    }

    let account = match state.store.account_by_username(&body.username) {
        Some(a) => a,
        None => {
            warn!("Login failed - user not found: {}", body.username);
            // Use generic error to prevent user enumeration
            return helpers::error(
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password",
            );
        }
    };

    let password_valid = match verify_password(&body.password, &account.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            warn!("Password verification error: {}", e);
            return helpers::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_ERROR",
                "Authentication error",
            );
        }
    };

    if !password_valid {
        warn!("Login failed - invalid password: {}", body.username);
        return helpers::error(
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "Invalid username or password",
        );
    }

    let (token, expires_at) = match state.jwt.generate_token(
        &account.id,
        &account.username,
        account.role,
        &account.team_id,
    ) {
        Ok(issued) => issued,
        Err(e) => {
            warn!("Token issuance failed: {}", e);
            return helpers::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "TOKEN_ERROR",
                "Failed to issue token",
            );
        }
    };

    info!("Login successful: {}", body.username);

    helpers::success(&LoginResponse {
        token,
        expires_at,
        user: AccountSummary {
            id: account.id,
            name: account.name,
            role: account.role,
            team_id: account.team_id,
            avatar: account.avatar,
        },
    })
}

/// POST /api/auth/refresh
///
/// Requires a currently-valid token; resets the expiry window without
/// rotating the signing material.
async fn handle_refresh(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ANY_ROLE) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let (token, expires_at) =
        match state
            .jwt
            .generate_token(&ctx.account_id, &ctx.username, ctx.role, &ctx.team_id)
        {
            Ok(issued) => issued,
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                return helpers::error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TOKEN_ERROR",
                    "Failed to issue token",
                );
            }
        };

    info!("Token refreshed: {}", ctx.username);

    helpers::success(&RefreshResponse { token, expires_at })
}
