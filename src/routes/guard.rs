//! Authentication and authorization gate
//!
//! A two-stage guard applied ahead of every protected handler. Stage one
//! extracts and verifies the bearer token; stage two checks the verified
//! role against the operation's static allow-list. On success the
//! verified identity is handed to the handler as an [`AuthContext`] so
//! handlers never re-verify tokens themselves.

use hyper::{Request, StatusCode};

use crate::auth::{extract_token_from_header, is_allowed, JwtValidator, Role};
use crate::routes::helpers::{self, BoxBody};
use crate::server::AppState;

/// Verified identity attached to a request after it clears the gate
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub account_id: String,
    pub username: String,
    pub role: Role,
    pub team_id: String,
}

/// Why the gate rejected a request
#[derive(Debug, PartialEq, Eq)]
pub enum GateRejection {
    /// No bearer token was presented (401)
    MissingToken,
    /// A token was presented but failed verification (403)
    InvalidToken,
    /// The verified role is outside the operation's allow-list (403)
    Forbidden,
}

/// Run both gate stages against a raw Authorization header value.
pub fn check(
    jwt: &JwtValidator,
    auth_header: Option<&str>,
    allow: &[Role],
) -> Result<AuthContext, GateRejection> {
    let token = extract_token_from_header(auth_header).ok_or(GateRejection::MissingToken)?;

    let result = jwt.verify_token(token);
    if !result.valid {
        return Err(GateRejection::InvalidToken);
    }
    let claims = result.claims.ok_or(GateRejection::InvalidToken)?;

    if !is_allowed(claims.role, allow) {
        return Err(GateRejection::Forbidden);
    }

    Ok(AuthContext {
        account_id: claims.sub,
        username: claims.username,
        role: claims.role,
        team_id: claims.team_id,
    })
}

/// Gate a request, producing either the verified context or the error
/// envelope to send back. Handlers call this before touching any state.
pub fn authorize(
    state: &AppState,
    req: &Request<hyper::body::Incoming>,
    allow: &[Role],
) -> Result<AuthContext, hyper::Response<BoxBody>> {
    check(&state.jwt, helpers::get_auth_header(req), allow).map_err(|rejection| match rejection {
        GateRejection::MissingToken => helpers::error(
            StatusCode::UNAUTHORIZED,
            "NO_TOKEN",
            "Access token required",
        ),
        GateRejection::InvalidToken => {
            helpers::error(StatusCode::FORBIDDEN, "INVALID_TOKEN", "Invalid token")
        }
        GateRejection::Forbidden => helpers::error(
            StatusCode::FORBIDDEN,
            "INSUFFICIENT_PERMISSIONS",
            "Insufficient permissions",
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ANY_ROLE, SUPERVISION};

    fn jwt() -> JwtValidator {
        JwtValidator::new("gate-test-signing-secret", 3600)
    }

    fn bearer(jwt: &JwtValidator, role: Role) -> String {
        let (token, _) = jwt.generate_token("u1", "demo", role, "t1").unwrap();
        format!("Bearer {token}")
    }

    #[test]
    fn test_missing_token_rejected_first() {
        let jwt = jwt();
        assert_eq!(
            check(&jwt, None, ANY_ROLE).unwrap_err(),
            GateRejection::MissingToken
        );
        assert_eq!(
            check(&jwt, Some("Basic abc"), ANY_ROLE).unwrap_err(),
            GateRejection::MissingToken
        );
    }

    #[test]
    fn test_bad_token_rejected() {
        let jwt = jwt();
        assert_eq!(
            check(&jwt, Some("Bearer junk"), ANY_ROLE).unwrap_err(),
            GateRejection::InvalidToken
        );
    }

    #[test]
    fn test_role_outside_allow_list_forbidden() {
        let jwt = jwt();
        let header = bearer(&jwt, Role::Associate);
        assert_eq!(
            check(&jwt, Some(&header), SUPERVISION).unwrap_err(),
            GateRejection::Forbidden
        );
    }

    #[test]
    fn test_verified_context_flows_through() {
        let jwt = jwt();
        let header = bearer(&jwt, Role::Supervisor);
        let ctx = check(&jwt, Some(&header), SUPERVISION).unwrap();
        assert_eq!(ctx.account_id, "u1");
        assert_eq!(ctx.role, Role::Supervisor);
        assert_eq!(ctx.team_id, "t1");
    }
}
