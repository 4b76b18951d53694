//! JWT session tokens
//!
//! Issues and verifies signed bearer tokens binding an account identity,
//! role, and team to a fixed expiry window. There is no revocation list;
//! expiry is the only invalidation mechanism, and `refresh` resets the
//! window without rotating the signing secret.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::types::HelixError;

/// Claims embedded in every session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    /// Login name, carried for log/display purposes
    pub username: String,
    /// Verified role, used by the authorization gate
    pub role: Role,
    /// Team affiliation
    pub team_id: String,
    /// Issued-at (unix seconds)
    pub iat: u64,
    /// Expiry (unix seconds)
    pub exp: u64,
}

/// Outcome of verifying a presented token
#[derive(Debug)]
pub struct TokenValidationResult {
    pub valid: bool,
    pub claims: Option<Claims>,
    pub error: Option<String>,
}

impl TokenValidationResult {
    fn ok(claims: Claims) -> Self {
        Self {
            valid: true,
            claims: Some(claims),
            error: None,
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            claims: None,
            error: Some(reason.into()),
        }
    }
}

/// Token issuance and verification service
pub struct JwtValidator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_seconds: u64,
}

impl JwtValidator {
    pub fn new(secret: &str, expiry_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_seconds,
        }
    }

    /// Issue a token for the given identity. Returns the encoded token and
    /// its expiry as unix seconds.
    pub fn generate_token(
        &self,
        account_id: &str,
        username: &str,
        role: Role,
        team_id: &str,
    ) -> Result<(String, u64), HelixError> {
        let now = Utc::now().timestamp() as u64;
        let exp = now + self.expiry_seconds;
        let claims = Claims {
            sub: account_id.to_string(),
            username: username.to_string(),
            role,
            team_id: team_id.to_string(),
            iat: now,
            exp,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map(|token| (token, exp))
            .map_err(|e| HelixError::Auth(format!("Failed to sign token: {e}")))
    }

    /// Verify signature and expiry of a presented token.
    ///
    /// Rejections do not distinguish between bad signatures and expired
    /// tokens; both are terminal for the request. Expiry is checked with
    /// no leeway: a token is rejected from the first tick past its horizon.
    pub fn verify_token(&self, token: &str) -> TokenValidationResult {
        let mut validation = Validation::default();
        validation.leeway = 0;
        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => TokenValidationResult::ok(data.claims),
            Err(e) => TokenValidationResult::rejected(format!("Invalid or expired token: {e}")),
        }
    }
}

/// Extract the bearer token from an `Authorization` header value.
///
/// Accepts `Bearer <token>`; anything else yields None.
pub fn extract_token_from_header(header: Option<&str>) -> Option<&str> {
    let header = header?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> JwtValidator {
        JwtValidator::new("unit-test-signing-secret", 3600)
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let jwt = validator();
        let (token, exp) = jwt
            .generate_token("u1", "associate_demo", Role::Associate, "t1")
            .unwrap();
        assert!(exp > Utc::now().timestamp() as u64);

        let result = jwt.verify_token(&token);
        assert!(result.valid);
        let claims = result.claims.unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.username, "associate_demo");
        assert_eq!(claims.role, Role::Associate);
        assert_eq!(claims.team_id, "t1");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = validator();

        // Hand-build a token whose horizon passed an hour ago.
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: "u1".into(),
            username: "associate_demo".into(),
            role: Role::Associate,
            team_id: "t1".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"unit-test-signing-secret"),
        )
        .unwrap();

        let result = jwt.verify_token(&token);
        assert!(!result.valid);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let jwt = validator();
        let (token, _) = jwt
            .generate_token("u1", "associate_demo", Role::Associate, "t1")
            .unwrap();

        let other = JwtValidator::new("a-completely-different-secret", 3600);
        let result = other.verify_token(&token);
        assert!(!result.valid);
        assert!(result.claims.is_none());
        assert!(result.error.is_some());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = validator().verify_token("not-a-jwt");
        assert!(!result.valid);
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(
            extract_token_from_header(Some("Bearer abc.def.ghi")),
            Some("abc.def.ghi")
        );
        assert_eq!(extract_token_from_header(Some("Bearer ")), None);
        assert_eq!(extract_token_from_header(Some("Basic dXNlcg==")), None);
        assert_eq!(extract_token_from_header(None), None);
    }
}
