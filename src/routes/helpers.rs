//! Shared response helpers for HTTP routes
//!
//! Every route answers with the uniform envelope
//! `{success, data?, error?: {code, message}, meta?}` so clients handle
//! one shape for success and failure alike.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::types::HelixError;

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Maximum accepted request body size
const MAX_BODY_BYTES: usize = 10_240;

// =============================================================================
// Envelope builders
// =============================================================================

/// 200 envelope with a data payload
pub fn success<T: Serialize>(data: &T) -> Response<BoxBody> {
    envelope(StatusCode::OK, json!({ "success": true, "data": data }))
}

/// Success envelope with an explicit status code
pub fn success_with_status<T: Serialize>(status: StatusCode, data: &T) -> Response<BoxBody> {
    envelope(status, json!({ "success": true, "data": data }))
}

/// 200 envelope with a data payload and a meta block
pub fn success_with_meta<T: Serialize, M: Serialize>(data: &T, meta: &M) -> Response<BoxBody> {
    envelope(
        StatusCode::OK,
        json!({ "success": true, "data": data, "meta": meta }),
    )
}

/// Error envelope with a machine-readable code and human-readable message
pub fn error(status: StatusCode, code: &str, message: impl Into<String>) -> Response<BoxBody> {
    envelope(
        status,
        json!({ "success": false, "error": { "code": code, "message": message.into() } }),
    )
}

/// 400 envelope for malformed or missing request fields
pub fn validation_error(message: impl Into<String>) -> Response<BoxBody> {
    error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
}

/// 404 envelope with a resource-specific code
pub fn not_found(code: &str, message: impl Into<String>) -> Response<BoxBody> {
    error(StatusCode::NOT_FOUND, code, message)
}

fn envelope(status: StatusCode, body: serde_json::Value) -> Response<BoxBody> {
    let json = body.to_string();

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, PUT, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .body(full_body(json))
        .unwrap()
}

/// Preflight response for CORS
pub fn cors_preflight() -> Response<BoxBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, PUT, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .header("Access-Control-Max-Age", "86400")
        .body(empty_body())
        .unwrap()
}

pub fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

pub fn empty_body() -> BoxBody {
    Full::new(Bytes::new())
        .map_err(|never| match never {})
        .boxed()
}

// =============================================================================
// Request parsing
// =============================================================================

/// Read and deserialize a JSON request body, capped at 10 KiB.
pub async fn parse_json_body<T: for<'de> Deserialize<'de>>(
    req: Request<hyper::body::Incoming>,
) -> Result<T, HelixError> {
    let body = req
        .collect()
        .await
        .map_err(|e| HelixError::Http(format!("Failed to read body: {e}")))?;

    let bytes = body.to_bytes();
    if bytes.len() > MAX_BODY_BYTES {
        return Err(HelixError::Http("Request body too large".into()));
    }

    serde_json::from_slice(&bytes).map_err(|e| HelixError::Http(format!("Invalid JSON: {e}")))
}

/// The `Authorization` header value, if present and valid UTF-8.
pub fn get_auth_header(req: &Request<hyper::body::Incoming>) -> Option<&str> {
    req.headers()
        .get(hyper::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// Extract one query parameter from a request URI.
pub fn query_param<'a>(query: Option<&'a str>, name: &str) -> Option<&'a str> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param() {
        let query = Some("status=active&limit=10");
        assert_eq!(query_param(query, "status"), Some("active"));
        assert_eq!(query_param(query, "limit"), Some("10"));
        assert_eq!(query_param(query, "scope"), None);
        assert_eq!(query_param(None, "status"), None);
    }

    #[test]
    fn test_success_envelope_shape() {
        let resp = success(&serde_json::json!({"id": "q1"}));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_error_envelope_status() {
        let resp = error(StatusCode::FORBIDDEN, "INSUFFICIENT_PERMISSIONS", "nope");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
