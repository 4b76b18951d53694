//! Shared error and result types for Helix

use thiserror::Error;

/// Top-level error type for the Helix server
#[derive(Debug, Error)]
pub enum HelixError {
    /// HTTP request handling errors (bad bodies, oversized payloads)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication and token errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Configuration errors detected at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/socket errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, HelixError>;
