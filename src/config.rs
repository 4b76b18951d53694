//! Configuration for Helix
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use uuid::Uuid;

use crate::types::HelixError;

/// Helix - gamified engagement API server
#[derive(Parser, Debug, Clone)]
#[command(name = "helix")]
#[command(about = "Gamified engagement API server with realtime notifications")]
pub struct Args {
    /// Unique node identifier for this server instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:3001")]
    pub listen: SocketAddr,

    /// Enable development mode (dev routes, fallback JWT secret, reseeding)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// JWT secret for token signing (required in production)
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// JWT token expiry in seconds
    #[arg(long, env = "JWT_EXPIRY_SECONDS", default_value = "86400")]
    pub jwt_expiry_seconds: u64,

    /// Period of the synthetic progress event pushed to each realtime connection
    #[arg(long, env = "HEARTBEAT_INTERVAL_SECS", default_value = "30")]
    pub heartbeat_interval_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Fallback signing secret, only ever used in development mode.
const DEV_JWT_SECRET: &str = "helix-dev-secret-do-not-deploy";

impl Args {
    /// Validate the configuration, returning an error describing the first problem found.
    pub fn validate(&self) -> Result<(), HelixError> {
        if self.jwt_secret.is_none() && !self.dev_mode {
            return Err(HelixError::Config(
                "JWT_SECRET is required outside development mode".into(),
            ));
        }
        if let Some(secret) = &self.jwt_secret {
            if secret.len() < 16 {
                return Err(HelixError::Config(
                    "JWT_SECRET must be at least 16 characters".into(),
                ));
            }
        }
        if self.jwt_expiry_seconds == 0 {
            return Err(HelixError::Config(
                "JWT_EXPIRY_SECONDS must be non-zero".into(),
            ));
        }
        if self.heartbeat_interval_secs == 0 {
            return Err(HelixError::Config(
                "HEARTBEAT_INTERVAL_SECS must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// The effective JWT signing secret (configured, or the dev fallback).
    pub fn effective_jwt_secret(&self) -> &str {
        match &self.jwt_secret {
            Some(secret) => secret.as_str(),
            None => DEV_JWT_SECRET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            node_id: Uuid::new_v4(),
            listen: "127.0.0.1:3001".parse().unwrap(),
            dev_mode: false,
            jwt_secret: Some("a-long-enough-test-secret".into()),
            jwt_expiry_seconds: 86_400,
            heartbeat_interval_secs: 30,
            log_level: "info".into(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(base_args().validate().is_ok());
    }

    #[test]
    fn test_missing_secret_rejected_in_production() {
        let mut args = base_args();
        args.jwt_secret = None;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_missing_secret_allowed_in_dev_mode() {
        let mut args = base_args();
        args.jwt_secret = None;
        args.dev_mode = true;
        assert!(args.validate().is_ok());
        assert_eq!(args.effective_jwt_secret(), DEV_JWT_SECRET);
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut args = base_args();
        args.jwt_secret = Some("short".into());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_zero_expiry_rejected() {
        let mut args = base_args();
        args.jwt_expiry_seconds = 0;
        assert!(args.validate().is_err());
    }
}
