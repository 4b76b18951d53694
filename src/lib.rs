//! Helix - gamified engagement API server
//!
//! A REST API over an in-memory domain store with JWT bearer
//! authentication, role-based authorization, and a WebSocket channel
//! pushing notifications to connected dashboards.
//!
//! ## Services
//!
//! - **Auth**: JWT issuance/verification and Argon2 credential checks
//! - **Gate**: shared two-stage guard (token, then role allow-list)
//! - **Store**: concurrent in-memory collections seeded with demo data
//! - **Realtime**: broadcast hub with per-connection heartbeat events

pub mod auth;
pub mod config;
pub mod realtime;
pub mod routes;
pub mod server;
pub mod store;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{HelixError, Result};
