//! HTTP routes for Helix

pub mod auth_routes;
pub mod badges;
pub mod boxes;
pub mod dev;
pub mod guard;
pub mod health;
pub mod helpers;
pub mod leaderboard;
pub mod notifications;
pub mod quests;
pub mod reports;
pub mod social;
pub mod supervisor;
pub mod talent;
pub mod users;
pub mod wellness;

pub use auth_routes::handle_auth_request;
pub use guard::{authorize, AuthContext};
pub use health::{health_check, version_info};
pub use helpers::BoxBody;
