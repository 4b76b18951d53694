//! Roles and per-operation allow-lists
//!
//! Every protected operation declares the closed set of roles permitted to
//! invoke it. The sets are static properties of the operations, checked by
//! the shared gate in `routes::guard` rather than by ad-hoc string
//! comparisons inside handlers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular team member: quests, talent DNA, wellness features
    Associate,
    /// Team lead: aggregated analytics, interventions, reports
    Supervisor,
    /// Full access, including badge awards
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Associate => write!(f, "associate"),
            Role::Supervisor => write!(f, "supervisor"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Any authenticated account
pub const ANY_ROLE: &[Role] = &[Role::Associate, Role::Supervisor, Role::Admin];

/// Associate-only operations (personal quests, talent DNA, wellness).
/// Supervisors and admins are deliberately excluded: these mutate the
/// caller's own gamification state, which only associates have.
pub const ASSOCIATE_ONLY: &[Role] = &[Role::Associate];

/// Team-level analytics and interventions
pub const SUPERVISION: &[Role] = &[Role::Supervisor, Role::Admin];

/// Administrative operations (badge awards)
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Check whether a verified role appears in an operation's allow-list.
pub fn is_allowed(role: Role, allow: &[Role]) -> bool {
    allow.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_role_admits_all() {
        assert!(is_allowed(Role::Associate, ANY_ROLE));
        assert!(is_allowed(Role::Supervisor, ANY_ROLE));
        assert!(is_allowed(Role::Admin, ANY_ROLE));
    }

    #[test]
    fn test_associate_only_excludes_supervisors() {
        assert!(is_allowed(Role::Associate, ASSOCIATE_ONLY));
        assert!(!is_allowed(Role::Supervisor, ASSOCIATE_ONLY));
        assert!(!is_allowed(Role::Admin, ASSOCIATE_ONLY));
    }

    #[test]
    fn test_supervision_excludes_associates() {
        assert!(!is_allowed(Role::Associate, SUPERVISION));
        assert!(is_allowed(Role::Supervisor, SUPERVISION));
        assert!(is_allowed(Role::Admin, SUPERVISION));
    }

    #[test]
    fn test_admin_only() {
        assert!(!is_allowed(Role::Associate, ADMIN_ONLY));
        assert!(!is_allowed(Role::Supervisor, ADMIN_ONLY));
        assert!(is_allowed(Role::Admin, ADMIN_ONLY));
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Associate).unwrap(), "\"associate\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"supervisor\"").unwrap(),
            Role::Supervisor
        );
        assert!(serde_json::from_str::<Role>("\"manager\"").is_err());
    }
}
