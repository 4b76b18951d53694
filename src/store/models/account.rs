//! Account records
//!
//! Stores identity, credentials, and accumulated experience points.
//! Accounts are provisioned by the seed data and never deleted in-process;
//! mutation is limited to XP grants and privacy-preference updates.

use serde::{Deserialize, Serialize};

use crate::auth::Role;

/// An account in the credential store
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,

    /// Login name, unique across accounts
    pub username: String,

    /// Display name
    pub name: String,

    pub role: Role,

    /// Team affiliation
    pub team_id: String,

    /// Avatar image URL
    pub avatar: String,

    /// Argon2 PHC hash; never serialized to the wire
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Accumulated experience points
    #[serde(default)]
    pub xp: u64,

    /// Whether the profile may be shown to other accounts
    #[serde(default = "default_true")]
    pub share_profile: bool,
}

fn default_true() -> bool {
    true
}

impl Account {
    /// Level derived from XP: 1000 XP per level, starting at level 1.
    pub fn level(&self) -> u64 {
        self.xp / 1000 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(xp: u64) -> Account {
        Account {
            id: "u1".into(),
            username: "demo".into(),
            name: "Demo".into(),
            role: Role::Associate,
            team_id: "t1".into(),
            avatar: String::new(),
            password_hash: "$argon2id$stub".into(),
            xp,
            share_profile: true,
        }
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(account(0).level(), 1);
        assert_eq!(account(999).level(), 1);
        assert_eq!(account(1000).level(), 2);
        assert_eq!(account(2850).level(), 3);
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_string(&account(100)).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("passwordHash"));
    }
}
