//! Reward records: badges and mystery boxes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A badge in the catalog
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// common, uncommon, rare, epic
    pub rarity: String,
}

/// A badge awarded to an account
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BadgeAward {
    pub id: String,
    pub user_id: String,
    pub badge_id: String,
    pub awarded_at: DateTime<Utc>,
}

/// A mystery box that can be opened for a random reward
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MysteryBox {
    pub id: String,
    pub name: String,
    pub description: String,
    /// daily_login, quest_completion
    pub unlock_criteria: String,
    pub available: bool,
    pub cooldown_ms: u64,
}

/// A reward drawn from a mystery box
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoxReward {
    Badge { id: String, name: String },
    Xp { amount: u64 },
}

/// The fixed reward table mystery boxes draw from, uniformly at random.
pub fn reward_table() -> Vec<BoxReward> {
    vec![
        BoxReward::Badge {
            id: "early_bird".into(),
            name: "Early Bird".into(),
        },
        BoxReward::Xp { amount: 100 },
        BoxReward::Badge {
            id: "explorer".into(),
            name: "Explorer".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_wire_format() {
        let json = serde_json::to_string(&BoxReward::Xp { amount: 100 }).unwrap();
        assert_eq!(json, "{\"type\":\"xp\",\"amount\":100}");

        let json = serde_json::to_string(&BoxReward::Badge {
            id: "explorer".into(),
            name: "Explorer".into(),
        })
        .unwrap();
        assert!(json.contains("\"type\":\"badge\""));
    }

    #[test]
    fn test_reward_table_is_nonempty() {
        assert_eq!(reward_table().len(), 3);
    }
}
