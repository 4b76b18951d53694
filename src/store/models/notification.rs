//! Notification records
//!
//! Created by handlers (quest invites, badge awards) and listed per
//! account. The only permitted mutation is flipping the read flag;
//! notifications are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored notification targeting one account
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub id: String,
    pub user_id: String,
    /// quest_invite, quest_progress, badge_earned, leaderboard
    #[serde(rename = "type")]
    pub category: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub timestamp: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn new(
        user_id: impl Into<String>,
        category: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("notif_{}", Uuid::new_v4()),
            user_id: user_id.into(),
            category: category.into(),
            title: title.into(),
            message: message.into(),
            read: false,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification_is_unread() {
        let n = NotificationEvent::new("u1", "quest_invite", "Quest Invitation", "hi");
        assert!(!n.read);
        assert!(n.id.starts_with("notif_"));
    }

    #[test]
    fn test_wire_format_uses_type_key() {
        let n = NotificationEvent::new("u1", "badge_earned", "t", "m");
        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains("\"type\":\"badge_earned\""));
        assert!(json.contains("\"userId\":\"u1\""));
    }
}
