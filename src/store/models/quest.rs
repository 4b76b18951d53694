//! Quest records
//!
//! Progress is clamped to `[0, total_steps]` and status transitions are
//! one-directional: `locked -> active` on first enrollment, `active ->
//! completed` on completion. There is no reset path.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Quest lifecycle status
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    Locked,
    Active,
    Completed,
}

/// A single step within a quest
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QuestStep {
    pub id: String,
    pub title: String,
    /// Step kind: video, practice, presentation, wellness, collaboration
    #[serde(rename = "type")]
    pub kind: String,
    pub completed: bool,
}

/// A gamified task with progress tracking and an XP reward
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Quest kind: skill, wellness, collaboration
    #[serde(rename = "type")]
    pub kind: String,
    pub progress: u32,
    pub total_steps: u32,
    /// XP awarded on completion
    pub reward: u64,
    pub deadline: NaiveDate,
    pub status: QuestStatus,
    #[serde(default)]
    pub steps: Vec<QuestStep>,
    /// Enrolled account ids; membership is idempotent
    #[serde(default)]
    pub enrolled_users: Vec<String>,
}

impl Quest {
    /// Enroll an account. Idempotent: a second enrollment of the same
    /// account leaves exactly one membership entry. First enrollment
    /// activates a locked quest.
    ///
    /// Returns true if the account was newly enrolled.
    pub fn enroll(&mut self, account_id: &str) -> bool {
        if self.enrolled_users.iter().any(|id| id == account_id) {
            return false;
        }
        self.enrolled_users.push(account_id.to_string());
        if self.status == QuestStatus::Locked {
            self.status = QuestStatus::Active;
        }
        true
    }

    pub fn is_enrolled(&self, account_id: &str) -> bool {
        self.enrolled_users.iter().any(|id| id == account_id)
    }

    /// Apply a progress delta, clamped so progress never exceeds
    /// `total_steps` regardless of the delta size or call count.
    ///
    /// Returns the progress after clamping.
    pub fn apply_progress(&mut self, delta: u32) -> u32 {
        self.progress = self.progress.saturating_add(delta).min(self.total_steps);
        self.progress
    }

    /// Mark the quest completed: progress snaps to `total_steps` and the
    /// status becomes `Completed`. The transition is one-way.
    pub fn complete(&mut self) {
        self.progress = self.total_steps;
        self.status = QuestStatus::Completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quest() -> Quest {
        Quest {
            id: "q1".into(),
            title: "Test Quest".into(),
            description: String::new(),
            kind: "skill".into(),
            progress: 0,
            total_steps: 3,
            reward: 500,
            deadline: NaiveDate::from_ymd_opt(2025, 2, 15).unwrap(),
            status: QuestStatus::Locked,
            steps: Vec::new(),
            enrolled_users: Vec::new(),
        }
    }

    #[test]
    fn test_enrollment_is_idempotent() {
        let mut q = quest();
        assert!(q.enroll("u1"));
        assert!(!q.enroll("u1"));
        assert_eq!(q.enrolled_users.len(), 1);
    }

    #[test]
    fn test_enrollment_activates_locked_quest() {
        let mut q = quest();
        assert_eq!(q.status, QuestStatus::Locked);
        q.enroll("u1");
        assert_eq!(q.status, QuestStatus::Active);
    }

    #[test]
    fn test_progress_clamps_at_total_steps() {
        let mut q = quest();
        q.enroll("u1");
        assert_eq!(q.apply_progress(2), 2);
        assert_eq!(q.apply_progress(100), 3);
        assert_eq!(q.apply_progress(1), 3);
        assert_eq!(q.progress, 3);
    }

    #[test]
    fn test_complete_snaps_progress() {
        let mut q = quest();
        q.enroll("u1");
        q.apply_progress(1);
        q.complete();
        assert_eq!(q.status, QuestStatus::Completed);
        assert_eq!(q.progress, q.total_steps);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&QuestStatus::Active).unwrap(),
            "\"active\""
        );
        let q = quest();
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"totalSteps\":3"));
        assert!(json.contains("\"type\":\"skill\""));
    }
}
