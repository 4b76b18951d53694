//! Talent DNA records
//!
//! Per-account skill segments grouped into categories. Segment progress
//! runs 0-100; a segment unlocks when its progress crosses the unlock
//! threshold.

use serde::{Deserialize, Serialize};

/// Progress at which a claimed segment unlocks
pub const SEGMENT_UNLOCK_THRESHOLD: u32 = 50;

/// Progress granted per milestone claim
pub const SEGMENT_CLAIM_INCREMENT: u32 = 10;

/// A skill category in the catalog
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategory {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// One segment of an account's talent DNA
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TalentSegment {
    pub id: String,
    pub name: String,
    pub category: String,
    /// 0-100
    pub progress: u32,
    pub unlocked: bool,
    pub color: String,
}

impl TalentSegment {
    /// Apply one milestone claim: progress rises by the claim increment
    /// (clamped to 100) and the segment unlocks once it reaches the
    /// threshold. Returns true if this claim newly unlocked the segment.
    pub fn claim(&mut self) -> bool {
        self.progress = (self.progress + SEGMENT_CLAIM_INCREMENT).min(100);
        if self.progress >= SEGMENT_UNLOCK_THRESHOLD && !self.unlocked {
            self.unlocked = true;
            return true;
        }
        false
    }
}

/// An account's full talent profile
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TalentProfile {
    pub user_id: String,
    pub segments: Vec<TalentSegment>,
    pub completion_percentage: u32,
    pub level: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(progress: u32, unlocked: bool) -> TalentSegment {
        TalentSegment {
            id: "s1".into(),
            name: "Leadership".into(),
            category: "Leadership".into(),
            progress,
            unlocked,
            color: "#3B82F6".into(),
        }
    }

    #[test]
    fn test_claim_increments_progress() {
        let mut seg = segment(20, false);
        assert!(!seg.claim());
        assert_eq!(seg.progress, 30);
    }

    #[test]
    fn test_claim_unlocks_at_threshold() {
        let mut seg = segment(45, false);
        assert!(seg.claim());
        assert!(seg.unlocked);
        assert_eq!(seg.progress, 55);
    }

    #[test]
    fn test_claim_does_not_reunlock() {
        let mut seg = segment(80, true);
        assert!(!seg.claim());
        assert_eq!(seg.progress, 90);
    }

    #[test]
    fn test_claim_clamps_at_hundred() {
        let mut seg = segment(95, true);
        seg.claim();
        assert_eq!(seg.progress, 100);
        seg.claim();
        assert_eq!(seg.progress, 100);
    }
}
