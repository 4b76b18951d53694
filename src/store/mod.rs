//! In-memory domain store
//!
//! Holds every application collection behind concurrent maps. Handlers
//! mutate records through the methods here; each method performs its
//! read-modify-write against a single entry atomically. Effects spanning
//! records (XP grants after quest completion) are sequential per-entry
//! operations with no cross-record transaction.
//!
//! Listings are returned in id order so responses are deterministic.

pub mod models;
pub mod seed;

use dashmap::DashMap;
use std::sync::RwLock;

use models::{
    Account, Badge, BadgeAward, Intervention, JournalEntry, MysteryBox, NotificationEvent,
    PulseEntry, Quest, QuestStatus, Report, SkillCategory, TalentProfile, TalentSegment,
};
use seed::SeedData;

/// Outcome of a quest progress update
#[derive(Debug)]
pub enum QuestProgress {
    NotFound,
    /// Progress on a locked quest is a conflict; enrollment activates it
    Locked,
    Updated(Quest),
}

/// Outcome of a quest completion
#[derive(Debug)]
pub enum QuestCompletion {
    NotFound,
    NotEnrolled,
    AlreadyCompleted,
    /// The completed quest and the caller's XP total after the reward
    Completed { quest: Quest, total_xp: u64 },
}

/// The process-wide store of application records
pub struct DomainStore {
    accounts: DashMap<String, Account>,
    talent: DashMap<String, TalentProfile>,
    quests: DashMap<String, Quest>,
    mystery_boxes: DashMap<String, MysteryBox>,
    badges: DashMap<String, Badge>,
    skill_categories: RwLock<Vec<SkillCategory>>,
    badge_awards: RwLock<Vec<BadgeAward>>,
    notifications: RwLock<Vec<NotificationEvent>>,
    pulse_entries: RwLock<Vec<PulseEntry>>,
    journals: RwLock<Vec<JournalEntry>>,
    interventions: RwLock<Vec<Intervention>>,
    reports: RwLock<Vec<Report>>,
}

impl DomainStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            talent: DashMap::new(),
            quests: DashMap::new(),
            mystery_boxes: DashMap::new(),
            badges: DashMap::new(),
            skill_categories: RwLock::new(Vec::new()),
            badge_awards: RwLock::new(Vec::new()),
            notifications: RwLock::new(Vec::new()),
            pulse_entries: RwLock::new(Vec::new()),
            journals: RwLock::new(Vec::new()),
            interventions: RwLock::new(Vec::new()),
            reports: RwLock::new(Vec::new()),
        }
    }

    /// Replace every collection with the given seed data.
    pub fn apply_seed(&self, data: SeedData) {
        self.accounts.clear();
        for account in data.accounts {
            self.accounts.insert(account.id.clone(), account);
        }
        self.talent.clear();
        for profile in data.talent_profiles {
            self.talent.insert(profile.user_id.clone(), profile);
        }
        self.quests.clear();
        for quest in data.quests {
            self.quests.insert(quest.id.clone(), quest);
        }
        self.mystery_boxes.clear();
        for mystery_box in data.mystery_boxes {
            self.mystery_boxes.insert(mystery_box.id.clone(), mystery_box);
        }
        self.badges.clear();
        for badge in data.badges {
            self.badges.insert(badge.id.clone(), badge);
        }
        *self.skill_categories.write().expect("lock poisoned") = data.skill_categories;
        *self.badge_awards.write().expect("lock poisoned") = data.badge_awards;
        *self.notifications.write().expect("lock poisoned") = data.notifications;
        *self.pulse_entries.write().expect("lock poisoned") = data.pulse_entries;
        *self.journals.write().expect("lock poisoned") = data.journals;
        *self.interventions.write().expect("lock poisoned") = data.interventions;
        *self.reports.write().expect("lock poisoned") = data.reports;
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    pub fn account(&self, id: &str) -> Option<Account> {
        self.accounts.get(id).map(|a| a.clone())
    }

    pub fn account_by_username(&self, username: &str) -> Option<Account> {
        self.accounts
            .iter()
            .find(|a| a.username == username)
            .map(|a| a.clone())
    }

    /// All accounts in id order
    pub fn all_accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self.accounts.iter().map(|a| a.clone()).collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        accounts
    }

    /// Accounts sharing a team, in id order
    pub fn accounts_in_team(&self, team_id: &str) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .filter(|a| a.team_id == team_id)
            .map(|a| a.clone())
            .collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        accounts
    }

    /// Add XP to an account, returning the new total.
    pub fn grant_xp(&self, account_id: &str, amount: u64) -> Option<u64> {
        self.accounts.get_mut(account_id).map(|mut account| {
            account.xp = account.xp.saturating_add(amount);
            account.xp
        })
    }

    /// Update the privacy flag, returning the new value.
    pub fn set_share_profile(&self, account_id: &str, share: bool) -> Option<bool> {
        self.accounts.get_mut(account_id).map(|mut account| {
            account.share_profile = share;
            account.share_profile
        })
    }

    // =========================================================================
    // Talent DNA
    // =========================================================================

    pub fn talent_profile(&self, user_id: &str) -> Option<TalentProfile> {
        self.talent.get(user_id).map(|p| p.clone())
    }

    pub fn skill_categories(&self) -> Vec<SkillCategory> {
        self.skill_categories.read().expect("lock poisoned").clone()
    }

    /// Apply a milestone claim to one segment of an account's profile.
    ///
    /// Returns the updated segment and whether this claim newly unlocked it,
    /// or None if the profile or segment does not exist.
    pub fn claim_segment(&self, user_id: &str, segment_id: &str) -> Option<(TalentSegment, bool)> {
        let mut profile = self.talent.get_mut(user_id)?;
        let segment = profile.segments.iter_mut().find(|s| s.id == segment_id)?;
        let unlocked_now = segment.claim();
        Some((segment.clone(), unlocked_now))
    }

    // =========================================================================
    // Quests
    // =========================================================================

    pub fn quest(&self, id: &str) -> Option<Quest> {
        self.quests.get(id).map(|q| q.clone())
    }

    /// Quests, optionally filtered by status, in id order
    pub fn quests_filtered(&self, status: Option<QuestStatus>) -> Vec<Quest> {
        let mut quests: Vec<Quest> = self
            .quests
            .iter()
            .filter(|q| status.map_or(true, |s| q.status == s))
            .map(|q| q.clone())
            .collect();
        quests.sort_by(|a, b| a.id.cmp(&b.id));
        quests
    }

    /// Enroll an account in a quest. Idempotent.
    ///
    /// Returns the quest after enrollment, or None if it does not exist.
    pub fn enroll_in_quest(&self, quest_id: &str, account_id: &str) -> Option<Quest> {
        let mut quest = self.quests.get_mut(quest_id)?;
        quest.enroll(account_id);
        Some(quest.clone())
    }

    /// Apply a progress delta to an active quest, clamped to its step bound.
    pub fn apply_quest_progress(&self, quest_id: &str, delta: u32) -> QuestProgress {
        let Some(mut quest) = self.quests.get_mut(quest_id) else {
            return QuestProgress::NotFound;
        };
        if quest.status == QuestStatus::Locked {
            return QuestProgress::Locked;
        }
        quest.apply_progress(delta);
        QuestProgress::Updated(quest.clone())
    }

    /// Complete a quest on behalf of an enrolled account and award its XP.
    ///
    /// The status transition is one-way: a second completion attempt is
    /// rejected rather than re-awarding the reward.
    pub fn complete_quest(&self, quest_id: &str, account_id: &str) -> QuestCompletion {
        let completed = {
            let Some(mut quest) = self.quests.get_mut(quest_id) else {
                return QuestCompletion::NotFound;
            };
            if !quest.is_enrolled(account_id) {
                return QuestCompletion::NotEnrolled;
            }
            if quest.status == QuestStatus::Completed {
                return QuestCompletion::AlreadyCompleted;
            }
            quest.complete();
            quest.clone()
        };

        // Entry lock released above; the XP grant is a separate atomic step.
        let total_xp = self
            .grant_xp(account_id, completed.reward)
            .unwrap_or_default();
        QuestCompletion::Completed {
            quest: completed,
            total_xp,
        }
    }

    // =========================================================================
    // Rewards
    // =========================================================================

    /// Mystery boxes in id order
    pub fn mystery_boxes(&self) -> Vec<MysteryBox> {
        let mut boxes: Vec<MysteryBox> = self.mystery_boxes.iter().map(|b| b.clone()).collect();
        boxes.sort_by(|a, b| a.id.cmp(&b.id));
        boxes
    }

    pub fn mystery_box(&self, id: &str) -> Option<MysteryBox> {
        self.mystery_boxes.get(id).map(|b| b.clone())
    }

    /// Badge catalog in id order
    pub fn all_badges(&self) -> Vec<Badge> {
        let mut badges: Vec<Badge> = self.badges.iter().map(|b| b.clone()).collect();
        badges.sort_by(|a, b| a.id.cmp(&b.id));
        badges
    }

    pub fn badge(&self, id: &str) -> Option<Badge> {
        self.badges.get(id).map(|b| b.clone())
    }

    /// Badges held by an account, in award order
    pub fn badges_for(&self, user_id: &str) -> Vec<Badge> {
        let awards = self.badge_awards.read().expect("lock poisoned");
        awards
            .iter()
            .filter(|award| award.user_id == user_id)
            .filter_map(|award| self.badge(&award.badge_id))
            .collect()
    }

    /// Record a badge award. Idempotent per (account, badge) pair.
    ///
    /// Returns false if the account already held the badge.
    pub fn award_badge(&self, award: BadgeAward) -> bool {
        let mut awards = self.badge_awards.write().expect("lock poisoned");
        if awards
            .iter()
            .any(|a| a.user_id == award.user_id && a.badge_id == award.badge_id)
        {
            return false;
        }
        awards.push(award);
        true
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Notifications targeting an account, in creation order
    pub fn notifications_for(&self, user_id: &str) -> Vec<NotificationEvent> {
        self.notifications
            .read()
            .expect("lock poisoned")
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn push_notification(&self, notification: NotificationEvent) {
        self.notifications
            .write()
            .expect("lock poisoned")
            .push(notification);
    }

    /// Flip the read flag on the caller's notifications. Ids belonging to
    /// other accounts are ignored. Returns how many flags were flipped.
    pub fn mark_notifications_read(&self, user_id: &str, ids: &[String]) -> usize {
        let mut notifications = self.notifications.write().expect("lock poisoned");
        let mut flipped = 0;
        for notification in notifications.iter_mut() {
            if notification.user_id == user_id
                && !notification.read
                && ids.contains(&notification.id)
            {
                notification.read = true;
                flipped += 1;
            }
        }
        flipped
    }

    // =========================================================================
    // Wellness
    // =========================================================================

    pub fn push_pulse_entry(&self, entry: PulseEntry) {
        self.pulse_entries
            .write()
            .expect("lock poisoned")
            .push(entry);
    }

    /// Journal entries owned by an account, in creation order
    pub fn journals_for(&self, user_id: &str) -> Vec<JournalEntry> {
        self.journals
            .read()
            .expect("lock poisoned")
            .iter()
            .filter(|j| j.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn push_journal(&self, entry: JournalEntry) {
        self.journals.write().expect("lock poisoned").push(entry);
    }

    pub fn push_intervention(&self, intervention: Intervention) {
        self.interventions
            .write()
            .expect("lock poisoned")
            .push(intervention);
    }

    /// Pulse entries for an account, in creation order
    pub fn pulse_entries_for(&self, user_id: &str) -> Vec<PulseEntry> {
        self.pulse_entries
            .read()
            .expect("lock poisoned")
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect()
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Reports, optionally filtered by kind, in creation order
    pub fn reports_filtered(&self, kind: Option<&str>) -> Vec<Report> {
        self.reports
            .read()
            .expect("lock poisoned")
            .iter()
            .filter(|r| kind.map_or(true, |k| r.kind == k))
            .cloned()
            .collect()
    }

    pub fn push_report(&self, report: Report) {
        self.reports.write().expect("lock poisoned").push(report);
    }

    // =========================================================================
    // Stats / dev dumps
    // =========================================================================

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            accounts: self.accounts.len(),
            quests: self.quests.len(),
            notifications: self.notifications.read().expect("lock poisoned").len(),
            journals: self.journals.read().expect("lock poisoned").len(),
            reports: self.reports.read().expect("lock poisoned").len(),
        }
    }

    /// Raw dump of a collection by name, for the dev mock endpoint.
    pub fn dump_collection(&self, name: &str) -> Option<serde_json::Value> {
        let value = match name {
            "users" => serde_json::to_value(self.all_accounts()),
            "talentDNA" => {
                let mut profiles: Vec<TalentProfile> =
                    self.talent.iter().map(|p| p.clone()).collect();
                profiles.sort_by(|a, b| a.user_id.cmp(&b.user_id));
                serde_json::to_value(profiles)
            }
            "quests" => serde_json::to_value(self.quests_filtered(None)),
            "mysteryBoxes" => serde_json::to_value(self.mystery_boxes()),
            "badges" => serde_json::to_value(self.all_badges()),
            "skillCategories" => serde_json::to_value(self.skill_categories()),
            "userBadges" => {
                serde_json::to_value(&*self.badge_awards.read().expect("lock poisoned"))
            }
            "notifications" => {
                serde_json::to_value(&*self.notifications.read().expect("lock poisoned"))
            }
            "pulseEntries" => {
                serde_json::to_value(&*self.pulse_entries.read().expect("lock poisoned"))
            }
            "journals" => serde_json::to_value(&*self.journals.read().expect("lock poisoned")),
            "interventions" => {
                serde_json::to_value(&*self.interventions.read().expect("lock poisoned"))
            }
            "reports" => serde_json::to_value(&*self.reports.read().expect("lock poisoned")),
            _ => return None,
        };
        value.ok()
    }
}

impl Default for DomainStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Collection sizes for health and log output
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub accounts: usize,
    pub quests: usize,
    pub notifications: usize,
    pub journals: usize,
    pub reports: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use chrono::NaiveDate;
    use models::QuestStep;

    fn store_with_fixtures() -> DomainStore {
        let store = DomainStore::new();
        store.accounts.insert(
            "u1".into(),
            Account {
                id: "u1".into(),
                username: "associate_demo".into(),
                name: "Aman Kumar".into(),
                role: Role::Associate,
                team_id: "t1".into(),
                avatar: String::new(),
                password_hash: "$argon2id$stub".into(),
                xp: 2850,
                share_profile: true,
            },
        );
        store.quests.insert(
            "q1".into(),
            Quest {
                id: "q1".into(),
                title: "Master Public Speaking".into(),
                description: String::new(),
                kind: "skill".into(),
                progress: 2,
                total_steps: 3,
                reward: 500,
                deadline: NaiveDate::from_ymd_opt(2025, 2, 15).unwrap(),
                status: QuestStatus::Active,
                steps: vec![QuestStep {
                    id: "step1".into(),
                    title: "Watch presentation fundamentals".into(),
                    kind: "video".into(),
                    completed: true,
                }],
                enrolled_users: vec!["u1".into()],
            },
        );
        store.quests.insert(
            "q4".into(),
            Quest {
                id: "q4".into(),
                title: "Code Review Champion".into(),
                description: String::new(),
                kind: "skill".into(),
                progress: 0,
                total_steps: 10,
                reward: 300,
                deadline: NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
                status: QuestStatus::Locked,
                steps: Vec::new(),
                enrolled_users: Vec::new(),
            },
        );
        store
    }

    #[test]
    fn test_progress_clamps_regardless_of_call_count() {
        let store = store_with_fixtures();
        for _ in 0..5 {
            store.apply_quest_progress("q1", 7);
        }
        let quest = store.quest("q1").unwrap();
        assert_eq!(quest.progress, quest.total_steps);
    }

    #[test]
    fn test_progress_on_locked_quest_is_conflict() {
        let store = store_with_fixtures();
        assert!(matches!(
            store.apply_quest_progress("q4", 1),
            QuestProgress::Locked
        ));
        assert_eq!(store.quest("q4").unwrap().progress, 0);
    }

    #[test]
    fn test_progress_on_missing_quest() {
        let store = store_with_fixtures();
        assert!(matches!(
            store.apply_quest_progress("nope", 1),
            QuestProgress::NotFound
        ));
    }

    #[test]
    fn test_enrollment_is_idempotent_through_store() {
        let store = store_with_fixtures();
        store.enroll_in_quest("q4", "u1");
        store.enroll_in_quest("q4", "u1");
        let quest = store.quest("q4").unwrap();
        assert_eq!(quest.enrolled_users.len(), 1);
        assert_eq!(quest.status, QuestStatus::Active);
    }

    #[test]
    fn test_complete_awards_xp_once() {
        let store = store_with_fixtures();
        match store.complete_quest("q1", "u1") {
            QuestCompletion::Completed { quest, total_xp } => {
                assert_eq!(quest.status, QuestStatus::Completed);
                assert_eq!(quest.progress, quest.total_steps);
                assert_eq!(total_xp, 2850 + 500);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        // A second completion is rejected and does not re-award.
        assert!(matches!(
            store.complete_quest("q1", "u1"),
            QuestCompletion::AlreadyCompleted
        ));
        assert_eq!(store.account("u1").unwrap().xp, 3350);
    }

    #[test]
    fn test_complete_requires_enrollment() {
        let store = store_with_fixtures();
        assert!(matches!(
            store.complete_quest("q4", "u1"),
            QuestCompletion::NotEnrolled
        ));
    }

    #[test]
    fn test_mark_read_ignores_foreign_notifications() {
        let store = store_with_fixtures();
        store.push_notification(NotificationEvent::new("u1", "quest_invite", "a", "b"));
        store.push_notification(NotificationEvent::new("u2", "quest_invite", "c", "d"));
        let ids: Vec<String> = store
            .notifications
            .read()
            .unwrap()
            .iter()
            .map(|n| n.id.clone())
            .collect();

        // u1 tries to mark both; only their own flips.
        assert_eq!(store.mark_notifications_read("u1", &ids), 1);
        let for_u2 = store.notifications_for("u2");
        assert!(!for_u2[0].read);
    }

    #[test]
    fn test_award_badge_is_idempotent() {
        let store = store_with_fixtures();
        let award = BadgeAward {
            id: "ub1".into(),
            user_id: "u1".into(),
            badge_id: "early_bird".into(),
            awarded_at: chrono::Utc::now(),
        };
        assert!(store.award_badge(award.clone()));
        assert!(!store.award_badge(BadgeAward {
            id: "ub2".into(),
            ..award
        }));
    }

    #[test]
    fn test_dump_unknown_collection() {
        let store = store_with_fixtures();
        assert!(store.dump_collection("users").is_some());
        assert!(store.dump_collection("secrets").is_none());
    }
}
