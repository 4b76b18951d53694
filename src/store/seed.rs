//! Demo dataset
//!
//! Seeds the store with the demo team used by the dashboard: five
//! accounts, the skill catalog, starter quests, mystery boxes, badges,
//! and a handful of wellness records. Passwords are hashed at seed time;
//! plaintext is never stored.

use chrono::{DateTime, NaiveDate, Utc};

use crate::auth::{hash_password, Role};
use crate::store::models::{
    Account, Badge, BadgeAward, Intervention, JournalEntry, MysteryBox, NotificationEvent,
    PulseAnswer, PulseEntry, Quest, QuestStatus, QuestStep, Report, SkillCategory, TalentProfile,
    TalentSegment,
};
use crate::types::{HelixError, Result};

/// Everything needed to (re)populate the store
pub struct SeedData {
    pub accounts: Vec<Account>,
    pub skill_categories: Vec<SkillCategory>,
    pub talent_profiles: Vec<TalentProfile>,
    pub quests: Vec<Quest>,
    pub mystery_boxes: Vec<MysteryBox>,
    pub badges: Vec<Badge>,
    pub badge_awards: Vec<BadgeAward>,
    pub notifications: Vec<NotificationEvent>,
    pub pulse_entries: Vec<PulseEntry>,
    pub journals: Vec<JournalEntry>,
    pub interventions: Vec<Intervention>,
    pub reports: Vec<Report>,
}

fn ts(rfc3339: &str) -> Result<DateTime<Utc>> {
    rfc3339
        .parse::<DateTime<Utc>>()
        .map_err(|e| HelixError::Config(format!("Bad seed timestamp {rfc3339}: {e}")))
}

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| HelixError::Config(format!("Bad seed date {y}-{m}-{d}")))
}

fn account(
    id: &str,
    username: &str,
    name: &str,
    role: Role,
    password: &str,
    xp: u64,
    share_profile: bool,
) -> Result<Account> {
    Ok(Account {
        id: id.into(),
        username: username.into(),
        name: name.into(),
        role,
        team_id: "t1".into(),
        avatar: format!("https://avatars.helix.local/{id}.jpg"),
        password_hash: hash_password(password)?,
        xp,
        share_profile,
    })
}

fn segment(id: &str, name: &str, progress: u32, unlocked: bool, color: &str) -> TalentSegment {
    TalentSegment {
        id: id.into(),
        name: name.into(),
        category: name.into(),
        progress,
        unlocked,
        color: color.into(),
    }
}

fn step(id: &str, title: &str, kind: &str, completed: bool) -> QuestStep {
    QuestStep {
        id: id.into(),
        title: title.into(),
        kind: kind.into(),
        completed,
    }
}

/// Build the demo dataset. Hashing the demo passwords takes a moment;
/// this runs once at startup (and on explicit dev reseed).
pub fn seed_data() -> Result<SeedData> {
    let accounts = vec![
        account("u1", "associate_demo", "Aman Kumar", Role::Associate, "associate123", 2850, true)?,
        account("u2", "supervisor_demo", "Maya Patel", Role::Supervisor, "supervisor123", 5200, true)?,
        account("u3", "admin_demo", "Admin User", Role::Admin, "admin123", 10_000, true)?,
        account("u4", "emily_chen", "Emily Chen", Role::Associate, "demo123", 2420, true)?,
        account("u5", "marcus_johnson", "Marcus Johnson", Role::Associate, "demo123", 2180, false)?,
    ];

    let skill_categories = vec![
        SkillCategory { id: "sc1".into(), name: "Leadership".into(), color: "#3B82F6".into() },
        SkillCategory { id: "sc2".into(), name: "Communication".into(), color: "#06B6D4".into() },
        SkillCategory { id: "sc3".into(), name: "Technical Skills".into(), color: "#10B981".into() },
        SkillCategory { id: "sc4".into(), name: "Problem Solving".into(), color: "#8B5CF6".into() },
        SkillCategory { id: "sc5".into(), name: "Creativity".into(), color: "#F59E0B".into() },
        SkillCategory { id: "sc6".into(), name: "Strategic Thinking".into(), color: "#EF4444".into() },
    ];

    let talent_profiles = vec![
        TalentProfile {
            user_id: "u1".into(),
            segments: vec![
                segment("s1", "Leadership", 85, true, "#3B82F6"),
                segment("s2", "Problem Solving", 92, true, "#8B5CF6"),
                segment("s3", "Communication", 78, true, "#06B6D4"),
                segment("s4", "Technical Skills", 65, true, "#10B981"),
                segment("s5", "Creativity", 45, true, "#F59E0B"),
                segment("s6", "Strategic Thinking", 30, false, "#EF4444"),
            ],
            completion_percentage: 66,
            level: 7,
        },
        TalentProfile {
            user_id: "u2".into(),
            segments: vec![
                segment("s1", "Leadership", 95, true, "#3B82F6"),
                segment("s2", "Problem Solving", 88, true, "#8B5CF6"),
                segment("s3", "Communication", 90, true, "#06B6D4"),
                segment("s4", "Technical Skills", 75, true, "#10B981"),
                segment("s5", "Creativity", 70, true, "#F59E0B"),
                segment("s6", "Strategic Thinking", 85, true, "#EF4444"),
            ],
            completion_percentage: 84,
            level: 12,
        },
    ];

    let quests = vec![
        Quest {
            id: "q1".into(),
            title: "Master Public Speaking".into(),
            description: "Complete 3 presentation challenges and receive peer feedback".into(),
            kind: "skill".into(),
            progress: 2,
            total_steps: 3,
            reward: 500,
            deadline: date(2025, 2, 15)?,
            status: QuestStatus::Active,
            steps: vec![
                step("step1", "Watch presentation fundamentals", "video", true),
                step("step2", "Practice 5-minute presentation", "practice", true),
                step("step3", "Present to team and get feedback", "presentation", false),
            ],
            enrolled_users: vec!["u1".into()],
        },
        Quest {
            id: "q2".into(),
            title: "Wellness Warrior".into(),
            description: "Log 7 wellness activities this week".into(),
            kind: "wellness".into(),
            progress: 5,
            total_steps: 7,
            reward: 200,
            deadline: date(2025, 1, 31)?,
            status: QuestStatus::Active,
            steps: vec![
                step("step1", "Morning meditation", "wellness", true),
                step("step2", "Lunch break walk", "wellness", true),
                step("step3", "Hydration check", "wellness", true),
                step("step4", "Stretching session", "wellness", true),
                step("step5", "Gratitude journal", "wellness", true),
                step("step6", "Team social activity", "wellness", false),
                step("step7", "Weekend self-care", "wellness", false),
            ],
            enrolled_users: vec!["u1".into(), "u4".into()],
        },
        Quest {
            id: "q3".into(),
            title: "Team Collaboration".into(),
            description: "Participate in cross-functional project".into(),
            kind: "collaboration".into(),
            progress: 1,
            total_steps: 5,
            reward: 800,
            deadline: date(2025, 3, 1)?,
            status: QuestStatus::Active,
            steps: vec![
                step("step1", "Join project team", "collaboration", true),
                step("step2", "Attend kickoff meeting", "collaboration", false),
                step("step3", "Complete assigned tasks", "collaboration", false),
                step("step4", "Provide peer feedback", "collaboration", false),
                step("step5", "Present final results", "collaboration", false),
            ],
            enrolled_users: vec!["u1".into()],
        },
        Quest {
            id: "q4".into(),
            title: "Code Review Champion".into(),
            description: "Provide meaningful code reviews".into(),
            kind: "skill".into(),
            progress: 0,
            total_steps: 10,
            reward: 300,
            deadline: date(2025, 2, 28)?,
            status: QuestStatus::Locked,
            steps: Vec::new(),
            enrolled_users: Vec::new(),
        },
    ];

    let mystery_boxes = vec![
        MysteryBox {
            id: "mb1".into(),
            name: "Daily Surprise".into(),
            description: "Open once per day for random rewards".into(),
            unlock_criteria: "daily_login".into(),
            available: true,
            cooldown_ms: 24 * 60 * 60 * 1000,
        },
        MysteryBox {
            id: "mb2".into(),
            name: "Achievement Box".into(),
            description: "Unlocked after completing any quest".into(),
            unlock_criteria: "quest_completion".into(),
            available: false,
            cooldown_ms: 0,
        },
    ];

    let badges = vec![
        Badge { id: "early_bird".into(), name: "Early Bird".into(), description: "Complete morning activities consistently".into(), icon: "🌅".into(), rarity: "common".into() },
        Badge { id: "team_player".into(), name: "Team Player".into(), description: "Collaborate effectively with team members".into(), icon: "🤝".into(), rarity: "common".into() },
        Badge { id: "explorer".into(), name: "Explorer".into(), description: "Try new learning activities".into(), icon: "🗺️".into(), rarity: "uncommon".into() },
        Badge { id: "mentor".into(), name: "Mentor".into(), description: "Help other team members grow".into(), icon: "🎓".into(), rarity: "rare".into() },
        Badge { id: "innovator".into(), name: "Innovator".into(), description: "Contribute creative solutions".into(), icon: "💡".into(), rarity: "epic".into() },
    ];

    let badge_awards = vec![
        BadgeAward { id: "ub1".into(), user_id: "u1".into(), badge_id: "early_bird".into(), awarded_at: ts("2025-01-15T08:00:00Z")? },
        BadgeAward { id: "ub2".into(), user_id: "u1".into(), badge_id: "team_player".into(), awarded_at: ts("2025-01-18T14:30:00Z")? },
        BadgeAward { id: "ub3".into(), user_id: "u2".into(), badge_id: "mentor".into(), awarded_at: ts("2025-01-20T10:15:00Z")? },
        BadgeAward { id: "ub4".into(), user_id: "u4".into(), badge_id: "explorer".into(), awarded_at: ts("2025-01-22T16:45:00Z")? },
    ];

    let notifications = vec![
        NotificationEvent {
            id: "notif1".into(),
            user_id: "u1".into(),
            category: "quest_progress".into(),
            title: "Quest Progress".into(),
            message: "You're making great progress on \"Master Public Speaking\"!".into(),
            read: false,
            timestamp: ts("2025-01-23T09:30:00Z")?,
        },
        NotificationEvent {
            id: "notif2".into(),
            user_id: "u1".into(),
            category: "badge_earned".into(),
            title: "New Badge Earned!".into(),
            message: "Congratulations! You earned the \"Team Player\" badge.".into(),
            read: false,
            timestamp: ts("2025-01-22T15:20:00Z")?,
        },
        NotificationEvent {
            id: "notif3".into(),
            user_id: "u1".into(),
            category: "leaderboard".into(),
            title: "Leaderboard Update".into(),
            message: "You've moved up to #1 on the team leaderboard!".into(),
            read: true,
            timestamp: ts("2025-01-21T12:00:00Z")?,
        },
    ];

    let pulse_entries = vec![PulseEntry {
        id: "pulse1".into(),
        user_id: "u1".into(),
        answers: vec![
            PulseAnswer { question_id: "q1".into(), answer: "8".into() },
            PulseAnswer {
                question_id: "q2".into(),
                answer: "Managing multiple priorities was challenging".into(),
            },
        ],
        mood_score: 75,
        tags: vec!["productive".into(), "focused".into()],
        timestamp: ts("2025-01-23T17:00:00Z")?,
    }];

    let journals = vec![
        JournalEntry {
            id: "journal1".into(),
            user_id: "u1".into(),
            title: "Reflection on Leadership Growth".into(),
            text: "Today I realized that effective leadership is more about listening than \
                   speaking. During our team meeting, I focused on understanding everyone's \
                   perspectives before sharing my own thoughts."
                .into(),
            mood: "positive".into(),
            timestamp: ts("2025-01-23T19:30:00Z")?,
        },
        JournalEntry {
            id: "journal2".into(),
            user_id: "u1".into(),
            title: "Learning from Challenges".into(),
            text: "The presentation didn't go as planned, but I learned valuable lessons about \
                   preparation and handling unexpected questions. Next time I'll practice more \
                   scenarios."
                .into(),
            mood: "reflective".into(),
            timestamp: ts("2025-01-22T20:15:00Z")?,
        },
    ];

    let interventions = vec![Intervention {
        id: "intervention1".into(),
        user_id: "u5".into(),
        supervisor_id: "u2".into(),
        kind: "check_in".into(),
        notes: "Scheduled 1:1 to discuss workload and provide support".into(),
        timestamp: ts("2025-01-23T14:00:00Z")?,
    }];

    let reports = vec![
        Report { id: "report1".into(), name: "Quarterly Engagement Report".into(), kind: "engagement".into(), format: "pdf".into(), last_updated: ts("2025-01-20T10:00:00Z")?, size: "2.4 MB".into(), download_link: "/api/reports/download/report1".into() },
        Report { id: "report2".into(), name: "Skills Assessment Summary".into(), kind: "skills".into(), format: "csv".into(), last_updated: ts("2025-01-18T15:30:00Z")?, size: "1.8 MB".into(), download_link: "/api/reports/download/report2".into() },
        Report { id: "report3".into(), name: "Wellness Analytics".into(), kind: "wellness".into(), format: "pdf".into(), last_updated: ts("2025-01-22T09:45:00Z")?, size: "956 KB".into(), download_link: "/api/reports/download/report3".into() },
        Report { id: "report4".into(), name: "Performance Insights".into(), kind: "performance".into(), format: "pdf".into(), last_updated: ts("2025-01-19T16:20:00Z")?, size: "3.1 MB".into(), download_link: "/api/reports/download/report4".into() },
        Report { id: "report5".into(), name: "Team Development Metrics".into(), kind: "engagement".into(), format: "csv".into(), last_updated: ts("2025-01-21T11:10:00Z")?, size: "2.7 MB".into(), download_link: "/api/reports/download/report5".into() },
    ];

    Ok(SeedData {
        accounts,
        skill_categories,
        talent_profiles,
        quests,
        mystery_boxes,
        badges,
        badge_awards,
        notifications,
        pulse_entries,
        journals,
        interventions,
        reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Seed construction hashes five demo passwords, so build it once.
    #[test]
    fn test_seed_referential_integrity() {
        let data = seed_data().unwrap();

        let account_ids: Vec<&str> = data.accounts.iter().map(|a| a.id.as_str()).collect();
        for profile in &data.talent_profiles {
            assert!(account_ids.contains(&profile.user_id.as_str()));
        }
        for quest in &data.quests {
            assert!(quest.progress <= quest.total_steps);
            for enrolled in &quest.enrolled_users {
                assert!(account_ids.contains(&enrolled.as_str()));
            }
        }
        let badge_ids: Vec<&str> = data.badges.iter().map(|b| b.id.as_str()).collect();
        for award in &data.badge_awards {
            assert!(account_ids.contains(&award.user_id.as_str()));
            assert!(badge_ids.contains(&award.badge_id.as_str()));
        }

        // Locked quests have no enrollments; sanity of the demo lifecycle.
        for quest in &data.quests {
            if quest.status == QuestStatus::Locked {
                assert!(quest.enrolled_users.is_empty());
            }
        }
    }
}
