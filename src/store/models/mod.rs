//! Domain entity definitions

pub mod account;
pub mod engagement;
pub mod notification;
pub mod quest;
pub mod report;
pub mod rewards;
pub mod talent;

pub use account::Account;
pub use engagement::{Intervention, JournalEntry, PulseAnswer, PulseEntry};
pub use notification::NotificationEvent;
pub use quest::{Quest, QuestStatus, QuestStep};
pub use report::Report;
pub use rewards::{reward_table, Badge, BadgeAward, BoxReward, MysteryBox};
pub use talent::{
    SkillCategory, TalentProfile, TalentSegment, SEGMENT_CLAIM_INCREMENT,
    SEGMENT_UNLOCK_THRESHOLD,
};
