//! Wellness and engagement records: pulse surveys, journals, interventions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An answer to one pulse survey question
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PulseAnswer {
    pub question_id: String,
    pub answer: String,
}

/// A submitted pulse survey entry
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PulseEntry {
    pub id: String,
    pub user_id: String,
    pub answers: Vec<PulseAnswer>,
    /// 0-100 self-reported mood
    pub mood_score: u32,
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// A private journal entry
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub text: String,
    /// positive, reflective, ...
    pub mood: String,
    pub timestamp: DateTime<Utc>,
}

/// A supervisor intervention logged against an account
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Intervention {
    pub id: String,
    pub user_id: String,
    pub supervisor_id: String,
    /// check_in, workload_review, ...
    #[serde(rename = "type")]
    pub kind: String,
    pub notes: String,
    pub timestamp: DateTime<Utc>,
}
