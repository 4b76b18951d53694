//! Supervisor analytics routes
//!
//! - GET  /api/supervisor/engagement[?range=] - Engagement/wellbeing trend
//! - GET  /api/supervisor/skill-gaps          - Team skill gap table
//! - GET  /api/supervisor/training-uptake     - Course uptake summary
//! - GET  /api/supervisor/alerts              - At-risk team members
//! - POST /api/supervisor/intervention        - Log an intervention
//!
//! The store keeps no daily engagement snapshots, so the trend endpoint
//! synthesizes a deterministic curve; gaps and alerts derive from the
//! live team data.

use chrono::{Duration, Utc};
use hyper::{Request, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::{Role, SUPERVISION};
use crate::routes::guard;
use crate::routes::helpers::{self, BoxBody};
use crate::server::AppState;
use crate::store::models::{Account, Intervention, PulseEntry, Quest, TalentProfile};

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EngagementResponse {
    trend: Vec<TrendPoint>,
    avg_engagement: u32,
    avg_wellbeing: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrendPoint {
    date: String,
    engagement_score: u32,
    wellbeing_score: u32,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    pub skill: String,
    pub required_level: f64,
    pub current_avg: f64,
    pub gap: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrainingUptakeResponse {
    total_courses: u32,
    completed_courses: u32,
    uptake_rate: u32,
    trending: Vec<TrendingCourse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrendingCourse {
    course: &'static str,
    completions: u32,
    trend: &'static str,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskAlert {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub reason: String,
    pub confidence: f64,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InterventionRequest {
    user_id: String,
    intervention_type: String,
    notes: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/supervisor/engagement
pub async fn handle_engagement(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(resp) = guard::authorize(&state, &req, SUPERVISION) {
        return resp;
    }

    let days = match helpers::query_param(req.uri().query(), "range") {
        None | Some("30d") => 30,
        Some("90d") => 90,
        Some("1y") => 365,
        Some(other) => {
            return helpers::validation_error(format!("Unknown range: {other}"));
        }
    };

    let today = Utc::now().date_naive();
    let trend: Vec<TrendPoint> = (0..days)
        .rev()
        .map(|days_ago| {
            let date = today - Duration::days(days_ago);
            TrendPoint {
                date: date.format("%Y-%m-%d").to_string(),
                engagement_score: synthetic_score(days_ago, 70, 30),
                wellbeing_score: synthetic_score(days_ago, 75, 20),
            }
        })
        .collect();

    let avg_engagement = average(trend.iter().map(|p| p.engagement_score));
    let avg_wellbeing = average(trend.iter().map(|p| p.wellbeing_score));

    helpers::success(&EngagementResponse {
        trend,
        avg_engagement,
        avg_wellbeing,
    })
}

/// GET /api/supervisor/skill-gaps
pub async fn handle_skill_gaps(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, SUPERVISION) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let members = state.store.accounts_in_team(&ctx.team_id);
    let profiles: Vec<TalentProfile> = members
        .iter()
        .filter_map(|m| state.store.talent_profile(&m.id))
        .collect();

    helpers::success(&compute_skill_gaps(&profiles))
}

/// GET /api/supervisor/training-uptake
pub async fn handle_training_uptake(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(resp) = guard::authorize(&state, &req, SUPERVISION) {
        return resp;
    }

    helpers::success(&TrainingUptakeResponse {
        total_courses: 25,
        completed_courses: 18,
        uptake_rate: 72,
        trending: vec![
            TrendingCourse {
                course: "Leadership Fundamentals",
                completions: 12,
                trend: "up",
            },
            TrendingCourse {
                course: "Data Literacy",
                completions: 8,
                trend: "stable",
            },
        ],
    })
}

/// GET /api/supervisor/alerts
pub async fn handle_alerts(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, SUPERVISION) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let members = state.store.accounts_in_team(&ctx.team_id);
    let quests = state.store.quests_filtered(None);
    let alerts: Vec<RiskAlert> = members
        .iter()
        .filter(|m| m.role == Role::Associate)
        .filter_map(|member| {
            assess_member_risk(member, &quests, &state.store.pulse_entries_for(&member.id))
        })
        .collect();

    helpers::success(&alerts)
}

/// POST /api/supervisor/intervention
pub async fn handle_intervention(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, SUPERVISION) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let body: InterventionRequest = match helpers::parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return helpers::validation_error(format!("Invalid JSON body: {e}")),
    };

    if body.intervention_type.trim().is_empty() {
        return helpers::validation_error("interventionType must not be empty");
    }
    if state.store.account(&body.user_id).is_none() {
        return helpers::not_found("USER_NOT_FOUND", "User not found");
    }

    state.store.push_intervention(Intervention {
        id: format!("intervention_{}", Uuid::new_v4()),
        user_id: body.user_id.clone(),
        supervisor_id: ctx.account_id.clone(),
        kind: body.intervention_type,
        notes: body.notes,
        timestamp: Utc::now(),
    });

    info!("{} logged intervention for {}", ctx.username, body.user_id);

    helpers::success(&serde_json::json!({
        "message": "Intervention logged successfully",
    }))
}

// =============================================================================
// Derivations
// =============================================================================

/// Deterministic pseudo-variation so trend charts look alive without a
/// random source: base + a triangle wave over the day index.
fn synthetic_score(day_index: i64, base: u32, spread: u32) -> u32 {
    let phase = (day_index % (2 * i64::from(spread))) as u32;
    let wave = if phase < spread { phase } else { 2 * spread - phase };
    base + wave
}

fn average(values: impl Iterator<Item = u32>) -> u32 {
    let (sum, count) = values.fold((0u64, 0u64), |(s, c), v| (s + u64::from(v), c + 1));
    if count == 0 {
        0
    } else {
        ((sum + count / 2) / count) as u32
    }
}

/// Skills tracked for gap analysis: (label, catalog category, required level)
const GAP_SKILLS: &[(&str, &str, f64)] = &[
    ("Data Analysis", "Technical Skills", 8.0),
    ("Leadership", "Leadership", 7.0),
    ("Communication", "Communication", 9.0),
];

/// Compare the team's average segment progress (on a 0-10 scale) against
/// each tracked skill's required level.
pub fn compute_skill_gaps(profiles: &[TalentProfile]) -> Vec<SkillGap> {
    GAP_SKILLS
        .iter()
        .map(|(label, category, required)| {
            let scores: Vec<f64> = profiles
                .iter()
                .flat_map(|p| p.segments.iter())
                .filter(|s| s.category == *category)
                .map(|s| f64::from(s.progress) / 10.0)
                .collect();

            let current = if scores.is_empty() {
                0.0
            } else {
                let avg = scores.iter().sum::<f64>() / scores.len() as f64;
                (avg * 10.0).round() / 10.0
            };

            SkillGap {
                skill: (*label).to_string(),
                required_level: *required,
                current_avg: current,
                gap: ((required - current) * 10.0).round() / 10.0,
            }
        })
        .collect()
}

/// Flag an associate as at-risk from live signals: a low latest mood
/// score, or no quest enrollment at all.
fn assess_member_risk(
    member: &Account,
    quests: &[Quest],
    pulse_entries: &[PulseEntry],
) -> Option<RiskAlert> {
    let latest_mood = pulse_entries.last().map(|p| p.mood_score);
    if let Some(mood) = latest_mood {
        if mood < 50 {
            return Some(RiskAlert {
                id: format!("alert_{}", member.id),
                user_id: member.id.clone(),
                user_name: member.name.clone(),
                kind: "burnout_risk".into(),
                reason: "Low mood scores and declining engagement".into(),
                confidence: 0.85,
                timestamp: Utc::now().to_rfc3339(),
            });
        }
    }

    let enrolled_anywhere = quests.iter().any(|q| q.is_enrolled(&member.id));
    if !enrolled_anywhere {
        return Some(RiskAlert {
            id: format!("alert_{}", member.id),
            user_id: member.id.clone(),
            user_name: member.name.clone(),
            kind: "low_engagement".into(),
            reason: "No quest activity".into(),
            confidence: 0.72,
            timestamp: Utc::now().to_rfc3339(),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::TalentSegment;
    use chrono::NaiveDate;

    fn profile_with(category: &str, progresses: &[u32]) -> TalentProfile {
        TalentProfile {
            user_id: "u1".into(),
            segments: progresses
                .iter()
                .map(|p| TalentSegment {
                    id: "s".into(),
                    name: category.into(),
                    category: category.into(),
                    progress: *p,
                    unlocked: true,
                    color: String::new(),
                })
                .collect(),
            completion_percentage: 0,
            level: 1,
        }
    }

    #[test]
    fn test_skill_gap_computation() {
        let profiles = vec![profile_with("Communication", &[78]), profile_with("Communication", &[90])];
        let gaps = compute_skill_gaps(&profiles);
        let comm = gaps.iter().find(|g| g.skill == "Communication").unwrap();
        assert_eq!(comm.required_level, 9.0);
        assert_eq!(comm.current_avg, 8.4);
        assert_eq!(comm.gap, 0.6);
    }

    #[test]
    fn test_skill_gap_empty_team() {
        let gaps = compute_skill_gaps(&[]);
        assert_eq!(gaps.len(), 3);
        assert!(gaps.iter().all(|g| g.current_avg == 0.0));
        assert_eq!(gaps[1].gap, 7.0);
    }

    #[test]
    fn test_synthetic_score_stays_in_band() {
        for day in 0..400 {
            let score = synthetic_score(day, 70, 30);
            assert!((70..=100).contains(&score));
        }
    }

    #[test]
    fn test_risk_from_low_mood() {
        let member = Account {
            id: "u5".into(),
            username: "marcus_johnson".into(),
            name: "Marcus Johnson".into(),
            role: Role::Associate,
            team_id: "t1".into(),
            avatar: String::new(),
            password_hash: String::new(),
            xp: 0,
            share_profile: false,
        };
        let pulse = PulseEntry {
            id: "p1".into(),
            user_id: "u5".into(),
            answers: Vec::new(),
            mood_score: 30,
            tags: Vec::new(),
            timestamp: Utc::now(),
        };
        let alert = assess_member_risk(&member, &[], &[pulse]).unwrap();
        assert_eq!(alert.kind, "burnout_risk");
    }

    #[test]
    fn test_no_risk_when_enrolled_and_content() {
        let member = Account {
            id: "u1".into(),
            username: "associate_demo".into(),
            name: "Aman Kumar".into(),
            role: Role::Associate,
            team_id: "t1".into(),
            avatar: String::new(),
            password_hash: String::new(),
            xp: 0,
            share_profile: true,
        };
        let quest = Quest {
            id: "q1".into(),
            title: String::new(),
            description: String::new(),
            kind: "skill".into(),
            progress: 0,
            total_steps: 3,
            reward: 100,
            deadline: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            status: crate::store::models::QuestStatus::Active,
            steps: Vec::new(),
            enrolled_users: vec!["u1".into()],
        };
        assert!(assess_member_risk(&member, &[quest], &[]).is_none());
    }
}
