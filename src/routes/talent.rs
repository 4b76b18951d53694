//! Talent DNA routes
//!
//! - GET  /api/talent-dna/associate           - Caller's own helix data
//! - GET  /api/talent-dna/team                - Aggregated team rollup
//! - POST /api/talent-dna/segment/:id/claim   - Claim a milestone
//!
//! The team rollup is a linear scan: segments group by category and
//! average with integer rounding; ranking downstream relies on the
//! ordering of the category catalog.

use hyper::{Request, Response};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::auth::{ASSOCIATE_ONLY, SUPERVISION};
use crate::realtime::PushEvent;
use crate::routes::guard;
use crate::routes::helpers::{self, BoxBody};
use crate::server::AppState;
use crate::store::models::{SkillCategory, TalentProfile, TalentSegment};

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssociateDnaResponse {
    segments: Vec<TalentSegment>,
    helix_meta: HelixMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HelixMeta {
    levels: u32,
    color_map: &'static str,
    completion_percentage: u32,
    level: u32,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedSegment {
    pub id: String,
    pub label: String,
    pub completion_rate: u32,
    pub avg_score: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TeamDnaResponse {
    segments: Vec<AggregatedSegment>,
    heatmap: TeamHeatmap,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TeamHeatmap {
    total_members: usize,
    avg_completion: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/talent-dna/associate
pub async fn handle_associate_dna(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ASSOCIATE_ONLY) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let profile = state.store.talent_profile(&ctx.account_id);
    let (segments, completion, level) = match profile {
        Some(p) => (p.segments, p.completion_percentage, p.level),
        None => (Vec::new(), 0, 1),
    };

    helpers::success(&AssociateDnaResponse {
        segments,
        helix_meta: HelixMeta {
            levels: 5,
            color_map: "progress",
            completion_percentage: completion,
            level,
        },
    })
}

/// GET /api/talent-dna/team
pub async fn handle_team_dna(
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

    let segments = aggregate_team_segments(&state.store.skill_categories(), &profiles);
    let avg_completion = average_completion(&profiles);

    helpers::success(&TeamDnaResponse {
        segments,
        heatmap: TeamHeatmap {
            total_members: members.len(),
            avg_completion,
        },
    })
}

/// POST /api/talent-dna/segment/:id/claim
pub async fn handle_claim_segment(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    segment_id: &str,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ASSOCIATE_ONLY) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let Some((segment, unlocked_now)) = state.store.claim_segment(&ctx.account_id, segment_id)
    else {
        return helpers::not_found("SEGMENT_NOT_FOUND", "Segment not found");
    };

    if unlocked_now {
        info!("{} unlocked segment {}", ctx.username, segment.id);
        state.hub.publish(PushEvent::Achievement {
            user_id: ctx.account_id.clone(),
            segment_id: segment.id.clone(),
            message: format!("{} unlocked {}!", ctx.username, segment.name),
        });
    }

    helpers::success(&segment)
}

// =============================================================================
// Aggregation
// =============================================================================

/// Group every team member's segments by catalog category and average the
/// progress per category with integer rounding. Categories nobody has a
/// segment in report zero.
pub fn aggregate_team_segments(
    categories: &[SkillCategory],
    profiles: &[TalentProfile],
) -> Vec<AggregatedSegment> {
    categories
        .iter()
        .map(|category| {
            let scores: Vec<u32> = profiles
                .iter()
                .flat_map(|p| p.segments.iter())
                .filter(|s| s.category == category.name)
                .map(|s| s.progress)
                .collect();

            let avg = rounded_average(&scores);
            AggregatedSegment {
                id: category.id.clone(),
                label: category.name.clone(),
                completion_rate: avg,
                avg_score: avg,
            }
        })
        .collect()
}

fn average_completion(profiles: &[TalentProfile]) -> u32 {
    let completions: Vec<u32> = profiles.iter().map(|p| p.completion_percentage).collect();
    rounded_average(&completions)
}

/// Integer-rounded mean; empty input averages to zero.
fn rounded_average(values: &[u32]) -> u32 {
    if values.is_empty() {
        return 0;
    }
    let sum: u64 = values.iter().map(|v| u64::from(*v)).sum();
    let count = values.len() as u64;
    // Round half up, in integer arithmetic.
    ((sum + count / 2) / count) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str) -> SkillCategory {
        SkillCategory {
            id: id.into(),
            name: name.into(),
            color: "#000000".into(),
        }
    }

    fn profile(user_id: &str, segments: Vec<(&str, u32)>, completion: u32) -> TalentProfile {
        TalentProfile {
            user_id: user_id.into(),
            segments: segments
                .into_iter()
                .map(|(cat, progress)| TalentSegment {
                    id: format!("s-{cat}"),
                    name: cat.into(),
                    category: cat.into(),
                    progress,
                    unlocked: true,
                    color: String::new(),
                })
                .collect(),
            completion_percentage: completion,
            level: 1,
        }
    }

    #[test]
    fn test_rounded_average() {
        assert_eq!(rounded_average(&[]), 0);
        assert_eq!(rounded_average(&[10]), 10);
        assert_eq!(rounded_average(&[1, 2]), 2); // 1.5 rounds up
        assert_eq!(rounded_average(&[85, 95]), 90);
    }

    #[test]
    fn test_aggregation_groups_by_category() {
        let categories = vec![category("sc1", "Leadership"), category("sc2", "Creativity")];
        let profiles = vec![
            profile("u1", vec![("Leadership", 85), ("Creativity", 45)], 66),
            profile("u2", vec![("Leadership", 95), ("Creativity", 70)], 84),
        ];

        let aggregated = aggregate_team_segments(&categories, &profiles);
        assert_eq!(aggregated.len(), 2);
        assert_eq!(aggregated[0].label, "Leadership");
        assert_eq!(aggregated[0].avg_score, 90);
        assert_eq!(aggregated[1].avg_score, 58); // (45 + 70) / 2 = 57.5, rounds up
    }

    #[test]
    fn test_aggregation_empty_category_is_zero() {
        let categories = vec![category("sc1", "Leadership"), category("sc9", "Juggling")];
        let profiles = vec![profile("u1", vec![("Leadership", 80)], 50)];

        let aggregated = aggregate_team_segments(&categories, &profiles);
        assert_eq!(aggregated[1].label, "Juggling");
        assert_eq!(aggregated[1].avg_score, 0);
        assert_eq!(aggregated[1].completion_rate, 0);
    }

    #[test]
    fn test_average_completion() {
        let profiles = vec![
            profile("u1", vec![], 66),
            profile("u2", vec![], 84),
        ];
        assert_eq!(average_completion(&profiles), 75);
        assert_eq!(average_completion(&[]), 0);
    }
}
