use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::dataset::Delivery;
use crate::numeric::round_dp;

/// Minimum balls faced before a batsman is ranked.
pub const MIN_BALLS_FACED: usize = 50;
/// Minimum wickets before a bowler is ranked.
pub const MIN_WICKETS: usize = 5;
pub const LEADERBOARD_SIZE: usize = 10;
/// Balls credited to a bowler per match when estimating economy.
pub const BALLS_PER_BOWLER_MATCH: usize = 24;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatsmanStats {
    pub batsman: String,
    pub total_runs: u64,
    pub matches: usize,
    pub balls_faced: usize,
    pub strike_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlerStats {
    pub bowler: String,
    pub wickets: usize,
    pub runs_conceded: u64,
    pub matches: usize,
    pub economy: f64,
}

#[derive(Default)]
struct Tally {
    runs: u64,
    balls: usize,
    wickets: usize,
    match_ids: HashSet<u64>,
}

pub fn strike_rate(total_runs: u64, balls_faced: usize) -> f64 {
    if balls_faced == 0 {
        return 0.0;
    }
    round_dp(total_runs as f64 / balls_faced as f64 * 100.0, 2)
}

/// Runs conceded per ball over an assumed four overs a match, not per over
/// actually bowled.
pub fn economy(runs_conceded: u64, matches: usize) -> f64 {
    let balls = matches * BALLS_PER_BOWLER_MATCH;
    if balls == 0 {
        return 0.0;
    }
    round_dp(runs_conceded as f64 / balls as f64, 2)
}

pub fn top_batsmen(deliveries: &[&Delivery]) -> Vec<BatsmanStats> {
    let mut by_batsman: BTreeMap<&str, Tally> = BTreeMap::new();
    for d in deliveries {
        let t = by_batsman.entry(d.batsman.as_str()).or_default();
        t.runs += u64::from(d.batsman_runs);
        t.balls += 1;
        t.match_ids.insert(d.match_id);
    }

    let mut rows = by_batsman
        .into_iter()
        .filter(|(_, t)| t.balls >= MIN_BALLS_FACED)
        .map(|(name, t)| BatsmanStats {
            batsman: name.to_string(),
            total_runs: t.runs,
            matches: t.match_ids.len(),
            balls_faced: t.balls,
            strike_rate: strike_rate(t.runs, t.balls),
        })
        .collect::<Vec<_>>();

    rows.sort_by(|a, b| b.total_runs.cmp(&a.total_runs));
    rows.truncate(LEADERBOARD_SIZE);
    rows
}

pub fn top_bowlers(deliveries: &[&Delivery]) -> Vec<BowlerStats> {
    let mut by_bowler: BTreeMap<&str, Tally> = BTreeMap::new();
    for d in deliveries {
        let t = by_bowler.entry(d.bowler.as_str()).or_default();
        t.runs += u64::from(d.total_runs);
        if d.is_wicket() {
            t.wickets += 1;
        }
        t.match_ids.insert(d.match_id);
    }

    let mut rows = by_bowler
        .into_iter()
        .filter(|(_, t)| t.wickets >= MIN_WICKETS)
        .map(|(name, t)| BowlerStats {
            bowler: name.to_string(),
            wickets: t.wickets,
            runs_conceded: t.runs,
            matches: t.match_ids.len(),
            economy: economy(t.runs, t.match_ids.len()),
        })
        .collect::<Vec<_>>();

    rows.sort_by(|a, b| b.wickets.cmp(&a.wickets));
    rows.truncate(LEADERBOARD_SIZE);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strike_rate_is_runs_per_hundred_balls() {
        assert_eq!(strike_rate(120, 60), 200.0);
        assert_eq!(strike_rate(10, 3), 333.33);
        assert_eq!(strike_rate(5, 0), 0.0);
    }

    #[test]
    fn economy_uses_fixed_balls_per_match() {
        assert_eq!(economy(96, 2), 2.0);
        assert_eq!(economy(50, 1), 2.08);
        assert_eq!(economy(50, 0), 0.0);
    }
}
