use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::dataset::{Delivery, Match, TossDecision};
use crate::numeric::{percent, round_dp};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueScoring {
    pub venue: String,
    pub matches: usize,
    pub avg_runs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueTossDecision {
    pub venue: String,
    pub bat: usize,
    pub field: usize,
    pub bat_percentage: f64,
}

/// Mean match aggregate per venue, highest first.
///
/// Only matches with at least one delivery take part, since the per-match
/// totals are joined onto the match list.
pub fn venue_scoring(matches: &[&Match], deliveries: &[&Delivery]) -> Vec<VenueScoring> {
    let mut runs_per_match: HashMap<u64, u64> = HashMap::new();
    for d in deliveries {
        *runs_per_match.entry(d.match_id).or_default() += u64::from(d.total_runs);
    }

    let mut by_venue: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
    for m in matches {
        let Some(runs) = runs_per_match.get(&m.match_id) else {
            continue;
        };
        let entry = by_venue.entry(m.venue.as_str()).or_default();
        entry.0 += 1;
        entry.1 += runs;
    }

    let mut rows = by_venue
        .into_iter()
        .map(|(venue, (count, runs))| VenueScoring {
            venue: venue.to_string(),
            matches: count,
            avg_runs: runs as f64 / count as f64,
        })
        .collect::<Vec<_>>();

    rows.sort_by(|a, b| b.avg_runs.total_cmp(&a.avg_runs));
    rows
}

/// Share of toss winners electing to bat, per venue. A venue where nobody
/// chose one option still gets a zero count for it.
pub fn toss_decision_by_venue(matches: &[&Match]) -> Vec<VenueTossDecision> {
    let mut by_venue: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for m in matches {
        let entry = by_venue.entry(m.venue.as_str()).or_default();
        match m.toss_decision {
            TossDecision::Bat => entry.0 += 1,
            TossDecision::Field => entry.1 += 1,
        }
    }

    by_venue
        .into_iter()
        .map(|(venue, (bat, field))| VenueTossDecision {
            venue: venue.to_string(),
            bat,
            field,
            bat_percentage: round_dp(percent(bat, bat + field), 1),
        })
        .collect()
}
