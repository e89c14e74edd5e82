use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::dataset::Delivery;
use crate::numeric::round_dp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Phase {
    Powerplay,
    Middle,
    Death,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Powerplay, Phase::Middle, Phase::Death];

    /// Overs 1-6 are the powerplay, 7-15 the middle overs, 16 onwards the
    /// death. Every over number lands in exactly one phase.
    pub fn of_over(over: u32) -> Self {
        match over {
            0..=6 => Phase::Powerplay,
            7..=15 => Phase::Middle,
            _ => Phase::Death,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Powerplay => "Powerplay (1-6)",
            Phase::Middle => "Middle (7-15)",
            Phase::Death => "Death (16-20)",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseStats {
    pub phase: Phase,
    pub total_runs: u64,
    pub wickets: usize,
    pub balls: usize,
    pub run_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DismissalCount {
    pub kind: String,
    pub count: usize,
}

/// Runs, wickets and runs-per-six-balls for each phase that saw a delivery,
/// in innings order.
pub fn phase_run_rates(deliveries: &[&Delivery]) -> Vec<PhaseStats> {
    let mut by_phase: BTreeMap<Phase, (u64, usize, usize)> = BTreeMap::new();
    for d in deliveries {
        let entry = by_phase.entry(Phase::of_over(d.over)).or_default();
        entry.0 += u64::from(d.total_runs);
        if d.is_wicket() {
            entry.1 += 1;
        }
        entry.2 += 1;
    }

    by_phase
        .into_iter()
        .map(|(phase, (total_runs, wickets, balls))| PhaseStats {
            phase,
            total_runs,
            wickets,
            balls,
            run_rate: round_dp(total_runs as f64 / balls as f64 * 6.0, 2),
        })
        .collect()
}

/// Frequency of each dismissal kind among wicket deliveries, most common
/// first. Wickets without a recorded kind are not counted.
pub fn dismissal_distribution(deliveries: &[&Delivery]) -> Vec<DismissalCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for d in deliveries.iter().filter(|d| d.is_wicket()) {
        if let Some(kind) = d.dismissal_kind.as_deref() {
            *counts.entry(kind).or_default() += 1;
        }
    }

    let mut rows = counts
        .into_iter()
        .map(|(kind, count)| DismissalCount {
            kind: kind.to_string(),
            count,
        })
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}
