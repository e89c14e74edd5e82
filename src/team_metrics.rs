use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::Match;
use crate::numeric::{percent, round_dp};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamWinRate {
    pub team: String,
    pub wins: usize,
    pub total_matches: usize,
    pub win_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TossAdvantage {
    pub team: String,
    pub toss_wins: usize,
    pub won_after_toss: usize,
    pub toss_win_rate: f64,
}

/// Win percentage for every team that won at least once in `matches`.
///
/// Teams without a win are left out rather than reported at zero. No-result
/// matches count towards both sides' totals but give nobody a win.
pub fn team_win_rates(matches: &[&Match]) -> Vec<TeamWinRate> {
    let mut wins: BTreeMap<&str, usize> = BTreeMap::new();
    for m in matches {
        if let Some(winner) = m.winner.as_deref() {
            *wins.entry(winner).or_default() += 1;
        }
    }

    let mut rows = wins
        .into_iter()
        .map(|(team, wins)| {
            let total_matches = matches.iter().filter(|m| m.involves(team)).count();
            TeamWinRate {
                team: team.to_string(),
                wins,
                total_matches,
                win_percentage: round_dp(percent(wins, total_matches), 1),
            }
        })
        .collect::<Vec<_>>();

    rows.sort_by(|a, b| b.win_percentage.total_cmp(&a.win_percentage));
    rows
}

/// How often the toss winner went on to win, per team that won a toss.
pub fn toss_advantage(matches: &[&Match]) -> Vec<TossAdvantage> {
    let mut tally: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for m in matches {
        let entry = tally.entry(m.toss_winner.as_str()).or_default();
        entry.0 += 1;
        if m.toss_winner_won() {
            entry.1 += 1;
        }
    }

    let mut rows = tally
        .into_iter()
        .map(|(team, (toss_wins, won_after_toss))| TossAdvantage {
            team: team.to_string(),
            toss_wins,
            won_after_toss,
            toss_win_rate: percent(won_after_toss, toss_wins),
        })
        .collect::<Vec<_>>();

    rows.sort_by(|a, b| b.toss_wins.cmp(&a.toss_wins));
    rows
}
