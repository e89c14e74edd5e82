use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::dataset::{DELIVERIES_FILE, Dataset, Delivery, MATCHES_FILE, Match, TossDecision};

const TEAMS: [&str; 8] = [
    "Chennai Super Kings",
    "Delhi Capitals",
    "Kolkata Knight Riders",
    "Mumbai Indians",
    "Punjab Kings",
    "Rajasthan Royals",
    "Royal Challengers Bangalore",
    "Sunrisers Hyderabad",
];

const VENUES: [&str; 8] = [
    "Arun Jaitley Stadium",
    "Eden Gardens",
    "M Chinnaswamy Stadium",
    "MA Chidambaram Stadium",
    "Punjab Cricket Association Stadium",
    "Rajiv Gandhi International Stadium",
    "Sawai Mansingh Stadium",
    "Wankhede Stadium",
];

const DISMISSALS: [&str; 6] = [
    "caught",
    "bowled",
    "lbw",
    "run out",
    "stumped",
    "caught and bowled",
];

const FIRST_SEASON: i32 = 2015;
const OVERS: u32 = 20;
const SQUAD: usize = 11;
const BOWLERS: usize = 5;

/// Seeded synthetic tournament history for demos and benchmarks.
pub fn generate(seed: u64, match_count: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut matches = Vec::with_capacity(match_count);
    let mut deliveries = Vec::new();

    for idx in 0..match_count {
        let match_id = idx as u64 + 1;
        let season = FIRST_SEASON + (idx / 60) as i32;
        let mut pair = TEAMS.choose_multiple(&mut rng, 2);
        let (Some(team1), Some(team2)) = (pair.next(), pair.next()) else {
            continue;
        };
        let toss_winner = if rng.gen_bool(0.5) { team1 } else { team2 };
        let toss_decision = if rng.gen_bool(0.6) {
            TossDecision::Field
        } else {
            TossDecision::Bat
        };
        let venue = VENUES[rng.gen_range(0..VENUES.len())];
        let date = NaiveDate::from_ymd_opt(season, 4, 1)
            .map(|start| start + ChronoDuration::days((idx % 60) as i64))
            .unwrap_or_default();

        let (batting_first, bowling_first) = match (toss_winner == team1, toss_decision) {
            (true, TossDecision::Bat) | (false, TossDecision::Field) => (team1, team2),
            _ => (team2, team1),
        };
        let first = simulate_innings(
            &mut rng,
            match_id,
            batting_first,
            bowling_first,
            &mut deliveries,
        );
        let second = simulate_innings(
            &mut rng,
            match_id,
            bowling_first,
            batting_first,
            &mut deliveries,
        );

        let winner = if rng.gen_bool(0.03) {
            None
        } else if first >= second {
            Some(batting_first.to_string())
        } else {
            Some(bowling_first.to_string())
        };

        matches.push(Match {
            match_id,
            season: season.to_string(),
            team1: team1.to_string(),
            team2: team2.to_string(),
            venue: venue.to_string(),
            toss_winner: toss_winner.to_string(),
            toss_decision,
            date,
            winner,
        });
    }

    Dataset::new(matches, deliveries)
}

fn player(team: &str, slot: usize) -> String {
    let initials = team
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .collect::<String>();
    format!("{initials} Player {}", slot + 1)
}

fn simulate_innings(
    rng: &mut StdRng,
    match_id: u64,
    batting: &str,
    bowling: &str,
    out: &mut Vec<Delivery>,
) -> u32 {
    let mut striker = 0usize;
    let mut non_striker = 1usize;
    let mut next_in = 2usize;
    let mut total = 0u32;
    let mut wickets = 0usize;

    for over in 1..=OVERS {
        let bowler = player(bowling, SQUAD - 1 - rng.gen_range(0..BOWLERS));
        for ball in 1..=6 {
            if wickets >= SQUAD - 1 {
                return total;
            }
            let batsman_runs = *[0, 0, 0, 1, 1, 1, 2, 3, 4, 4, 6]
                .choose(rng)
                .unwrap_or(&0);
            let extras = u32::from(rng.gen_bool(0.06));
            let dismissed = rng.gen_bool(if over >= 16 { 0.08 } else { 0.045 });
            let batsman = player(batting, striker);

            out.push(Delivery {
                match_id,
                over,
                ball,
                batsman: batsman.clone(),
                bowler: bowler.clone(),
                batsman_runs: if dismissed { 0 } else { batsman_runs },
                total_runs: if dismissed { extras } else { batsman_runs + extras },
                player_dismissed: dismissed.then(|| batsman.clone()),
                dismissal_kind: dismissed
                    .then(|| DISMISSALS[rng.gen_range(0..DISMISSALS.len())].to_string()),
            });

            if dismissed {
                wickets += 1;
                striker = next_in;
                next_in += 1;
            } else {
                total += batsman_runs + extras;
                if batsman_runs % 2 == 1 {
                    std::mem::swap(&mut striker, &mut non_striker);
                }
            }
        }
        std::mem::swap(&mut striker, &mut non_striker);
    }
    total
}

/// Write `dataset` as the two CSV sources the loader reads.
pub fn write_csv(dataset: &Dataset, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    let matches_path = dir.join(MATCHES_FILE);
    let mut writer = csv::Writer::from_path(&matches_path)
        .with_context(|| format!("open {}", matches_path.display()))?;
    writer.write_record([
        "match_id",
        "season",
        "team1",
        "team2",
        "venue",
        "toss_winner",
        "toss_decision",
        "winner",
        "date",
    ])?;
    for m in &dataset.matches {
        let decision = match m.toss_decision {
            TossDecision::Bat => "bat",
            TossDecision::Field => "field",
        };
        writer.write_record([
            m.match_id.to_string(),
            m.season.clone(),
            m.team1.clone(),
            m.team2.clone(),
            m.venue.clone(),
            m.toss_winner.clone(),
            decision.to_string(),
            m.winner.clone().unwrap_or_default(),
            m.date.format("%Y-%m-%d").to_string(),
        ])?;
    }
    writer.flush().context("flush matches csv")?;

    let deliveries_path = dir.join(DELIVERIES_FILE);
    let mut writer = csv::Writer::from_path(&deliveries_path)
        .with_context(|| format!("open {}", deliveries_path.display()))?;
    writer.write_record([
        "match_id",
        "over",
        "ball",
        "batsman",
        "bowler",
        "batsman_runs",
        "total_runs",
        "player_dismissed",
        "dismissal_kind",
    ])?;
    for d in &dataset.deliveries {
        writer.write_record([
            d.match_id.to_string(),
            d.over.to_string(),
            d.ball.to_string(),
            d.batsman.clone(),
            d.bowler.clone(),
            d.batsman_runs.to_string(),
            d.total_runs.to_string(),
            d.player_dismissed.clone().unwrap_or_default(),
            d.dismissal_kind.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush().context("flush deliveries csv")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_history() {
        let a = generate(7, 12);
        let b = generate(7, 12);
        assert_eq!(a.matches, b.matches);
        assert_eq!(a.deliveries, b.deliveries);
    }

    #[test]
    fn generated_matches_respect_invariants() {
        let dataset = generate(11, 40);
        assert_eq!(dataset.matches.len(), 40);
        for m in &dataset.matches {
            assert_ne!(m.team1, m.team2);
            if let Some(w) = &m.winner {
                assert!(m.involves(w));
            }
            assert!(m.involves(&m.toss_winner));
        }
        let ids = dataset
            .matches
            .iter()
            .map(|m| m.match_id)
            .collect::<std::collections::HashSet<_>>();
        assert!(dataset.deliveries.iter().all(|d| ids.contains(&d.match_id)));
        assert!(dataset.deliveries.iter().all(|d| (1..=20).contains(&d.over)));
    }
}
