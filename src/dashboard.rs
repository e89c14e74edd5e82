use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::dataset::Dataset;
use crate::filter::{self, FilterSelection};
use crate::kpi::{self, Kpis};
use crate::phase_metrics::{self, DismissalCount, PhaseStats};
use crate::player_metrics::{self, BatsmanStats, BowlerStats};
use crate::team_metrics::{self, TeamWinRate, TossAdvantage};
use crate::venue_metrics::{self, VenueScoring, VenueTossDecision};

pub const TITLE_TEAM_WINS: &str = "Team Win Percentage";
pub const TITLE_TOSS_ADVANTAGE: &str = "Win Rate After Winning Toss";
pub const TITLE_TOP_BATSMEN: &str = "Top 10 Run Scorers";
pub const TITLE_TOP_BOWLERS: &str = "Top 10 Wicket Takers";
pub const TITLE_VENUE_SCORING: &str = "Average Runs per Match by Venue";
pub const TITLE_TOSS_DECISION: &str = "Teams Choosing to Bat First";
pub const TITLE_PHASE_RUN_RATE: &str = "Run Rate by Match Phase";
pub const TITLE_DISMISSALS: &str = "Dismissal Types";

pub const INSIGHTS: [&str; 5] = [
    "Toss Strategy: toss winners have a slight advantage, especially at certain venues.",
    "Venue Impact: some stadiums are clearly more batting-friendly.",
    "Player Impact: high strike rates and lower economy rates correlate with winning.",
    "Game Phases: death overs are the most expensive, plan bowling accordingly.",
    "Balanced Teams: success depends on consistent performers across all roles.",
];

/// A result table plus the heading it is shown under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTable<T> {
    pub title: &'static str,
    pub rows: Vec<T>,
}

impl<T> MetricTable<T> {
    fn new(title: &'static str, rows: Vec<T>) -> Self {
        Self { title, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateSpan {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

/// Everything a presentation layer needs for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub kpis: Kpis,
    pub date_span: Option<DateSpan>,
    pub team_win_rates: MetricTable<TeamWinRate>,
    pub toss_advantage: MetricTable<TossAdvantage>,
    pub top_batsmen: MetricTable<BatsmanStats>,
    pub top_bowlers: MetricTable<BowlerStats>,
    pub venue_scoring: MetricTable<VenueScoring>,
    pub toss_decisions: MetricTable<VenueTossDecision>,
    pub phase_run_rates: MetricTable<PhaseStats>,
    pub dismissals: MetricTable<DismissalCount>,
}

/// Filter the dataset and run every aggregator over the result.
///
/// Pure: the same dataset and selection always give an equal view.
pub fn render(dataset: &Dataset, selection: &FilterSelection) -> DashboardView {
    let tables = filter::filter(dataset, selection);
    let matches = tables.matches.as_slice();
    let deliveries = tables.deliveries.as_slice();

    let date_span = matches
        .iter()
        .map(|m| m.date)
        .min()
        .zip(matches.iter().map(|m| m.date).max())
        .map(|(first, last)| DateSpan { first, last });

    let view = DashboardView {
        kpis: kpi::kpis(matches, deliveries),
        date_span,
        team_win_rates: MetricTable::new(TITLE_TEAM_WINS, team_metrics::team_win_rates(matches)),
        toss_advantage: MetricTable::new(
            TITLE_TOSS_ADVANTAGE,
            team_metrics::toss_advantage(matches),
        ),
        top_batsmen: MetricTable::new(TITLE_TOP_BATSMEN, player_metrics::top_batsmen(deliveries)),
        top_bowlers: MetricTable::new(TITLE_TOP_BOWLERS, player_metrics::top_bowlers(deliveries)),
        venue_scoring: MetricTable::new(
            TITLE_VENUE_SCORING,
            venue_metrics::venue_scoring(matches, deliveries),
        ),
        toss_decisions: MetricTable::new(
            TITLE_TOSS_DECISION,
            venue_metrics::toss_decision_by_venue(matches),
        ),
        phase_run_rates: MetricTable::new(
            TITLE_PHASE_RUN_RATE,
            phase_metrics::phase_run_rates(deliveries),
        ),
        dismissals: MetricTable::new(
            TITLE_DISMISSALS,
            phase_metrics::dismissal_distribution(deliveries),
        ),
    };

    debug!(
        matches = view.kpis.matches,
        balls = view.kpis.balls,
        "rendered dashboard view"
    );
    view
}
