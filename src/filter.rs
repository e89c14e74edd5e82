use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::dataset::{Dataset, Delivery, Match};

/// Venues selected by default. The other two dimensions default to "all".
pub const DEFAULT_VENUE_COUNT: usize = 5;

/// Sorted distinct values available to each selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainOptions {
    pub seasons: Vec<String>,
    pub teams: Vec<String>,
    pub venues: Vec<String>,
}

impl DomainOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut seasons = BTreeSet::new();
        let mut teams = BTreeSet::new();
        let mut venues = BTreeSet::new();
        for m in &dataset.matches {
            seasons.insert(m.season.clone());
            teams.insert(m.team1.clone());
            teams.insert(m.team2.clone());
            venues.insert(m.venue.clone());
        }
        Self {
            seasons: seasons.into_iter().collect(),
            teams: teams.into_iter().collect(),
            venues: venues.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub seasons: BTreeSet<String>,
    pub teams: BTreeSet<String>,
    pub venues: BTreeSet<String>,
}

impl FilterSelection {
    /// All seasons, all teams, first [`DEFAULT_VENUE_COUNT`] venues.
    pub fn defaults(options: &DomainOptions) -> Self {
        Self {
            seasons: options.seasons.iter().cloned().collect(),
            teams: options.teams.iter().cloned().collect(),
            venues: options
                .venues
                .iter()
                .take(DEFAULT_VENUE_COUNT)
                .cloned()
                .collect(),
        }
    }

    pub fn everything(options: &DomainOptions) -> Self {
        Self {
            seasons: options.seasons.iter().cloned().collect(),
            teams: options.teams.iter().cloned().collect(),
            venues: options.venues.iter().cloned().collect(),
        }
    }

    pub fn admits(&self, m: &Match) -> bool {
        self.seasons.contains(&m.season)
            && (self.teams.contains(&m.team1) || self.teams.contains(&m.team2))
            && self.venues.contains(&m.venue)
    }
}

/// Rows surviving a selection, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredTables<'a> {
    pub matches: Vec<&'a Match>,
    pub deliveries: Vec<&'a Delivery>,
}

impl FilteredTables<'_> {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredTables<'a> {
    let matches = dataset
        .matches
        .iter()
        .filter(|m| selection.admits(m))
        .collect::<Vec<_>>();

    let kept_ids = matches.iter().map(|m| m.match_id).collect::<HashSet<_>>();
    let deliveries = dataset
        .deliveries
        .iter()
        .filter(|d| kept_ids.contains(&d.match_id))
        .collect::<Vec<_>>();

    debug!(
        matches = matches.len(),
        deliveries = deliveries.len(),
        "filtered dataset"
    );
    FilteredTables {
        matches,
        deliveries,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::dataset::TossDecision;

    fn m(id: u64, venue: &str) -> Match {
        Match {
            match_id: id,
            season: "2019".into(),
            team1: "A".into(),
            team2: "B".into(),
            venue: venue.into(),
            toss_winner: "A".into(),
            toss_decision: TossDecision::Bat,
            date: NaiveDate::from_ymd_opt(2019, 4, 1).unwrap(),
            winner: None,
        }
    }

    #[test]
    fn default_venues_take_first_five_sorted() {
        let venues = ["G", "C", "A", "F", "B", "E", "D"];
        let dataset = Dataset::new(
            venues
                .iter()
                .enumerate()
                .map(|(i, v)| m(i as u64, v))
                .collect(),
            Vec::new(),
        );
        let options = DomainOptions::from_dataset(&dataset);
        let selection = FilterSelection::defaults(&options);
        let picked = selection.venues.iter().cloned().collect::<Vec<_>>();
        assert_eq!(picked, vec!["A", "B", "C", "D", "E"]);
        assert_eq!(selection.seasons.len(), 1);
        assert_eq!(selection.teams.len(), 2);
    }

    #[test]
    fn team_options_cover_both_sides() {
        let mut only_away = m(1, "V");
        only_away.team2 = "Z".into();
        let dataset = Dataset::new(vec![only_away], Vec::new());
        let options = DomainOptions::from_dataset(&dataset);
        assert_eq!(options.teams, vec!["A", "Z"]);
    }
}
