use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

use crate::error::DataError;

pub const MATCHES_FILE: &str = "matches.csv";
pub const DELIVERIES_FILE: &str = "deliveries.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TossDecision {
    Bat,
    Field,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub match_id: u64,
    pub season: String,
    pub team1: String,
    pub team2: String,
    pub venue: String,
    pub toss_winner: String,
    pub toss_decision: TossDecision,
    pub date: NaiveDate,
    pub winner: Option<String>,
}

impl Match {
    pub fn involves(&self, team: &str) -> bool {
        self.team1 == team || self.team2 == team
    }

    /// True when the side that won the toss also won the match.
    pub fn toss_winner_won(&self) -> bool {
        self.winner.as_deref() == Some(self.toss_winner.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Delivery {
    pub match_id: u64,
    pub over: u32,
    pub ball: u32,
    #[serde(alias = "batter")]
    pub batsman: String,
    pub bowler: String,
    pub batsman_runs: u32,
    pub total_runs: u32,
    #[serde(default, deserialize_with = "nullable_text")]
    pub player_dismissed: Option<String>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub dismissal_kind: Option<String>,
}

impl Delivery {
    /// Derived on every access so raw and filtered views always agree.
    pub fn is_wicket(&self) -> bool {
        self.player_dismissed.is_some()
    }
}

/// In-memory snapshot of both sources. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub matches: Vec<Match>,
    pub deliveries: Vec<Delivery>,
}

impl Dataset {
    pub fn new(matches: Vec<Match>, deliveries: Vec<Delivery>) -> Self {
        Self {
            matches,
            deliveries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Locations of the two CSV sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataSources {
    pub matches: PathBuf,
    pub deliveries: PathBuf,
}

impl DataSources {
    pub fn new(matches: impl Into<PathBuf>, deliveries: impl Into<PathBuf>) -> Self {
        Self {
            matches: matches.into(),
            deliveries: deliveries.into(),
        }
    }

    pub fn from_dir(dir: &Path) -> Self {
        Self::new(dir.join(MATCHES_FILE), dir.join(DELIVERIES_FILE))
    }
}

#[derive(Debug, Deserialize)]
struct MatchRecord {
    #[serde(alias = "id")]
    match_id: u64,
    season: String,
    team1: String,
    team2: String,
    venue: String,
    toss_winner: String,
    toss_decision: TossDecision,
    #[serde(default, deserialize_with = "nullable_text")]
    winner: Option<String>,
    date: String,
}

impl MatchRecord {
    fn into_match(self) -> Result<Match, DataError> {
        let Some(date) = parse_match_date(&self.date) else {
            return Err(DataError::MalformedDate {
                match_id: self.match_id,
                raw: self.date,
            });
        };
        Ok(Match {
            match_id: self.match_id,
            season: self.season,
            team1: self.team1,
            team2: self.team2,
            venue: self.venue,
            toss_winner: self.toss_winner,
            toss_decision: self.toss_decision,
            date,
            winner: self.winner,
        })
    }
}

/// Read both sources. Fails as a whole: a missing file or a single bad date
/// yields no tables at all.
pub fn load(sources: &DataSources) -> Result<Dataset, DataError> {
    let matches = read_csv::<MatchRecord>(&sources.matches)?
        .into_iter()
        .map(MatchRecord::into_match)
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|err| {
            warn!(path = %sources.matches.display(), %err, "match table rejected");
        })?;
    let deliveries = read_csv::<Delivery>(&sources.deliveries)?;

    info!(
        matches = matches.len(),
        deliveries = deliveries.len(),
        "loaded dataset"
    );
    Ok(Dataset::new(matches, deliveries))
}

fn read_csv<T>(path: &Path) -> Result<Vec<T>, DataError>
where
    T: for<'de> Deserialize<'de>,
{
    let file = File::open(path).map_err(|source| DataError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut out = Vec::new();
    for row in reader.deserialize::<T>() {
        out.push(row.map_err(|err| csv_error(path, err))?);
    }
    Ok(out)
}

fn csv_error(path: &Path, err: csv::Error) -> DataError {
    let line = err.position().map(|pos| pos.line()).unwrap_or_default();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => DataError::DataUnavailable {
            path: path.to_path_buf(),
            source,
        },
        kind => DataError::MalformedRecord {
            path: path.to_path_buf(),
            line,
            reason: describe_csv_kind(&kind),
        },
    }
}

fn describe_csv_kind(kind: &csv::ErrorKind) -> String {
    match kind {
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} fields, found {len}"),
        csv::ErrorKind::Utf8 { err, .. } => err.to_string(),
        other => format!("{other:?}"),
    }
}

/// Accepts the date layouts seen across published IPL dumps. Slash dates are
/// read day-first and fall back to month-first when that is the only valid
/// reading, so `04/05/2017` is 4 May but `04/30/2017` is 30 April.
pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    const LONG_YEAR_FORMATS: [&str; 5] =
        ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%m/%d/%Y"];
    const SHORT_YEAR_FORMATS: [&str; 3] = ["%d/%m/%y", "%d-%m-%y", "%m/%d/%y"];

    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }

    let parts = raw.split(['/', '-']).collect::<Vec<_>>();
    let short_year = parts.len() == 3 && parts[0].len() <= 2 && parts[2].len() == 2;
    let formats: &[&str] = if short_year {
        &SHORT_YEAR_FORMATS
    } else {
        &LONG_YEAR_FORMATS
    };
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn is_null_marker(raw: &str) -> bool {
    const MARKERS: [&str; 6] = ["", "na", "n/a", "nan", "null", "none"];
    let lowered = raw.trim().to_ascii_lowercase();
    MARKERS.contains(&lowered.as_str())
}

fn nullable_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !is_null_marker(s))
        .map(|s| s.trim().to_string()))
}
