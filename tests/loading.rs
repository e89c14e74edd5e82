use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use cricket_terminal::dataset::{self, DataSources, TossDecision};
use cricket_terminal::dataset_cache::DatasetCache;
use cricket_terminal::error::DataError;

fn fixture_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn write_sources(dir: &Path, matches: &str, deliveries: &str) -> DataSources {
    let sources = DataSources::from_dir(dir);
    fs::write(&sources.matches, matches).expect("write matches");
    fs::write(&sources.deliveries, deliveries).expect("write deliveries");
    sources
}

const MATCHES_HEADER: &str =
    "match_id,season,team1,team2,venue,toss_winner,toss_decision,winner,date\n";
const DELIVERIES_HEADER: &str = "match_id,over,ball,batsman,bowler,batsman_runs,total_runs,player_dismissed,dismissal_kind\n";

#[test]
fn loads_fixture_tables() {
    let data = dataset::load(&DataSources::from_dir(&fixture_dir())).expect("fixture should load");
    assert_eq!(data.matches.len(), 6);
    assert_eq!(data.deliveries.len(), 13);

    let first = &data.matches[0];
    assert_eq!(first.match_id, 1);
    assert_eq!(first.season, "2017");
    assert_eq!(first.toss_decision, TossDecision::Field);
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2017, 4, 5).unwrap());
    assert_eq!(first.winner.as_deref(), Some("Sunrisers Hyderabad"));
}

#[test]
fn no_result_and_short_year_dates() {
    let data = dataset::load(&DataSources::from_dir(&fixture_dir())).unwrap();
    let washed_out = data.matches.iter().find(|m| m.match_id == 5).unwrap();
    assert_eq!(washed_out.winner, None);
    assert_eq!(washed_out.toss_decision, TossDecision::Bat);
    assert_eq!(washed_out.date, NaiveDate::from_ymd_opt(2019, 3, 30).unwrap());
}

#[test]
fn null_markers_are_not_wickets() {
    let data = dataset::load(&DataSources::from_dir(&fixture_dir())).unwrap();
    let marked_na = data.deliveries.iter().find(|d| d.match_id == 4).unwrap();
    assert_eq!(marked_na.player_dismissed, None);
    assert_eq!(marked_na.dismissal_kind, None);
    assert!(!marked_na.is_wicket());
    assert_eq!(data.deliveries.iter().filter(|d| d.is_wicket()).count(), 3);
}

#[test]
fn missing_source_is_unavailable() {
    let tmp = tempfile::tempdir().unwrap();
    let err = dataset::load(&DataSources::from_dir(tmp.path())).unwrap_err();
    assert!(err.is_unavailable(), "unexpected error: {err}");
    match err {
        DataError::DataUnavailable { path, .. } => assert!(path.ends_with("matches.csv")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_deliveries_fails_whole_load() {
    let tmp = tempfile::tempdir().unwrap();
    let sources = DataSources::from_dir(tmp.path());
    fs::write(
        &sources.matches,
        format!("{MATCHES_HEADER}1,2020,A,B,V1,A,bat,A,2020-09-19\n"),
    )
    .unwrap();
    let err = dataset::load(&sources).unwrap_err();
    assert!(err.is_unavailable());
}

#[test]
fn bad_date_fails_whole_load() {
    let tmp = tempfile::tempdir().unwrap();
    let sources = write_sources(
        tmp.path(),
        &format!(
            "{MATCHES_HEADER}1,2020,A,B,V1,A,bat,A,2020-09-19\n2,2020,A,B,V1,B,field,B,sometime in may\n"
        ),
        DELIVERIES_HEADER,
    );
    match dataset::load(&sources) {
        Err(DataError::MalformedDate { match_id, raw }) => {
            assert_eq!(match_id, 2);
            assert_eq!(raw, "sometime in may");
        }
        other => panic!("expected malformed date, got {other:?}"),
    }
}

#[test]
fn non_numeric_over_is_malformed_record() {
    let tmp = tempfile::tempdir().unwrap();
    let sources = write_sources(
        tmp.path(),
        &format!("{MATCHES_HEADER}1,2020,A,B,V1,A,bat,A,2020-09-19\n"),
        &format!("{DELIVERIES_HEADER}1,first,1,X,Y,0,0,,\n"),
    );
    let err = dataset::load(&sources).unwrap_err();
    assert!(matches!(err, DataError::MalformedRecord { line: 2, .. }), "{err}");
}

#[test]
fn accepts_batter_column_alias() {
    let tmp = tempfile::tempdir().unwrap();
    let sources = write_sources(
        tmp.path(),
        &format!("{MATCHES_HEADER}1,2020,A,B,V1,A,bat,null,2020-09-19\n"),
        "match_id,over,ball,batter,bowler,batsman_runs,total_runs,player_dismissed,dismissal_kind\n\
         1,1,1,X,Y,4,4,,\n\
         1,20,1,X,Y,0,1,X,bowled\n",
    );
    let data = dataset::load(&sources).unwrap();
    assert_eq!(data.matches[0].winner, None);
    assert_eq!(data.deliveries[0].batsman, "X");
    assert!(data.deliveries[1].is_wicket());
    assert_eq!(data.deliveries[1].dismissal_kind.as_deref(), Some("bowled"));
}

#[test]
fn cache_returns_same_snapshot_until_reload() {
    let tmp = tempfile::tempdir().unwrap();
    let sources = write_sources(
        tmp.path(),
        &format!("{MATCHES_HEADER}1,2020,A,B,V1,A,bat,A,2020-09-19\n"),
        &format!("{DELIVERIES_HEADER}1,1,1,X,Y,4,4,,\n"),
    );

    let mut cache = DatasetCache::new();
    let first = cache.get_or_load(&sources).unwrap();
    let second = cache.get_or_load(&sources).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.load_count(), 1);
    assert_eq!(cache.len(), 1);

    // Changes on disk are only picked up by an explicit reload.
    fs::write(
        &sources.deliveries,
        format!("{DELIVERIES_HEADER}1,1,1,X,Y,4,4,,\n1,1,2,X,Y,6,6,,\n"),
    )
    .unwrap();
    let stale = cache.get_or_load(&sources).unwrap();
    assert_eq!(stale.deliveries.len(), 1);

    let fresh = cache.reload(&sources).unwrap();
    assert_eq!(fresh.deliveries.len(), 2);
    assert!(!Arc::ptr_eq(&first, &fresh));
    assert_eq!(cache.load_count(), 2);
}

#[test]
fn cache_keys_on_resolved_location() {
    let tmp = tempfile::tempdir().unwrap();
    let sources = write_sources(
        tmp.path(),
        &format!("{MATCHES_HEADER}1,2020,A,B,V1,A,bat,A,2020-09-19\n"),
        DELIVERIES_HEADER,
    );
    let dotted = DataSources::from_dir(&tmp.path().join("."));

    let mut cache = DatasetCache::new();
    let a = cache.get_or_load(&sources).unwrap();
    let b = cache.get_or_load(&dotted).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.load_count(), 1);
}

#[test]
fn failed_loads_are_not_cached() {
    let tmp = tempfile::tempdir().unwrap();
    let sources = DataSources::from_dir(tmp.path());
    let mut cache = DatasetCache::new();
    assert!(cache.get_or_load(&sources).is_err());
    assert!(cache.is_empty());

    write_sources(
        tmp.path(),
        &format!("{MATCHES_HEADER}1,2020,A,B,V1,A,bat,A,2020-09-19\n"),
        DELIVERIES_HEADER,
    );
    let loaded = cache.get_or_load(&sources).unwrap();
    assert_eq!(loaded.matches.len(), 1);
    assert!(cache.invalidate(&sources));
    assert!(!cache.invalidate(&sources));
    assert!(cache.is_empty());
}
