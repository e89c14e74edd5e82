use std::path::PathBuf;
use std::sync::Arc;

use cricket_terminal::dataset::{self, DataSources};
use cricket_terminal::error::DataError;
use cricket_terminal::state::{Action, AppState, FilterFocus, Tab, apply_action};

fn loaded_state() -> AppState {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.push("tests");
    dir.push("fixtures");
    let data = dataset::load(&DataSources::from_dir(&dir)).expect("fixture should load");
    let mut state = AppState::new();
    state.set_dataset(Arc::new(data));
    state
}

#[test]
fn loading_installs_defaults_and_renders() {
    let state = loaded_state();
    assert_eq!(state.selection.venues.len(), 5);
    assert!(!state.selection.venues.contains("Wankhede Stadium"));
    assert_eq!(state.renders, 1);
    let view = state.view.as_ref().unwrap();
    assert_eq!(view.kpis.matches, 5);
    assert!(state.logs.back().unwrap().starts_with("[INFO] Loaded 6 matches"));
}

#[test]
fn tabs_cycle_both_ways() {
    let mut state = loaded_state();
    apply_action(&mut state, Action::PrevTab);
    assert_eq!(state.tab, Tab::AdvancedAnalytics);
    apply_action(&mut state, Action::NextTab);
    apply_action(&mut state, Action::NextTab);
    assert_eq!(state.tab, Tab::PlayerAnalysis);
    apply_action(&mut state, Action::SelectTab(Tab::VenueInsights));
    assert_eq!(state.tab, Tab::VenueInsights);
    assert_eq!(state.renders, 1, "tab changes do not re-render");
}

#[test]
fn toggling_a_season_rerenders() {
    let mut state = loaded_state();
    assert_eq!(state.focus, FilterFocus::Seasons);

    // Cursor starts on "2017".
    apply_action(&mut state, Action::ToggleCurrent);
    assert!(!state.selection.seasons.contains("2017"));
    assert_eq!(state.renders, 2);
    assert_eq!(state.view.as_ref().unwrap().kpis.matches, 3);

    apply_action(&mut state, Action::ToggleCurrent);
    assert!(state.selection.seasons.contains("2017"));
    assert_eq!(state.view.as_ref().unwrap().kpis.matches, 5);
}

#[test]
fn cursor_wraps_within_focused_list() {
    let mut state = loaded_state();
    apply_action(&mut state, Action::CursorUp);
    assert_eq!(state.cursor_for(FilterFocus::Seasons), 2);
    apply_action(&mut state, Action::CursorDown);
    assert_eq!(state.cursor_for(FilterFocus::Seasons), 0);

    apply_action(&mut state, Action::CycleFocus);
    apply_action(&mut state, Action::CycleFocus);
    assert_eq!(state.focus, FilterFocus::Venues);
    apply_action(&mut state, Action::CursorDown);
    assert_eq!(state.cursor_for(FilterFocus::Venues), 1);
    assert_eq!(state.cursor_for(FilterFocus::Seasons), 0);
}

#[test]
fn select_all_none_and_defaults() {
    let mut state = loaded_state();
    apply_action(&mut state, Action::CycleFocus);
    apply_action(&mut state, Action::CycleFocus);

    apply_action(&mut state, Action::SelectAll);
    assert_eq!(state.selection.venues.len(), 6);
    assert_eq!(state.view.as_ref().unwrap().kpis.matches, 6);

    let renders = state.renders;
    apply_action(&mut state, Action::SelectAll);
    assert_eq!(state.renders, renders, "no-op selection keeps the view");

    apply_action(&mut state, Action::SelectNone);
    assert!(state.selection.venues.is_empty());
    let view = state.view.as_ref().unwrap();
    assert_eq!(view.kpis.matches, 0);
    assert!(view.team_win_rates.is_empty());

    apply_action(&mut state, Action::RestoreDefaults);
    assert_eq!(state.selection.venues.len(), 5);
    assert_eq!(state.view.as_ref().unwrap().kpis.matches, 5);
}

#[test]
fn help_overlay_toggles() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::ToggleHelp);
    assert!(state.help_overlay);
    apply_action(&mut state, Action::ToggleHelp);
    assert!(!state.help_overlay);
}

#[test]
fn actions_without_dataset_are_harmless() {
    let mut state = AppState::new();
    for action in [
        Action::CursorDown,
        Action::ToggleCurrent,
        Action::SelectAll,
        Action::SelectNone,
        Action::RestoreDefaults,
    ] {
        apply_action(&mut state, action);
    }
    assert!(state.view.is_none());
    assert_eq!(state.renders, 0);
}

#[test]
fn load_error_clears_previous_view() {
    let mut state = loaded_state();
    let err = DataError::DataUnavailable {
        path: PathBuf::from("data/matches.csv"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    };
    state.set_load_error(&err);

    assert!(state.view.is_none());
    assert!(state.dataset.is_none());
    assert!(state.selection.seasons.is_empty());
    assert!(state.load_error.as_deref().unwrap().contains("data unavailable"));
    assert!(state.logs.back().unwrap().starts_with("[WARN]"));
}
