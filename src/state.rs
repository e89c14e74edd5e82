use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use crate::dashboard::{self, DashboardView};
use crate::dataset::Dataset;
use crate::error::DataError;
use crate::filter::{DomainOptions, FilterSelection};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    TeamPerformance,
    PlayerAnalysis,
    VenueInsights,
    AdvancedAnalytics,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::TeamPerformance,
        Tab::PlayerAnalysis,
        Tab::VenueInsights,
        Tab::AdvancedAnalytics,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::TeamPerformance => "Team Performance",
            Tab::PlayerAnalysis => "Player Analysis",
            Tab::VenueInsights => "Venue Insights",
            Tab::AdvancedAnalytics => "Advanced Analytics",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::TeamPerformance => 0,
            Tab::PlayerAnalysis => 1,
            Tab::VenueInsights => 2,
            Tab::AdvancedAnalytics => 3,
        }
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Which multi-select list in the sidebar receives cursor keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterFocus {
    Seasons,
    Teams,
    Venues,
}

impl FilterFocus {
    pub fn label(self) -> &'static str {
        match self {
            FilterFocus::Seasons => "Seasons",
            FilterFocus::Teams => "Teams",
            FilterFocus::Venues => "Venues",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FilterFocus::Seasons => FilterFocus::Teams,
            FilterFocus::Teams => FilterFocus::Venues,
            FilterFocus::Venues => FilterFocus::Seasons,
        }
    }

    fn slot(self) -> usize {
        match self {
            FilterFocus::Seasons => 0,
            FilterFocus::Teams => 1,
            FilterFocus::Venues => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NextTab,
    PrevTab,
    SelectTab(Tab),
    CycleFocus,
    CursorDown,
    CursorUp,
    ToggleCurrent,
    SelectAll,
    SelectNone,
    RestoreDefaults,
    ToggleHelp,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub dataset: Option<Arc<Dataset>>,
    pub load_error: Option<String>,
    pub options: DomainOptions,
    pub selection: FilterSelection,
    pub view: Option<DashboardView>,
    pub tab: Tab,
    pub focus: FilterFocus,
    pub cursors: [usize; 3],
    pub help_overlay: bool,
    pub renders: usize,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            dataset: None,
            load_error: None,
            options: DomainOptions::default(),
            selection: FilterSelection::default(),
            view: None,
            tab: Tab::TeamPerformance,
            focus: FilterFocus::Seasons,
            cursors: [0; 3],
            help_overlay: false,
            renders: 0,
            logs: VecDeque::new(),
        }
    }

    /// Install a freshly loaded dataset and reset filters to their defaults.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.options = DomainOptions::from_dataset(&dataset);
        self.selection = FilterSelection::defaults(&self.options);
        self.cursors = [0; 3];
        self.load_error = None;
        self.push_log(format!(
            "[INFO] Loaded {} matches, {} deliveries",
            dataset.matches.len(),
            dataset.deliveries.len()
        ));
        if dataset.is_empty() {
            self.push_log("[WARN] Match table is empty");
        }
        self.dataset = Some(dataset);
        self.recompute();
    }

    /// A failed load clears everything derived from the previous dataset so
    /// nothing stale is shown next to the error.
    pub fn set_load_error(&mut self, err: &DataError) {
        self.dataset = None;
        self.view = None;
        self.options = DomainOptions::default();
        self.selection = FilterSelection::default();
        self.load_error = Some(err.to_string());
        self.push_log(format!("[WARN] {err}"));
    }

    pub fn recompute(&mut self) {
        let Some(dataset) = &self.dataset else {
            self.view = None;
            return;
        };
        self.view = Some(dashboard::render(dataset, &self.selection));
        self.renders += 1;
    }

    pub fn focused_options(&self) -> &[String] {
        match self.focus {
            FilterFocus::Seasons => &self.options.seasons,
            FilterFocus::Teams => &self.options.teams,
            FilterFocus::Venues => &self.options.venues,
        }
    }

    pub fn options_for(&self, focus: FilterFocus) -> &[String] {
        match focus {
            FilterFocus::Seasons => &self.options.seasons,
            FilterFocus::Teams => &self.options.teams,
            FilterFocus::Venues => &self.options.venues,
        }
    }

    pub fn selected_for(&self, focus: FilterFocus) -> &BTreeSet<String> {
        match focus {
            FilterFocus::Seasons => &self.selection.seasons,
            FilterFocus::Teams => &self.selection.teams,
            FilterFocus::Venues => &self.selection.venues,
        }
    }

    fn selected_for_mut(&mut self, focus: FilterFocus) -> &mut BTreeSet<String> {
        match focus {
            FilterFocus::Seasons => &mut self.selection.seasons,
            FilterFocus::Teams => &mut self.selection.teams,
            FilterFocus::Venues => &mut self.selection.venues,
        }
    }

    pub fn cursor_for(&self, focus: FilterFocus) -> usize {
        self.cursors[focus.slot()]
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    fn move_cursor(&mut self, forward: bool) {
        let total = self.focused_options().len();
        let slot = self.focus.slot();
        if total == 0 {
            self.cursors[slot] = 0;
            return;
        }
        let current = self.cursors[slot].min(total - 1);
        self.cursors[slot] = if forward {
            (current + 1) % total
        } else {
            (current + total - 1) % total
        };
    }

    fn toggle_current(&mut self) -> bool {
        let focus = self.focus;
        let Some(value) = self
            .options_for(focus)
            .get(self.cursor_for(focus))
            .cloned()
        else {
            return false;
        };
        let set = self.selected_for_mut(focus);
        if !set.remove(&value) {
            set.insert(value);
        }
        true
    }

    fn replace_focused(&mut self, all: bool) -> bool {
        let focus = self.focus;
        let next = if all {
            self.options_for(focus).iter().cloned().collect()
        } else {
            BTreeSet::new()
        };
        let set = self.selected_for_mut(focus);
        if *set == next {
            return false;
        }
        *set = next;
        true
    }
}

/// Apply one user action. Any change to the selection re-renders the view
/// from scratch.
pub fn apply_action(state: &mut AppState, action: Action) {
    let changed = match action {
        Action::NextTab => {
            state.tab = state.tab.next();
            false
        }
        Action::PrevTab => {
            state.tab = state.tab.prev();
            false
        }
        Action::SelectTab(tab) => {
            state.tab = tab;
            false
        }
        Action::CycleFocus => {
            state.focus = state.focus.next();
            false
        }
        Action::CursorDown => {
            state.move_cursor(true);
            false
        }
        Action::CursorUp => {
            state.move_cursor(false);
            false
        }
        Action::ToggleCurrent => state.toggle_current(),
        Action::SelectAll => state.replace_focused(true),
        Action::SelectNone => state.replace_focused(false),
        Action::RestoreDefaults => {
            let defaults = FilterSelection::defaults(&state.options);
            let changed = state.selection != defaults;
            state.selection = defaults;
            changed
        }
        Action::ToggleHelp => {
            state.help_overlay = !state.help_overlay;
            false
        }
    };

    if changed {
        state.recompute();
    }
}
