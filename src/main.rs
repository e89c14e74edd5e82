use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Tabs, Wrap};
use tracing::{error, info};

use cricket_terminal::config::{self, LogArgs, SourceArgs};
use cricket_terminal::dashboard::{DashboardView, INSIGHTS, MetricTable};
use cricket_terminal::dataset::DataSources;
use cricket_terminal::dataset_cache::DatasetCache;
use cricket_terminal::logging;
use cricket_terminal::state::{Action, AppState, FilterFocus, Tab, apply_action};

/// Terminal dashboard over IPL match and ball-by-ball records.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    sources: SourceArgs,
    #[command(flatten)]
    log: LogArgs,
}

struct App {
    state: AppState,
    should_quit: bool,
    cache: DatasetCache,
    sources: DataSources,
}

impl App {
    fn new(sources: DataSources) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cache: DatasetCache::new(),
            sources,
        }
    }

    fn load(&mut self, force: bool) {
        let result = if force {
            self.cache.reload(&self.sources)
        } else {
            self.cache.get_or_load(&self.sources)
        };
        match result {
            Ok(dataset) => self.state.set_dataset(dataset),
            Err(err) => {
                error!(%err, "dataset load failed");
                self.state.set_load_error(&err);
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        let action = match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.state.push_log("[INFO] Reloading sources");
                self.load(true);
                return;
            }
            KeyCode::Char('1') => Action::SelectTab(Tab::TeamPerformance),
            KeyCode::Char('2') => Action::SelectTab(Tab::PlayerAnalysis),
            KeyCode::Char('3') => Action::SelectTab(Tab::VenueInsights),
            KeyCode::Char('4') => Action::SelectTab(Tab::AdvancedAnalytics),
            KeyCode::Tab | KeyCode::Right => Action::NextTab,
            KeyCode::BackTab | KeyCode::Left => Action::PrevTab,
            KeyCode::Char('f') | KeyCode::Char('F') => Action::CycleFocus,
            KeyCode::Char('j') | KeyCode::Down => Action::CursorDown,
            KeyCode::Char('k') | KeyCode::Up => Action::CursorUp,
            KeyCode::Char(' ') | KeyCode::Enter => Action::ToggleCurrent,
            KeyCode::Char('a') => Action::SelectAll,
            KeyCode::Char('n') => Action::SelectNone,
            KeyCode::Char('d') => Action::RestoreDefaults,
            KeyCode::Char('?') => Action::ToggleHelp,
            _ => return,
        };
        apply_action(&mut self.state, action);
    }
}

fn main() -> Result<()> {
    config::load_env_files();
    let cli = Cli::parse();
    let _log_guard = logging::init_file_logging(&cli.log.log_dir)?;

    let mut app = App::new(cli.sources.sources());
    app.load(false);
    info!(
        matches = %app.sources.matches.display(),
        deliveries = %app.sources.deliveries.display(),
        "dashboard started"
    );

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, config::tick_rate());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(%err, "terminal loop failed");
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(size);

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match &app.state.view {
        Some(view) => render_dashboard(frame, chunks[1], &app.state, view),
        None => render_unavailable(frame, chunks[1], app),
    }

    let footer = Paragraph::new(footer_text()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, size);
    }
}

fn header_text(state: &AppState) -> String {
    let line1 = "  IPL CRICKET ANALYTICS".to_string();
    let line2 = match state.view.as_ref().and_then(|v| v.date_span) {
        Some(span) => format!(
            "  {} seasons | {} teams | {} venues | {} to {}",
            state.selection.seasons.len(),
            state.selection.teams.len(),
            state.selection.venues.len(),
            span.first.format("%Y-%m-%d"),
            span.last.format("%Y-%m-%d")
        ),
        None => format!(
            "  {} seasons | {} teams | {} venues",
            state.selection.seasons.len(),
            state.selection.teams.len(),
            state.selection.venues.len()
        ),
    };
    format!("{line1}\n{line2}")
}

fn footer_text() -> &'static str {
    "1-4/Tab Tabs | f Filter | j/k Move | Space Toggle | a All | n None | d Defaults | r Reload | ? Help | q Quit"
}

fn render_unavailable(frame: &mut Frame, area: Rect, app: &App) {
    let reason = app
        .state
        .load_error
        .as_deref()
        .unwrap_or("No dataset loaded");
    let text = format!(
        "Data files not found or unreadable.\n\n{reason}\n\nExpected:\n  {}\n  {}\n\nFix the paths and press r to retry.",
        app.sources.matches.display(),
        app.sources.deliveries.display()
    );
    let panel = Paragraph::new(text)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Data Unavailable").borders(Borders::ALL));
    frame.render_widget(panel, area);
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState, view: &DashboardView) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(40)])
        .split(area);

    render_sidebar(frame, columns[0], state);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(7),
            Constraint::Length(3),
        ])
        .split(columns[1]);

    render_kpis(frame, rows[0], view);

    let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.label()).collect::<Vec<_>>())
        .select(state.tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, rows[1]);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);
    render_tab(frame, panels[0], panels[1], state.tab, view);

    let insights = INSIGHTS
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    let insights = Paragraph::new(insights)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Key Insights").borders(Borders::ALL));
    frame.render_widget(insights, rows[3]);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, rows[4]);
}

fn render_kpis(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);
    let kpis = [
        ("Total Matches", group_thousands(view.kpis.matches as u64)),
        ("Total Balls", group_thousands(view.kpis.balls as u64)),
        ("Total Runs", group_thousands(view.kpis.total_runs)),
        ("Total Wickets", group_thousands(view.kpis.wickets as u64)),
    ];
    for (idx, (title, value)) in kpis.into_iter().enumerate() {
        let card = Paragraph::new(value)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(card, cols[idx]);
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, state: &AppState) {
    let lists = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(40),
            Constraint::Percentage(35),
        ])
        .split(area);

    for (idx, focus) in [FilterFocus::Seasons, FilterFocus::Teams, FilterFocus::Venues]
        .into_iter()
        .enumerate()
    {
        render_filter_list(frame, lists[idx], state, focus);
    }
}

fn render_filter_list(frame: &mut Frame, area: Rect, state: &AppState, focus: FilterFocus) {
    let focused = state.focus == focus;
    let options = state.options_for(focus);
    let selected = state.selected_for(focus);
    let title = format!("{} ({}/{})", focus.label(), selected.len(), options.len());
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }
    let cursor = state.cursor_for(focus);
    let (start, end) = visible_range(cursor, options.len(), inner.height as usize);
    let width = inner.width.saturating_sub(4) as usize;
    let lines = (start..end)
        .map(|idx| {
            let value = &options[idx];
            let mark = if selected.contains(value) { "[x]" } else { "[ ]" };
            let style = if focused && idx == cursor {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::styled(format!("{mark} {}", truncate(value, width)), style)
        })
        .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(lines), inner);
}

/// One chart row: label, bar height, printed value.
struct ChartRow {
    label: String,
    value: f64,
    text: String,
}

fn render_tab(frame: &mut Frame, left: Rect, right: Rect, tab: Tab, view: &DashboardView) {
    match tab {
        Tab::TeamPerformance => {
            render_chart(
                frame,
                left,
                &view.team_win_rates,
                Color::Green,
                |r| ChartRow {
                    label: r.team.clone(),
                    value: r.win_percentage,
                    text: format!("{:.1}% ({}/{})", r.win_percentage, r.wins, r.total_matches),
                },
            );
            render_chart(
                frame,
                right,
                &view.toss_advantage,
                Color::Magenta,
                |r| ChartRow {
                    label: r.team.clone(),
                    value: r.toss_win_rate,
                    text: format!("{:.1}%", r.toss_win_rate),
                },
            );
        }
        Tab::PlayerAnalysis => {
            render_chart(frame, left, &view.top_batsmen, Color::Red, |r| ChartRow {
                label: r.batsman.clone(),
                value: r.total_runs as f64,
                text: format!("{} (SR {:.2})", r.total_runs, r.strike_rate),
            });
            render_chart(frame, right, &view.top_bowlers, Color::Blue, |r| ChartRow {
                label: r.bowler.clone(),
                value: r.wickets as f64,
                text: format!("{} (Econ {:.2})", r.wickets, r.economy),
            });
        }
        Tab::VenueInsights => {
            render_chart(frame, left, &view.venue_scoring, Color::Green, |r| ChartRow {
                label: r.venue.clone(),
                value: r.avg_runs,
                text: format!("{:.1}", r.avg_runs),
            });
            render_chart(
                frame,
                right,
                &view.toss_decisions,
                Color::Magenta,
                |r| ChartRow {
                    label: r.venue.clone(),
                    value: r.bat_percentage,
                    text: format!("{:.1}% bat ({}/{})", r.bat_percentage, r.bat, r.bat + r.field),
                },
            );
        }
        Tab::AdvancedAnalytics => {
            render_chart(
                frame,
                left,
                &view.phase_run_rates,
                Color::Red,
                |r| ChartRow {
                    label: r.phase.label().to_string(),
                    value: r.run_rate,
                    text: format!("{:.2} rpo, {} wkts", r.run_rate, r.wickets),
                },
            );
            let total = view.dismissals.rows.iter().map(|r| r.count).sum::<usize>();
            render_chart(frame, right, &view.dismissals, Color::Yellow, |r| ChartRow {
                label: r.kind.clone(),
                value: r.count as f64,
                text: format!(
                    "{} ({:.1}%)",
                    r.count,
                    r.count as f64 / total.max(1) as f64 * 100.0
                ),
            });
        }
    }
}

fn render_chart<T>(
    frame: &mut Frame,
    area: Rect,
    table: &MetricTable<T>,
    color: Color,
    to_row: impl Fn(&T) -> ChartRow,
) {
    let block = Block::default().title(table.title).borders(Borders::ALL);
    if table.is_empty() {
        let empty = Paragraph::new("No data for this selection")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let label_width = (area.width / 3).max(8) as usize;
    let rows = table.rows.iter().map(to_row).collect::<Vec<_>>();
    let bars = rows
        .iter()
        .map(|row| {
            Bar::default()
                .label(Line::from(truncate(&row.label, label_width)))
                .value((row.value.max(0.0) * 100.0).round() as u64)
                .text_value(row.text.clone())
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect::<Vec<_>>();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0);
    frame.render_widget(chart, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn truncate(raw: &str, width: usize) -> String {
    if raw.chars().count() <= width {
        return raw.to_string();
    }
    let keep = width.saturating_sub(1);
    let mut out = raw.chars().take(keep).collect::<String>();
    out.push('…');
    out
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn console_text(state: &AppState) -> String {
    state
        .logs
        .back()
        .cloned()
        .unwrap_or_else(|| "No messages yet".to_string())
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "IPL Cricket Analytics - Help",
        "",
        "Tabs:",
        "  1-4          Jump to tab",
        "  Tab / ←/→    Next / previous tab",
        "",
        "Filters:",
        "  f            Cycle Seasons / Teams / Venues",
        "  j/k or ↑/↓   Move cursor",
        "  Space/Enter  Toggle value",
        "  a / n        Select all / none",
        "  d            Restore defaults (first 5 venues)",
        "",
        "  r            Reload data files",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::{group_thousands, truncate, visible_range};

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn long_labels_are_cut() {
        assert_eq!(truncate("Eden Gardens", 20), "Eden Gardens");
        assert_eq!(truncate("Eden Gardens", 5), "Eden…");
    }

    #[test]
    fn visible_window_follows_cursor() {
        assert_eq!(visible_range(0, 3, 10), (0, 3));
        assert_eq!(visible_range(9, 20, 4), (7, 11));
        assert_eq!(visible_range(19, 20, 4), (16, 20));
    }
}
