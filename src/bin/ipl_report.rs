use std::collections::BTreeSet;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cricket_terminal::config::{self, SourceArgs};
use cricket_terminal::dashboard::{self, DashboardView, INSIGHTS, MetricTable};
use cricket_terminal::dataset;
use cricket_terminal::filter::{DomainOptions, FilterSelection};
use cricket_terminal::logging;

/// Print the dashboard for one filter selection without the terminal UI.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    sources: SourceArgs,

    /// Season to include (repeatable). Defaults to every season.
    #[arg(long = "season")]
    seasons: Vec<String>,

    /// Team to include (repeatable). Defaults to every team.
    #[arg(long = "team")]
    teams: Vec<String>,

    /// Venue to include (repeatable). Defaults to the first five venues.
    #[arg(long = "venue")]
    venues: Vec<String>,

    /// Include every venue instead of the default five.
    #[arg(long, conflicts_with = "venues")]
    all_venues: bool,

    /// Emit the view model as JSON.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn selection(&self, options: &DomainOptions) -> FilterSelection {
        let mut selection = FilterSelection::defaults(options);
        if !self.seasons.is_empty() {
            selection.seasons = self.seasons.iter().cloned().collect();
        }
        if !self.teams.is_empty() {
            selection.teams = self.teams.iter().cloned().collect();
        }
        if self.all_venues {
            selection.venues = options.venues.iter().cloned().collect();
        } else if !self.venues.is_empty() {
            selection.venues = self.venues.iter().cloned().collect::<BTreeSet<_>>();
        }
        selection
    }
}

fn main() -> Result<()> {
    config::load_env_files();
    let cli = Cli::parse();
    logging::init_stderr_logging()?;

    let sources = cli.sources.sources();
    let data = dataset::load(&sources)
        .with_context(|| format!("load {}", sources.matches.display()))?;
    let options = DomainOptions::from_dataset(&data);
    let selection = cli.selection(&options);
    info!(
        seasons = selection.seasons.len(),
        teams = selection.teams.len(),
        venues = selection.venues.len(),
        "rendering report"
    );

    let view = dashboard::render(&data, &selection);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_report(&view);
    }
    Ok(())
}

fn print_report(view: &DashboardView) {
    println!("IPL Cricket Analytics");
    if let Some(span) = view.date_span {
        println!("{} to {}", span.first, span.last);
    }
    println!();
    println!("Total Matches: {}", view.kpis.matches);
    println!("Total Balls:   {}", view.kpis.balls);
    println!("Total Runs:    {}", view.kpis.total_runs);
    println!("Total Wickets: {}", view.kpis.wickets);

    print_table(&view.team_win_rates, "Team", &["Wins", "Matches", "Win %"], |r| {
        (
            r.team.clone(),
            vec![
                r.wins.to_string(),
                r.total_matches.to_string(),
                format!("{:.1}", r.win_percentage),
            ],
        )
    });
    print_table(
        &view.toss_advantage,
        "Team",
        &["Toss Wins", "Won After", "Rate %"],
        |r| {
            (
                r.team.clone(),
                vec![
                    r.toss_wins.to_string(),
                    r.won_after_toss.to_string(),
                    format!("{:.1}", r.toss_win_rate),
                ],
            )
        },
    );
    print_table(
        &view.top_batsmen,
        "Batsman",
        &["Runs", "Matches", "Balls", "SR"],
        |r| {
            (
                r.batsman.clone(),
                vec![
                    r.total_runs.to_string(),
                    r.matches.to_string(),
                    r.balls_faced.to_string(),
                    format!("{:.2}", r.strike_rate),
                ],
            )
        },
    );
    print_table(
        &view.top_bowlers,
        "Bowler",
        &["Wickets", "Runs", "Matches", "Econ"],
        |r| {
            (
                r.bowler.clone(),
                vec![
                    r.wickets.to_string(),
                    r.runs_conceded.to_string(),
                    r.matches.to_string(),
                    format!("{:.2}", r.economy),
                ],
            )
        },
    );
    print_table(&view.venue_scoring, "Venue", &["Matches", "Avg Runs"], |r| {
        (
            r.venue.clone(),
            vec![r.matches.to_string(), format!("{:.1}", r.avg_runs)],
        )
    });
    print_table(
        &view.toss_decisions,
        "Venue",
        &["Bat", "Field", "Bat %"],
        |r| {
            (
                r.venue.clone(),
                vec![
                    r.bat.to_string(),
                    r.field.to_string(),
                    format!("{:.1}", r.bat_percentage),
                ],
            )
        },
    );
    print_table(
        &view.phase_run_rates,
        "Phase",
        &["Runs", "Wickets", "Balls", "RR"],
        |r| {
            (
                r.phase.to_string(),
                vec![
                    r.total_runs.to_string(),
                    r.wickets.to_string(),
                    r.balls.to_string(),
                    format!("{:.2}", r.run_rate),
                ],
            )
        },
    );
    print_table(&view.dismissals, "Kind", &["Count"], |r| {
        (r.kind.clone(), vec![r.count.to_string()])
    });

    println!();
    println!("Key Insights");
    for (idx, line) in INSIGHTS.iter().enumerate() {
        println!("  {}. {line}", idx + 1);
    }
}

fn print_table<T>(
    table: &MetricTable<T>,
    key_header: &str,
    headers: &[&str],
    to_row: impl Fn(&T) -> (String, Vec<String>),
) {
    println!();
    println!("{}", table.title);
    if table.is_empty() {
        println!("  (no data for this selection)");
        return;
    }

    let rows = table.rows.iter().map(to_row).collect::<Vec<_>>();
    let key_width = rows
        .iter()
        .map(|(key, _)| key.chars().count())
        .chain(std::iter::once(key_header.len()))
        .max()
        .unwrap_or(0);

    let mut header = format!("  {key_header:<key_width$}");
    for h in headers {
        header.push_str(&format!("  {h:>9}"));
    }
    println!("{header}");
    for (key, cells) in rows {
        let mut line = format!("  {key:<key_width$}");
        for cell in cells {
            line.push_str(&format!("  {cell:>9}"));
        }
        println!("{line}");
    }
}
