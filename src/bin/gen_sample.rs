use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cricket_terminal::{logging, sample_data};

/// Write a seeded synthetic matches.csv / deliveries.csv pair.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, default_value_t = 2008)]
    seed: u64,

    /// Number of matches to simulate.
    #[arg(long, default_value_t = 240)]
    matches: usize,

    /// Output directory.
    #[arg(long, default_value = "data")]
    out: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_stderr_logging()?;

    let dataset = sample_data::generate(cli.seed, cli.matches);
    sample_data::write_csv(&dataset, &cli.out)?;
    info!(
        out = %cli.out.display(),
        matches = dataset.matches.len(),
        deliveries = dataset.deliveries.len(),
        "sample data written"
    );
    Ok(())
}
