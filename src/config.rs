use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::dataset::DataSources;

const DEFAULT_TICK_MS: u64 = 250;
const MIN_TICK_MS: u64 = 50;

/// `.env.local` wins over `.env`; neither is required.
pub fn load_env_files() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

/// Where the two CSV sources live. Explicit file paths beat the directory.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Directory holding matches.csv and deliveries.csv.
    #[arg(long, env = "IPL_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Path to the matches table.
    #[arg(long, env = "IPL_MATCHES_CSV")]
    pub matches: Option<PathBuf>,

    /// Path to the ball-by-ball deliveries table.
    #[arg(long, env = "IPL_DELIVERIES_CSV")]
    pub deliveries: Option<PathBuf>,
}

impl SourceArgs {
    pub fn sources(&self) -> DataSources {
        let defaults = DataSources::from_dir(&self.data_dir);
        DataSources::new(
            self.matches.clone().unwrap_or(defaults.matches),
            self.deliveries.clone().unwrap_or(defaults.deliveries),
        )
    }
}

#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Directory for the rolling log file.
    #[arg(long, env = "IPL_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}

pub fn tick_rate() -> Duration {
    let ms = std::env::var("IPL_TICK_MS")
        .ok()
        .and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_TICK_MS)
        .max(MIN_TICK_MS);
    Duration::from_millis(ms)
}
