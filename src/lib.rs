pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod dataset_cache;
pub mod error;
pub mod filter;
pub mod kpi;
pub mod logging;
pub mod numeric;
pub mod phase_metrics;
pub mod player_metrics;
pub mod sample_data;
pub mod state;
pub mod team_metrics;
pub mod venue_metrics;
