use serde::Serialize;

use crate::dataset::{Delivery, Match};

/// Headline counts shown above the charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub matches: usize,
    pub balls: usize,
    pub total_runs: u64,
    pub wickets: usize,
}

/// Every wicket counts here, including ones without a recorded kind.
pub fn kpis(matches: &[&Match], deliveries: &[&Delivery]) -> Kpis {
    Kpis {
        matches: matches.len(),
        balls: deliveries.len(),
        total_runs: deliveries.iter().map(|d| u64::from(d.total_runs)).sum(),
        wickets: deliveries.iter().filter(|d| d.is_wicket()).count(),
    }
}
