use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use cricket_terminal::dashboard;
use cricket_terminal::dataset::{self, DataSources};
use cricket_terminal::filter::{self, DomainOptions, FilterSelection};
use cricket_terminal::player_metrics;
use cricket_terminal::sample_data;

const SEASON_MATCHES: usize = 600;

fn bench_filter_defaults(c: &mut Criterion) {
    let data = sample_data::generate(2008, SEASON_MATCHES);
    let options = DomainOptions::from_dataset(&data);
    let selection = FilterSelection::defaults(&options);

    c.bench_function("filter_defaults", |b| {
        b.iter(|| {
            let tables = filter::filter(black_box(&data), black_box(&selection));
            black_box(tables.deliveries.len());
        })
    });
}

fn bench_render_everything(c: &mut Criterion) {
    let data = sample_data::generate(2008, SEASON_MATCHES);
    let options = DomainOptions::from_dataset(&data);
    let selection = FilterSelection::everything(&options);

    c.bench_function("render_everything", |b| {
        b.iter(|| {
            let view = dashboard::render(black_box(&data), black_box(&selection));
            black_box(view.kpis.total_runs);
        })
    });
}

fn bench_leaderboards(c: &mut Criterion) {
    let data = sample_data::generate(2008, SEASON_MATCHES);
    let deliveries = data.deliveries.iter().collect::<Vec<_>>();

    c.bench_function("leaderboards", |b| {
        b.iter(|| {
            let batsmen = player_metrics::top_batsmen(black_box(&deliveries));
            let bowlers = player_metrics::top_bowlers(black_box(&deliveries));
            black_box((batsmen.len(), bowlers.len()));
        })
    });
}

fn bench_csv_load(c: &mut Criterion) {
    let data = sample_data::generate(2008, 120);
    let dir = tempfile::tempdir().expect("temp dir");
    sample_data::write_csv(&data, dir.path()).expect("write sample csv");
    let sources = DataSources::from_dir(dir.path());

    c.bench_function("csv_load", |b| {
        b.iter(|| {
            let loaded = dataset::load(black_box(&sources)).unwrap();
            black_box(loaded.deliveries.len());
        })
    });
}

criterion_group!(
    perf,
    bench_filter_defaults,
    bench_render_everything,
    bench_leaderboards,
    bench_csv_load
);
criterion_main!(perf);
