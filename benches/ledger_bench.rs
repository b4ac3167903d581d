//! Ledger Analytics Benchmarks — Report Pass Performance
//!
//! Benchmarks the domain functions that run on every report refresh
//! over a ledger of a few thousand tracked bets.
//!
//! Run with: cargo bench --bench ledger_bench

use chrono::{Duration, TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tipster_ledger::domain::bet::{BetResult, TrackedBet};
use tipster_ledger::domain::filter::{FilterCriteria, filter_bets};
use tipster_ledger::domain::kelly::KellySizer;
use tipster_ledger::domain::ledger::{bucket_edges, group_pnl, ledger_metrics};
use tipster_ledger::domain::series::build_pl_series;
use tipster_ledger::usecases::{ReportOptions, build_report};

const TRACKS: [&str; 4] = ["Randwick", "Flemington", "Eagle Farm", "Morphettville"];

fn synthetic_ledger(n: usize) -> Vec<TrackedBet> {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let result = match i % 5 {
                0 | 3 => BetResult::Won,
                4 => BetResult::Pending,
                _ => BetResult::Lost,
            };
            let mut bet = TrackedBet::new(
                i.to_string(),
                1.5 + (i % 20) as f64 * 0.5,
                result,
                start + Duration::minutes(i as i64 * 37),
            );
            bet.track = TRACKS[i % TRACKS.len()].to_string();
            bet.bookmaker = if i % 2 == 0 { "TAB" } else { "Sportsbet" }.to_string();
            bet.horse_name = format!("Runner {i}");
            bet.edge_pct = Some((i % 31) as f64 - 12.0);
            bet.barrier = Some((i % 16) as u32 + 1);
            bet
        })
        .collect()
}

/// Benchmark the metrics table over a sorted ledger.
fn bench_ledger_metrics(c: &mut Criterion) {
    let bets = synthetic_ledger(5_000);

    c.bench_function("ledger_metrics_5k", |b| {
        b.iter(|| ledger_metrics(black_box(&bets), 20));
    });
}

/// Benchmark histogram and grouping.
fn bench_breakdowns(c: &mut Criterion) {
    let bets = synthetic_ledger(5_000);

    c.bench_function("bucket_edges_5k", |b| {
        b.iter(|| bucket_edges(black_box(&bets)));
    });

    c.bench_function("group_pnl_by_track_5k", |b| {
        b.iter(|| group_pnl(black_box(&bets), |bet| bet.track.as_str()));
    });
}

/// Benchmark the cumulative P&L series with significance.
fn bench_pl_series(c: &mut Criterion) {
    let bets = synthetic_ledger(5_000);

    c.bench_function("build_pl_series_5k", |b| {
        b.iter(|| build_pl_series(black_box(&bets)));
    });
}

/// Benchmark the advanced filter with several active criteria.
fn bench_filter(c: &mut Criterion) {
    let bets = synthetic_ledger(5_000);
    let criteria = FilterCriteria {
        min_edge: Some(0.0),
        min_odds: Some(2.0),
        max_barrier: Some(8),
        search: Some("runner 1".to_string()),
        ..FilterCriteria::default()
    };

    c.bench_function("filter_bets_5k", |b| {
        b.iter(|| filter_bets(black_box(&bets), black_box(&criteria)));
    });
}

/// Benchmark a single Kelly stake suggestion.
fn bench_kelly(c: &mut Criterion) {
    let sizer = KellySizer::default();

    c.bench_function("kelly_suggest", |b| {
        b.iter(|| sizer.suggest(black_box(Some(7.5)), black_box(3.4), black_box(100.0)));
    });
}

/// Benchmark a full report pass.
fn bench_full_report(c: &mut Criterion) {
    let bets = synthetic_ledger(5_000);
    let options = ReportOptions::default();
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();

    c.bench_function("build_report_5k", |b| {
        b.iter(|| build_report(black_box(&bets), None, &options, &now));
    });
}

criterion_group!(
    benches,
    bench_ledger_metrics,
    bench_breakdowns,
    bench_pl_series,
    bench_filter,
    bench_kelly,
    bench_full_report,
);
criterion_main!(benches);
