//! Ledger Report Use Case - Fetch, Filter and Analyse Tracked Bets
//!
//! Pulls the ledger from a `BetSource`, narrows it to the configured
//! date window and filter, and derives every figure the dashboard
//! shows: the metrics table, edge histogram, bookmaker and track
//! breakdowns, recent-outcome strip, cumulative P&L curve with its
//! significance estimate, and Kelly stake suggestions for bets still
//! pending.
//!
//! Report flow:
//! 1. Fetch bets (required) and the server summary (best effort)
//! 2. Optionally snapshot the raw ledger to disk
//! 3. Apply date range, then the advanced filter
//! 4. Sort chronologically and compute

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::adapters::persistence::LedgerSnapshot;
use crate::config::AppConfig;
use crate::domain::bet::{BetId, BetResult, TrackedBet};
use crate::domain::filter::{DateRange, FilterCriteria, filter_bets, filter_by_range};
use crate::domain::kelly::KellySizer;
use crate::domain::ledger::{
  DEFAULT_OUTCOME_WINDOW, DEFAULT_RECENT_WINDOW, EdgeBucket, GroupPnl, LedgerMetrics,
  bucket_edges, group_pnl, ledger_metrics, recent_outcomes, sort_chronological,
};
use crate::domain::series::{SignificanceStats, build_pl_series};
use crate::ports::bet_source::{BetSource, ServerSummary};

/// Parameters of one report pass.
#[derive(Debug, Clone)]
pub struct ReportOptions {
  pub date_range: DateRange,
  pub filter: FilterCriteria,
  pub recent_window: usize,
  pub outcome_window: usize,
  /// Bankroll in units for stake suggestions.
  pub bankroll_units: f64,
  /// Kelly fraction multiplier (0.5 = half-Kelly).
  pub kelly_fraction: f64,
}

impl Default for ReportOptions {
  fn default() -> Self {
    Self {
      date_range: DateRange::All,
      filter: FilterCriteria::default(),
      recent_window: DEFAULT_RECENT_WINDOW,
      outcome_window: DEFAULT_OUTCOME_WINDOW,
      bankroll_units: 100.0,
      kelly_fraction: 0.5,
    }
  }
}

impl ReportOptions {
  pub fn from_config(config: &AppConfig) -> Self {
    Self {
      date_range: config.analysis.date_range,
      filter: config.filter.clone(),
      recent_window: config.analysis.recent_window,
      outcome_window: config.analysis.outcome_window,
      bankroll_units: config.analysis.bankroll_units,
      kelly_fraction: config.analysis.kelly_fraction,
    }
  }
}

/// One point of the cumulative P&L curve, detached from the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
  pub cumulative: f64,
  pub delta_pl: f64,
  /// `None` for the starting anchor.
  pub bet_id: Option<BetId>,
  pub tracked_at: Option<DateTime<Utc>>,
}

/// Kelly stake suggestion for a pending bet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeSuggestion {
  pub bet_id: BetId,
  pub horse_name: String,
  pub track: String,
  pub race_number: u32,
  pub odds_at_tip: f64,
  pub edge_pct: Option<f64>,
  /// Units to stake; `None` means no bet.
  pub suggested_stake: Option<f64>,
}

/// Everything derived from one pass over the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerReport {
  pub generated_at: DateTime<Utc>,
  pub date_range: DateRange,
  /// Bets returned by the source.
  pub fetched: usize,
  /// Bets left after the date range and filter.
  pub analysed: usize,
  pub metrics: LedgerMetrics,
  pub edge_buckets: Vec<EdgeBucket>,
  pub by_bookmaker: Vec<GroupPnl>,
  pub by_track: Vec<GroupPnl>,
  pub recent_outcomes: Vec<BetResult>,
  pub pl_series: Vec<SeriesPoint>,
  pub significance: Option<SignificanceStats>,
  pub stake_suggestions: Vec<StakeSuggestion>,
  pub server_summary: Option<ServerSummary>,
}

/// Build a report from an already fetched ledger.
pub fn build_report<Tz: TimeZone>(
  bets: &[TrackedBet],
  server_summary: Option<ServerSummary>,
  options: &ReportOptions,
  now: &DateTime<Tz>,
) -> LedgerReport {
  let in_range = filter_by_range(bets, options.date_range, now);
  let mut selected: Vec<TrackedBet> = filter_bets(in_range, &options.filter)
    .into_iter()
    .cloned()
    .collect();
  sort_chronological(&mut selected);

  let series = build_pl_series(&selected);
  let pl_series = series
    .points
    .iter()
    .map(|p| SeriesPoint {
      cumulative: p.cumulative,
      delta_pl: p.delta_pl,
      bet_id: p.bet.map(|b| b.id.clone()),
      tracked_at: p.bet.map(|b| b.tracked_at),
    })
    .collect();

  let sizer = KellySizer::new(options.kelly_fraction);
  let stake_suggestions = selected
    .iter()
    .filter(|b| b.result == BetResult::Pending)
    .map(|b| StakeSuggestion {
      bet_id: b.id.clone(),
      horse_name: b.horse_name.clone(),
      track: b.track.clone(),
      race_number: b.race_number,
      odds_at_tip: b.odds_at_tip,
      edge_pct: b.edge_pct,
      suggested_stake: sizer.suggest(b.edge_pct, b.odds_at_tip, options.bankroll_units),
    })
    .collect();

  LedgerReport {
    generated_at: now.with_timezone(&Utc),
    date_range: options.date_range,
    fetched: bets.len(),
    analysed: selected.len(),
    metrics: ledger_metrics(&selected, options.recent_window),
    edge_buckets: bucket_edges(&selected),
    by_bookmaker: group_pnl(&selected, |b| b.bookmaker.as_str()),
    by_track: group_pnl(&selected, |b| b.track.as_str()),
    recent_outcomes: recent_outcomes(&selected, options.outcome_window),
    significance: series.stats,
    pl_series,
    stake_suggestions,
    server_summary,
  }
}

/// Report generator bound to a ledger source.
pub struct LedgerReporter {
  source: Arc<dyn BetSource>,
  options: ReportOptions,
  snapshot: Option<LedgerSnapshot>,
}

impl LedgerReporter {
  pub fn new(source: Arc<dyn BetSource>, options: ReportOptions) -> Self {
    Self {
      source,
      options,
      snapshot: None,
    }
  }

  /// Write every fetched ledger to `snapshot` before analysis.
  pub fn with_snapshot(mut self, snapshot: LedgerSnapshot) -> Self {
    self.snapshot = Some(snapshot);
    self
  }

  pub const fn options(&self) -> &ReportOptions {
    &self.options
  }

  /// Run one full pass: fetch, snapshot, analyse.
  ///
  /// A failing bet fetch or snapshot write fails the pass. A failing
  /// summary fetch only drops the summary from the report.
  pub async fn run<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<LedgerReport> {
    let bets = self
      .source
      .fetch_bets()
      .await
      .context("Failed to fetch tracked bets")?;

    let summary = match self.source.fetch_summary().await {
      Ok(summary) => summary,
      Err(e) => {
        warn!(error = %e, "Server summary unavailable, continuing without it");
        None
      }
    };

    if let Some(snapshot) = &self.snapshot {
      snapshot
        .write(&bets)
        .await
        .context("Failed to write ledger snapshot")?;
    }

    let report = build_report(&bets, summary, &self.options, now);

    info!(
      fetched = report.fetched,
      analysed = report.analysed,
      settled = report.metrics.settled,
      pending = report.metrics.pending,
      profit = report.metrics.pnl.profit,
      roi_pct = report.metrics.pnl.roi_pct,
      p_value = report.significance.map(|s| s.p_value),
      "Ledger report generated"
    );

    Ok(report)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
  }

  fn bet(id: &str, odds: f64, result: BetResult, hours_ago: i64) -> TrackedBet {
    let mut b = TrackedBet::new(id, odds, result, now() - Duration::hours(hours_ago));
    b.bookmaker = "Sportsbet".into();
    b.track = "Flemington".into();
    b
  }

  #[test]
  fn test_report_over_mixed_ledger() {
    let mut pending = bet("p", 3.0, BetResult::Pending, 1);
    pending.edge_pct = Some(10.0);
    let bets = vec![
      bet("w", 3.0, BetResult::Won, 3),
      bet("l", 2.0, BetResult::Lost, 2),
      pending,
    ];

    let report = build_report(&bets, None, &ReportOptions::default(), &now());

    assert_eq!(report.fetched, 3);
    assert_eq!(report.analysed, 3);
    assert_eq!(report.metrics.won, 1);
    assert_eq!(report.metrics.pending, 1);
    assert!((report.metrics.pnl.profit - 1.0).abs() < 1e-9);
    assert_eq!(
      report.recent_outcomes,
      vec![BetResult::Won, BetResult::Lost, BetResult::Pending]
    );
    // Anchor plus two settled bets
    assert_eq!(report.pl_series.len(), 3);
    assert_eq!(report.pl_series[0].bet_id, None);
    assert_eq!(report.pl_series[1].bet_id.as_deref(), Some("w"));
    assert!((report.pl_series[2].cumulative - 1.0).abs() < 1e-9);

    assert_eq!(report.stake_suggestions.len(), 1);
    assert_eq!(report.stake_suggestions[0].bet_id, "p");
    // p = 0.3667, b = 2 -> full 0.05, half of 100 units
    let stake = report.stake_suggestions[0].suggested_stake.unwrap();
    assert!((stake - 2.5).abs() < 1e-9, "got {stake}");
  }

  #[test]
  fn test_range_and_filter_compose() {
    let bets = vec![
      bet("old", 2.0, BetResult::Won, 24 * 40),
      bet("cheap", 1.5, BetResult::Won, 2),
      bet("keep", 4.0, BetResult::Lost, 1),
    ];
    let options = ReportOptions {
      date_range: DateRange::Month,
      filter: FilterCriteria {
        min_odds: Some(2.0),
        ..FilterCriteria::default()
      },
      ..ReportOptions::default()
    };

    let report = build_report(&bets, None, &options, &now());
    assert_eq!(report.fetched, 3);
    assert_eq!(report.analysed, 1);
    assert_eq!(report.by_track[0].label, "Flemington");
    assert_eq!(report.by_track[0].bets, 1);
  }

  #[test]
  fn test_empty_ledger() {
    let report = build_report(&[], None, &ReportOptions::default(), &now());
    assert_eq!(report.analysed, 0);
    assert_eq!(report.pl_series.len(), 1);
    assert!(report.significance.is_none());
    assert!(report.stake_suggestions.is_empty());
    assert_eq!(report.edge_buckets.len(), 5);
  }
}
