//! Domain layer - Core betting analytics.
//!
//! This module contains the pure analytics over a tracked-bet ledger.
//! No I/O and no global state (hexagonal architecture inner ring).
//! Every function takes plain data and returns plain data.

pub mod bet;
pub mod filter;
pub mod kelly;
pub mod ledger;
pub mod series;

// Re-export core types for convenience
pub use bet::{BetId, BetResult, TrackedBet, implied_stake, profit_loss_for_bet};
pub use filter::{DateRange, FilterCriteria, ResultFilter, filter_bets, filter_by_range};
pub use kelly::{KellyCriterion, KellySizer, compute_half_kelly};
pub use ledger::{
    EdgeBucket, GroupPnl, LedgerMetrics, PnlSummary, Streaks, aggregate_pnl, bucket_edges,
    group_pnl, ledger_metrics, recent_outcomes, streaks, win_pct_from,
};
pub use series::{PlPoint, PlSeries, SignificanceStats, build_pl_series};
