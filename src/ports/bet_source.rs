//! Bet Source Port - Ledger Retrieval Interface
//!
//! Defines how the analytics use case obtains tracked bets. The
//! dashboard API and local ledger files both implement this trait;
//! every analysis pass fetches the full ledger afresh.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::bet::TrackedBet;

/// Analytics summary computed server-side.
///
/// The figures are owned by the backend; they are carried through to
/// the report unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerSummary {
  /// Headline totals (stake, profit, ROI, CLV).
  #[serde(default)]
  pub summary: Value,
  /// Per-track breakdown rows.
  #[serde(default)]
  pub by_track: Vec<Value>,
  /// Per-bookmaker breakdown rows.
  #[serde(default)]
  pub by_bookmaker: Vec<Value>,
  /// Status of the backend's automatic settlement job.
  #[serde(default)]
  pub auto_settlement: Value,
}

/// Trait for tracked-bet providers.
#[async_trait]
pub trait BetSource: Send + Sync + 'static {
  /// Fetch the full ledger of tracked bets.
  async fn fetch_bets(&self) -> anyhow::Result<Vec<TrackedBet>>;

  /// Fetch the server-side analytics summary, if the source offers one.
  async fn fetch_summary(&self) -> anyhow::Result<Option<ServerSummary>>;

  /// Check if the source is reachable.
  async fn is_healthy(&self) -> bool;
}
