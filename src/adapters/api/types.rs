//! Dashboard API Response Types
//!
//! Serialization types for the tipping dashboard's ledger endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::bet::TrackedBet;

/// Response of the ledger endpoints.
///
/// `/api/user/bets` wraps rows in `bets`; `/api/tips/tracked` uses `tips`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BetsResponse {
  #[serde(default, alias = "tips")]
  pub bets: Vec<TrackedBet>,
}
