//! Dashboard Bet Source - BetSource over the REST API
//!
//! Fetches the user's tracked bets and, when configured, the
//! server-side analytics summary.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::client::ApiClient;
use super::types::BetsResponse;
use crate::domain::bet::TrackedBet;
use crate::ports::bet_source::{BetSource, ServerSummary};

/// Default ledger endpoint.
pub const DEFAULT_BETS_PATH: &str = "/api/user/bets";

/// `BetSource` backed by the dashboard API.
pub struct ApiBetSource {
  client: Arc<ApiClient>,
  bets_path: String,
  summary_path: Option<String>,
}

impl ApiBetSource {
  /// Create a source reading bets from `bets_path`.
  pub fn new(client: Arc<ApiClient>, bets_path: impl Into<String>) -> Self {
    Self {
      client,
      bets_path: bets_path.into(),
      summary_path: None,
    }
  }

  /// Also fetch the analytics summary from `path`.
  #[must_use]
  pub fn with_summary_path(mut self, path: impl Into<String>) -> Self {
    self.summary_path = Some(path.into());
    self
  }
}

#[async_trait]
impl BetSource for ApiBetSource {
  async fn fetch_bets(&self) -> Result<Vec<TrackedBet>> {
    let payload: BetsResponse = self
      .client
      .get_json(&self.bets_path)
      .await
      .context("Failed to fetch tracked bets")?;

    debug!(count = payload.bets.len(), path = %self.bets_path, "Fetched tracked bets");
    Ok(payload.bets)
  }

  async fn fetch_summary(&self) -> Result<Option<ServerSummary>> {
    let Some(path) = &self.summary_path else {
      return Ok(None);
    };

    let summary: ServerSummary = self
      .client
      .get_json(path)
      .await
      .context("Failed to fetch analytics summary")?;
    Ok(Some(summary))
  }

  async fn is_healthy(&self) -> bool {
    self.client.health_check(&self.bets_path).await
  }
}
