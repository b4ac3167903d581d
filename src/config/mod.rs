//! Configuration Module - TOML-based Reporter Configuration
//!
//! Loads and validates configuration from `config.toml`.
//! Where the ledger comes from, how it is windowed and how stakes
//! are sized are all externalized here; the domain layer takes them
//! as plain arguments.

pub mod loader;

use serde::Deserialize;

use crate::domain::filter::{DateRange, FilterCriteria};

/// Top-level reporter configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
  /// Reporter identity and logging.
  #[serde(default)]
  pub app: AppSection,
  /// Where tracked bets are fetched from.
  #[serde(default)]
  pub source: SourceConfig,
  /// Analysis windows and staking parameters.
  #[serde(default)]
  pub analysis: AnalysisConfig,
  /// Advanced bet filter applied before analysis.
  #[serde(default)]
  pub filter: FilterCriteria,
}

/// Reporter identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
  /// Human-readable reporter name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

impl Default for AppSection {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
    }
  }
}

/// Kind of ledger source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
  /// Dashboard REST API.
  #[default]
  Api,
  /// JSON or JSONL ledger file.
  File,
}

/// Ledger source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
  #[serde(default)]
  pub kind: SourceKind,
  /// Dashboard base URL.
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Ledger endpoint path.
  #[serde(default = "default_bets_path")]
  pub bets_path: String,
  /// Analytics summary endpoint path; not fetched when absent.
  #[serde(default)]
  pub summary_path: Option<String>,
  /// Ledger file for `kind = "file"`.
  #[serde(default)]
  pub file: Option<String>,
  /// Request timeout in milliseconds.
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
  /// Maximum retries on transient HTTP errors.
  #[serde(default = "default_max_retries")]
  pub max_retries: u32,
  /// Base retry delay in milliseconds (doubles per attempt).
  #[serde(default = "default_retry_base_delay_ms")]
  pub retry_base_delay_ms: u64,
  /// Seconds between refreshes; 0 runs a single pass.
  #[serde(default)]
  pub poll_interval_secs: u64,
}

impl Default for SourceConfig {
  fn default() -> Self {
    Self {
      kind: SourceKind::default(),
      base_url: default_base_url(),
      bets_path: default_bets_path(),
      summary_path: None,
      file: None,
      timeout_ms: default_timeout_ms(),
      max_retries: default_max_retries(),
      retry_base_delay_ms: default_retry_base_delay_ms(),
      poll_interval_secs: 0,
    }
  }
}

/// Analysis configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
  /// Bankroll in units for stake suggestions.
  #[serde(default = "default_bankroll")]
  pub bankroll_units: f64,
  /// Kelly fraction multiplier (0.5 = half-Kelly).
  #[serde(default = "default_kelly_fraction")]
  pub kelly_fraction: f64,
  /// Date window applied to `tracked_at`.
  #[serde(default)]
  pub date_range: DateRange,
  /// Bets in the "recent" metrics block.
  #[serde(default = "default_recent_window")]
  pub recent_window: usize,
  /// Outcomes in the recent-results strip.
  #[serde(default = "default_outcome_window")]
  pub outcome_window: usize,
}

impl Default for AnalysisConfig {
  fn default() -> Self {
    Self {
      bankroll_units: default_bankroll(),
      kelly_fraction: default_kelly_fraction(),
      date_range: DateRange::default(),
      recent_window: default_recent_window(),
      outcome_window: default_outcome_window(),
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "tipster-ledger".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_base_url() -> String {
  "http://127.0.0.1:8000".to_string()
}

fn default_bets_path() -> String {
  crate::adapters::api::source::DEFAULT_BETS_PATH.to_string()
}

fn default_timeout_ms() -> u64 {
  10_000
}

fn default_max_retries() -> u32 {
  3
}

fn default_retry_base_delay_ms() -> u64 {
  200
}

fn default_bankroll() -> f64 {
  100.0
}

fn default_kelly_fraction() -> f64 {
  0.5
}

fn default_recent_window() -> usize {
  crate::domain::ledger::DEFAULT_RECENT_WINDOW
}

fn default_outcome_window() -> usize {
  crate::domain::ledger::DEFAULT_OUTCOME_WINDOW
}
