//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::{AppConfig, SourceKind};

/// Upper bound on `source.max_retries`.
pub const MAX_RETRIES: u32 = 10;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)
    .with_context(|| format!("Invalid config file: {}", path.display()))?;

  info!(
    source = ?config.source.kind,
    range = %config.analysis.date_range,
    bankroll = config.analysis.bankroll_units,
    kelly = config.analysis.kelly_fraction,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse TOML")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - A usable ledger source
/// - Positive bankroll and a Kelly fraction in (0, 1]
/// - Non-empty analysis windows
/// - Filter bounds that do not contradict each other
pub fn validate_config(config: &AppConfig) -> Result<()> {
  // Source validation
  match config.source.kind {
    SourceKind::Api => {
      anyhow::ensure!(
        config.source.base_url.starts_with("http://")
          || config.source.base_url.starts_with("https://"),
        "source.base_url must be an http(s) URL, got '{}'",
        config.source.base_url
      );
      anyhow::ensure!(
        config.source.bets_path.starts_with('/'),
        "source.bets_path must start with '/', got '{}'",
        config.source.bets_path
      );
      anyhow::ensure!(config.source.timeout_ms > 0, "source.timeout_ms must be positive");
      anyhow::ensure!(
        config.source.max_retries <= MAX_RETRIES,
        "source.max_retries must be at most {MAX_RETRIES}, got {}",
        config.source.max_retries
      );
    }
    SourceKind::File => {
      anyhow::ensure!(
        config.source.file.as_deref().is_some_and(|f| !f.trim().is_empty()),
        "source.file is required when source.kind = \"file\""
      );
    }
  }

  // Analysis validation
  anyhow::ensure!(
    config.analysis.bankroll_units.is_finite() && config.analysis.bankroll_units > 0.0,
    "bankroll_units must be positive, got {}",
    config.analysis.bankroll_units
  );
  anyhow::ensure!(
    config.analysis.kelly_fraction > 0.0 && config.analysis.kelly_fraction <= 1.0,
    "Kelly fraction must be in (0, 1], got {}",
    config.analysis.kelly_fraction
  );
  anyhow::ensure!(config.analysis.recent_window > 0, "recent_window must be positive");
  anyhow::ensure!(config.analysis.outcome_window > 0, "outcome_window must be positive");

  // Filter validation
  let f = &config.filter;
  check_bounds("odds", f.min_odds, f.max_odds)?;
  check_bounds("barrier", f.min_barrier, f.max_barrier)?;
  check_bounds("distance", f.min_distance, f.max_distance)?;
  check_bounds("back_number", f.min_back_number, f.max_back_number)?;

  Ok(())
}

fn check_bounds<T: PartialOrd + std::fmt::Display + Copy>(
  name: &str,
  min: Option<T>,
  max: Option<T>,
) -> Result<()> {
  if let (Some(lo), Some(hi)) = (min, max) {
    anyhow::ensure!(lo <= hi, "filter.min_{name} ({lo}) exceeds filter.max_{name} ({hi})");
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::filter::{DateRange, ResultFilter};

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_empty_config_uses_defaults() {
    let config = parse_config("").unwrap();
    assert_eq!(config.source.kind, SourceKind::Api);
    assert_eq!(config.source.bets_path, "/api/user/bets");
    assert_eq!(config.analysis.kelly_fraction, 0.5);
    assert_eq!(config.analysis.recent_window, 20);
    assert_eq!(config.analysis.outcome_window, 30);
    assert_eq!(config.analysis.date_range, DateRange::All);
    assert!(config.filter.is_unconstrained());
  }

  #[test]
  fn test_full_config() {
    let toml = r#"
      [app]
      name = "weekend-review"
      log_level = "debug"

      [source]
      kind = "file"
      file = "data/ledger.jsonl"

      [analysis]
      bankroll_units = 250.0
      date_range = "week"

      [filter]
      min_edge = 2.5
      tracks = ["Randwick"]
      result = "settled"
      search = "star"
    "#;
    let config = parse_config(toml).unwrap();
    assert_eq!(config.app.name, "weekend-review");
    assert_eq!(config.source.kind, SourceKind::File);
    assert_eq!(config.analysis.date_range, DateRange::Week);
    assert_eq!(config.filter.min_edge, Some(2.5));
    assert_eq!(config.filter.result, ResultFilter::Settled);
    assert_eq!(config.filter.tracks, vec!["Randwick".to_string()]);
  }

  #[test]
  fn test_file_source_requires_path() {
    let err = parse_config("[source]\nkind = \"file\"\n").unwrap_err();
    assert!(format!("{err:#}").contains("source.file"));
  }

  #[test]
  fn test_rejects_bad_kelly_fraction() {
    assert!(parse_config("[analysis]\nkelly_fraction = 1.5\n").is_err());
    assert!(parse_config("[analysis]\nkelly_fraction = 0.0\n").is_err());
  }

  #[test]
  fn test_rejects_inverted_bounds() {
    let err = parse_config("[filter]\nmin_odds = 5.0\nmax_odds = 2.0\n").unwrap_err();
    assert!(format!("{err:#}").contains("min_odds"));
  }

  #[test]
  fn test_rejects_excessive_retries() {
    let err = parse_config("[source]\nmax_retries = 33\n").unwrap_err();
    assert!(format!("{err:#}").contains("max_retries"));
    assert!(parse_config("[source]\nmax_retries = 10\n").is_ok());
  }

  #[test]
  fn test_rejects_unknown_range() {
    assert!(parse_config("[analysis]\ndate_range = \"fortnight\"\n").is_err());
  }
}
