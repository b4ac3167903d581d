//! Tipster Ledger — Entry Point
//!
//! Loads configuration, wires the ledger source, and prints a JSON
//! report of the tracked-bet ledger. Refreshes on an interval until
//! SIGINT when polling is configured.
//!
//! Wiring sequence:
//! 1. Parse CLI flags, load config.toml + validate
//! 2. Init tracing (JSON structured logging to stderr)
//! 3. Create the BetSource (dashboard API or ledger file)
//! 4. Create the LedgerReporter (optionally snapshotting to disk)
//! 5. Report loop: run pass → print → wait for next tick or SIGINT

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use tipster_ledger::adapters::api::{ApiBetSource, ApiClient, ApiClientConfig};
use tipster_ledger::adapters::persistence::{FileBetSource, LedgerSnapshot};
use tipster_ledger::config::{self, AppConfig, SourceKind};
use tipster_ledger::domain::filter::DateRange;
use tipster_ledger::ports::BetSource;
use tipster_ledger::usecases::{LedgerReporter, ReportOptions};

/// Analyse a tipster's tracked-bet ledger.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Date window override (today, yesterday, week, month, all).
    #[arg(short, long)]
    range: Option<DateRange>,

    /// Bankroll override in units.
    #[arg(long)]
    bankroll: Option<f64>,

    /// Write each fetched ledger to this JSONL file.
    #[arg(long)]
    save_snapshot: Option<PathBuf>,

    /// Run a single pass even if polling is configured.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── 1. Load configuration ───────────────────────────────
    let mut config = config::loader::load_config(&cli.config)
        .context("Failed to load configuration")?;
    if let Some(range) = cli.range {
        config.analysis.date_range = range;
    }
    if let Some(bankroll) = cli.bankroll {
        anyhow::ensure!(bankroll > 0.0, "--bankroll must be positive, got {bankroll}");
        config.analysis.bankroll_units = bankroll;
    }

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        source = ?config.source.kind,
        range = %config.analysis.date_range,
        "Starting Tipster Ledger"
    );

    // ── 3. Create the ledger source ─────────────────────────
    let source = build_source(&config)?;

    // ── 4. Create the reporter ──────────────────────────────
    let mut reporter = LedgerReporter::new(source, ReportOptions::from_config(&config));
    if let Some(path) = &cli.save_snapshot {
        reporter = reporter.with_snapshot(LedgerSnapshot::new(path));
    }

    // ── 5. Report loop ──────────────────────────────────────
    let single_pass = cli.once || config.source.poll_interval_secs == 0;
    let interval = Duration::from_secs(config.source.poll_interval_secs);

    loop {
        match reporter.run(&Local::now()).await {
            Ok(report) => {
                let json = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize report")?;
                println!("{json}");
            }
            Err(e) if single_pass => return Err(e),
            Err(e) => error!(error = %format!("{e:#}"), "Report pass failed"),
        }

        if single_pass {
            break;
        }

        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("SIGINT received, shutting down");
                break;
            }
            () = tokio::time::sleep(interval) => {}
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Build the configured `BetSource`.
fn build_source(config: &AppConfig) -> Result<Arc<dyn BetSource>> {
    match config.source.kind {
        SourceKind::Api => {
            let client_config = ApiClientConfig {
                base_url: config.source.base_url.clone(),
                timeout: Duration::from_millis(config.source.timeout_ms),
                max_retries: config.source.max_retries,
                retry_base_delay: Duration::from_millis(config.source.retry_base_delay_ms),
                ..ApiClientConfig::default()
            };
            let client =
                Arc::new(ApiClient::new(client_config).context("Failed to create API client")?);

            let mut source = ApiBetSource::new(client, config.source.bets_path.clone());
            if let Some(path) = &config.source.summary_path {
                source = source.with_summary_path(path.clone());
            }
            Ok(Arc::new(source))
        }
        SourceKind::File => {
            let path = config
                .source
                .file
                .as_deref()
                .context("source.file is required for a file source")?;
            Ok(Arc::new(FileBetSource::new(path)))
        }
    }
}
