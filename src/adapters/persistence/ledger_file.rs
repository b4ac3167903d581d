//! Ledger Files - JSON / JSONL Bet Ledgers on Disk
//!
//! Reads a tracked-bet ledger saved from the dashboard, either as the
//! raw API payload (`{"bets": [...]}` or a bare array) or as JSONL with
//! one bet per line. JSONL is also the snapshot format written by
//! `LedgerSnapshot`, so a live ledger can be captured and re-analysed
//! offline.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

use crate::adapters::api::types::BetsResponse;
use crate::domain::bet::TrackedBet;
use crate::ports::bet_source::{BetSource, ServerSummary};

/// `BetSource` reading a ledger file.
///
/// Files ending in `.jsonl` are read line by line and malformed lines
/// are skipped; anything else is parsed as a single JSON document.
pub struct FileBetSource {
    path: PathBuf,
}

impl FileBetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_jsonl(&self) -> bool {
        self.path.extension().is_some_and(|ext| ext == "jsonl")
    }

    /// Load every bet in the file.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load_all(&self) -> Result<Vec<TrackedBet>> {
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read ledger file: {}", self.path.display()))?;

        let bets = if self.is_jsonl() {
            parse_jsonl(&content, &self.path)
        } else {
            parse_document(&content)
                .with_context(|| format!("Failed to parse ledger file: {}", self.path.display()))?
        };

        info!(count = bets.len(), "Loaded ledger file");
        Ok(bets)
    }
}

fn parse_jsonl(content: &str, path: &Path) -> Vec<TrackedBet> {
    let mut bets = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<TrackedBet>(line) {
            Ok(bet) => bets.push(bet),
            Err(e) => {
                warn!(
                    file = %path.display(),
                    line = line_no + 1,
                    error = %e,
                    "Skipping malformed bet record"
                );
            }
        }
    }
    bets
}

fn parse_document(content: &str) -> Result<Vec<TrackedBet>> {
    if content.trim_start().starts_with('[') {
        Ok(serde_json::from_str::<Vec<TrackedBet>>(content)?)
    } else {
        Ok(serde_json::from_str::<BetsResponse>(content)?.bets)
    }
}

#[async_trait]
impl BetSource for FileBetSource {
    async fn fetch_bets(&self) -> Result<Vec<TrackedBet>> {
        self.load_all().await
    }

    async fn fetch_summary(&self) -> Result<Option<ServerSummary>> {
        Ok(None)
    }

    async fn is_healthy(&self) -> bool {
        fs::metadata(&self.path).await.is_ok_and(|m| m.is_file())
    }
}

// ────────────────────────────────────────────
// Snapshot writer
// ────────────────────────────────────────────

/// Writes fetched ledgers to a JSONL snapshot file.
pub struct LedgerSnapshot {
    path: PathBuf,
}

impl LedgerSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Replace the snapshot with `bets`, one JSON object per line.
    #[instrument(skip(self, bets), fields(path = %self.path.display(), count = bets.len()))]
    pub async fn write(&self, bets: &[TrackedBet]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create snapshot directory")?;
        }

        let mut buf = String::new();
        for bet in bets {
            buf.push_str(&serde_json::to_string(bet).context("Failed to serialize bet")?);
            buf.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .await
            .context("Failed to open snapshot file")?;

        file.write_all(buf.as_bytes())
            .await
            .context("Failed to write snapshot")?;
        file.flush().await.context("Failed to flush snapshot")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bet::BetResult;
    use chrono::{TimeZone, Utc};

    fn sample(id: &str, result: BetResult) -> TrackedBet {
        TrackedBet::new(id, 2.4, result, Utc.with_ymd_and_hms(2026, 9, 1, 7, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_load_api_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bets.json");
        std::fs::write(
            &path,
            r#"{"bets": [{"id": 1, "tracked_at": "2026-09-01T07:00:00", "result": "won", "odds_at_tip": 2.4}]}"#,
        )
        .unwrap();

        let bets = FileBetSource::new(&path).fetch_bets().await.unwrap();
        assert_eq!(bets.len(), 1);
        assert_eq!(bets[0].result, BetResult::Won);
    }

    #[tokio::test]
    async fn test_load_bare_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bets.json");
        std::fs::write(&path, r#"[{"id": "a", "tracked_at": "2026-09-01T07:00:00Z"}]"#).unwrap();

        let bets = FileBetSource::new(&path).load_all().await.unwrap();
        assert_eq!(bets[0].id, "a");
    }

    #[tokio::test]
    async fn test_jsonl_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        std::fs::write(
            &path,
            "{\"id\": 1, \"tracked_at\": \"2026-09-01T07:00:00\"}\n\nnot json\n{\"id\": 2, \"tracked_at\": \"2026-09-01T08:00:00\"}\n",
        )
        .unwrap();

        let bets = FileBetSource::new(&path).load_all().await.unwrap();
        let ids: Vec<&str> = bets.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_error_and_unhealthy() {
        let source = FileBetSource::new("does/not/exist.json");
        assert!(source.fetch_bets().await.is_err());
        assert!(!source.is_healthy().await);
        assert_eq!(source.fetch_summary().await.unwrap(), None);
    }

    #[test]
    fn test_snapshot_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshots").join("ledger.jsonl");
        let bets = vec![sample("1", BetResult::Won), sample("2", BetResult::Pending)];

        tokio_test::block_on(LedgerSnapshot::new(&path).write(&bets)).unwrap();
        let reloaded = tokio_test::block_on(FileBetSource::new(&path).load_all()).unwrap();
        assert_eq!(reloaded, bets);
    }
}
