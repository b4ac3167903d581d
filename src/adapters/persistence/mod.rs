//! Persistence Adapters - File-based Ledgers
//!
//! Implements the `BetSource` port over ledger files on disk and
//! writes JSONL snapshots of fetched ledgers for offline analysis.

pub mod ledger_file;

pub use ledger_file::{FileBetSource, LedgerSnapshot};
