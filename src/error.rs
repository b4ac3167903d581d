//! Typed errors raised by the domain layer.
//!
//! Adapters and use cases wrap these in `anyhow` with context; the
//! domain functions themselves only fail when parsing wire names.

use thiserror::Error;

/// Errors produced while interpreting ledger wire values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("unknown bet result '{0}' (expected pending, won or lost)")]
    UnknownResult(String),

    #[error("unknown date range '{0}' (expected today, yesterday, week, month or all)")]
    UnknownDateRange(String),

    #[error("unknown result filter '{0}' (expected all, settled, pending, won or lost)")]
    UnknownResultFilter(String),
}
