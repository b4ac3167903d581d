//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the reporter's workflows.
//!
//! Use cases:
//! - `LedgerReporter`: Fetch, filter and analyse the tracked-bet ledger

pub mod report;

pub use report::{LedgerReport, LedgerReporter, ReportOptions, build_report};
