//! Dashboard API Adapter
//!
//! Implements the HTTP side of the `BetSource` port against the
//! tipping dashboard's REST API.
//!
//! Sub-modules:
//! - `client`: HTTP client with concurrency limiting and retries
//! - `source`: `BetSource` implementation over the ledger endpoints
//! - `types`: API response type definitions

pub mod client;
pub mod source;
pub mod types;

pub use client::{ApiClient, ApiClientConfig};
pub use source::ApiBetSource;
