//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `BetSource`: Tracked-bet ledger retrieval (HTTP API or file)

pub mod bet_source;

pub use bet_source::{BetSource, ServerSummary};
