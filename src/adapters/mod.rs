//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP client, file I/O). Each sub-module
//! groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `api`: Tipping dashboard REST API client
//! - `persistence`: JSON / JSONL ledger files and snapshots

pub mod api;
pub mod persistence;
