//! # hb-models
//!
//! Data models for holder snapshots and the backfill hand-off file shared by
//! the extractor and the exporters.

#![warn(clippy::all)]

pub mod snapshot;

// Re-export all model types
pub use snapshot::*;
