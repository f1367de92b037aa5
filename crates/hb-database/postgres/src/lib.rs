//! Postgres sink for holder snapshots.
//!
//! Rows are written with bound parameters and a conflict-skip clause keyed on
//! `(project_id, token_address, timestamp)`, so re-running an upload is safe.

pub mod connection;
pub mod models;
pub mod schema;

// Re-export commonly used items
pub use connection::establish_connection;
pub use diesel::prelude::*;
pub use models::{InsertSummary, NewHolderSnapshot, StoredHolderSnapshot};
