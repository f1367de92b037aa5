pub mod holder_snapshot;

pub use holder_snapshot::{InsertSummary, NewHolderSnapshot, StoredHolderSnapshot, MAX_ROWS_PER_STATEMENT};
