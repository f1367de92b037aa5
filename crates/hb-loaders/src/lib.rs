//! # hb-loaders
//!
//! Pipelines for backfilling token holder history.
//!
//! This crate provides:
//! - History sources (chat export files, in-memory replays)
//! - Holder count extraction from bot messages
//! - The JSON hand-off file shared by the pipelines
//! - CSV, summary report and change-event exports
//! - SQL batch export and parameterized Postgres upload

pub mod csv_export;
pub mod error;
pub mod export_source;
pub mod handoff;
pub mod history_source;
pub mod holder_extractor;
pub mod loader;
pub mod process_tracker;
pub mod sql_export;
pub mod summary_report;
pub mod upload;

// Re-export commonly used types
pub use error::{LoaderError, LoaderResult};
pub use loader::{DataLoader, LoaderConfig, LoaderContext};
pub use process_tracker::{ProcessInfo, ProcessState, ProcessTracker};

pub use csv_export::{export_holder_csv, write_holder_csv};
pub use export_source::{api_chat_id, ExportFileSource};
pub use handoff::{read_backfill, write_backfill_atomic, write_output_file};
pub use history_source::{ChatInfo, ChatMessage, HistoryOrder, HistorySource, MemorySource};
pub use holder_extractor::{ExtractionOutput, ExtractionStats, HolderExtractor};
pub use sql_export::{escape_literal, SqlBatchExporter};
pub use summary_report::{find_significant_events, render_events, ChangeEvent, HolderSummary};
pub use upload::{to_rows, upload_snapshots, DEFAULT_UPLOAD_CHUNK};

// Prelude for convenient imports
pub mod prelude {
  pub use crate::{
    DataLoader, ExportFileSource, HistorySource, HolderExtractor, LoaderConfig, LoaderContext,
    LoaderError, LoaderResult, ProcessState, ProcessTracker,
  };
}
