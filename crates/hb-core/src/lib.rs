//! # hb-core
//!
//! Configuration records, defaults and the shared error type for the holder
//! backfill tools. Every pipeline takes one of the config structs defined here
//! as an explicit argument; nothing in the workspace reads global state.

pub mod config;
pub mod error;
pub mod tracking;

pub use config::{
  check_identifier, parse_chat_id, Config, ExporterConfig, ExtractorConfig, OutputPaths,
  SqlSinkConfig,
};
pub use error::{Error, Result};
pub use tracking::{MigrationDate, PoolConfig, TrackingConfig};

/// Display name of the bot that posts holder counts
pub const DEFAULT_BOT_NAME: &str = "Skeleton Price Bot";

/// Matches "Holders of ZERA token: 4704"
pub const DEFAULT_HOLDER_PATTERN: &str = r"Holders of ZERA token:\s*(\d+)";

/// Scanning stops at the first message older than this date
pub const DEFAULT_START_DATE: &str = "2025-01-01";

/// Consecutive changes larger than this are reported as events
pub const DEFAULT_CHANGE_THRESHOLD: u64 = 100;

/// Number of trailing snapshots listed in the summary report
pub const DEFAULT_RECENT_ENTRIES: usize = 10;

/// Destination table for holder snapshots
pub const HOLDER_SNAPSHOTS_TABLE: &str = "holder_snapshots";

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const BACKFILL_FILENAME: &str = "holder_backfill_data.json";
pub const CSV_FILENAME: &str = "holder_history.csv";
pub const SUMMARY_FILENAME: &str = "holder_summary.txt";
pub const SQL_FILENAME: &str = "insert_holder_snapshots.sql";

/// Template values shipped in `.env.example`
pub const PLACEHOLDER_PREFIX: &str = "YOUR_";
