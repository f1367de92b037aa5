//! Configuration management for the holder backfill pipelines

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Process-level configuration shared by every subcommand
#[derive(Debug, Clone)]
pub struct Config {
  /// Locations of the generated artifacts
  pub output: OutputPaths,

  /// Postgres connection string, only needed by `upload`
  pub database_url: Option<String>,
}

impl Config {
  /// Load configuration from environment variables
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let output_dir =
      env::var("HB_OUTPUT_DIR").unwrap_or_else(|_| crate::DEFAULT_OUTPUT_DIR.to_string());
    if output_dir.trim().is_empty() {
      return Err(Error::Config("HB_OUTPUT_DIR must not be empty".to_string()));
    }

    let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());

    Ok(Config { output: OutputPaths::in_dir(output_dir), database_url })
  }
}

/// Where each pipeline reads and writes its files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
  pub backfill_json: PathBuf,
  pub csv: PathBuf,
  pub summary: PathBuf,
  pub sql: PathBuf,
}

impl OutputPaths {
  pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
    let dir = dir.as_ref();
    Self {
      backfill_json: dir.join(crate::BACKFILL_FILENAME),
      csv: dir.join(crate::CSV_FILENAME),
      summary: dir.join(crate::SUMMARY_FILENAME),
      sql: dir.join(crate::SQL_FILENAME),
    }
  }
}

impl Default for OutputPaths {
  fn default() -> Self {
    Self::in_dir(crate::DEFAULT_OUTPUT_DIR)
  }
}

/// Settings for the history extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
  /// Chat-history export produced by the chat client
  pub export_path: PathBuf,

  /// Conversation to scan
  pub chat_id: i64,

  /// Exact display name of the posting bot
  pub bot_name: String,

  /// Regular expression whose first capture group is the holder count
  pub holder_pattern: String,

  /// First day of the scan window (inclusive, UTC midnight)
  pub start_date: NaiveDate,

  /// Hand-off file written at the end of the run
  pub output_path: PathBuf,

  /// Messages requested from the source per page
  pub page_size: usize,

  /// Log a progress line after this many matches
  pub match_progress_every: usize,

  /// Log a progress line after this many scanned messages
  pub scan_progress_every: usize,

  /// Draw a terminal spinner while scanning
  pub show_progress: bool,
}

impl ExtractorConfig {
  pub fn new(export_path: PathBuf, chat_id: i64, output_path: PathBuf) -> Self {
    Self {
      export_path,
      chat_id,
      bot_name: crate::DEFAULT_BOT_NAME.to_string(),
      holder_pattern: crate::DEFAULT_HOLDER_PATTERN.to_string(),
      start_date: default_start_date(),
      output_path,
      page_size: 100,
      match_progress_every: 10,
      scan_progress_every: 1000,
      show_progress: false,
    }
  }

  /// Cutoff instant; messages strictly older than this end the scan
  pub fn window_start(&self) -> DateTime<Utc> {
    self.start_date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
  }

  pub fn validate(&self) -> Result<()> {
    check_identifier("TELEGRAM_BOT_NAME", &self.bot_name)?;
    if self.holder_pattern.trim().is_empty() {
      return Err(Error::Config("holder pattern must not be empty".to_string()));
    }
    if self.page_size == 0 {
      return Err(Error::Config("page size must be at least 1".to_string()));
    }
    if self.match_progress_every == 0 || self.scan_progress_every == 0 {
      return Err(Error::Config("progress intervals must be at least 1".to_string()));
    }
    if self.export_path.as_os_str().is_empty() {
      return Err(Error::Config("TELEGRAM_EXPORT_PATH not set".to_string()));
    }
    Ok(())
  }
}

/// Settings for the CSV/summary exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExporterConfig {
  /// Absolute change between consecutive snapshots that counts as an event
  pub change_threshold: u64,

  /// Trailing snapshots listed under "Recent Activity"
  pub recent_entries: usize,
}

impl Default for ExporterConfig {
  fn default() -> Self {
    Self {
      change_threshold: crate::DEFAULT_CHANGE_THRESHOLD,
      recent_entries: crate::DEFAULT_RECENT_ENTRIES,
    }
  }
}

/// Identifiers stamped on every row sent to the relational sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlSinkConfig {
  pub project_id: String,
  pub token_address: String,
  pub table: String,
}

impl SqlSinkConfig {
  pub fn new(project_id: impl Into<String>, token_address: impl Into<String>) -> Self {
    Self {
      project_id: project_id.into(),
      token_address: token_address.into(),
      table: crate::HOLDER_SNAPSHOTS_TABLE.to_string(),
    }
  }

  pub fn validate(&self) -> Result<()> {
    check_identifier("HOLDER_PROJECT_ID", &self.project_id)?;
    check_identifier("HOLDER_TOKEN_ADDRESS", &self.token_address)?;
    let valid_table = !self.table.is_empty()
      && self.table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if !valid_table {
      return Err(Error::Config(format!("invalid table name '{}'", self.table)));
    }
    Ok(())
  }
}

/// Reject empty or template values for a required identifier
pub fn check_identifier(name: &'static str, value: &str) -> Result<()> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::Config(format!("{} not set", name)));
  }
  if trimmed.starts_with(crate::PLACEHOLDER_PREFIX) {
    return Err(Error::Placeholder { name, value: trimmed.to_string() });
  }
  Ok(())
}

/// Parse a chat identifier such as `-1001234567890`
pub fn parse_chat_id(raw: &str) -> Result<i64> {
  check_identifier("TELEGRAM_CHAT_ID", raw)?;
  raw
    .trim()
    .parse()
    .map_err(|_| Error::Config(format!("TELEGRAM_CHAT_ID '{}' is not a numeric chat id", raw.trim())))
}

fn default_start_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_config_from_env() {
    env::set_var("HB_OUTPUT_DIR", "/tmp/hb-test-output");
    env::remove_var("DATABASE_URL");
    let config = Config::from_env().unwrap();
    assert_eq!(
      config.output.backfill_json,
      PathBuf::from("/tmp/hb-test-output/holder_backfill_data.json")
    );
    assert!(config.database_url.is_none());
    env::remove_var("HB_OUTPUT_DIR");
  }

  #[test]
  #[serial]
  fn test_config_from_env_reads_database_url() {
    env::set_var("DATABASE_URL", "postgres://localhost/holders");
    let config = Config::from_env().unwrap();
    assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/holders"));
    env::remove_var("DATABASE_URL");
  }

  #[test]
  fn test_output_paths_default() {
    let paths = OutputPaths::default();
    assert_eq!(paths.csv, PathBuf::from("output/holder_history.csv"));
    assert_eq!(paths.summary, PathBuf::from("output/holder_summary.txt"));
    assert_eq!(paths.sql, PathBuf::from("output/insert_holder_snapshots.sql"));
  }

  #[test]
  fn test_extractor_defaults() {
    let config = ExtractorConfig::new("result.json".into(), -100123, "out.json".into());
    assert_eq!(config.bot_name, "Skeleton Price Bot");
    assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    assert_eq!(config.window_start().to_rfc3339(), "2025-01-01T00:00:00+00:00");
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_extractor_rejects_placeholder_bot_name() {
    let mut config = ExtractorConfig::new("result.json".into(), 1, "out.json".into());
    config.bot_name = "YOUR_BOT_NAME".to_string();
    assert!(matches!(config.validate(), Err(Error::Placeholder { .. })));
  }

  #[test]
  fn test_extractor_rejects_zero_page_size() {
    let mut config = ExtractorConfig::new("result.json".into(), 1, "out.json".into());
    config.page_size = 0;
    assert!(matches!(config.validate(), Err(Error::Config(_))));
  }

  #[test]
  fn test_parse_chat_id() {
    assert_eq!(parse_chat_id(" -1001234567890 ").unwrap(), -1001234567890);
    assert!(matches!(parse_chat_id("YOUR_CHAT_ID_OR_USERNAME"), Err(Error::Placeholder { .. })));
    assert!(matches!(parse_chat_id("@groupname"), Err(Error::Config(_))));
    assert!(matches!(parse_chat_id(""), Err(Error::Config(_))));
  }

  #[test]
  fn test_sql_sink_validation() {
    let sink = SqlSinkConfig::new("49fd8ab1-e85b-445f-9f92-defa0d46363a", "8avjtj");
    assert!(sink.validate().is_ok());
    assert_eq!(sink.table, "holder_snapshots");

    let bad_table = SqlSinkConfig { table: "holders; DROP".to_string(), ..sink.clone() };
    assert!(bad_table.validate().is_err());

    let placeholder = SqlSinkConfig::new("YOUR_PROJECT_ID", "8avjtj");
    assert!(matches!(placeholder.validate(), Err(Error::Placeholder { .. })));
  }

  #[test]
  fn test_exporter_defaults() {
    let config = ExporterConfig::default();
    assert_eq!(config.change_threshold, 100);
    assert_eq!(config.recent_entries, 10);
  }
}
