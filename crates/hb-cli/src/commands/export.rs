/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-dot-]browne[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use hb_core::{Config, ExporterConfig};
use hb_loaders::{
  export_holder_csv, find_significant_events, read_backfill, render_events, write_output_file,
  HolderSummary, LoaderError,
};

use super::{print_banner, rule};

#[derive(Args, Debug)]
pub struct ExportArgs {
  /// Hand-off file written by `extract`
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// CSV destination
  #[arg(long)]
  csv: Option<PathBuf>,

  /// Summary report destination
  #[arg(long)]
  summary: Option<PathBuf>,

  /// Changes larger than this many holders are listed as events
  #[arg(long, default_value_t = hb_core::DEFAULT_CHANGE_THRESHOLD)]
  threshold: u64,

  /// Number of trailing entries in the report
  #[arg(long, default_value_t = hb_core::DEFAULT_RECENT_ENTRIES)]
  recent: usize,
}

pub async fn execute(args: ExportArgs, config: Config) -> Result<()> {
  print_banner("HOLDER DATA PROCESSOR");

  let input = args.input.unwrap_or(config.output.backfill_json);
  let csv_path = args.csv.unwrap_or(config.output.csv);
  let summary_path = args.summary.unwrap_or(config.output.summary);
  let exporter = ExporterConfig { change_threshold: args.threshold, recent_entries: args.recent };

  println!("Loading data from: {}", input.display());
  let document = match read_backfill(&input) {
    Ok(document) => document,
    Err(LoaderError::InputNotFound(path)) => {
      println!("✗ Error: Could not find {}", path.display());
      println!("  Please run `hb extract` first to generate the data.");
      return Err(LoaderError::InputNotFound(path).into());
    }
    Err(e) => return Err(e.into()),
  };
  println!("✓ Loaded {} records\n", document.data.len());

  if let Err(e) = write_outputs(&document.data, &csv_path, &summary_path, exporter) {
    error!("Export failed: {:#}", e);
    discard(&csv_path);
    discard(&summary_path);
    return Err(e);
  }

  println!("\n{}", rule());
  println!("PROCESSING COMPLETE");
  println!("{}", rule());
  println!("\nGenerated files:");
  println!("  📊 {}", csv_path.display());
  println!("  📄 {}", summary_path.display());
  println!("\n{}\n", rule());
  Ok(())
}

fn write_outputs(
  data: &[hb_models::HolderSnapshot],
  csv_path: &Path,
  summary_path: &Path,
  exporter: ExporterConfig,
) -> Result<()> {
  // parse every date before touching the output files
  let summary = HolderSummary::compute(data, exporter.recent_entries)?;
  let events = find_significant_events(data, exporter.change_threshold)?;

  let rows = export_holder_csv(csv_path, data)
    .with_context(|| format!("Failed to write {}", csv_path.display()))?;
  println!("✓ CSV exported to: {}", csv_path.display());
  println!("  Total rows: {}", rows);

  match summary {
    Some(summary) => {
      let report = summary.render();
      write_output_file(summary_path, &report)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;
      print!("{}", report);
      println!("✓ Summary saved to: {}", summary_path.display());
    }
    None => println!("No data to summarize"),
  }

  print!("{}", render_events(&events, exporter.change_threshold));
  info!("{} significant events above {} holders", events.len(), exporter.change_threshold);
  Ok(())
}

/// Remove an output left behind by a failed run
fn discard(path: &Path) {
  if path.exists() {
    if let Err(e) = fs::remove_file(path) {
      error!("Could not remove partial output {}: {}", path.display(), e);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};
  use hb_core::OutputPaths;
  use hb_loaders::write_backfill_atomic;
  use hb_models::{BackfillDocument, HolderSnapshot};
  use tempfile::TempDir;

  fn args(dir: &Path) -> ExportArgs {
    ExportArgs {
      input: Some(dir.join("holder_backfill_data.json")),
      csv: Some(dir.join("out").join("holder_history.csv")),
      summary: Some(dir.join("out").join("holder_summary.txt")),
      threshold: 100,
      recent: 10,
    }
  }

  fn config(dir: &Path) -> Config {
    Config { output: OutputPaths::in_dir(dir), database_url: None }
  }

  #[tokio::test]
  async fn test_export_writes_csv_and_summary() {
    let dir = TempDir::new().unwrap();
    let snapshots = vec![
      HolderSnapshot::new(1, Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(), 100, None),
      HolderSnapshot::new(2, Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap(), 250, None),
    ];
    let document = BackfillDocument::from_snapshots(snapshots, Utc::now());
    write_backfill_atomic(dir.path().join("holder_backfill_data.json"), &document).unwrap();

    execute(args(dir.path()), config(dir.path())).await.unwrap();

    let csv = fs::read_to_string(dir.path().join("out/holder_history.csv")).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.starts_with("date,timestamp,holder_count,message_id\n2025-01-01T09:00:00+00:00,"));
    let summary = fs::read_to_string(dir.path().join("out/holder_summary.txt")).unwrap();
    assert!(summary.contains("Net change: +150"));
  }

  #[tokio::test]
  async fn test_export_missing_input() {
    let dir = TempDir::new().unwrap();
    let err = execute(args(dir.path()), config(dir.path())).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<LoaderError>(), Some(LoaderError::InputNotFound(_))));
    assert!(!dir.path().join("out/holder_history.csv").exists());
  }

  #[tokio::test]
  async fn test_export_bad_date_leaves_no_outputs() {
    let dir = TempDir::new().unwrap();
    let mut snapshot = HolderSnapshot::new(1, Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(), 100, None);
    snapshot.date = "yesterday".to_string();
    let document = BackfillDocument::from_snapshots(vec![snapshot], Utc::now());
    write_backfill_atomic(dir.path().join("holder_backfill_data.json"), &document).unwrap();

    assert!(execute(args(dir.path()), config(dir.path())).await.is_err());
    assert!(!dir.path().join("out/holder_history.csv").exists());
    assert!(!dir.path().join("out/holder_summary.txt").exists());
  }
}
