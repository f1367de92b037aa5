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

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;
use std::path::PathBuf;
use tracing::{error, info};

use hb_core::{parse_chat_id, Config, ExtractorConfig};
use hb_loaders::{
  write_backfill_atomic, DataLoader, ExportFileSource, ExtractionStats, HolderExtractor, LoaderConfig,
  LoaderContext, ProcessInfo, ProcessTracker,
};
use hb_models::{BackfillDocument, HolderSnapshot};

use super::{print_banner, rule};

#[derive(Args, Debug)]
pub struct ExtractArgs {
  /// Telegram Desktop JSON export (result.json)
  #[arg(long, env = "TELEGRAM_EXPORT_PATH")]
  export_path: Option<PathBuf>,

  /// Chat to scan, e.g. -1001234567890
  #[arg(long, env = "TELEGRAM_CHAT_ID", allow_hyphen_values = true)]
  chat_id: Option<String>,

  /// Display name of the bot posting holder counts
  #[arg(long, env = "TELEGRAM_BOT_NAME", default_value = hb_core::DEFAULT_BOT_NAME)]
  bot_name: String,

  /// Pattern with one capture group for the holder count
  #[arg(long, env = "HOLDER_PATTERN", default_value = hb_core::DEFAULT_HOLDER_PATTERN)]
  pattern: String,

  /// Stop at the first message older than this date (YYYY-MM-DD)
  #[arg(long, default_value = hb_core::DEFAULT_START_DATE)]
  since: NaiveDate,

  /// Hand-off file to write (defaults to the configured output directory)
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Messages requested per page
  #[arg(long, default_value_t = 100)]
  page_size: usize,

  /// Hide the progress spinner
  #[arg(long)]
  no_progress: bool,
}

pub async fn execute(args: ExtractArgs, config: Config) -> Result<()> {
  print_banner("TELEGRAM HOLDER DATA BACKFILL");

  let export_path = args
    .export_path
    .ok_or_else(|| anyhow!("TELEGRAM_EXPORT_PATH not set; pass --export-path"))?;
  let chat_id = parse_chat_id(args.chat_id.as_deref().unwrap_or_default())?;
  let output_path = args.output.unwrap_or(config.output.backfill_json);

  let mut extractor_config = ExtractorConfig::new(export_path, chat_id, output_path);
  extractor_config.bot_name = args.bot_name;
  extractor_config.holder_pattern = args.pattern;
  extractor_config.start_date = args.since;
  extractor_config.page_size = args.page_size;
  extractor_config.show_progress = !args.no_progress;

  let extractor = HolderExtractor::new(extractor_config)?;
  let config = extractor.config();

  info!("Opening export {}", config.export_path.display());
  let source = ExportFileSource::open(&config.export_path).await?;
  println!("✓ Opened chat export\n");
  println!("Starting message fetch from chat: {}", config.chat_id);
  println!("This may take a while depending on chat history size...\n");

  let tracker = ProcessTracker::new();
  let context = LoaderContext::new(LoaderConfig { show_progress: config.show_progress, track_process: true })
    .with_process_tracker(tracker.clone());
  let result = extractor.load(&context, Box::new(source)).await;
  let run = tracker.latest().await;

  let output = match result {
    Ok(output) => output,
    Err(e) => {
      if let Some(run) = &run {
        error!("{}", run.status_line());
      }
      return Err(e.into());
    }
  };

  println!("\n{}", rule());
  for line in completion_lines(&output.stats, run.as_ref(), config.start_date) {
    println!("{}", line);
  }
  println!("{}\n", rule());

  let document = BackfillDocument::from_snapshots(output.snapshots, Utc::now());
  write_backfill_atomic(&config.output_path, &document)?;

  println!("✓ Data saved to: {}", config.output_path.display());
  println!("  Total records: {}", document.total_records);
  if let (Some(start), Some(end)) = (&document.date_range.start, &document.date_range.end) {
    println!("  Date range: {} to {}", start, end);
  }
  if let Some((min, max)) = document.holder_range() {
    println!("  Holder count range: {} to {}", min, max);
  }

  print_data_summary(&document);
  print_banner("Session ended");
  Ok(())
}

fn completion_lines(stats: &ExtractionStats, run: Option<&ProcessInfo>, since: NaiveDate) -> Vec<String> {
  let mut lines = vec![
    "✓ Completed message search".to_string(),
    format!("  Total messages searched: {}", stats.messages_scanned),
    format!("  Holder count messages found: {}", stats.matches),
    format!("  Messages from other senders: {}", stats.skipped_sender),
  ];
  if let Some(id) = stats.stopped_at_message {
    lines.push(format!("  Stopped at message {} (older than {})", id, since));
  }
  if stats.out_of_order > 0 {
    lines.push(format!("  ⚠️  Out-of-order messages: {}", stats.out_of_order));
  }
  if let Some(run) = run {
    lines.push(format!("  Run: {}", run.status_line()));
  }
  lines
}

fn print_entries(title: &str, entries: &[HolderSnapshot]) {
  println!("\n{}", title);
  for entry in entries {
    println!("  {}: {} holders", entry.date, entry.holder_count);
  }
}

fn print_data_summary(document: &BackfillDocument) {
  if document.is_empty() {
    println!("\nNo holder data extracted.");
    return;
  }

  print_banner("DATA SUMMARY");
  println!("Total data points: {}", document.total_records);
  if let (Some(start), Some(end)) = (&document.date_range.start, &document.date_range.end) {
    println!("Date range: {} to {}", start, end);
  }
  if let Some((min, max)) = document.holder_range() {
    println!("Holder count range: {} to {}", min, max);
  }

  let data = &document.data;
  print_entries("First 3 entries:", &data[..data.len().min(3)]);
  print_entries("Last 3 entries:", &data[data.len().saturating_sub(3)..]);
}
