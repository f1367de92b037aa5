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
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use hb_core::{Config, SqlSinkConfig};
use hb_database_postgres::{establish_connection, StoredHolderSnapshot};
use hb_loaders::{read_backfill, to_rows, upload_snapshots, DEFAULT_UPLOAD_CHUNK};

use super::print_banner;

#[derive(Args, Debug)]
pub struct UploadArgs {
  /// Hand-off file written by `extract`
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// Project id stamped on every row
  #[arg(long, env = "HOLDER_PROJECT_ID")]
  project_id: String,

  /// Token address stamped on every row
  #[arg(long, env = "HOLDER_TOKEN_ADDRESS")]
  token_address: String,

  /// Postgres connection string (overrides DATABASE_URL)
  #[arg(long)]
  database_url: Option<String>,

  /// Rows per INSERT statement
  #[arg(long, default_value_t = DEFAULT_UPLOAD_CHUNK)]
  chunk_size: usize,

  /// Report what would be uploaded without connecting
  #[arg(long)]
  dry_run: bool,
}

pub async fn execute(args: UploadArgs, config: Config) -> Result<()> {
  print_banner("UPLOAD HOLDER SNAPSHOTS");

  let input = args.input.unwrap_or(config.output.backfill_json);
  let sink = SqlSinkConfig::new(args.project_id, args.token_address);

  println!("Loading data from: {}", input.display());
  let document = read_backfill(&input)?;
  let rows = to_rows(&document.data, &sink)?;
  println!("✓ Loaded {} records", rows.len());
  println!("  Table: {}", sink.table);
  println!("  Project ID: {}", sink.project_id);
  println!("  Token Address: {}\n", sink.token_address);

  if args.dry_run {
    println!("⚠️  Dry run mode - no data saved to database");
    return Ok(());
  }

  let database_url = args
    .database_url
    .or(config.database_url)
    .ok_or_else(|| anyhow!("DATABASE_URL not set; pass --database-url or use `hb sql`"))?;

  info!("Connecting to database");
  let mut conn = establish_connection(&database_url)?;
  let summary = upload_snapshots(&mut conn, &rows, args.chunk_size)?;

  println!("✅ Database Update:");
  println!("   Records submitted: {}", summary.submitted);
  println!("   Records saved: {}", summary.inserted);
  println!("   Already present: {}", summary.skipped());

  let stored = StoredHolderSnapshot::count_for_token(&mut conn, &sink.project_id, &sink.token_address)?;
  println!("   Stored snapshots for token: {}", stored);
  if let Some(latest) = StoredHolderSnapshot::latest_for_token(&mut conn, &sink.project_id, &sink.token_address)? {
    println!("   Latest: {} holders at timestamp {}", latest.holder_count, latest.timestamp);
  }
  Ok(())
}
