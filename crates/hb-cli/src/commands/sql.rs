use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use hb_core::{Config, SqlSinkConfig};
use hb_loaders::{read_backfill, SqlBatchExporter};

use super::{print_banner, rule};

#[derive(Args, Debug)]
pub struct SqlArgs {
  /// Hand-off file written by `extract`
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// SQL file to write
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Project id stamped on every row
  #[arg(long, env = "HOLDER_PROJECT_ID")]
  project_id: String,

  /// Token address stamped on every row
  #[arg(long, env = "HOLDER_TOKEN_ADDRESS")]
  token_address: String,

  /// Rows shown in the console preview
  #[arg(long, default_value_t = 10)]
  preview: usize,
}

pub async fn execute(args: SqlArgs, config: Config) -> Result<()> {
  print_banner("HOLDER SNAPSHOTS SQL EXPORT");

  let input = args.input.unwrap_or(config.output.backfill_json);
  let output = args.output.unwrap_or(config.output.sql);
  let exporter = SqlBatchExporter::new(SqlSinkConfig::new(args.project_id, args.token_address))?;

  println!("Loading data from: {}", input.display());
  let document = read_backfill(&input)?;
  println!("✓ Loaded {} records", document.data.len());
  if let (Some(start), Some(end)) = (&document.date_range.start, &document.date_range.end) {
    println!("  Date range: {} to {}\n", start, end);
  }

  println!("Generating SQL INSERT statement...");
  let rows = exporter.export(&output, &document.data)?;

  let sink = exporter.sink();
  println!("✓ SQL saved to: {}", output.display());
  println!("  Total records: {}", rows);
  println!("  Table: {}", sink.table);
  println!("  Project ID: {}", sink.project_id);
  println!("  Token Address: {}\n", sink.token_address);

  if args.preview > 0 {
    println!("{}", rule());
    println!("SQL PREVIEW (first {} records):", args.preview);
    println!("{}", rule());
    println!("{}", exporter.preview(&document.data, args.preview)?);
    println!("...");
    println!("{}", rule());
  }

  println!("\nTo insert, run the statement against your database:");
  println!("  psql \"$DATABASE_URL\" -f {}", output.display());
  println!("Or load it with `hb upload`, which binds every value as a parameter.");
  println!("{}\n", rule());
  Ok(())
}
