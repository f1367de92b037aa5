use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

use hb_core::{PoolConfig, TrackingConfig};

use super::print_banner;

#[derive(Args, Debug)]
pub struct PoolsArgs {
  /// JSON file replacing the built-in tracking table
  #[arg(long, env = "HB_POOLS_FILE")]
  pools_file: Option<PathBuf>,

  /// Show which pool was tracked on this date (YYYY-MM-DD)
  #[arg(long)]
  on: Option<NaiveDate>,
}

fn window(pool: &PoolConfig) -> String {
  let from = pool.active_from.map_or_else(|| "start".to_string(), |d| d.to_string());
  let until = pool.active_until.map_or_else(|| "now".to_string(), |d| d.to_string());
  format!("{} .. {}", from, until)
}

pub async fn execute(args: PoolsArgs) -> Result<()> {
  print_banner("POOL TRACKING CONFIGURATION");

  let tracking = match &args.pools_file {
    Some(path) => TrackingConfig::from_json_file(path)?,
    None => TrackingConfig::default(),
  };
  tracking.validate()?;

  println!("API: {}", tracking.base_url);
  println!("Network: {}", tracking.network);
  println!("Timeframe: {}\n", tracking.timeframe);

  println!("Pools:");
  for pool in &tracking.pools {
    println!("  {} ({}): {}", pool.name, pool.token_symbol, pool.address);
    println!("    key: {}, active: {}", pool.key, window(pool));
  }

  if !tracking.migrations.is_empty() {
    println!("\nMigrations:");
    for migration in &tracking.migrations {
      match migration.at() {
        Some(at) => println!("  {}: {}", migration.name, at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("  {}: invalid timestamp {}", migration.name, migration.timestamp),
      }
    }
  }

  if let Some(date) = args.on {
    match tracking.active_pool_on(date) {
      Some(pool) => println!("\nActive on {}: {} ({})", date, pool.name, pool.key),
      None => println!("\nNo pool was tracked on {}", date),
    }
  }
  println!();
  Ok(())
}
