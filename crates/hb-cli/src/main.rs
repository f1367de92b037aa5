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

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use hb_core::Config;
use tracing::error;

mod commands;
use commands::{
  chats::ChatsArgs, export::ExportArgs, extract::ExtractArgs, patch::PatchArgs, pools::PoolsArgs,
  sql::SqlArgs, upload::UploadArgs,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "hb")]
#[command(propagate_version = true)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Verbose output
  #[arg(short, long, global = true)]
  verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Scan a chat export for holder counts and write the hand-off file
  Extract(ExtractArgs),

  /// Write the CSV, summary report and change events from the hand-off file
  Export(ExportArgs),

  /// Write a batch INSERT statement from the hand-off file
  Sql(SqlArgs),

  /// Insert the hand-off records into Postgres
  Upload(UploadArgs),

  /// List the chats of an export with their ids
  Chats(ChatsArgs),

  /// Show the pool tracking table
  Pools(PoolsArgs),

  /// Apply a built-in rule set to the dashboard page source
  Patch(PatchArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
  // Load environment variables
  dotenv().ok();

  // Parse CLI arguments
  let cli = Cli::parse();

  // Initialize logging
  let log_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt().with_env_filter(log_level).init();

  // Load configuration
  let config = Config::from_env()?;

  if let Err(e) = run(cli.command, config).await {
    error!("{:?}", e);
    eprintln!("\n✗ Error: {:#}", e);
    std::process::exit(1);
  }

  Ok(())
}

async fn run(command: Commands, config: Config) -> Result<()> {
  match command {
    Commands::Extract(args) => commands::extract::execute(args, config).await?,
    Commands::Export(args) => commands::export::execute(args, config).await?,
    Commands::Sql(args) => commands::sql::execute(args, config).await?,
    Commands::Upload(args) => commands::upload::execute(args, config).await?,
    Commands::Chats(args) => commands::chats::execute(args).await?,
    Commands::Pools(args) => commands::pools::execute(args).await?,
    Commands::Patch(args) => commands::patch::execute(args)?,
  }

  Ok(())
}
