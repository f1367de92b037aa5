use anyhow::{anyhow, Result};
use clap::Args;
use std::path::PathBuf;

use hb_loaders::ExportFileSource;

use super::{print_banner, rule};

#[derive(Args, Debug)]
pub struct ChatsArgs {
  /// Telegram Desktop JSON export (result.json)
  #[arg(long, env = "TELEGRAM_EXPORT_PATH")]
  export_path: Option<PathBuf>,
}

/// List every chat in an export so the right TELEGRAM_CHAT_ID can be picked
pub async fn execute(args: ChatsArgs) -> Result<()> {
  print_banner("TELEGRAM CHAT ID FINDER");

  let export_path = args
    .export_path
    .ok_or_else(|| anyhow!("TELEGRAM_EXPORT_PATH not set; pass --export-path"))?;
  let source = ExportFileSource::open(&export_path).await?;
  println!("✓ Opened {}\n", source.path().display());
  println!("{}", rule());

  let chats = source.list_chats();
  for (i, chat) in chats.iter().enumerate() {
    println!("\nChat #{}:", i + 1);
    println!("  Title: {}", chat.title.as_deref().unwrap_or("N/A"));
    println!("  Type: {}", chat.kind);
    println!("  Chat ID: {}", chat.id);
    if let Some(count) = chat.message_count {
      println!("  Messages: {}", count);
    }
  }

  println!("\n{}", rule());
  println!("Total chats: {}", chats.len());
  println!("{}\n", rule());
  println!("Copy the Chat ID of the group where the bot posts holder counts");
  println!("into TELEGRAM_CHAT_ID.\n");
  Ok(())
}
