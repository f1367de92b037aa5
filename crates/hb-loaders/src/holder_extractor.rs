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

//! Holder count extraction from chat history.
//!
//! Scans one conversation newest-first, keeps messages posted by the price
//! bot, reads the holder count with a regular expression and stops at the
//! first message older than the configured window.

use crate::history_source::{ChatInfo, ChatMessage, HistoryOrder, HistorySource};
use crate::loader::{DataLoader, LoaderContext};
use crate::{LoaderError, LoaderResult};
use async_trait::async_trait;
use hb_core::ExtractorConfig;
use hb_models::HolderSnapshot;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Counters collected during one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
  /// Messages inside the window that were examined
  pub messages_scanned: usize,

  /// Messages that produced a snapshot
  pub matches: usize,

  /// Messages dropped because another sender posted them
  pub skipped_sender: usize,

  pub pages_fetched: usize,

  /// First message found older than the window; the scan ended there
  pub stopped_at_message: Option<i64>,

  /// Messages newer than their predecessor despite newest-first delivery
  pub out_of_order: usize,
}

#[derive(Debug, Clone)]
pub struct ExtractionOutput {
  pub chat: ChatInfo,

  /// Ascending by timestamp
  pub snapshots: Vec<HolderSnapshot>,

  pub stats: ExtractionStats,
}

pub struct HolderExtractor {
  config: ExtractorConfig,
  pattern: Regex,
}

impl HolderExtractor {
  pub fn new(config: ExtractorConfig) -> LoaderResult<Self> {
    config.validate()?;
    let pattern = Regex::new(&config.holder_pattern)?;
    if pattern.captures_len() < 2 {
      return Err(LoaderError::InvalidPattern(format!(
        "'{}' has no capture group for the holder count",
        config.holder_pattern
      )));
    }
    Ok(Self { config, pattern })
  }

  pub fn config(&self) -> &ExtractorConfig {
    &self.config
  }

  /// Holder count in `text`, or `None` when the pattern does not match
  pub fn extract_holder_count(&self, text: &str) -> Option<u64> {
    let captures = self.pattern.captures(text)?;
    captures.get(1)?.as_str().parse().ok()
  }

  /// Messages without sender information are not filtered out
  fn is_from_bot(&self, message: &ChatMessage) -> bool {
    message.sender_name.as_deref().map_or(true, |sender| sender == self.config.bot_name)
  }

  fn progress_bar(&self, show: bool) -> ProgressBar {
    if !show {
      return ProgressBar::hidden();
    }
    let progress = ProgressBar::new_spinner();
    progress.set_style(
      ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.enable_steady_tick(Duration::from_millis(120));
    progress
  }

  /// Scan the configured chat.
  ///
  /// The source must deliver newest-first; the scan ends at the first message
  /// older than the window and never looks past it.
  pub async fn scan(
    &self,
    source: &mut dyn HistorySource,
    show_progress: bool,
  ) -> LoaderResult<ExtractionOutput> {
    if source.order() != HistoryOrder::NewestFirst {
      return Err(LoaderError::UnsupportedOrder(source.order().to_string()));
    }

    let chat_id = self.config.chat_id;
    let chat = source.chat_info(chat_id).await?;
    info!(
      "✓ Found chat: {} (type: {}, id: {})",
      chat.title.as_deref().unwrap_or("N/A"),
      chat.kind,
      chat.id
    );

    let cutoff = self.config.window_start();
    info!("Looking for messages from: {}", self.config.bot_name);
    info!("Pattern: {}", self.config.holder_pattern);
    info!("Starting from: {}", cutoff.format("%B %-d, %Y"));

    let progress = self.progress_bar(show_progress);
    let mut stats = ExtractionStats::default();
    let mut snapshots = Vec::new();
    let mut previous_date = None;
    let mut offset = 0;

    'pages: loop {
      let page = source.fetch_page(chat_id, offset, self.config.page_size).await?;
      if page.is_empty() {
        break;
      }
      stats.pages_fetched += 1;
      offset += page.len();

      for message in page {
        if message.date < cutoff {
          debug!("Message {} at {} is older than the window, stopping", message.id, message.date);
          stats.stopped_at_message = Some(message.id);
          break 'pages;
        }

        if previous_date.is_some_and(|previous| message.date > previous) {
          stats.out_of_order += 1;
        }
        previous_date = Some(message.date);
        stats.messages_scanned += 1;

        if self.is_from_bot(&message) {
          if let Some(text) = message.text {
            if let Some(holder_count) = self.extract_holder_count(&text) {
              snapshots.push(HolderSnapshot::new(message.id, message.date, holder_count, Some(text)));
              stats.matches += 1;
              if stats.matches % self.config.match_progress_every == 0 {
                info!("  Found {} holder count messages...", stats.matches);
              }
            }
          }
        } else {
          stats.skipped_sender += 1;
        }

        if stats.messages_scanned % self.config.scan_progress_every == 0 {
          info!("  Scanned {} total messages...", stats.messages_scanned);
        }
        progress.set_message(format!(
          "{} messages scanned, {} holder counts found",
          stats.messages_scanned, stats.matches
        ));
      }
    }
    progress.finish_and_clear();

    if stats.out_of_order > 0 {
      warn!(
        "{} messages arrived out of order; the early stop may have skipped older matches",
        stats.out_of_order
      );
    }

    snapshots.sort_by_key(|snapshot| snapshot.timestamp);

    info!("✓ Completed message search");
    info!("  Total messages searched: {}", stats.messages_scanned);
    info!("  Holder count messages found: {}", stats.matches);

    Ok(ExtractionOutput { chat, snapshots, stats })
  }
}

#[async_trait]
impl DataLoader for HolderExtractor {
  type Input = Box<dyn HistorySource>;
  type Output = ExtractionOutput;

  /// Run a scan and release the source whether or not it succeeded
  async fn load(&self, context: &LoaderContext, input: Self::Input) -> LoaderResult<Self::Output> {
    let mut source = input;
    if let Some(tracker) = context.tracker() {
      tracker.start(self.name()).await?;
    }

    let result = self.scan(source.as_mut(), context.config.show_progress).await;

    if let Err(e) = source.close().await {
      warn!("Failed to close {} history source: {}", source.name(), e);
    }

    if let Some(tracker) = context.tracker() {
      match &result {
        Ok(output) => tracker.succeed(output.snapshots.len()).await?,
        Err(e) => tracker.fail(&e.to_string()).await?,
      }
    }
    result
  }

  fn name(&self) -> &'static str {
    "holder_extract"
  }
}
