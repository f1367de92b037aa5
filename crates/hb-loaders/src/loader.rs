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

//! Base traits and types for data loaders

use crate::{LoaderResult, ProcessTracker};
use async_trait::async_trait;

/// Configuration shared by all loaders
#[derive(Debug, Clone)]
pub struct LoaderConfig {
  /// Enable progress display
  pub show_progress: bool,

  /// Enable process state tracking
  pub track_process: bool,
}

impl Default for LoaderConfig {
  fn default() -> Self {
    Self { show_progress: true, track_process: true }
  }
}

/// Shared context for all loaders
#[derive(Clone, Default)]
pub struct LoaderContext {
  pub config: LoaderConfig,
  pub process_tracker: Option<ProcessTracker>,
}

impl LoaderContext {
  pub fn new(config: LoaderConfig) -> Self {
    Self { config, process_tracker: None }
  }

  pub fn with_process_tracker(mut self, tracker: ProcessTracker) -> Self {
    self.process_tracker = Some(tracker);
    self
  }

  /// Tracker to report to, if tracking is enabled
  pub fn tracker(&self) -> Option<&ProcessTracker> {
    if self.config.track_process {
      self.process_tracker.as_ref()
    } else {
      None
    }
  }
}

/// Base trait for all data loaders
#[async_trait]
pub trait DataLoader: Send + Sync {
  /// The type of data this loader processes
  type Input;

  /// The result type after loading
  type Output;

  /// Load data from the given input
  async fn load(&self, context: &LoaderContext, input: Self::Input) -> LoaderResult<Self::Output>;

  /// Get loader name for logging/tracking
  fn name(&self) -> &'static str;
}
