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

//! Holder snapshots and the backfill hand-off document

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
  #[error("Invalid snapshot date '{0}'")]
  InvalidDate(String),

  #[error("Document declares {declared} records but contains {actual}")]
  RecordCountMismatch { declared: usize, actual: usize },
}

/// One holder count observed in a chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderSnapshot {
  /// Id of the chat message the count was read from
  pub message_id: i64,

  /// ISO-8601 timestamp of the message
  pub date: String,

  /// Unix seconds, derived from `date`
  pub timestamp: i64,

  pub holder_count: u64,

  /// Raw message text
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,
}

impl HolderSnapshot {
  pub fn new(message_id: i64, at: DateTime<Utc>, holder_count: u64, text: Option<String>) -> Self {
    Self {
      message_id,
      date: at.to_rfc3339_opts(SecondsFormat::Secs, false),
      timestamp: at.timestamp(),
      holder_count,
      text,
    }
  }

  /// Wall-clock time of the snapshot as written in `date`
  pub fn parsed_date(&self) -> Result<NaiveDateTime, ModelError> {
    parse_snapshot_date(&self.date)
  }
}

/// Accepts RFC 3339 dates as well as the offset-less form older files carry
/// (`2025-01-02T10:00:00`, optionally with fractional seconds).
pub fn parse_snapshot_date(raw: &str) -> Result<NaiveDateTime, ModelError> {
  if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
    return Ok(with_offset.naive_local());
  }
  NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
    .map_err(|_| ModelError::InvalidDate(raw.to_string()))
}

/// First and last snapshot dates; both `null` for an empty document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub start: Option<String>,
  pub end: Option<String>,
}

/// The JSON file handed from the extractor to the exporters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillDocument {
  pub extracted_at: String,
  pub total_records: usize,
  pub date_range: DateRange,

  /// Snapshots ordered by ascending timestamp
  pub data: Vec<HolderSnapshot>,
}

impl BackfillDocument {
  /// Build a document from snapshots in any order.
  ///
  /// The sort is stable, so snapshots sharing a timestamp keep their
  /// collection order.
  pub fn from_snapshots(mut snapshots: Vec<HolderSnapshot>, extracted_at: DateTime<Utc>) -> Self {
    snapshots.sort_by_key(|snapshot| snapshot.timestamp);

    let date_range = DateRange {
      start: snapshots.first().map(|s| s.date.clone()),
      end: snapshots.last().map(|s| s.date.clone()),
    };

    Self {
      extracted_at: extracted_at.to_rfc3339(),
      total_records: snapshots.len(),
      date_range,
      data: snapshots,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// Timestamps never decrease from one snapshot to the next
  pub fn is_chronological(&self) -> bool {
    self.data.windows(2).all(|pair| pair[0].timestamp <= pair[1].timestamp)
  }

  /// Smallest and largest holder count
  pub fn holder_range(&self) -> Option<(u64, u64)> {
    let min = self.data.iter().map(|s| s.holder_count).min()?;
    let max = self.data.iter().map(|s| s.holder_count).max()?;
    Some((min, max))
  }

  pub fn check_record_count(&self) -> Result<(), ModelError> {
    if self.total_records != self.data.len() {
      return Err(ModelError::RecordCountMismatch {
        declared: self.total_records,
        actual: self.data.len(),
      });
    }
    Ok(())
  }
}
