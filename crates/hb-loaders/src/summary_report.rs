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

//! Statistics report and change-event detection over a snapshot sequence.
//!
//! Both operate on the sequence as given; callers pass snapshots already in
//! ascending time order, as the hand-off document guarantees.

use crate::{LoaderError, LoaderResult};
use chrono::NaiveDateTime;
use hb_models::HolderSnapshot;
use std::fmt::Write as _;

const RULE_WIDTH: usize = 70;

/// Aggregate statistics of a snapshot sequence
#[derive(Debug, Clone, PartialEq)]
pub struct HolderSummary {
  pub start: NaiveDateTime,
  pub end: NaiveDateTime,
  pub days: i64,
  pub data_points: usize,
  pub min_holders: u64,
  pub max_holders: u64,
  pub mean_holders: f64,
  pub first_count: u64,
  pub last_count: u64,
  pub net_change: i128,
  pub percentage_change: f64,

  /// Size of the activity listing the report announces
  pub recent_limit: usize,

  /// Trailing entries as (wall-clock time, holder count)
  pub recent: Vec<(NaiveDateTime, u64)>,
}

/// Signed percentage change from `first` to `last`; zero when `first` is zero
pub fn percentage_change(first: u64, last: u64) -> f64 {
  if first == 0 {
    return 0.0;
  }
  (last as f64 - first as f64) / first as f64 * 100.0
}

fn signed_delta(from: u64, to: u64) -> i128 {
  i128::from(to) - i128::from(from)
}

impl HolderSummary {
  /// Compute statistics, keeping the last `recent_entries` snapshots for the
  /// activity listing. Returns `None` for an empty sequence.
  pub fn compute(snapshots: &[HolderSnapshot], recent_entries: usize) -> LoaderResult<Option<Self>> {
    let (Some(first), Some(last)) = (snapshots.first(), snapshots.last()) else {
      return Ok(None);
    };

    let counts = snapshots.iter().map(|s| s.holder_count);
    let min_holders = counts.clone().min().unwrap_or_default();
    let max_holders = counts.clone().max().unwrap_or_default();
    let mean_holders = counts.map(|c| c as f64).sum::<f64>() / snapshots.len() as f64;

    let start = first.parsed_date()?;
    let end = last.parsed_date()?;

    let recent = snapshots[snapshots.len().saturating_sub(recent_entries)..]
      .iter()
      .map(|s| -> LoaderResult<(NaiveDateTime, u64)> { Ok((s.parsed_date()?, s.holder_count)) })
      .collect::<LoaderResult<Vec<_>>>()?;

    Ok(Some(Self {
      start,
      end,
      days: (end - start).num_days(),
      data_points: snapshots.len(),
      min_holders,
      max_holders,
      mean_holders,
      first_count: first.holder_count,
      last_count: last.holder_count,
      net_change: signed_delta(first.holder_count, last.holder_count),
      percentage_change: percentage_change(first.holder_count, last.holder_count),
      recent_limit: recent_entries,
      recent,
    }))
  }

  /// Plain-text report
  pub fn render(&self) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut report = String::new();

    let _ = write!(
      report,
      "\n{rule}\nHOLDER DATA SUMMARY\n{rule}\n\n\
       Data Collection Period:\n  Start: {}\n  End:   {}\n  Duration: {} days\n\n\
       Holder Statistics:\n  Total data points: {}\n  Minimum holders: {}\n  Maximum holders: {}\n  Average holders: {}\n\n\
       Growth Analysis:\n  Starting holders: {}\n  Ending holders: {}\n  Net change: {}\n  Percentage change: {:+.2}%\n\n\
       Recent Activity (Last {} entries):\n",
      self.start.format("%Y-%m-%d %H:%M:%S"),
      self.end.format("%Y-%m-%d %H:%M:%S"),
      self.days,
      self.data_points,
      format_thousands(self.min_holders.into()),
      format_thousands(self.max_holders.into()),
      format_mean(self.mean_holders),
      format_thousands(self.first_count.into()),
      format_thousands(self.last_count.into()),
      format_signed_thousands(self.net_change),
      self.percentage_change,
      self.recent_limit,
    );

    for (at, count) in &self.recent {
      let _ = writeln!(report, "  {}: {} holders", at.format("%Y-%m-%d %H:%M"), format_thousands((*count).into()));
    }

    let _ = write!(report, "\n{rule}\n");
    report
  }
}

/// Integer with `,` as thousands separator
pub fn format_thousands(value: i128) -> String {
  let digits = value.unsigned_abs().to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
  if value < 0 {
    grouped.push('-');
  }
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }
  grouped
}

/// Like `format_thousands` but always carries a sign
pub fn format_signed_thousands(value: i128) -> String {
  if value < 0 {
    format_thousands(value)
  } else {
    format!("+{}", format_thousands(value))
  }
}

fn format_mean(mean: f64) -> String {
  // round half to even, then group
  let rounded = format!("{:.0}", mean);
  match rounded.parse::<i128>() {
    Ok(value) => format_thousands(value),
    Err(_) => rounded,
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
  Increase,
  Decrease,
}

/// A jump between two consecutive snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
  pub at: NaiveDateTime,
  pub previous: u64,
  pub current: u64,
  pub change: i128,
}

impl ChangeEvent {
  pub fn direction(&self) -> ChangeDirection {
    if self.change > 0 {
      ChangeDirection::Increase
    } else {
      ChangeDirection::Decrease
    }
  }
}

/// Consecutive pairs whose absolute change is strictly greater than `threshold`
pub fn find_significant_events(snapshots: &[HolderSnapshot], threshold: u64) -> LoaderResult<Vec<ChangeEvent>> {
  let mut events = Vec::new();
  for pair in snapshots.windows(2) {
    let (previous, current) = (&pair[0], &pair[1]);
    let change = signed_delta(previous.holder_count, current.holder_count);
    if change.unsigned_abs() > u128::from(threshold) {
      events.push(ChangeEvent {
        at: current.parsed_date().map_err(LoaderError::from)?,
        previous: previous.holder_count,
        current: current.holder_count,
        change,
      });
    }
  }
  Ok(events)
}

/// Event listing in the report's layout
pub fn render_events(events: &[ChangeEvent], threshold: u64) -> String {
  let mut out = format!("\nSignificant Events (changes > {} holders):\n{}\n", threshold, "=".repeat(RULE_WIDTH));
  for event in events {
    let label = match event.direction() {
      ChangeDirection::Increase => "📈 Increase",
      ChangeDirection::Decrease => "📉 Decrease",
    };
    let _ = write!(
      out,
      "\n{}\n  {}: {} → {} ({})\n",
      event.at.format("%Y-%m-%d %H:%M"),
      label,
      format_thousands(event.previous.into()),
      format_thousands(event.current.into()),
      format_signed_thousands(event.change),
    );
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone, Utc};
  use pretty_assertions::assert_eq;

  fn series(counts: &[u64]) -> Vec<HolderSnapshot> {
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
    counts
      .iter()
      .enumerate()
      .map(|(i, &count)| HolderSnapshot::new(i as i64 + 1, base + Duration::days(i as i64), count, None))
      .collect()
  }

  #[test]
  fn test_threshold_events() {
    let events = find_significant_events(&series(&[100, 250, 240, 400]), 100).unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!((events[0].previous, events[0].current, events[0].change), (100, 250, 150));
    assert_eq!((events[1].previous, events[1].current, events[1].change), (240, 400, 160));
    assert_eq!(events[0].direction(), ChangeDirection::Increase);
  }

  #[test]
  fn test_threshold_is_exclusive_and_decreases_count() {
    let events = find_significant_events(&series(&[500, 600, 399]), 100).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].change, -201);
    assert_eq!(events[0].direction(), ChangeDirection::Decrease);
  }

  #[test]
  fn test_summary_statistics() {
    let summary = HolderSummary::compute(&series(&[4700, 4650, 4800, 5000]), 10).unwrap().unwrap();

    assert_eq!(summary.min_holders, 4650);
    assert_eq!(summary.max_holders, 5000);
    assert!(summary.min_holders as f64 <= summary.mean_holders);
    assert!(summary.mean_holders <= summary.max_holders as f64);
    assert_eq!(summary.mean_holders, 4787.5);
    assert_eq!(summary.net_change, 300);
    assert_eq!(summary.days, 3);
    assert_eq!(summary.recent.len(), 4);
  }

  #[test]
  fn test_percentage_change_guards_zero_start() {
    assert_eq!(percentage_change(0, 500), 0.0);
    assert_eq!(percentage_change(200, 300), 50.0);
    assert_eq!(percentage_change(200, 100), -50.0);

    let summary = HolderSummary::compute(&series(&[0, 10]), 10).unwrap().unwrap();
    assert_eq!(summary.percentage_change, 0.0);
    assert_eq!(summary.net_change, 10);
  }

  #[test]
  fn test_empty_sequence_has_no_summary() {
    assert!(HolderSummary::compute(&[], 10).unwrap().is_none());
    assert!(find_significant_events(&[], 100).unwrap().is_empty());
  }

  #[test]
  fn test_recent_entries_are_the_tail() {
    let counts: Vec<u64> = (1..=15).map(|i| i * 1000).collect();
    let summary = HolderSummary::compute(&series(&counts), 10).unwrap().unwrap();
    assert_eq!(summary.recent.len(), 10);
    assert_eq!(summary.recent[0].1, 6000);
    assert_eq!(summary.recent[9].1, 15000);
  }

  #[test]
  fn test_format_thousands() {
    assert_eq!(format_thousands(0), "0");
    assert_eq!(format_thousands(999), "999");
    assert_eq!(format_thousands(4704), "4,704");
    assert_eq!(format_thousands(1234567), "1,234,567");
    assert_eq!(format_thousands(-1500), "-1,500");
    assert_eq!(format_signed_thousands(1500), "+1,500");
    assert_eq!(format_signed_thousands(0), "+0");
  }

  #[test]
  fn test_render_report() {
    let summary = HolderSummary::compute(&series(&[4700, 4950]), 10).unwrap().unwrap();
    let rule = "=".repeat(70);
    let expected = format!(
      "\n{rule}\nHOLDER DATA SUMMARY\n{rule}\n\n\
       Data Collection Period:\n  Start: 2025-01-01 09:00:00\n  End:   2025-01-02 09:00:00\n  Duration: 1 days\n\n\
       Holder Statistics:\n  Total data points: 2\n  Minimum holders: 4,700\n  Maximum holders: 4,950\n  Average holders: 4,825\n\n\
       Growth Analysis:\n  Starting holders: 4,700\n  Ending holders: 4,950\n  Net change: +250\n  Percentage change: +5.32%\n\n\
       Recent Activity (Last 10 entries):\n  2025-01-01 09:00: 4,700 holders\n  2025-01-02 09:00: 4,950 holders\n\n{rule}\n"
    );
    assert_eq!(summary.render(), expected);
  }

  #[test]
  fn test_counts_beyond_i64_range() {
    let huge = i64::MAX as u64 + 1;
    let summary = HolderSummary::compute(&series(&[huge, 1]), 10).unwrap().unwrap();
    assert_eq!(summary.net_change, -(i128::from(huge) - 1));
    assert_eq!(summary.max_holders, huge);
    assert!(summary.render().contains("  Maximum holders: 9,223,372,036,854,775,808
"));

    let events = find_significant_events(&series(&[1, u64::MAX]), 100).unwrap();
    assert_eq!(events[0].change, i128::from(u64::MAX) - 1);
    assert!(render_events(&events, 100).contains("1 → 18,446,744,073,709,551,615 (+18,446,744,073,709,551,614)"));
  }

  #[test]
  fn test_render_events() {
    let events = find_significant_events(&series(&[1000, 1200, 1050]), 100).unwrap();
    let rendered = render_events(&events, 100);
    assert!(rendered.starts_with("\nSignificant Events (changes > 100 holders):\n"));
    assert!(rendered.contains("2025-01-02 09:00\n  📈 Increase: 1,000 → 1,200 (+200)\n"));
    assert!(rendered.contains("2025-01-03 09:00\n  📉 Decrease: 1,200 → 1,050 (-150)\n"));
  }
}
