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

//! Batch INSERT statement for the `holder_snapshots` table.
//!
//! String values are inlined as escaped literals. The identifiers come from
//! operator configuration; untrusted input goes through `upload` instead,
//! which binds every value.

use crate::{LoaderError, LoaderResult};
use hb_core::SqlSinkConfig;
use crate::handoff::write_output_file;
use hb_models::HolderSnapshot;
use std::path::Path;

const COLUMNS: &str = "(project_id, token_address, holder_count, timestamp)";
const CONFLICT_CLAUSE: &str = "ON CONFLICT (project_id, token_address, timestamp) DO NOTHING;";

/// Quote a string as an SQL literal, doubling embedded single quotes
pub fn escape_literal(value: &str) -> String {
  format!("'{}'", value.replace('\'', "''"))
}

pub struct SqlBatchExporter {
  sink: SqlSinkConfig,
}

impl SqlBatchExporter {
  pub fn new(sink: SqlSinkConfig) -> LoaderResult<Self> {
    sink.validate()?;
    Ok(Self { sink })
  }

  pub fn sink(&self) -> &SqlSinkConfig {
    &self.sink
  }

  /// One multi-row INSERT covering every snapshot. An empty batch has no
  /// valid statement and is rejected.
  pub fn render(&self, snapshots: &[HolderSnapshot]) -> LoaderResult<String> {
    if snapshots.is_empty() {
      return Err(LoaderError::InvalidData("no holder snapshots to insert".to_string()));
    }

    let project = escape_literal(&self.sink.project_id);
    let token = escape_literal(&self.sink.token_address);
    let values = snapshots
      .iter()
      .map(|s| format!("({}, {}, {}, {})", project, token, s.holder_count, s.timestamp))
      .collect::<Vec<_>>()
      .join(",\n  ");

    Ok(format!(
      "INSERT INTO {} {}\nVALUES\n  {}\n{}",
      self.sink.table, COLUMNS, values, CONFLICT_CLAUSE
    ))
  }

  /// Statement for the first `limit` snapshots only
  pub fn preview(&self, snapshots: &[HolderSnapshot], limit: usize) -> LoaderResult<String> {
    self.render(&snapshots[..limit.min(snapshots.len())])
  }

  /// Render and write the statement, returning the number of rows it carries
  pub fn export<P: AsRef<Path>>(&self, path: P, snapshots: &[HolderSnapshot]) -> LoaderResult<usize> {
    let sql = self.render(snapshots)?;
    write_output_file(path, sql)?;
    Ok(snapshots.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};
  use pretty_assertions::assert_eq;
  use std::fs;
  use tempfile::TempDir;

  fn snapshots(n: usize) -> Vec<HolderSnapshot> {
    (0..n)
      .map(|i| {
        let at = Utc.timestamp_opt(1_735_812_000 + i as i64 * 3600, 0).unwrap();
        HolderSnapshot::new(i as i64, at, 4700 + i as u64, None)
      })
      .collect()
  }

  fn exporter() -> SqlBatchExporter {
    SqlBatchExporter::new(SqlSinkConfig::new("proj-1", "8avjtjHAHFqp4g2RR9ALAGBpSTqKPZR8nRbzSTwZERA")).unwrap()
  }

  #[test]
  fn test_escape_literal() {
    assert_eq!(escape_literal("abc"), "'abc'");
    assert_eq!(escape_literal("o'brien"), "'o''brien'");
    assert_eq!(escape_literal("''"), "''''''");
  }

  #[test]
  fn test_render_statement() {
    let sql = exporter().render(&snapshots(2)).unwrap();
    assert_eq!(
      sql,
      "INSERT INTO holder_snapshots (project_id, token_address, holder_count, timestamp)\n\
       VALUES\n  \
       ('proj-1', '8avjtjHAHFqp4g2RR9ALAGBpSTqKPZR8nRbzSTwZERA', 4700, 1735812000),\n  \
       ('proj-1', '8avjtjHAHFqp4g2RR9ALAGBpSTqKPZR8nRbzSTwZERA', 4701, 1735815600)\n\
       ON CONFLICT (project_id, token_address, timestamp) DO NOTHING;"
    );
  }

  #[test]
  fn test_identifiers_with_quotes_are_escaped() {
    let exporter = SqlBatchExporter::new(SqlSinkConfig::new("it's", "tok'en")).unwrap();
    let sql = exporter.render(&snapshots(1)).unwrap();
    assert!(sql.contains("('it''s', 'tok''en', 4700, 1735812000)"));
  }

  #[test]
  fn test_empty_batch_is_rejected() {
    assert!(matches!(exporter().render(&[]), Err(LoaderError::InvalidData(_))));
  }

  #[test]
  fn test_preview_limits_rows() {
    let exporter = exporter();
    let data = snapshots(25);
    let preview = exporter.preview(&data, 10).unwrap();
    assert_eq!(preview.matches("'proj-1'").count(), 10);
    assert_eq!(exporter.preview(&data[..3], 10).unwrap().matches("'proj-1'").count(), 3);
  }

  #[test]
  fn test_export_writes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("output").join("insert_holder_snapshots.sql");

    let rows = exporter().export(&path, &snapshots(3)).unwrap();

    assert_eq!(rows, 3);
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("INSERT INTO holder_snapshots"));
    assert!(written.ends_with("DO NOTHING;"));
  }
}
