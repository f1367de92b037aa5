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

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;

use crate::schema::holder_snapshots;

/// Postgres caps a statement at 65535 bind parameters; each row binds four.
pub const MAX_ROWS_PER_STATEMENT: usize = 65535 / 4;

type TokenFilter<'a> = diesel::dsl::Filter<
  diesel::dsl::Filter<holder_snapshots::table, diesel::dsl::Eq<holder_snapshots::project_id, &'a str>>,
  diesel::dsl::Eq<holder_snapshots::token_address, &'a str>,
>;

/// A snapshot row as stored
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = holder_snapshots)]
#[diesel(primary_key(id))]
pub struct StoredHolderSnapshot {
  pub id: i64,
  pub project_id: String,
  pub token_address: String,
  pub holder_count: i64,
  pub timestamp: i64,
  pub created_at: DateTime<Utc>,
}

impl StoredHolderSnapshot {
  fn for_token<'a>(project: &'a str, token: &'a str) -> TokenFilter<'a> {
    use crate::schema::holder_snapshots::dsl::*;

    holder_snapshots.filter(project_id.eq(project)).filter(token_address.eq(token))
  }

  /// Number of stored snapshots of one token
  pub fn count_for_token(conn: &mut PgConnection, project: &str, token: &str) -> Result<i64, DieselError> {
    Self::for_token(project, token).count().get_result(conn)
  }

  /// Most recent snapshot of one token
  pub fn latest_for_token(
    conn: &mut PgConnection,
    project: &str,
    token: &str,
  ) -> Result<Option<Self>, DieselError> {
    use crate::schema::holder_snapshots::dsl::*;

    Self::for_token(project, token)
      .order(timestamp.desc())
      .select(StoredHolderSnapshot::as_select())
      .first(conn)
      .optional()
  }
}

/// For inserting new snapshots
#[derive(Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = holder_snapshots)]
pub struct NewHolderSnapshot {
  pub project_id: String,
  pub token_address: String,
  pub holder_count: i64,
  pub timestamp: i64,
}

/// Outcome of a conflict-skipping batch insert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertSummary {
  /// Rows offered to the database
  pub submitted: usize,

  /// Rows actually written
  pub inserted: usize,

  /// Statements executed
  pub statements: usize,
}

impl InsertSummary {
  /// Rows dropped by the uniqueness constraint
  pub fn skipped(&self) -> usize {
    self.submitted.saturating_sub(self.inserted)
  }
}

impl NewHolderSnapshot {
  pub fn new(
    project_id: impl Into<String>,
    token_address: impl Into<String>,
    holder_count: i64,
    timestamp: i64,
  ) -> Self {
    Self {
      project_id: project_id.into(),
      token_address: token_address.into(),
      holder_count,
      timestamp,
    }
  }

  /// Insert one statement's worth of rows, ignoring rows that already exist
  pub fn insert_skip_conflicts(
    conn: &mut PgConnection,
    rows: &[NewHolderSnapshot],
  ) -> Result<usize, DieselError> {
    use crate::schema::holder_snapshots::dsl::*;

    if rows.is_empty() {
      return Ok(0);
    }

    diesel::insert_into(holder_snapshots)
      .values(rows)
      .on_conflict((project_id, token_address, timestamp))
      .do_nothing()
      .execute(conn)
  }

  /// Insert all rows in chunks inside one transaction.
  ///
  /// Either every chunk is applied or none is.
  pub fn insert_all_skip_conflicts(
    conn: &mut PgConnection,
    rows: &[NewHolderSnapshot],
    chunk_size: usize,
  ) -> Result<InsertSummary, DieselError> {
    let chunk_size = chunk_size.clamp(1, MAX_ROWS_PER_STATEMENT);

    conn.transaction(|conn| {
      let mut summary = InsertSummary { submitted: rows.len(), ..InsertSummary::default() };
      for chunk in rows.chunks(chunk_size) {
        match Self::insert_skip_conflicts(conn, chunk) {
          Ok(written) => {
            summary.inserted += written;
            summary.statements += 1;
          }
          Err(e) => {
            log::error!(
              "Failed to insert {} holder snapshots starting at timestamp {}: {}",
              chunk.len(),
              chunk[0].timestamp,
              e
            );
            return Err(e);
          }
        }
      }
      log::debug!(
        "Inserted {} of {} holder snapshots in {} statements",
        summary.inserted,
        summary.submitted,
        summary.statements
      );
      Ok(summary)
    })
  }
}
