//! Parameterized upload of holder snapshots to Postgres

use crate::{LoaderError, LoaderResult};
use hb_core::SqlSinkConfig;
use hb_database_postgres::{InsertSummary, NewHolderSnapshot, PgConnection};
use hb_models::HolderSnapshot;
use tracing::info;

/// Default rows per INSERT statement
pub const DEFAULT_UPLOAD_CHUNK: usize = 1000;

/// Map snapshots to insertable rows for one project and token
pub fn to_rows(snapshots: &[HolderSnapshot], sink: &SqlSinkConfig) -> LoaderResult<Vec<NewHolderSnapshot>> {
  sink.validate()?;
  snapshots
    .iter()
    .map(|snapshot| {
      let holder_count = i64::try_from(snapshot.holder_count).map_err(|_| {
        LoaderError::InvalidData(format!(
          "holder count {} of message {} does not fit a BIGINT",
          snapshot.holder_count, snapshot.message_id
        ))
      })?;
      Ok(NewHolderSnapshot::new(
        sink.project_id.as_str(),
        sink.token_address.as_str(),
        holder_count,
        snapshot.timestamp,
      ))
    })
    .collect()
}

/// Insert every row in one transaction, skipping rows already stored
pub fn upload_snapshots(
  conn: &mut PgConnection,
  rows: &[NewHolderSnapshot],
  chunk_size: usize,
) -> LoaderResult<InsertSummary> {
  let summary = NewHolderSnapshot::insert_all_skip_conflicts(conn, rows, chunk_size)?;
  info!(
    "✅ Uploaded {} holder snapshots ({} already present, {} statements)",
    summary.inserted,
    summary.skipped(),
    summary.statements
  );
  Ok(summary)
}
