//! Flat CSV export of holder snapshots

use crate::LoaderResult;
use csv::WriterBuilder;
use hb_models::HolderSnapshot;
use serde::Serialize;
use crate::handoff::write_output_file;
use std::io::Write;
use std::path::Path;

/// Column order of the exported file
pub const CSV_HEADER: [&str; 4] = ["date", "timestamp", "holder_count", "message_id"];

#[derive(Serialize)]
struct CsvRow<'a> {
  date: &'a str,
  timestamp: i64,
  holder_count: u64,
  message_id: i64,
}

/// Write one row per snapshot, in the order given. The header is written
/// even when there are no snapshots.
pub fn write_holder_csv<W: Write>(out: W, snapshots: &[HolderSnapshot]) -> LoaderResult<usize> {
  let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);
  writer.write_record(CSV_HEADER)?;

  for snapshot in snapshots {
    writer.serialize(CsvRow {
      date: &snapshot.date,
      timestamp: snapshot.timestamp,
      holder_count: snapshot.holder_count,
      message_id: snapshot.message_id,
    })?;
  }

  writer.flush()?;
  Ok(snapshots.len())
}

/// Write the CSV to `path`, creating parent directories as needed. Rows are
/// rendered in memory first, so a failed render leaves no file behind.
pub fn export_holder_csv<P: AsRef<Path>>(path: P, snapshots: &[HolderSnapshot]) -> LoaderResult<usize> {
  let mut rendered = Vec::new();
  let rows = write_holder_csv(&mut rendered, snapshots)?;
  write_output_file(path, rendered)?;
  Ok(rows)
}
