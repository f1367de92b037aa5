//! Backfill JSON hand-off between the extractor and the exporters

use crate::{LoaderError, LoaderResult};
use hb_models::BackfillDocument;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Read a backfill document, failing with `InputNotFound` when it is missing
pub fn read_backfill<P: AsRef<Path>>(path: P) -> LoaderResult<BackfillDocument> {
  let path = path.as_ref();
  let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
    ErrorKind::NotFound => LoaderError::InputNotFound(path.to_path_buf()),
    _ => LoaderError::from(e),
  })?;

  let document: BackfillDocument = serde_json::from_str(&raw)?;
  // the declared count is informational; `data` is authoritative
  if let Err(e) = document.check_record_count() {
    warn!("{}: {}", path.display(), e);
  }
  debug!("Read {} records from {}", document.data.len(), path.display());
  Ok(document)
}

pub(crate) fn ensure_parent_dir(path: &Path) -> LoaderResult<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)?;
  }
  Ok(())
}

/// Write a generated artifact, creating parent directories as needed
pub fn write_output_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> LoaderResult<()> {
  let path = path.as_ref();
  ensure_parent_dir(path)?;
  fs::write(path, contents)?;
  Ok(())
}

/// Write a backfill document through a temporary sibling file and rename it
/// into place, so readers never see a partial file.
pub fn write_backfill_atomic<P: AsRef<Path>>(path: P, document: &BackfillDocument) -> LoaderResult<()> {
  let path = path.as_ref();
  ensure_parent_dir(path)?;

  let tmp_path = path.with_extension("json.tmp");
  let json = serde_json::to_string_pretty(document)?;
  fs::write(&tmp_path, json)?;
  if let Err(e) = fs::rename(&tmp_path, path) {
    let _ = fs::remove_file(&tmp_path);
    return Err(e.into());
  }

  debug!("Wrote {} records to {}", document.total_records, path.display());
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};
  use hb_models::HolderSnapshot;
  use pretty_assertions::assert_eq;
  use tempfile::TempDir;

  fn document() -> BackfillDocument {
    let snapshots = vec![
      HolderSnapshot::new(2, Utc.with_ymd_and_hms(2025, 1, 3, 10, 0, 0).unwrap(), 4710, None),
      HolderSnapshot::new(1, Utc.with_ymd_and_hms(2025, 1, 2, 10, 0, 0).unwrap(), 4700, None),
    ];
    BackfillDocument::from_snapshots(snapshots, Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap())
  }

  #[test]
  fn test_write_then_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("holder_backfill_data.json");

    write_backfill_atomic(&path, &document()).unwrap();
    let read = read_backfill(&path).unwrap();

    assert_eq!(read, document());
    assert!(read.is_chronological());
    assert!(!path.with_extension("json.tmp").exists());
  }

  #[test]
  fn test_overwrite_replaces_previous_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("holder_backfill_data.json");
    fs::write(&path, "stale").unwrap();

    write_backfill_atomic(&path, &document()).unwrap();

    assert_eq!(read_backfill(&path).unwrap().total_records, 2);
  }

  #[test]
  fn test_missing_input() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.json");
    match read_backfill(&path) {
      Err(LoaderError::InputNotFound(p)) => assert_eq!(p, path),
      other => panic!("expected InputNotFound, got {:?}", other),
    }
  }

  #[test]
  fn test_count_mismatch_is_tolerated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("holder_backfill_data.json");
    let mut doc = document();
    doc.total_records = 5;
    fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

    let read = read_backfill(&path).unwrap();
    assert_eq!(read.total_records, 5);
    assert_eq!(read.data, document().data);
  }

  #[test]
  fn test_write_output_file_creates_parents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a").join("b").join("report.txt");

    write_output_file(&path, "done\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "done\n");
  }

  #[test]
  fn test_malformed_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("holder_backfill_data.json");
    fs::write(&path, "{\"data\": [").unwrap();
    assert!(matches!(read_backfill(&path), Err(LoaderError::SerializationError(_))));
  }
}
