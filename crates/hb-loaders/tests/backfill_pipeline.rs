//! End-to-end run of extract → hand-off → CSV / summary / SQL

use chrono::{TimeZone, Utc};
use hb_core::{ExtractorConfig, SqlSinkConfig};
use hb_loaders::prelude::*;
use hb_loaders::{
  export_holder_csv, find_significant_events, read_backfill, write_backfill_atomic, HolderSummary,
  MemorySource, SqlBatchExporter,
};
use hb_models::BackfillDocument;
use std::fs;
use tempfile::TempDir;

const EXPORT: &str = r#"{
  "name": "ZERA Price",
  "type": "private_supergroup",
  "id": 1234567890,
  "messages": [
    {"id": 100, "type": "message", "date": "2024-12-31T20:00:00", "date_unixtime": "1735675200",
     "from": "Skeleton Price Bot", "text": "Holders of ZERA token: 4000"},
    {"id": 101, "type": "message", "date": "2025-01-01T09:00:00", "date_unixtime": "1735722000",
     "from": "Skeleton Price Bot", "text": "📊 ZERA\nHolders of ZERA token: 4100"},
    {"id": 102, "type": "message", "date": "2025-01-01T12:00:00", "date_unixtime": "1735732800",
     "from": "Carol", "text": "Holders of ZERA token: 99999"},
    {"id": 103, "type": "message", "date": "2025-01-02T09:00:00", "date_unixtime": "1735808400",
     "from": "Skeleton Price Bot", "text": ["Holders of ZERA token: ", {"type": "bold", "text": "4250"}]},
    {"id": 104, "type": "message", "date": "2025-01-03T09:00:00", "date_unixtime": "1735894800",
     "from": "Skeleton Price Bot", "text": "Price only, no holder line"},
    {"id": 105, "type": "message", "date": "2025-01-04T09:00:00", "date_unixtime": "1735981200",
     "from": "Skeleton Price Bot", "text": "Holders of ZERA token: 4240"}
  ]
}"#;

const CHAT_ID: i64 = -1001234567890;

fn quiet_context() -> LoaderContext {
  LoaderContext::new(LoaderConfig { show_progress: false, track_process: true })
    .with_process_tracker(ProcessTracker::new())
}

#[tokio::test]
async fn test_backfill_pipeline_end_to_end() {
  let dir = TempDir::new().unwrap();
  let export_path = dir.path().join("result.json");
  fs::write(&export_path, EXPORT).unwrap();
  let output_dir = dir.path().join("output");
  let backfill_path = output_dir.join("holder_backfill_data.json");

  // extract
  let config = ExtractorConfig::new(export_path.clone(), CHAT_ID, backfill_path.clone());
  let extractor = HolderExtractor::new(config).unwrap();
  let source = ExportFileSource::open(&export_path).await.unwrap();
  let output = extractor.load(&quiet_context(), Box::new(source)).await.unwrap();

  assert_eq!(output.chat.id, CHAT_ID);
  assert_eq!(output.stats.stopped_at_message, Some(100));
  assert_eq!(output.stats.skipped_sender, 1);
  let counts: Vec<u64> = output.snapshots.iter().map(|s| s.holder_count).collect();
  assert_eq!(counts, vec![4100, 4250, 4240]);

  // hand-off
  let extracted_at = Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap();
  let document = BackfillDocument::from_snapshots(output.snapshots, extracted_at);
  write_backfill_atomic(&backfill_path, &document).unwrap();
  let document = read_backfill(&backfill_path).unwrap();
  assert_eq!(document.total_records, 3);
  assert_eq!(document.date_range.start.as_deref(), Some("2025-01-01T09:00:00+00:00"));
  assert_eq!(document.date_range.end.as_deref(), Some("2025-01-04T09:00:00+00:00"));

  // CSV
  let csv_path = output_dir.join("holder_history.csv");
  export_holder_csv(&csv_path, &document.data).unwrap();
  let csv = fs::read_to_string(&csv_path).unwrap();
  assert_eq!(csv.lines().count(), 4);
  assert_eq!(csv.lines().nth(1), Some("2025-01-01T09:00:00+00:00,1735722000,4100,101"));

  // summary and events
  let summary = HolderSummary::compute(&document.data, 10).unwrap().unwrap();
  assert_eq!(summary.days, 3);
  assert_eq!(summary.net_change, 140);
  let report = summary.render();
  assert!(report.contains("  Maximum holders: 4,250\n"));
  assert!(report.contains("  Net change: +140\n"));
  let events = find_significant_events(&document.data, 100).unwrap();
  assert_eq!(events.len(), 1);
  assert_eq!(events[0].change, 150);

  // SQL
  let sql_path = output_dir.join("insert_holder_snapshots.sql");
  let exporter = SqlBatchExporter::new(SqlSinkConfig::new("proj-1", "token-1")).unwrap();
  assert_eq!(exporter.export(&sql_path, &document.data).unwrap(), 3);
  let sql = fs::read_to_string(&sql_path).unwrap();
  assert!(sql.contains("('proj-1', 'token-1', 4100, 1735722000),\n"));
  assert!(sql.ends_with("ON CONFLICT (project_id, token_address, timestamp) DO NOTHING;"));
}

#[tokio::test]
async fn test_export_pipelines_report_missing_hand_off() {
  let dir = TempDir::new().unwrap();
  let err = read_backfill(dir.path().join("holder_backfill_data.json")).unwrap_err();
  assert!(matches!(err, LoaderError::InputNotFound(_)));
}

#[tokio::test]
async fn test_extraction_from_wrong_chat_fails() {
  let dir = TempDir::new().unwrap();
  let export_path = dir.path().join("result.json");
  fs::write(&export_path, EXPORT).unwrap();

  let config = ExtractorConfig::new(export_path.clone(), -100555, dir.path().join("out.json"));
  let extractor = HolderExtractor::new(config).unwrap();
  let source = ExportFileSource::open(&export_path).await.unwrap();
  let err = extractor.load(&quiet_context(), Box::new(source)).await.unwrap_err();

  assert!(matches!(err, LoaderError::ChatNotAccessible { chat_id: -100555, .. }));
}

#[tokio::test]
async fn test_replayed_history_matches_export() {
  let dir = TempDir::new().unwrap();
  let export_path = dir.path().join("result.json");
  fs::write(&export_path, EXPORT).unwrap();

  let mut export = ExportFileSource::open(&export_path).await.unwrap();
  let chat = export.chat_info(CHAT_ID).await.unwrap();
  let messages = export.fetch_page(CHAT_ID, 0, 100).await.unwrap();
  export.close().await.unwrap();

  let config = ExtractorConfig::new(export_path, CHAT_ID, dir.path().join("out.json"));
  let extractor = HolderExtractor::new(config).unwrap();

  let replay = MemorySource::newest_first(chat, messages);
  let replayed = extractor.load(&quiet_context(), Box::new(replay)).await.unwrap();
  let source = ExportFileSource::open(dir.path().join("result.json")).await.unwrap();
  let direct = extractor.load(&quiet_context(), Box::new(source)).await.unwrap();

  assert_eq!(replayed.snapshots, direct.snapshots);
  assert_eq!(replayed.stats, direct.stats);
}
