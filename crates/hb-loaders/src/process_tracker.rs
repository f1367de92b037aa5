//! Process tracking for pipeline runs
//! In-memory only; each CLI invocation owns its own tracker

use crate::LoaderResult;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessState {
  Running,
  Success,
  Failed,
}

#[derive(Debug, Clone)]
pub struct ProcessInfo {
  pub process_name: String,
  pub start_time: DateTime<Utc>,
  pub end_time: Option<DateTime<Utc>>,
  pub state: ProcessState,
  pub error_message: Option<String>,
  pub records_processed: Option<usize>,
}

impl ProcessInfo {
  /// Wall-clock duration of a finished run
  pub fn elapsed(&self) -> Option<chrono::Duration> {
    self.end_time.map(|end| end - self.start_time)
  }

  /// One-line status for the completion banner
  pub fn status_line(&self) -> String {
    let elapsed = match self.elapsed() {
      Some(d) => format!("{:.1}s", d.num_milliseconds() as f64 / 1000.0),
      None => "running".to_string(),
    };
    match self.state {
      ProcessState::Success => format!(
        "{}: success, {} records in {}",
        self.process_name,
        self.records_processed.unwrap_or_default(),
        elapsed
      ),
      ProcessState::Failed => format!(
        "{}: failed after {} ({})",
        self.process_name,
        elapsed,
        self.error_message.as_deref().unwrap_or("unknown error")
      ),
      ProcessState::Running => format!("{}: {}", self.process_name, elapsed),
    }
  }
}

/// In-memory process tracker
#[derive(Clone, Default)]
pub struct ProcessTracker {
  processes: Arc<Mutex<Vec<ProcessInfo>>>,
}

impl ProcessTracker {
  pub fn new() -> Self {
    Self { processes: Arc::new(Mutex::new(Vec::new())) }
  }

  pub async fn start(&self, process_name: &str) -> LoaderResult<()> {
    let mut processes = self.processes.lock().await;
    processes.push(ProcessInfo {
      process_name: process_name.to_string(),
      start_time: Utc::now(),
      end_time: None,
      state: ProcessState::Running,
      error_message: None,
      records_processed: None,
    });
    Ok(())
  }

  pub async fn succeed(&self, records_processed: usize) -> LoaderResult<()> {
    let mut processes = self.processes.lock().await;
    if let Some(last) = processes.last_mut() {
      last.state = ProcessState::Success;
      last.records_processed = Some(records_processed);
      last.end_time = Some(Utc::now());
    }
    Ok(())
  }

  pub async fn fail(&self, error_message: &str) -> LoaderResult<()> {
    let mut processes = self.processes.lock().await;
    if let Some(last) = processes.last_mut() {
      last.state = ProcessState::Failed;
      last.error_message = Some(error_message.to_string());
      last.end_time = Some(Utc::now());
    }
    Ok(())
  }

  pub async fn get_all(&self) -> Vec<ProcessInfo> {
    self.processes.lock().await.clone()
  }

  /// Most recently started run
  pub async fn latest(&self) -> Option<ProcessInfo> {
    self.processes.lock().await.last().cloned()
  }
}
