use std::fmt::Debug;
use std::sync::Mutex;

use thiserror::Error;

use crate::logging::Severity;

/// Category every hinge-point record is emitted on.
pub const MESSAGE_GENERAL: &str = "Message.General";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
  #[error("log sink unavailable: {0}")]
  Unavailable(String),
}

/// Destination of hinge-point log records.
pub trait LogSink: Debug + Send + Sync {
  fn emit(&self, category: &str, severity: Severity, text: &str) -> Result<(), SinkError>;
}

/// Forwards records to `tracing`. Fatal records go out at error level with `fatal = true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
  fn emit(&self, category: &str, severity: Severity, text: &str) -> Result<(), SinkError> {
    match severity {
      Severity::Fatal => tracing::error!(category, fatal = true, "{}", text),
      Severity::Error => tracing::error!(category, "{}", text),
      Severity::Warn => tracing::warn!(category, "{}", text),
      Severity::Info => tracing::info!(category, "{}", text),
      Severity::Debug => tracing::debug!(category, "{}", text),
    }
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
  pub category: String,
  pub severity: Severity,
  pub text: String,
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
  records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogSink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn records(&self) -> Vec<LogRecord> {
    self
      .records
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .clone()
  }

  pub fn len(&self) -> usize {
    self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl LogSink for MemoryLogSink {
  fn emit(&self, category: &str, severity: Severity, text: &str) -> Result<(), SinkError> {
    let mut records = self
      .records
      .lock()
      .map_err(|_| SinkError::Unavailable("memory sink lock poisoned".to_string()))?;
    records.push(LogRecord {
      category: category.to_string(),
      severity,
      text: text.to_string(),
    });
    Ok(())
  }
}
