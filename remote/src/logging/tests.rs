use std::sync::Arc;

use rstest::rstest;
use tracing_subscriber::EnvFilter;

use super::*;
use crate::fault::{translate, Failure};

#[derive(Debug)]
struct BrokenSink;

impl LogSink for BrokenSink {
  fn emit(&self, _category: &str, _severity: Severity, _text: &str) -> Result<(), SinkError> {
    Err(SinkError::Unavailable("closed".to_string()))
  }
}

fn init_logger() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .try_init();
}

fn logger(minimum: Severity) -> (Arc<MemoryLogSink>, HingePointLogger) {
  let sink = Arc::new(MemoryLogSink::new());
  let logger = HingePointLogger::new(sink.clone(), minimum);
  (sink, logger)
}

#[rstest]
#[case(Severity::Debug, 2)]
#[case(Severity::Info, 4)]
#[case(Severity::Warn, 6)]
#[case(Severity::Error, 8)]
#[case(Severity::Fatal, 1000)]
fn test_severity_levels(#[case] severity: Severity, #[case] level: i16) {
  assert_eq!(severity.level(), level);
  assert_eq!(Severity::from_level(level), Some(severity));
  assert_eq!(severity.to_string().parse::<Severity>().unwrap(), severity);
}

#[test]
fn test_severity_deserializes_from_upper_case_names() {
  let severity: Severity = serde_json::from_str("\"WARN\"").unwrap();
  assert_eq!(severity, Severity::Warn);
  assert!(Severity::from_level(5).is_none());
}

#[test]
fn test_report_composes_one_record() {
  init_logger();
  let (sink, logger) = logger(Severity::Info);
  let failure = Failure::new("boom")
    .with_code("App.Failed")
    .caused_by(Failure::new("disk").with_code("Io.Failed"));
  let envelope = translate(&failure);

  assert!(logger.report(&failure, &"request#1", Some(&envelope), None));
  let records = sink.records();
  assert_eq!(records.len(), 1);
  let record = &records[0];
  assert_eq!(record.category, MESSAGE_GENERAL);
  assert_eq!(record.severity, Severity::Error);
  assert!(record.text.starts_with("Error handling message: App.Failed: boom"));
  assert!(record.text.contains("\n  incomingMessage: request#1"));
  assert!(record.text.contains("\n  errorReply: ErrorMessage(faultCode = App.Failed"));
  assert!(record.text.contains("\n    Caused by: Io.Failed: disk"));
  assert_eq!(record.text.matches("App.Failed: boom").count(), 1);
}

#[test]
fn test_report_uses_given_intro_and_omits_missing_reply() {
  let (sink, logger) = logger(Severity::Info);
  let failure = Failure::new("bad bytes").with_log_stack_trace(false);
  logger.report(&failure, &"raw", None, Some("Error deserializing request: "));
  let text = &sink.records()[0].text;
  assert!(text.starts_with("Error deserializing request: "));
  assert!(!text.contains("errorReply"));
  assert!(!text.contains("\n    "));
}

#[test]
fn test_report_logs_only_once() {
  let (sink, logger) = logger(Severity::Info);
  let failure = Failure::new("boom");
  assert!(logger.report(&failure, &"first", None, None));
  assert!(!logger.report(&failure, &"second", None, None));
  assert_eq!(sink.len(), 1);
}

#[test]
fn test_below_minimum_is_marked_but_not_emitted() {
  let (sink, logger) = logger(Severity::Error);
  let failure = Failure::new("minor").with_preferred_level(Severity::Warn);
  assert!(!logger.report(&failure, &"request", None, None));
  assert!(failure.is_logged());
  assert!(sink.is_empty());
}

#[test]
fn test_invalid_level_emits_fatal_record() {
  let (sink, logger) = logger(Severity::Info);
  let failure = Failure::new("odd").with_raw_preferred_level(5);
  assert!(logger.report(&failure, &"request", None, None));
  let records = sink.records();
  assert_eq!(records[0].severity, Severity::Fatal);
  assert_eq!(
    records[0].text,
    "Failed to log exception for handling message due to an invalid preferred log level: 5"
  );
}

#[test]
fn test_sink_errors_are_swallowed() {
  init_logger();
  let logger = HingePointLogger::new(Arc::new(BrokenSink), Severity::Debug);
  let failure = Failure::new("boom");
  assert!(logger.report(&failure, &"request", None, None));
  assert!(failure.is_logged());
}

#[test]
fn test_causal_chains_can_be_disabled() {
  let (sink, logger) = logger(Severity::Info);
  let logger = logger.with_causal_chains(false);
  let failure = Failure::new("boom").caused_by(Failure::new("disk"));
  logger.report(&failure, &"request", None, None);
  assert!(!sink.records()[0].text.contains("\n    "));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reports_emit_once() {
  init_logger();
  let (sink, logger) = logger(Severity::Debug);
  let failure = Arc::new(Failure::new("shared"));
  let handles = (0..16)
    .map(|i| {
      let logger = logger.clone();
      let failure = failure.clone();
      tokio::spawn(async move { logger.report(&failure, &format!("request#{}", i), None, None) })
    })
    .collect::<Vec<_>>();
  let mut emitted = 0;
  for handle in handles {
    if handle.await.unwrap() {
      emitted += 1;
    }
  }
  assert_eq!(emitted, 1);
  assert_eq!(sink.len(), 1);
}
