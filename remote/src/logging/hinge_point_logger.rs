use std::fmt::{Display, Write};
use std::sync::Arc;

use crate::fault::{ErrorEnvelope, Failure};
use crate::logging::{LogSink, Severity, TracingLogSink, MESSAGE_GENERAL};

/// Logs each failure once, at the point where handling of its request ends.
#[derive(Debug, Clone)]
pub struct HingePointLogger {
  sink: Arc<dyn LogSink>,
  minimum: Severity,
  causal_chains: bool,
}

impl HingePointLogger {
  pub fn new(sink: Arc<dyn LogSink>, minimum: Severity) -> Self {
    Self {
      sink,
      minimum,
      causal_chains: true,
    }
  }

  pub fn tracing(minimum: Severity) -> Self {
    Self::new(Arc::new(TracingLogSink), minimum)
  }

  /// When disabled, causal chains are left out even for failures that ask for them.
  pub fn with_causal_chains(mut self, causal_chains: bool) -> Self {
    self.causal_chains = causal_chains;
    self
  }

  pub fn minimum(&self) -> Severity {
    self.minimum
  }

  /// Logs `failure` unless it was logged before. Returns whether a record was emitted.
  ///
  /// The failure is marked logged even when its level is below the minimum.
  pub fn report(
    &self,
    failure: &Failure,
    request: &dyn Display,
    reply: Option<&ErrorEnvelope>,
    intro: Option<&str>,
  ) -> bool {
    if !failure.mark_logged() {
      return false;
    }
    let level = failure.preferred_level();
    if level < self.minimum.level() {
      return false;
    }

    let (severity, text) = match Severity::from_level(level) {
      Some(severity) => (severity, self.compose(failure, request, reply, intro)),
      None => (
        Severity::Fatal,
        format!(
          "Failed to log exception for handling message due to an invalid preferred log level: {}",
          level
        ),
      ),
    };
    if let Err(error) = self.sink.emit(MESSAGE_GENERAL, severity, &text) {
      tracing::warn!("failed to emit hinge-point record: {}", error);
    }
    true
  }

  fn compose(&self, failure: &Failure, request: &dyn Display, reply: Option<&ErrorEnvelope>, intro: Option<&str>) -> String {
    let mut text = String::new();
    text.push_str(intro.unwrap_or(failure.default_log_intro()));
    let _ = write!(text, "{}\n  incomingMessage: {}", failure, request);
    if let Some(reply) = reply {
      let _ = write!(text, "\n  errorReply: {}", reply);
    }
    if self.causal_chains && failure.log_stack_trace() {
      // The failure itself is already on the first line.
      for line in failure.causal_chain().iter().skip(1) {
        let _ = write!(text, "\n    {}", line);
      }
    }
    text
  }
}
