use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nexus_amf_core_rs::{EncodeError, MalformedStream};

use crate::fault::fault_code;
use crate::fault::ExtendedData;
use crate::logging::Severity;

/// Underlying cause of a [`Failure`].
#[derive(Debug, Clone)]
pub enum FailureCause {
  /// Nested failure; translated recursively.
  Failure(Box<Failure>),
  /// Any other error, forwarded by type name and message.
  Opaque {
    type_name: &'static str,
    error: Arc<dyn Error + Send + Sync + 'static>,
  },
}

impl FailureCause {
  pub fn opaque<E>(error: E) -> Self
  where
    E: Error + Send + Sync + 'static, {
    FailureCause::Opaque {
      type_name: std::any::type_name::<E>(),
      error: Arc::new(error),
    }
  }
}

/// A translatable server-side failure.
///
/// Carries everything the error envelope is built from, plus logging preferences and the flag
/// that makes sure the failure is logged at most once.
#[derive(Debug)]
pub struct Failure {
  code: Option<String>,
  message: String,
  details: Option<String>,
  root_cause: Option<FailureCause>,
  extended_data: Option<ExtendedData>,
  status_code: Option<i32>,
  preferred_level: i16,
  log_stack_trace: bool,
  logged: AtomicBool,
}

impl Failure {
  pub const DEFAULT_LOG_INTRO: &'static str = "Error handling message: ";

  pub fn new(message: impl Into<String>) -> Self {
    Self {
      code: None,
      message: message.into(),
      details: None,
      root_cause: None,
      extended_data: None,
      status_code: None,
      preferred_level: Severity::Error.level(),
      log_stack_trace: true,
      logged: AtomicBool::new(false),
    }
  }

  /// Wraps an arbitrary error as the root cause of a `Server.Processing` failure.
  pub fn from_error<E>(error: E) -> Self
  where
    E: Error + Send + Sync + 'static, {
    Self::new(error.to_string()).with_root_cause(FailureCause::opaque(error))
  }

  pub fn with_code(mut self, code: impl Into<String>) -> Self {
    self.code = Some(code.into());
    self
  }

  pub fn with_details(mut self, details: impl Into<String>) -> Self {
    self.details = Some(details.into());
    self
  }

  pub fn with_root_cause(mut self, cause: FailureCause) -> Self {
    self.root_cause = Some(cause);
    self
  }

  pub fn caused_by(self, failure: Failure) -> Self {
    self.with_root_cause(FailureCause::Failure(Box::new(failure)))
  }

  pub fn with_extended_data(mut self, extended_data: ExtendedData) -> Self {
    self.extended_data = Some(extended_data);
    self
  }

  pub fn with_status_code(mut self, status_code: i32) -> Self {
    self.status_code = Some(status_code);
    self
  }

  pub fn with_preferred_level(self, severity: Severity) -> Self {
    self.with_raw_preferred_level(severity.level())
  }

  /// Sets the preferred level without validating it; unknown levels are reported when logged.
  pub fn with_raw_preferred_level(mut self, level: i16) -> Self {
    self.preferred_level = level;
    self
  }

  pub fn with_log_stack_trace(mut self, log_stack_trace: bool) -> Self {
    self.log_stack_trace = log_stack_trace;
    self
  }

  pub fn code(&self) -> Option<&str> {
    self.code.as_deref()
  }

  /// The code, or `Server.Processing` when none (or an empty one) was set.
  pub fn effective_code(&self) -> &str {
    self
      .code
      .as_deref()
      .filter(|code| !code.is_empty())
      .unwrap_or(fault_code::SERVER_PROCESSING)
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn details(&self) -> Option<&str> {
    self.details.as_deref()
  }

  pub fn root_cause(&self) -> Option<&FailureCause> {
    self.root_cause.as_ref()
  }

  pub fn extended_data(&self) -> Option<&ExtendedData> {
    self.extended_data.as_ref()
  }

  pub fn status_code(&self) -> Option<i32> {
    self.status_code
  }

  pub fn preferred_level(&self) -> i16 {
    self.preferred_level
  }

  pub fn log_stack_trace(&self) -> bool {
    self.log_stack_trace
  }

  pub fn default_log_intro(&self) -> &'static str {
    Self::DEFAULT_LOG_INTRO
  }

  pub fn is_logged(&self) -> bool {
    self.logged.load(Ordering::Acquire)
  }

  /// Flips the logged flag; returns `true` only for the single caller that flipped it.
  pub fn mark_logged(&self) -> bool {
    self
      .logged
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
  }

  /// One line per failure in the cause chain, starting with this one.
  pub fn causal_chain(&self) -> Vec<String> {
    let mut chain = vec![self.to_string()];
    let mut next: Option<&(dyn Error + 'static)> = self.source();
    while let Some(error) = next {
      match error.downcast_ref::<Failure>() {
        Some(failure) => chain.push(format!("Caused by: {}", failure)),
        None => chain.push(format!("Caused by: {}", error)),
      }
      next = error.source();
    }
    chain
  }
}

impl Clone for Failure {
  /// The clone starts out not logged.
  fn clone(&self) -> Self {
    Self {
      code: self.code.clone(),
      message: self.message.clone(),
      details: self.details.clone(),
      root_cause: self.root_cause.clone(),
      extended_data: self.extended_data.clone(),
      status_code: self.status_code,
      preferred_level: self.preferred_level,
      log_stack_trace: self.log_stack_trace,
      logged: AtomicBool::new(false),
    }
  }
}

impl Display for Failure {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}: {}", self.effective_code(), self.message)
  }
}

impl Error for Failure {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match &self.root_cause {
      Some(FailureCause::Failure(failure)) => Some(failure.as_ref()),
      Some(FailureCause::Opaque { error, .. }) => Some(error.as_ref()),
      None => None,
    }
  }
}

impl From<MalformedStream> for Failure {
  fn from(error: MalformedStream) -> Self {
    Failure::new(error.to_string())
      .with_code(fault_code::CLIENT_MESSAGE_ENCODING)
      .with_details(format!("decoding stopped at offset {}", error.offset()))
      .with_root_cause(FailureCause::opaque(error))
  }
}

impl From<EncodeError> for Failure {
  fn from(error: EncodeError) -> Self {
    Failure::new(error.to_string())
      .with_code(fault_code::SERVER_MESSAGE_ENCODING)
      .with_root_cause(FailureCause::opaque(error))
  }
}

static_assertions::assert_impl_all!(Failure: Send, Sync);
