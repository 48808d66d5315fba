use crate::fault::{fault_code, ErrorEnvelope, Failure, FailureCause, OpaqueCause, RootCause};

/// Builds the client-facing envelope of a failure.
///
/// Pure: the failure is not modified, and translating it twice gives equal envelopes.
pub fn translate(failure: &Failure) -> ErrorEnvelope {
  let mut envelope = ErrorEnvelope::new(failure.effective_code(), failure.message());
  if let Some(details) = failure.details() {
    envelope = envelope.with_fault_detail(details);
  }
  if let Some(cause) = failure.root_cause() {
    envelope = envelope.with_root_cause(translate_cause(cause));
  }
  if let Some(extended_data) = failure.extended_data() {
    envelope = envelope.with_extended_data(extended_data.clone());
  }
  if let Some(status_code) = failure.status_code() {
    envelope = envelope.with_header(fault_code::STATUS_CODE_HEADER, status_code);
  }
  envelope
}

fn translate_cause(cause: &FailureCause) -> RootCause {
  match cause {
    FailureCause::Failure(failure) => RootCause::Envelope(Box::new(translate(failure))),
    FailureCause::Opaque { type_name, error } => RootCause::Opaque(OpaqueCause::new(*type_name, error.to_string())),
  }
}
