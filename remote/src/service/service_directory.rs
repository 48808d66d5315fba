use std::collections::BTreeSet;

use crate::config::MessagingConfig;
use crate::fault::{fault_code, Failure};
use crate::logging::Severity;

/// A body target split into service id and operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCall {
  pub service_id: String,
  pub operation: String,
}

/// Known service ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDirectory {
  services: BTreeSet<String>,
}

impl ServiceDirectory {
  pub fn new<I, S>(services: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>, {
    Self {
      services: services.into_iter().map(Into::into).collect(),
    }
  }

  pub fn from_config(config: &MessagingConfig) -> Self {
    Self::new(config.services().iter().cloned())
  }

  fn invalid_id(id: &str) -> Failure {
    Failure::new(format!("Invalid service id '{}'.", id))
      .with_code(fault_code::SERVER_RESOURCE_UNAVAILABLE)
      .with_preferred_level(Severity::Warn)
  }

  /// Ids must be non-empty and free of separators and whitespace.
  pub fn validate_id(id: &str) -> Result<(), Failure> {
    let valid = !id.is_empty() && !id.chars().any(|c| matches!(c, ',' | ';' | ':') || c.is_whitespace());
    if valid {
      Ok(())
    } else {
      Err(Self::invalid_id(id))
    }
  }

  pub fn contains(&self, id: &str) -> bool {
    self.services.contains(id)
  }

  pub fn resolve(&self, id: &str) -> Result<(), Failure> {
    Self::validate_id(id)?;
    if self.contains(id) {
      Ok(())
    } else {
      Err(Self::invalid_id(id))
    }
  }

  /// Splits `service.operation` at the last dot and resolves the service id.
  pub fn route(&self, target_uri: &str) -> Result<ServiceCall, Failure> {
    let (service_id, operation) = target_uri.rsplit_once('.').unwrap_or((target_uri, ""));
    self.resolve(service_id)?;
    Ok(ServiceCall {
      service_id: service_id.to_string(),
      operation: operation.to_string(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_route_splits_at_last_dot() {
    let directory = ServiceDirectory::new(["com.example.echo"]);
    let call = directory.route("com.example.echo.ping").unwrap();
    assert_eq!(call.service_id, "com.example.echo");
    assert_eq!(call.operation, "ping");
  }

  #[test]
  fn test_unknown_service_is_rejected() {
    let directory = ServiceDirectory::new(["echo"]);
    let failure = directory.route("missing.ping").unwrap_err();
    assert_eq!(failure.message(), "Invalid service id 'missing'.");
    assert_eq!(failure.effective_code(), fault_code::SERVER_RESOURCE_UNAVAILABLE);
  }

  #[test]
  fn test_malformed_id_is_rejected_even_if_listed() {
    let directory = ServiceDirectory::new(["foo-service,"]);
    let failure = directory.resolve("foo-service,").unwrap_err();
    assert_eq!(failure.message(), "Invalid service id 'foo-service,'.");
  }
}
