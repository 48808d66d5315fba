use std::collections::BTreeSet;

use nexus_amf_core_rs::CodecConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::config_option::ConfigOption;
use crate::fault::Failure;
use crate::logging::Severity;
use crate::service::ServiceDirectory;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to parse messaging configuration: {0}")]
  Parse(#[from] serde_json::Error),
  #[error(transparent)]
  Invalid(#[from] Failure),
}

/// Settings of a message processor.
///
/// Built from [`ConfigOption`]s, or deserialized from JSON with kebab-case keys:
///
/// ```json
/// { "minimum-severity": "WARN", "max-depth": 64, "services": ["echo"], "log-stack-trace": false }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct MessagingConfig {
  minimum_severity: Severity,
  max_depth: usize,
  services: BTreeSet<String>,
  log_stack_trace: bool,
}

impl Default for MessagingConfig {
  fn default() -> Self {
    Self {
      minimum_severity: Severity::Info,
      max_depth: CodecConfig::DEFAULT_MAX_DEPTH,
      services: BTreeSet::new(),
      log_stack_trace: true,
    }
  }
}

impl MessagingConfig {
  pub fn from(options: impl IntoIterator<Item = ConfigOption>) -> MessagingConfig {
    let mut config = MessagingConfig::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }

  /// Parses and validates a JSON document.
  pub fn from_json(json: &str) -> Result<MessagingConfig, ConfigError> {
    let config: MessagingConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
  }

  /// Rejects service ids that could not be addressed by a target URI.
  pub fn validate(&self) -> Result<(), Failure> {
    self
      .services
      .iter()
      .try_for_each(|id| ServiceDirectory::validate_id(id))
  }

  pub fn minimum_severity(&self) -> Severity {
    self.minimum_severity
  }

  pub fn set_minimum_severity(&mut self, minimum_severity: Severity) {
    self.minimum_severity = minimum_severity;
  }

  pub fn max_depth(&self) -> usize {
    self.max_depth
  }

  pub fn set_max_depth(&mut self, max_depth: usize) {
    self.max_depth = max_depth;
  }

  pub fn services(&self) -> &BTreeSet<String> {
    &self.services
  }

  pub fn add_service(&mut self, id: impl Into<String>) {
    self.services.insert(id.into());
  }

  pub fn log_stack_trace(&self) -> bool {
    self.log_stack_trace
  }

  pub fn set_log_stack_trace(&mut self, log_stack_trace: bool) {
    self.log_stack_trace = log_stack_trace;
  }

  pub fn codec_config(&self) -> CodecConfig {
    CodecConfig::default().with_max_depth(self.max_depth)
  }
}
