use crate::config::MessagingConfig;
use crate::logging::Severity;

#[derive(Debug, Clone)]
pub enum ConfigOption {
  SetMinimumSeverity(Severity),
  SetMaxDepth(usize),
  AddService(String),
  SetLogStackTrace(bool),
}

impl ConfigOption {
  pub fn apply(&self, config: &mut MessagingConfig) {
    match self {
      ConfigOption::SetMinimumSeverity(severity) => {
        config.set_minimum_severity(*severity);
      }
      ConfigOption::SetMaxDepth(max_depth) => {
        config.set_max_depth(*max_depth);
      }
      ConfigOption::AddService(id) => {
        config.add_service(id.clone());
      }
      ConfigOption::SetLogStackTrace(log_stack_trace) => {
        config.set_log_stack_trace(*log_stack_trace);
      }
    }
  }

  pub fn with_minimum_severity(severity: Severity) -> ConfigOption {
    ConfigOption::SetMinimumSeverity(severity)
  }

  pub fn with_max_depth(max_depth: usize) -> ConfigOption {
    ConfigOption::SetMaxDepth(max_depth)
  }

  pub fn with_service(id: &str) -> ConfigOption {
    ConfigOption::AddService(id.to_string())
  }

  pub fn with_log_stack_trace(log_stack_trace: bool) -> ConfigOption {
    ConfigOption::SetLogStackTrace(log_stack_trace)
  }
}
