use std::fmt::{Display, Formatter};
use std::str::FromStr;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Log severity with the numeric levels clients and configuration use.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, IntoPrimitive, TryFromPrimitive, Serialize, Deserialize,
)]
#[repr(i16)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
  Debug = 2,
  Info = 4,
  Warn = 6,
  Error = 8,
  Fatal = 1000,
}

impl Severity {
  pub const fn level(self) -> i16 {
    self as i16
  }

  pub fn from_level(level: i16) -> Option<Self> {
    Self::try_from(level).ok()
  }
}

impl Default for Severity {
  fn default() -> Self {
    Severity::Info
  }
}

impl Display for Severity {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      Severity::Debug => "DEBUG",
      Severity::Info => "INFO",
      Severity::Warn => "WARN",
      Severity::Error => "ERROR",
      Severity::Fatal => "FATAL",
    };
    write!(f, "{}", name)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity {0:?}")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
  type Err = ParseSeverityError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_uppercase().as_str() {
      "DEBUG" => Ok(Severity::Debug),
      "INFO" => Ok(Severity::Info),
      "WARN" => Ok(Severity::Warn),
      "ERROR" => Ok(Severity::Error),
      "FATAL" => Ok(Severity::Fatal),
      _ => Err(ParseSeverityError(s.to_string())),
    }
  }
}
