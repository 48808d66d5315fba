use std::fmt::{Display, Formatter};

use time::OffsetDateTime;

/// Point in time as carried on the wire: milliseconds since the Unix epoch, UTC.
///
/// Any offset of the originating [`OffsetDateTime`] is normalized away; two dates are equal when
/// they denote the same instant.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct AmfDate {
  millis: f64,
}

impl AmfDate {
  pub const fn from_millis(millis: f64) -> Self {
    Self { millis }
  }

  pub fn millis(&self) -> f64 {
    self.millis
  }

  /// Returns `None` when the instant is outside the range `time` can represent.
  pub fn to_offset_date_time(&self) -> Option<OffsetDateTime> {
    if !self.millis.is_finite() {
      return None;
    }
    let nanos = (self.millis * 1_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
  }
}

impl From<OffsetDateTime> for AmfDate {
  fn from(value: OffsetDateTime) -> Self {
    let millis = value.unix_timestamp_nanos() / 1_000_000;
    Self::from_millis(millis as f64)
  }
}

impl Display for AmfDate {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self.to_offset_date_time() {
      Some(date_time) => write!(f, "{}", date_time),
      None => write!(f, "date({}ms)", self.millis),
    }
  }
}
