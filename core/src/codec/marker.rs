use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Type markers of the value encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Marker {
  Undefined = 0x00,
  Null = 0x01,
  False = 0x02,
  True = 0x03,
  Integer = 0x04,
  Double = 0x05,
  String = 0x06,
  XmlDocument = 0x07,
  Date = 0x08,
  Array = 0x09,
  Object = 0x0A,
  Xml = 0x0B,
  ByteArray = 0x0C,
  AssociativeArray = 0x11,
  /// Starts a message body; never valid where a value is expected.
  BodyTag = 0xB0,
}

pub const ENVELOPE_VERSION: u16 = 3;

pub const INTEGER_MIN: i64 = -(1 << 28);
pub const INTEGER_MAX: i64 = (1 << 28) - 1;

/// Largest unsigned value a variable-length 29-bit header can hold.
pub const U29_MAX: u32 = (1 << 29) - 1;

/// Largest integer magnitude a double represents exactly.
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;
