use thiserror::Error;

use crate::codec::ReferenceKind;
use crate::registry::ProxyError;
use crate::value::NodeId;

/// Decoding failure. Every variant carries the byte offset at which decoding stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedStream {
  #[error("Unexpected body tag.")]
  UnexpectedBodyTag { offset: usize },
  #[error("expected body tag at offset {offset}, found 0x{found:02X}")]
  MissingBodyTag { offset: usize, found: u8 },
  #[error("truncated stream at offset {offset}: {needed} more byte(s) needed")]
  Truncated { offset: usize, needed: usize },
  #[error("unknown type marker 0x{marker:02X} at offset {offset}")]
  UnknownMarker { offset: usize, marker: u8 },
  #[error("invalid {kind} reference {index} at offset {offset}")]
  InvalidReference {
    offset: usize,
    kind: ReferenceKind,
    index: usize,
  },
  #[error("unsupported envelope version {version} at offset {offset}")]
  UnsupportedVersion { offset: usize, version: u16 },
  #[error("invalid UTF-8 string at offset {offset}")]
  InvalidUtf8 { offset: usize },
  #[error("externalizable class {class_name} at offset {offset} is not supported")]
  ExternalizableTrait { offset: usize, class_name: String },
  #[error("array at offset {offset} mixes dense and associative entries")]
  MixedArray { offset: usize },
  #[error("nesting depth exceeds {limit} at offset {offset}")]
  DepthExceeded { offset: usize, limit: usize },
  #[error("{remaining} trailing byte(s) at offset {offset}")]
  TrailingBytes { offset: usize, remaining: usize },
  #[error("cannot rebuild object at offset {offset}: {source}")]
  RecomposeFailed {
    offset: usize,
    #[source]
    source: ProxyError,
  },
}

impl MalformedStream {
  pub fn offset(&self) -> usize {
    match self {
      MalformedStream::UnexpectedBodyTag { offset }
      | MalformedStream::MissingBodyTag { offset, .. }
      | MalformedStream::Truncated { offset, .. }
      | MalformedStream::UnknownMarker { offset, .. }
      | MalformedStream::InvalidReference { offset, .. }
      | MalformedStream::UnsupportedVersion { offset, .. }
      | MalformedStream::InvalidUtf8 { offset }
      | MalformedStream::ExternalizableTrait { offset, .. }
      | MalformedStream::MixedArray { offset }
      | MalformedStream::DepthExceeded { offset, .. }
      | MalformedStream::TrailingBytes { offset, .. }
      | MalformedStream::RecomposeFailed { offset, .. } => *offset,
    }
  }

  /// Offending marker byte, for the variants that have one.
  pub fn marker(&self) -> Option<u8> {
    match self {
      MalformedStream::UnexpectedBodyTag { .. } => Some(0xB0),
      MalformedStream::MissingBodyTag { found, .. } => Some(*found),
      MalformedStream::UnknownMarker { marker, .. } => Some(*marker),
      _ => None,
    }
  }
}

/// Encoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
  #[error("unsupported type {type_name}: {reason}")]
  UnsupportedType { type_name: String, reason: String },
  #[error("value references missing node {0}")]
  DanglingReference(NodeId),
  #[error("nesting depth exceeds {limit}")]
  DepthExceeded { limit: usize },
  #[error("length {length} exceeds the limit of {limit}")]
  LengthOverflow { length: usize, limit: usize },
  #[error("integer {0} cannot be represented exactly")]
  IntegerOutOfRange(i64),
  #[error("proxy for {type_name} failed: {source}")]
  Proxy {
    type_name: String,
    #[source]
    source: ProxyError,
  },
}

impl EncodeError {
  pub fn unsupported_type(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
    EncodeError::UnsupportedType {
      type_name: type_name.into(),
      reason: reason.into(),
    }
  }
}

static_assertions::assert_impl_all!(MalformedStream: Send, Sync);
static_assertions::assert_impl_all!(EncodeError: Send, Sync);
