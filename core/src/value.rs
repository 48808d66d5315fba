//! In-memory object model shared by the decoder and the encoder.
//!
//! Scalars are carried inline in [`Value`]. Arrays, maps, typed objects and native objects live in an
//! [`ObjectGraph`] arena and are addressed by [`NodeId`], which is what makes shared and cyclic
//! structures representable without shared mutable pointers.

mod amf_date;
mod native_object;
mod node;
mod object_graph;
mod rooted_value;
#[cfg(test)]
mod tests;
mod traits_info;

pub use self::{amf_date::*, native_object::*, node::*, object_graph::*, rooted_value::*, traits_info::*};

use std::fmt::{Display, Formatter};

/// A single payload value.
#[derive(Debug, Clone)]
pub enum Value {
  Undefined,
  Null,
  Boolean(bool),
  Integer(i64),
  Double(f64),
  String(String),
  Date(AmfDate),
  Xml(String),
  ByteArray(Vec<u8>),
  /// Reference to a complex node of the enclosing [`ObjectGraph`].
  Node(NodeId),
}

impl Value {
  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null | Value::Undefined)
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Boolean(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Value::Integer(i) => Some(*i),
      Value::Double(d) if d.fract() == 0.0 && d.is_finite() => Some(*d as i64),
      _ => None,
    }
  }

  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Value::Integer(i) => Some(*i as f64),
      Value::Double(d) => Some(*d),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(s) | Value::Xml(s) => Some(s.as_str()),
      _ => None,
    }
  }

  pub fn as_node(&self) -> Option<NodeId> {
    match self {
      Value::Node(id) => Some(*id),
      _ => None,
    }
  }

  /// Short label of the value kind, used in diagnostics.
  pub fn kind(&self) -> &'static str {
    match self {
      Value::Undefined => "undefined",
      Value::Null => "null",
      Value::Boolean(_) => "boolean",
      Value::Integer(_) => "integer",
      Value::Double(_) => "double",
      Value::String(_) => "string",
      Value::Date(_) => "date",
      Value::Xml(_) => "xml",
      Value::ByteArray(_) => "byte-array",
      Value::Node(_) => "node",
    }
  }
}

impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
      (Value::Boolean(a), Value::Boolean(b)) => a == b,
      (Value::Integer(a), Value::Integer(b)) => a == b,
      (Value::Double(a), Value::Double(b)) => a == b || (a.is_nan() && b.is_nan()),
      // Integers outside the compact wire range travel as doubles.
      (Value::Integer(i), Value::Double(d)) | (Value::Double(d), Value::Integer(i)) => *d == *i as f64,
      (Value::String(a), Value::String(b)) => a == b,
      (Value::Date(a), Value::Date(b)) => a == b,
      (Value::Xml(a), Value::Xml(b)) => a == b,
      (Value::ByteArray(a), Value::ByteArray(b)) => a == b,
      (Value::Node(a), Value::Node(b)) => a == b,
      _ => false,
    }
  }
}

impl Display for Value {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Value::Undefined => write!(f, "undefined"),
      Value::Null => write!(f, "null"),
      Value::Boolean(b) => write!(f, "{}", b),
      Value::Integer(i) => write!(f, "{}", i),
      Value::Double(d) => write!(f, "{}", d),
      Value::String(s) => write!(f, "{:?}", s),
      Value::Date(d) => write!(f, "{}", d),
      Value::Xml(s) => write!(f, "xml({} chars)", s.len()),
      Value::ByteArray(b) => write!(f, "bytes({})", b.len()),
      Value::Node(id) => write!(f, "{}", id),
    }
  }
}

impl Default for Value {
  fn default() -> Self {
    Value::Null
  }
}

impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Value::Boolean(value)
  }
}

macro_rules! integer_into_value {
  ($($t:ty),*) => {
    $(
      impl From<$t> for Value {
        fn from(value: $t) -> Self {
          Value::Integer(value as i64)
        }
      }
    )*
  };
}

integer_into_value!(i8, u8, i16, u16, i32, u32, i64);

impl From<f32> for Value {
  fn from(value: f32) -> Self {
    Value::Double(value as f64)
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Double(value)
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Value::String(value.to_string())
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Value::String(value)
  }
}

impl From<Vec<u8>> for Value {
  fn from(value: Vec<u8>) -> Self {
    Value::ByteArray(value)
  }
}

impl From<AmfDate> for Value {
  fn from(value: AmfDate) -> Self {
    Value::Date(value)
  }
}

impl From<NodeId> for Value {
  fn from(value: NodeId) -> Self {
    Value::Node(value)
  }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(value: Option<T>) -> Self {
    value.map_or(Value::Null, Into::into)
  }
}
