use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::value::{NativeObject, TraitInfo, Value};

/// Index of a node inside an [`ObjectGraph`](crate::value::ObjectGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
  pub(crate) const fn new(index: usize) -> Self {
    Self(index)
  }

  pub const fn index(self) -> usize {
    self.0
  }
}

impl Display for NodeId {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// Complex value stored in the object graph.
#[derive(Debug, Clone)]
pub enum Node {
  /// Dense, ordered sequence.
  Array(Vec<Value>),
  /// Key-unordered associative array.
  Map(BTreeMap<String, Value>),
  Object(TypedObject),
  /// Domain value produced or consumed by a registered proxy.
  Native(Arc<dyn NativeObject>),
}

impl Node {
  pub fn kind(&self) -> &'static str {
    match self {
      Node::Array(_) => "array",
      Node::Map(_) => "map",
      Node::Object(_) => "object",
      Node::Native(_) => "native",
    }
  }

  pub fn as_array(&self) -> Option<&[Value]> {
    match self {
      Node::Array(values) => Some(values),
      _ => None,
    }
  }

  pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
    match self {
      Node::Map(entries) => Some(entries),
      _ => None,
    }
  }

  pub fn as_object(&self) -> Option<&TypedObject> {
    match self {
      Node::Object(object) => Some(object),
      _ => None,
    }
  }

  pub fn as_native(&self) -> Option<&Arc<dyn NativeObject>> {
    match self {
      Node::Native(native) => Some(native),
      _ => None,
    }
  }
}

impl PartialEq for Node {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Node::Array(a), Node::Array(b)) => a == b,
      (Node::Map(a), Node::Map(b)) => a == b,
      (Node::Object(a), Node::Object(b)) => a == b,
      (Node::Native(a), Node::Native(b)) => a.eq_native(b.as_ref()),
      _ => false,
    }
  }
}

/// Named aggregate: a trait plus the sealed values in trait order and any dynamic fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypedObject {
  traits: TraitInfo,
  values: Vec<Value>,
  dynamic_fields: Vec<(String, Value)>,
}

impl TypedObject {
  pub fn new(class_name: impl Into<String>) -> Self {
    Self {
      traits: TraitInfo::sealed(class_name, Vec::new()),
      values: Vec::new(),
      dynamic_fields: Vec::new(),
    }
  }

  pub fn anonymous() -> Self {
    Self::new(String::new())
  }

  /// Builds an object from decoded parts. `values` must follow the order of `traits`.
  pub fn from_parts(traits: TraitInfo, values: Vec<Value>, dynamic_fields: Vec<(String, Value)>) -> Self {
    debug_assert_eq!(traits.property_count(), values.len());
    Self {
      traits,
      values,
      dynamic_fields,
    }
  }

  /// Appends a sealed field.
  pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    self.traits.push_property(name.into());
    self.values.push(value.into());
    self
  }

  /// Appends a dynamic field and marks the trait dynamic.
  pub fn with_dynamic_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    self.traits.set_dynamic(true);
    self.dynamic_fields.push((name.into(), value.into()));
    self
  }

  pub fn with_dynamic(mut self, dynamic: bool) -> Self {
    self.traits.set_dynamic(dynamic);
    self
  }

  pub fn traits(&self) -> &TraitInfo {
    &self.traits
  }

  pub fn class_name(&self) -> &str {
    self.traits.class_name()
  }

  pub fn is_dynamic(&self) -> bool {
    self.traits.is_dynamic()
  }

  pub fn sealed_values(&self) -> &[Value] {
    &self.values
  }

  pub fn sealed_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
    self
      .traits
      .properties()
      .iter()
      .map(String::as_str)
      .zip(self.values.iter())
  }

  pub fn dynamic_fields(&self) -> &[(String, Value)] {
    &self.dynamic_fields
  }

  /// Looks a field up by name, sealed fields first.
  pub fn field(&self, name: &str) -> Option<&Value> {
    self
      .sealed_fields()
      .find(|(field, _)| *field == name)
      .map(|(_, value)| value)
      .or_else(|| {
        self
          .dynamic_fields
          .iter()
          .find(|(field, _)| field == name)
          .map(|(_, value)| value)
      })
  }

  /// Replaces the value of an existing field; returns `false` if no field has that name.
  pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> bool {
    let value = value.into();
    if let Some(index) = self.traits.properties().iter().position(|field| field == name) {
      self.values[index] = value;
      return true;
    }
    match self.dynamic_fields.iter_mut().find(|(field, _)| field == name) {
      Some(slot) => {
        slot.1 = value;
        true
      }
      None => false,
    }
  }
}
