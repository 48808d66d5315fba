use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use crate::value::{NodeId, TraitInfo, Value};

/// The three independent reference tables of one transcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
  String,
  Object,
  Trait,
}

impl Display for ReferenceKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      ReferenceKind::String => write!(f, "string"),
      ReferenceKind::Object => write!(f, "object"),
      ReferenceKind::Trait => write!(f, "trait"),
    }
  }
}

/// Per-transcode record of strings, complex values and traits already seen.
///
/// Indices are dense, start at 0 and follow first appearance. The empty string is never stored.
/// Dates, byte arrays and XML take object slots too, so object indices line up on both ends.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
  strings: Vec<String>,
  string_indices: HashMap<String, usize>,
  objects: Vec<Value>,
  object_indices: HashMap<NodeId, usize>,
  traits: Vec<TraitInfo>,
  trait_indices: HashMap<TraitInfo, usize>,
}

impl ReferenceTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a string and returns its index, or `None` for the empty string.
  pub fn add_string(&mut self, value: &str) -> Option<usize> {
    if value.is_empty() {
      return None;
    }
    let index = self.strings.len();
    self.strings.push(value.to_string());
    self.string_indices.entry(value.to_string()).or_insert(index);
    Some(index)
  }

  pub fn string(&self, index: usize) -> Option<&str> {
    self.strings.get(index).map(String::as_str)
  }

  pub fn string_index(&self, value: &str) -> Option<usize> {
    self.string_indices.get(value).copied()
  }

  pub fn add_object(&mut self, value: Value) -> usize {
    let index = self.objects.len();
    if let Value::Node(id) = value {
      self.object_indices.entry(id).or_insert(index);
    }
    self.objects.push(value);
    index
  }

  pub fn object(&self, index: usize) -> Option<&Value> {
    self.objects.get(index)
  }

  pub fn object_index(&self, id: NodeId) -> Option<usize> {
    self.object_indices.get(&id).copied()
  }

  pub fn add_trait(&mut self, traits: TraitInfo) -> usize {
    let index = self.traits.len();
    self.trait_indices.entry(traits.clone()).or_insert(index);
    self.traits.push(traits);
    index
  }

  pub fn trait_at(&self, index: usize) -> Option<&TraitInfo> {
    self.traits.get(index)
  }

  pub fn trait_index(&self, traits: &TraitInfo) -> Option<usize> {
    self.trait_indices.get(traits).copied()
  }

  pub fn string_count(&self) -> usize {
    self.strings.len()
  }

  pub fn object_count(&self) -> usize {
    self.objects.len()
  }

  pub fn trait_count(&self) -> usize {
    self.traits.len()
  }
}

impl Display for ReferenceTable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "strings = {}, objects = {}, traits = {}",
      self.strings.len(),
      self.objects.len(),
      self.traits.len()
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_string_is_never_stored() {
    let mut table = ReferenceTable::new();
    assert_eq!(table.add_string(""), None);
    assert_eq!(table.add_string("a"), Some(0));
    assert_eq!(table.add_string("b"), Some(1));
    assert_eq!(table.string_count(), 2);
    assert_eq!(table.string(1), Some("b"));
  }

  #[test]
  fn test_first_occurrence_wins_for_lookups() {
    let mut table = ReferenceTable::new();
    table.add_string("a");
    table.add_string("a");
    assert_eq!(table.string_index("a"), Some(0));
    assert_eq!(table.string_count(), 2);
  }

  #[test]
  fn test_object_slots_include_scalars() {
    let mut table = ReferenceTable::new();
    assert_eq!(table.add_object(Value::ByteArray(vec![1])), 0);
    assert_eq!(table.add_object(Value::Node(NodeId::new(4))), 1);
    assert_eq!(table.object_index(NodeId::new(4)), Some(1));
    assert_eq!(table.object(0), Some(&Value::ByteArray(vec![1])));
  }

  #[test]
  fn test_traits_are_indexed_by_shape() {
    let mut table = ReferenceTable::new();
    let traits = TraitInfo::sealed("a.B", vec!["x".to_string()]);
    assert_eq!(table.add_trait(traits.clone()), 0);
    assert_eq!(table.trait_index(&traits), Some(0));
    assert_eq!(table.trait_index(&TraitInfo::sealed("a.B", Vec::new())), None);
  }
}
