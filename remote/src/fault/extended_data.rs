use std::collections::BTreeMap;

use nexus_amf_core_rs::{Equivalence, Importer, ObjectGraph, RootedValue, Value};

/// Free-form key/value data attached to a failure and passed to the client unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendedData {
  graph: ObjectGraph,
  entries: BTreeMap<String, Value>,
}

impl ExtendedData {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.insert(key, value);
    self
  }

  /// Inserts a scalar; node references are not resolvable here and become `Null`.
  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
    let value = match value.into() {
      Value::Node(id) => {
        tracing::warn!("extended data entry holds node {} without its graph", id);
        Value::Null
      }
      value => value,
    };
    self.entries.insert(key.into(), value);
  }

  /// Inserts a value together with the graph it lives in.
  pub fn insert_rooted(&mut self, key: impl Into<String>, value: &RootedValue) {
    let imported = value.import_into(&mut self.graph);
    self.entries.insert(key.into(), imported);
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.entries.get(key)
  }

  pub fn graph(&self) -> &ObjectGraph {
    &self.graph
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  /// Renders the entries as a map node of `target`. Nodes shared between entries stay shared.
  pub fn to_value(&self, target: &mut ObjectGraph) -> Value {
    let mut importer = Importer::new(&self.graph);
    let entries = self
      .entries
      .iter()
      .map(|(key, value)| (key.clone(), importer.import(target, value)))
      .collect();
    target.map(entries)
  }

  /// Reads a map node of `source` back; returns `None` if `value` is not a map.
  pub fn from_value(source: &ObjectGraph, value: &Value) -> Option<Self> {
    let entries = source.resolve(value)?.as_map()?;
    let mut data = Self::new();
    let mut importer = Importer::new(source);
    for (key, value) in entries {
      let imported = importer.import(&mut data.graph, value);
      data.entries.insert(key.clone(), imported);
    }
    Some(data)
  }

  pub fn equivalent(&self, other: &ExtendedData) -> bool {
    let mut equivalence = Equivalence::new(&self.graph, &other.graph);
    self.entries.len() == other.entries.len()
      && self
        .entries
        .iter()
        .zip(other.entries.iter())
        .all(|((ka, va), (kb, vb))| ka == kb && equivalence.check(va, vb))
  }
}
