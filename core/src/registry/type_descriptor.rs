use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Structural shape a native type can expose to the codec.
///
/// Variants are declared most specific first, so the derived ordering is the lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
  DateLike,
  ByteSequence,
  OrderedSequence,
  KeyValueMapping,
  NamedAggregate,
}

impl Capability {
  pub const ALL: [Capability; 5] = [
    Capability::DateLike,
    Capability::ByteSequence,
    Capability::OrderedSequence,
    Capability::KeyValueMapping,
    Capability::NamedAggregate,
  ];
}

impl Display for Capability {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      Capability::DateLike => "date-like",
      Capability::ByteSequence => "byte-sequence",
      Capability::OrderedSequence => "ordered-sequence",
      Capability::KeyValueMapping => "key-value-mapping",
      Capability::NamedAggregate => "named-aggregate",
    };
    write!(f, "{}", name)
  }
}

/// Runtime description of a native type: its registered name and the shapes it can take.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
  type_name: String,
  capabilities: BTreeSet<Capability>,
}

impl TypeDescriptor {
  pub fn named(type_name: impl Into<String>) -> Self {
    Self {
      type_name: type_name.into(),
      capabilities: BTreeSet::new(),
    }
  }

  pub fn with_capability(mut self, capability: Capability) -> Self {
    self.capabilities.insert(capability);
    self
  }

  pub fn type_name(&self) -> &str {
    &self.type_name
  }

  pub fn has_capability(&self, capability: Capability) -> bool {
    self.capabilities.contains(&capability)
  }

  /// Declared capabilities, most specific first.
  pub fn capabilities_by_specificity(&self) -> impl Iterator<Item = Capability> + '_ {
    self.capabilities.iter().copied()
  }
}

impl Display for TypeDescriptor {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.type_name)?;
    if !self.capabilities.is_empty() {
      let names = self.capabilities.iter().map(ToString::to_string).collect::<Vec<_>>();
      write!(f, " [{}]", names.join(", "))?;
    }
    Ok(())
  }
}
