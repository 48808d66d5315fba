use std::collections::BTreeMap;
use std::fmt::Debug;

use thiserror::Error;

use crate::registry::Capability;
use crate::value::{AmfDate, NativeObject, Node, TraitInfo, TypedObject, Value};

/// Wire-shaped parts of a native value.
///
/// Node references inside the parts point into the graph that holds the native value.
#[derive(Debug, Clone, PartialEq)]
pub enum Decomposed {
  Aggregate(TypedObject),
  Sequence(Vec<Value>),
  Mapping(BTreeMap<String, Value>),
  Date(AmfDate),
  Bytes(Vec<u8>),
}

impl Decomposed {
  pub fn capability(&self) -> Capability {
    match self {
      Decomposed::Aggregate(_) => Capability::NamedAggregate,
      Decomposed::Sequence(_) => Capability::OrderedSequence,
      Decomposed::Mapping(_) => Capability::KeyValueMapping,
      Decomposed::Date(_) => Capability::DateLike,
      Decomposed::Bytes(_) => Capability::ByteSequence,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
  #[error("{type_name} does not provide a {capability} view")]
  MissingView { type_name: String, capability: Capability },
  #[error("{type_name} cannot be handled by {proxy}")]
  TypeMismatch { type_name: String, proxy: String },
  #[error("cannot rebuild {class_name}: {reason}")]
  Recompose { class_name: String, reason: String },
  #[error("{proxy} does not rebuild typed objects")]
  NotRecomposable { proxy: String },
}

static_assertions::assert_impl_all!(ProxyError: Send, Sync);

/// Serialization strategy for one native type or one capability.
pub trait PropertyProxy: Debug + Send + Sync {
  /// Splits a native value into wire-shaped parts.
  fn decompose(&self, value: &dyn NativeObject) -> Result<Decomposed, ProxyError>;

  /// Rebuilds a node from a decoded trait and its sealed values in trait order.
  fn recompose(
    &self,
    traits: &TraitInfo,
    values: Vec<Value>,
    dynamic_fields: Vec<(String, Value)>,
  ) -> Result<Node, ProxyError>;

  /// Identity used to tell an equivalent re-registration from a conflicting one.
  fn proxy_name(&self) -> String {
    std::any::type_name::<Self>().to_string()
  }
}
