use std::any::Any;
use std::fmt::Debug;

use crate::registry::{Capability, Decomposed, TypeDescriptor};

/// Domain value that enters the object graph through a proxy rather than as a generic node.
///
/// Implementors declare a [`TypeDescriptor`]; the registry resolves a proxy from its type name or,
/// failing that, from its capabilities. Types that only rely on the built-in capability proxies
/// answer [`NativeObject::view`] for the capabilities they declare. `#[derive(NativeObject)]`
/// generates all of this for plain structs.
pub trait NativeObject: Debug + Send + Sync + 'static {
  fn type_descriptor(&self) -> TypeDescriptor;

  fn eq_native(&self, other: &dyn NativeObject) -> bool;

  fn as_any(&self) -> &(dyn Any + Send + Sync + 'static);

  /// Capability-shaped view of this value, or `None` if the capability is not supported.
  fn view(&self, _capability: Capability) -> Option<Decomposed> {
    None
  }
}
