use crate::registry::{Capability, Decomposed, PropertyProxy, ProxyError};
use crate::value::{NativeObject, Node, TraitInfo, TypedObject, Value};

/// Built-in proxy for one capability; it asks the native value for the matching view.
///
/// Only the named-aggregate proxy rebuilds objects, as generic typed objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityProxy {
  capability: Capability,
}

impl CapabilityProxy {
  pub const fn new(capability: Capability) -> Self {
    Self { capability }
  }

  pub fn capability(&self) -> Capability {
    self.capability
  }
}

impl PropertyProxy for CapabilityProxy {
  fn decompose(&self, value: &dyn NativeObject) -> Result<Decomposed, ProxyError> {
    let missing = || ProxyError::MissingView {
      type_name: value.type_descriptor().type_name().to_string(),
      capability: self.capability,
    };
    let view = value.view(self.capability).ok_or_else(missing)?;
    if view.capability() != self.capability {
      return Err(missing());
    }
    Ok(view)
  }

  fn recompose(
    &self,
    traits: &TraitInfo,
    values: Vec<Value>,
    dynamic_fields: Vec<(String, Value)>,
  ) -> Result<Node, ProxyError> {
    match self.capability {
      Capability::NamedAggregate => Ok(Node::Object(TypedObject::from_parts(
        traits.clone(),
        values,
        dynamic_fields,
      ))),
      _ => Err(ProxyError::NotRecomposable {
        proxy: self.proxy_name(),
      }),
    }
  }

  fn proxy_name(&self) -> String {
    format!("capability:{}", self.capability)
  }
}
