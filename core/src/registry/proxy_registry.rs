use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::registry::{Capability, CapabilityProxy, PropertyProxy, TypeDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ProxyKey {
  TypeName(String),
  Capability(Capability),
}

/// What a call to [`ProxyRegistry::register`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
  Inserted,
  /// An equivalent proxy was already registered.
  Unchanged,
  /// A different proxy was registered and has been replaced.
  Replaced,
}

static GLOBAL: Lazy<ProxyRegistry> = Lazy::new(ProxyRegistry::with_defaults);

/// Mapping from type names and capabilities to proxies.
///
/// Cloning shares the underlying map. Lookups on distinct keys never block each other.
#[derive(Debug, Clone, Default)]
pub struct ProxyRegistry {
  proxies: Arc<DashMap<ProxyKey, Arc<dyn PropertyProxy>>>,
}

impl ProxyRegistry {
  /// Empty registry, without even the capability proxies.
  pub fn new() -> Self {
    Self::default()
  }

  /// Registry holding one [`CapabilityProxy`] per capability.
  pub fn with_defaults() -> Self {
    let registry = Self::new();
    for capability in Capability::ALL {
      registry.register_capability(capability, Arc::new(CapabilityProxy::new(capability)));
    }
    registry
  }

  /// Process-wide default instance.
  pub fn global() -> &'static ProxyRegistry {
    &GLOBAL
  }

  /// Binds `proxy` to the descriptor's type name. Last write wins.
  pub fn register(&self, descriptor: &TypeDescriptor, proxy: Arc<dyn PropertyProxy>) -> RegistrationOutcome {
    self.insert(ProxyKey::TypeName(descriptor.type_name().to_string()), proxy)
  }

  /// Binds `proxy` as the fallback for every type declaring `capability`.
  pub fn register_capability(&self, capability: Capability, proxy: Arc<dyn PropertyProxy>) -> RegistrationOutcome {
    self.insert(ProxyKey::Capability(capability), proxy)
  }

  fn insert(&self, key: ProxyKey, proxy: Arc<dyn PropertyProxy>) -> RegistrationOutcome {
    let proxy_name = proxy.proxy_name();
    let outcome = match self.proxies.entry(key.clone()) {
      Entry::Occupied(mut entry) => {
        if entry.get().proxy_name() == proxy_name {
          RegistrationOutcome::Unchanged
        } else {
          entry.insert(proxy);
          RegistrationOutcome::Replaced
        }
      }
      Entry::Vacant(entry) => {
        entry.insert(proxy);
        RegistrationOutcome::Inserted
      }
    };
    tracing::debug!("Registering proxy: key = {:?}, proxy = {}, outcome = {:?}", key, proxy_name, outcome);
    outcome
  }

  /// Exact type name first, then the declared capabilities from most to least specific.
  pub fn lookup(&self, descriptor: &TypeDescriptor) -> Option<Arc<dyn PropertyProxy>> {
    if let Some(proxy) = self.lookup_type_name(descriptor.type_name()) {
      return Some(proxy);
    }
    descriptor
      .capabilities_by_specificity()
      .find_map(|capability| self.lookup_capability(capability))
  }

  pub fn lookup_type_name(&self, type_name: &str) -> Option<Arc<dyn PropertyProxy>> {
    self
      .proxies
      .get(&ProxyKey::TypeName(type_name.to_string()))
      .map(|entry| entry.value().clone())
  }

  pub fn lookup_capability(&self, capability: Capability) -> Option<Arc<dyn PropertyProxy>> {
    self
      .proxies
      .get(&ProxyKey::Capability(capability))
      .map(|entry| entry.value().clone())
  }

  pub fn len(&self) -> usize {
    self.proxies.len()
  }

  pub fn is_empty(&self) -> bool {
    self.proxies.is_empty()
  }
}

static_assertions::assert_impl_all!(ProxyRegistry: Send, Sync);
