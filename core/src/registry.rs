//! Type proxy registry: which strategy turns a native value into wire-shaped parts and back.

mod capability_proxy;
mod property_proxy;
mod proxy_registry;
mod type_descriptor;

pub use self::{capability_proxy::*, property_proxy::*, proxy_registry::*, type_descriptor::*};
