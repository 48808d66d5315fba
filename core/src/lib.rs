//! Object-graph codec: value model, type proxy registry, reference tables and the binary
//! encoder/decoder for message envelopes.

extern crate self as nexus_amf_core_rs;

pub mod codec;
pub mod envelope;
pub mod registry;
pub mod value;

pub use codec::*;
pub use envelope::*;
pub use registry::*;
pub use value::*;

// Re-exports for derive macros
pub use nexus_amf_message_derive_rs::NativeObject;
