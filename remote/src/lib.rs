//! Fault pipeline and request processing on top of the object-graph codec.

pub mod config;
pub mod config_option;
pub mod fault;
pub mod logging;
pub mod message_processor;
pub mod service;

pub use config::*;
pub use config_option::*;
pub use fault::*;
pub use logging::*;
pub use message_processor::*;
pub use service::*;
