use std::fmt::Debug;

use async_trait::async_trait;
use nexus_amf_core_rs::{MessageBody, ObjectGraph, RootedValue};

use crate::fault::Failure;
use crate::service::ServiceCall;

/// Executes one service operation. Routing to adapters and destinations happens behind this seam.
#[async_trait]
pub trait ServiceInvoker: Debug + Send + Sync {
  /// `body` payload nodes resolve in `graph`.
  async fn invoke(&self, call: &ServiceCall, body: &MessageBody, graph: &ObjectGraph) -> Result<RootedValue, Failure>;
}
