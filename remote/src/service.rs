//! Service addressing and the seam to whatever executes a service operation.

mod service_directory;
mod service_invoker;

pub use self::{service_directory::*, service_invoker::*};
