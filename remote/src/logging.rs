//! Exactly-once failure logging at the points where a request's handling ends.

mod hinge_point_logger;
mod log_sink;
mod severity;
#[cfg(test)]
mod tests;

pub use self::{hinge_point_logger::*, log_sink::*, severity::*};
