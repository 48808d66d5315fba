//! Server-side failures and their client-safe error envelopes.

pub mod fault_code;

mod error_envelope;
mod extended_data;
mod failure;
#[cfg(test)]
mod tests;
mod translator;

pub use self::{error_envelope::*, extended_data::*, failure::*, translator::*};
