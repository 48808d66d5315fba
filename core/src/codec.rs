//! Binary codec between wire bytes and [`ActionMessage`](crate::envelope::ActionMessage).
//!
//! Each call to [`decode`] or [`encode`] owns a fresh [`ReferenceTable`]; nothing is shared between
//! transcodes except the [`ProxyRegistry`](crate::registry::ProxyRegistry) passed in.

mod byte_reader;
mod byte_writer;
mod codec_config;
mod codec_error;
mod decoder;
mod encoder;
mod marker;
mod reference_table;

pub use self::{codec_config::*, codec_error::*, decoder::*, encoder::*, marker::*, reference_table::*};
