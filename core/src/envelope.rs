//! Message envelope: headers and bodies whose payloads point into one object graph.

mod action_message;
mod message_body;
mod message_header;

pub use self::{action_message::*, message_body::*, message_header::*};
