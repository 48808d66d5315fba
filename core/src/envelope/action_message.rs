use std::fmt::{Display, Formatter};

use crate::codec::ENVELOPE_VERSION;
use crate::envelope::{MessageBody, MessageHeader};
use crate::value::{Equivalence, ObjectGraph};

/// A complete message: headers, bodies and the graph their payloads live in.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionMessage {
  version: u16,
  headers: Vec<MessageHeader>,
  bodies: Vec<MessageBody>,
  graph: ObjectGraph,
}

impl ActionMessage {
  pub fn new() -> Self {
    Self::with_graph(ObjectGraph::new())
  }

  pub fn with_graph(graph: ObjectGraph) -> Self {
    Self {
      version: ENVELOPE_VERSION,
      headers: Vec::new(),
      bodies: Vec::new(),
      graph,
    }
  }

  pub(crate) fn from_parts(
    version: u16,
    headers: Vec<MessageHeader>,
    bodies: Vec<MessageBody>,
    graph: ObjectGraph,
  ) -> Self {
    Self {
      version,
      headers,
      bodies,
      graph,
    }
  }

  pub fn version(&self) -> u16 {
    self.version
  }

  pub fn headers(&self) -> &[MessageHeader] {
    &self.headers
  }

  pub fn header(&self, name: &str) -> Option<&MessageHeader> {
    self.headers.iter().find(|header| header.name() == name)
  }

  pub fn bodies(&self) -> &[MessageBody] {
    &self.bodies
  }

  pub fn body(&self, index: usize) -> Option<&MessageBody> {
    self.bodies.get(index)
  }

  pub fn graph(&self) -> &ObjectGraph {
    &self.graph
  }

  pub fn graph_mut(&mut self) -> &mut ObjectGraph {
    &mut self.graph
  }

  pub fn add_header(&mut self, header: MessageHeader) {
    self.headers.push(header);
  }

  pub fn add_body(&mut self, body: MessageBody) {
    self.bodies.push(body);
  }

  /// Structural equality with `other`, independent of node numbering in the two graphs.
  pub fn equivalent(&self, other: &ActionMessage) -> bool {
    if self.version != other.version
      || self.headers.len() != other.headers.len()
      || self.bodies.len() != other.bodies.len()
    {
      return false;
    }
    let mut equivalence = Equivalence::new(&self.graph, &other.graph);
    let headers_match = self.headers.iter().zip(other.headers.iter()).all(|(a, b)| {
      a.name() == b.name() && a.must_understand() == b.must_understand() && equivalence.check(a.value(), b.value())
    });
    headers_match
      && self.bodies.iter().zip(other.bodies.iter()).all(|(a, b)| {
        a.target_uri() == b.target_uri()
          && a.response_uri() == b.response_uri()
          && equivalence.check(a.data(), b.data())
      })
  }
}

impl Default for ActionMessage {
  fn default() -> Self {
    Self::new()
  }
}

impl Display for ActionMessage {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "ActionMessage(version = {}, headers = [", self.version)?;
    for (index, header) in self.headers.iter().enumerate() {
      if index > 0 {
        write!(f, ", ")?;
      }
      write!(f, "{}", header.name())?;
    }
    write!(f, "], bodies = [")?;
    for (index, body) in self.bodies.iter().enumerate() {
      if index > 0 {
        write!(f, ", ")?;
      }
      write!(f, "{} -> {}: {}", body.target_uri(), body.response_uri(), body.data())?;
    }
    write!(f, "])")
  }
}
