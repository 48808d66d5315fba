use crate::value::{ObjectGraph, Value};

/// A value together with the graph its nodes live in.
///
/// Used for data produced outside a message, such as service results and extended fault data,
/// before it is imported into a reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootedValue {
  graph: ObjectGraph,
  root: Value,
}

impl RootedValue {
  pub fn new(graph: ObjectGraph, root: Value) -> Self {
    Self { graph, root }
  }

  /// Wraps a scalar; complex values need a graph and go through [`RootedValue::new`].
  pub fn scalar(value: impl Into<Value>) -> Self {
    Self::new(ObjectGraph::new(), value.into())
  }

  pub fn graph(&self) -> &ObjectGraph {
    &self.graph
  }

  pub fn root(&self) -> &Value {
    &self.root
  }

  pub fn into_parts(self) -> (ObjectGraph, Value) {
    (self.graph, self.root)
  }

  /// Copies the value into `target` and returns the root there.
  pub fn import_into(&self, target: &mut ObjectGraph) -> Value {
    target.import(&self.graph, &self.root)
  }

  pub fn equivalent(&self, other: &RootedValue) -> bool {
    self.graph.equivalent(&self.root, &other.graph, &other.root)
  }
}

impl From<Value> for RootedValue {
  fn from(value: Value) -> Self {
    Self::new(ObjectGraph::new(), value)
  }
}
