use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::value::{NativeObject, Node, NodeId, TypedObject, Value};

/// Arena owning every complex node of one message (or one detached value).
///
/// Node identity is the [`NodeId`]; two `Value::Node` with the same id are the same object, which
/// is how back-references and cycles are expressed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectGraph {
  nodes: Vec<Node>,
}

impl ObjectGraph {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn insert(&mut self, node: Node) -> NodeId {
    let id = NodeId::new(self.nodes.len());
    self.nodes.push(node);
    id
  }

  pub fn array(&mut self, values: Vec<Value>) -> Value {
    Value::Node(self.insert(Node::Array(values)))
  }

  pub fn map(&mut self, entries: BTreeMap<String, Value>) -> Value {
    Value::Node(self.insert(Node::Map(entries)))
  }

  pub fn object(&mut self, object: TypedObject) -> Value {
    Value::Node(self.insert(Node::Object(object)))
  }

  pub fn native(&mut self, native: Arc<dyn NativeObject>) -> Value {
    Value::Node(self.insert(Node::Native(native)))
  }

  /// Allocates a slot whose content is filled in later with [`ObjectGraph::replace`].
  pub(crate) fn reserve(&mut self) -> NodeId {
    self.insert(Node::Array(Vec::new()))
  }

  pub fn get(&self, id: NodeId) -> Option<&Node> {
    self.nodes.get(id.index())
  }

  pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
    self.nodes.get_mut(id.index())
  }

  /// Swaps the content of an existing node, keeping its identity.
  pub fn replace(&mut self, id: NodeId, node: Node) -> Option<Node> {
    self
      .nodes
      .get_mut(id.index())
      .map(|slot| std::mem::replace(slot, node))
  }

  pub fn resolve(&self, value: &Value) -> Option<&Node> {
    value.as_node().and_then(|id| self.get(id))
  }

  pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
    self.nodes.iter().enumerate().map(|(index, node)| (NodeId::new(index), node))
  }

  /// Copies the sub-graph reachable from `value` in `source` into this graph and returns the
  /// equivalent value. Shared nodes stay shared and cycles are preserved. References that do not
  /// resolve in `source` become `Null`.
  ///
  /// Native objects are shared by `Arc`; node ids they hold internally are not remapped.
  pub fn import(&mut self, source: &ObjectGraph, value: &Value) -> Value {
    Importer::new(source).import(self, value)
  }

  /// Structural comparison of `value` in this graph with `other_value` in `other`, ignoring how
  /// nodes are numbered. Sharing must match too: a node referenced twice on one side must map to
  /// a single node on the other side.
  pub fn equivalent(&self, value: &Value, other: &ObjectGraph, other_value: &Value) -> bool {
    Equivalence::new(self, other).check(value, other_value)
  }
}

/// Copies values from one source graph into one target graph.
///
/// The node mapping survives across calls, so a node reachable from several imported roots is
/// copied once. Every call must use the same target graph.
#[derive(Debug)]
pub struct Importer<'a> {
  source: &'a ObjectGraph,
  mapping: HashMap<NodeId, NodeId>,
}

impl<'a> Importer<'a> {
  pub fn new(source: &'a ObjectGraph) -> Self {
    Self {
      source,
      mapping: HashMap::new(),
    }
  }

  pub fn import(&mut self, target: &mut ObjectGraph, value: &Value) -> Value {
    let source = self.source;
    let mut pending = Vec::new();
    let root = self.import_value(target, value, &mut pending);
    while let Some((from, to)) = pending.pop() {
      let copied = match source.get(from) {
        Some(Node::Array(values)) => Node::Array(
          values
            .iter()
            .map(|v| self.import_value(target, v, &mut pending))
            .collect(),
        ),
        Some(Node::Map(entries)) => Node::Map(
          entries
            .iter()
            .map(|(k, v)| (k.clone(), self.import_value(target, v, &mut pending)))
            .collect(),
        ),
        Some(Node::Object(object)) => {
          let values = object
            .sealed_values()
            .iter()
            .map(|v| self.import_value(target, v, &mut pending))
            .collect();
          let dynamic_fields = object
            .dynamic_fields()
            .iter()
            .map(|(k, v)| (k.clone(), self.import_value(target, v, &mut pending)))
            .collect();
          Node::Object(TypedObject::from_parts(object.traits().clone(), values, dynamic_fields))
        }
        Some(Node::Native(native)) => Node::Native(native.clone()),
        None => continue,
      };
      target.replace(to, copied);
    }
    root
  }

  fn import_value(&mut self, target: &mut ObjectGraph, value: &Value, pending: &mut Vec<(NodeId, NodeId)>) -> Value {
    let Value::Node(id) = value else {
      return value.clone();
    };
    if let Some(mapped) = self.mapping.get(id) {
      return Value::Node(*mapped);
    }
    if self.source.get(*id).is_none() {
      tracing::warn!("dropping dangling reference {} while importing a value", id);
      return Value::Null;
    }
    let copy = target.reserve();
    self.mapping.insert(*id, copy);
    pending.push((*id, copy));
    Value::Node(copy)
  }
}

/// Cycle-safe structural comparison between two graphs.
///
/// One instance keeps its node correspondence across calls, so several roots of the same pair of
/// graphs (e.g. every body of two messages) are checked against one consistent mapping.
#[derive(Debug)]
pub struct Equivalence<'a> {
  left: &'a ObjectGraph,
  right: &'a ObjectGraph,
  forward: HashMap<NodeId, NodeId>,
  backward: HashMap<NodeId, NodeId>,
}

impl<'a> Equivalence<'a> {
  pub fn new(left: &'a ObjectGraph, right: &'a ObjectGraph) -> Self {
    Self {
      left,
      right,
      forward: HashMap::new(),
      backward: HashMap::new(),
    }
  }

  pub fn check(&mut self, left: &'a Value, right: &'a Value) -> bool {
    let (left_graph, right_graph) = (self.left, self.right);
    let mut pending: Vec<(&'a Value, &'a Value)> = vec![(left, right)];
    while let Some((l, r)) = pending.pop() {
      let (l_id, r_id) = match (l, r) {
        (Value::Node(l_id), Value::Node(r_id)) => (*l_id, *r_id),
        (Value::Node(_), _) | (_, Value::Node(_)) => return false,
        _ => {
          if l != r {
            return false;
          }
          continue;
        }
      };
      match (self.forward.get(&l_id), self.backward.get(&r_id)) {
        (Some(mapped_r), Some(mapped_l)) => {
          if *mapped_r != r_id || *mapped_l != l_id {
            return false;
          }
          continue;
        }
        (None, None) => {
          self.forward.insert(l_id, r_id);
          self.backward.insert(r_id, l_id);
        }
        _ => return false,
      }
      let (Some(l_node), Some(r_node)) = (left_graph.get(l_id), right_graph.get(r_id)) else {
        return false;
      };
      match (l_node, r_node) {
        (Node::Array(a), Node::Array(b)) => {
          if a.len() != b.len() {
            return false;
          }
          pending.extend(a.iter().zip(b.iter()));
        }
        (Node::Map(a), Node::Map(b)) => {
          if a.len() != b.len() || !a.keys().eq(b.keys()) {
            return false;
          }
          pending.extend(a.values().zip(b.values()));
        }
        (Node::Object(a), Node::Object(b)) => {
          if a.traits() != b.traits() || a.dynamic_fields().len() != b.dynamic_fields().len() {
            return false;
          }
          if !a
            .dynamic_fields()
            .iter()
            .zip(b.dynamic_fields().iter())
            .all(|((ka, _), (kb, _))| ka == kb)
          {
            return false;
          }
          pending.extend(a.sealed_values().iter().zip(b.sealed_values().iter()));
          pending.extend(
            a.dynamic_fields()
              .iter()
              .map(|(_, v)| v)
              .zip(b.dynamic_fields().iter().map(|(_, v)| v)),
          );
        }
        (Node::Native(a), Node::Native(b)) => {
          if !a.eq_native(b.as_ref()) {
            return false;
          }
        }
        _ => return false,
      }
    }
    true
  }
}
