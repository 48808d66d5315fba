use std::collections::BTreeMap;

use super::*;

fn person(graph: &mut ObjectGraph, name: &str) -> Value {
  graph.object(TypedObject::new("example.Person").with_field("name", name).with_field("age", 42))
}

#[test]
fn test_integer_equals_promoted_double() {
  assert_eq!(Value::Integer(1 << 30), Value::Double((1u64 << 30) as f64));
  assert_ne!(Value::Integer(3), Value::Double(3.5));
  assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
}

#[test]
fn test_option_into_value() {
  assert_eq!(Value::from(None::<i32>), Value::Null);
  assert_eq!(Value::from(Some("x")), Value::String("x".to_string()));
}

#[test]
fn test_typed_object_field_lookup() {
  let mut object = TypedObject::new("example.Person")
    .with_field("name", "alice")
    .with_dynamic_field("nickname", "al");
  assert!(object.is_dynamic());
  assert_eq!(object.traits().properties(), &["name".to_string()]);
  assert_eq!(object.field("nickname"), Some(&Value::from("al")));
  assert!(object.set_field("name", "bob"));
  assert_eq!(object.field("name"), Some(&Value::from("bob")));
  assert!(!object.set_field("missing", 1));
}

#[test]
fn test_import_preserves_sharing() {
  let mut source = ObjectGraph::new();
  let shared = person(&mut source, "alice");
  let root = source.array(vec![shared.clone(), shared]);

  let mut target = ObjectGraph::new();
  target.array(Vec::new());
  let imported = target.import(&source, &root);

  let items = target.resolve(&imported).and_then(Node::as_array).unwrap();
  assert_eq!(items[0], items[1]);
  assert!(source.equivalent(&root, &target, &imported));
}

#[test]
fn test_import_preserves_cycles() {
  let mut source = ObjectGraph::new();
  let root = source.object(TypedObject::anonymous().with_field("self", Value::Null));
  let id = root.as_node().unwrap();
  if let Some(Node::Object(object)) = source.get_mut(id) {
    object.set_field("self", root.clone());
  }

  let mut target = ObjectGraph::new();
  let imported = target.import(&source, &root);
  let object = target.resolve(&imported).and_then(Node::as_object).unwrap();
  assert_eq!(object.field("self"), Some(&imported));
  assert_eq!(target.len(), 1);
}

#[test]
fn test_import_drops_dangling_references() {
  let source = ObjectGraph::new();
  let mut target = ObjectGraph::new();
  let imported = target.import(&source, &Value::Node(NodeId::new(7)));
  assert_eq!(imported, Value::Null);
}

#[test]
fn test_equivalence_ignores_numbering() {
  let mut left = ObjectGraph::new();
  let l = person(&mut left, "alice");

  let mut right = ObjectGraph::new();
  right.map(BTreeMap::new());
  let r = person(&mut right, "alice");

  assert!(left.equivalent(&l, &right, &r));
  let other = person(&mut right, "bob");
  assert!(!left.equivalent(&l, &right, &other));
}

#[test]
fn test_equivalence_requires_matching_sharing() {
  let mut shared = ObjectGraph::new();
  let item = shared.array(vec![Value::from(1)]);
  let left = shared.array(vec![item.clone(), item]);

  let mut distinct = ObjectGraph::new();
  let first = distinct.array(vec![Value::from(1)]);
  let second = distinct.array(vec![Value::from(1)]);
  let right = distinct.array(vec![first, second]);

  assert!(!shared.equivalent(&left, &distinct, &right));
}

#[test]
fn test_rooted_value_equivalence() {
  let mut graph = ObjectGraph::new();
  let root = person(&mut graph, "alice");
  let rooted = RootedValue::new(graph, root);

  let mut target = ObjectGraph::new();
  let imported = rooted.import_into(&mut target);
  assert!(rooted.equivalent(&RootedValue::new(target, imported)));
  assert!(RootedValue::scalar(5).equivalent(&RootedValue::scalar(5.0)));
}
