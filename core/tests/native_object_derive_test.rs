use std::sync::Arc;

use nexus_amf_core_rs::{
  decode, encode, ActionMessage, Capability, Decomposed, MessageBody, NativeObject, Node, ObjectGraph, ProxyRegistry,
  Value,
};

#[derive(Debug, Clone, PartialEq, NativeObject)]
#[native(alias = "com.example.Account")]
struct Account {
  id: i32,
  owner: String,
  active: bool,
}

#[derive(Debug, Clone, PartialEq, NativeObject)]
struct Unaliased {
  label: Option<String>,
}

#[test]
fn test_derive_declares_named_aggregate() {
  let account = Account {
    id: 7,
    owner: "alice".to_string(),
    active: true,
  };
  let descriptor = account.type_descriptor();
  assert_eq!(descriptor.type_name(), "com.example.Account");
  assert!(descriptor.has_capability(Capability::NamedAggregate));
  assert_eq!(Unaliased { label: None }.type_descriptor().type_name(), "Unaliased");
}

#[test]
fn test_derive_view_follows_field_order() {
  let account = Account {
    id: 7,
    owner: "alice".to_string(),
    active: true,
  };
  let Some(Decomposed::Aggregate(object)) = account.view(Capability::NamedAggregate) else {
    panic!("expected an aggregate view");
  };
  assert_eq!(object.class_name(), "com.example.Account");
  assert_eq!(
    object.sealed_fields().collect::<Vec<_>>(),
    vec![
      ("id", &Value::from(7)),
      ("owner", &Value::from("alice")),
      ("active", &Value::from(true)),
    ]
  );
  assert!(account.view(Capability::OrderedSequence).is_none());
}

#[test]
fn test_derive_eq_native() {
  let a = Unaliased { label: Some("x".to_string()) };
  let b = Unaliased { label: Some("x".to_string()) };
  let c = Unaliased { label: None };
  assert!(a.eq_native(&b));
  assert!(!a.eq_native(&c));
  assert!(!a.eq_native(&Account {
    id: 0,
    owner: String::new(),
    active: false
  }));
}

#[test]
fn test_derived_native_encodes_as_typed_object() {
  let registry = ProxyRegistry::with_defaults();
  let mut graph = ObjectGraph::new();
  let root = graph.native(Arc::new(Account {
    id: 1,
    owner: "bob".to_string(),
    active: false,
  }));
  let mut message = ActionMessage::with_graph(graph);
  message.add_body(MessageBody::new("accounts.get", "/1", root));

  let bytes = encode(&message, &registry).unwrap();
  let (decoded, _) = decode(&bytes, &registry).unwrap();
  let data = decoded.body(0).unwrap().data();
  let object = decoded.graph().resolve(data).and_then(Node::as_object).unwrap();
  assert_eq!(object.class_name(), "com.example.Account");
  assert_eq!(object.field("owner"), Some(&Value::from("bob")));
  assert_eq!(object.field("active"), Some(&Value::from(false)));
}
