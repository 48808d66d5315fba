use nexus_amf_core_rs::{MalformedStream, Node, ObjectGraph, RootedValue, TypedObject, Value};

use super::*;
use crate::logging::Severity;

#[derive(Debug, thiserror::Error)]
#[error("disk full")]
struct DiskFull;

#[test]
fn test_missing_code_defaults_to_server_processing() {
  let envelope = translate(&Failure::new("boom"));
  assert_eq!(envelope.fault_code(), fault_code::SERVER_PROCESSING);
  assert_eq!(envelope.fault_string(), "boom");
  assert_eq!(translate(&Failure::new("boom").with_code("")).fault_code(), fault_code::SERVER_PROCESSING);
}

#[test]
fn test_translate_is_pure_and_idempotent() {
  let failure = Failure::new("outer")
    .with_code("App.Failed")
    .with_details("step 3")
    .with_status_code(503)
    .with_extended_data(ExtendedData::new().with_entry("retry", true))
    .caused_by(Failure::new("inner").with_code("App.Inner"));
  let first = translate(&failure);
  let second = translate(&failure);
  assert_eq!(first, second);
  assert!(!failure.is_logged());
}

#[test]
fn test_root_causes_are_translated_recursively() {
  let failure = Failure::new("outer").caused_by(Failure::new("middle").caused_by(Failure::from_error(DiskFull)));
  let envelope = translate(&failure);
  let Some(RootCause::Envelope(middle)) = envelope.root_cause() else {
    panic!("expected a nested envelope");
  };
  assert_eq!(middle.fault_string(), "middle");
  let Some(RootCause::Envelope(wrapped)) = middle.root_cause() else {
    panic!("expected a nested envelope");
  };
  assert_eq!(wrapped.fault_string(), "disk full");
  let Some(RootCause::Opaque(cause)) = wrapped.root_cause() else {
    panic!("expected an opaque cause");
  };
  assert!(cause.type_name().ends_with("DiskFull"));
  assert_eq!(cause.description(), "disk full");
}

#[test]
fn test_status_code_travels_as_header() {
  let envelope = translate(&Failure::new("busy").with_status_code(503));
  assert_eq!(envelope.status_code(), Some(503));
  assert_eq!(
    envelope.headers().get(fault_code::STATUS_CODE_HEADER),
    Some(&Value::Integer(503))
  );

  let mut graph = ObjectGraph::new();
  let value = envelope.to_value(&mut graph);
  let object = graph.resolve(&value).and_then(Node::as_object).unwrap();
  assert!(object.field("statusCode").is_none());
  assert!(object.field(fault_code::STATUS_CODE_HEADER).is_none());
}

#[test]
fn test_extended_data_is_attached_verbatim() {
  let mut source = ObjectGraph::new();
  let nested = source.object(TypedObject::new("example.Quota").with_field("limit", 10));
  let mut data = ExtendedData::new().with_entry("tenant", "acme");
  data.insert_rooted("quota", &RootedValue::new(source, nested));

  let envelope = translate(&Failure::new("over quota").with_extended_data(data.clone()));
  assert!(envelope.extended_data().unwrap().equivalent(&data));
}

#[test]
fn test_extended_data_keeps_nodes_shared_between_keys() {
  let mut source = ObjectGraph::new();
  let quota = source.object(TypedObject::new("example.Quota").with_field("limit", 10));
  let entries = [("a".to_string(), quota.clone()), ("b".to_string(), quota)].into_iter().collect();
  let map = source.map(entries);

  let data = ExtendedData::from_value(&source, &map).unwrap();
  assert_eq!(data.get("a"), data.get("b"));
  assert_eq!(data.graph().len(), 1);

  let mut rendered = ObjectGraph::new();
  let value = data.to_value(&mut rendered);
  assert!(source.equivalent(&map, &rendered, &value));
  let rendered_map = rendered.resolve(&value).and_then(Node::as_map).unwrap();
  assert_eq!(rendered_map.get("a"), rendered_map.get("b"));

  let mut split = ExtendedData::new();
  let mut first = ObjectGraph::new();
  let a = first.object(TypedObject::new("example.Quota").with_field("limit", 10));
  split.insert_rooted("a", &RootedValue::new(first.clone(), a.clone()));
  split.insert_rooted("b", &RootedValue::new(first, a));
  assert!(!data.equivalent(&split));
}

#[test]
fn test_envelope_value_round_trip() {
  let failure = Failure::new("outer")
    .with_code("App.Failed")
    .with_details("detail")
    .with_status_code(500)
    .with_extended_data(ExtendedData::new().with_entry("attempt", 2))
    .caused_by(Failure::from_error(DiskFull));
  let envelope = translate(&failure);

  let mut graph = ObjectGraph::new();
  let value = envelope.to_value(&mut graph);
  let restored = ErrorEnvelope::from_value(&graph, &value).unwrap();
  assert_eq!(restored.fault_code(), "App.Failed");
  assert_eq!(restored.fault_detail(), Some("detail"));
  assert_eq!(restored.status_code(), Some(500));
  assert_eq!(restored.root_cause(), envelope.root_cause());
  assert!(restored
    .extended_data()
    .unwrap()
    .equivalent(envelope.extended_data().unwrap()));
}

#[test]
fn test_minimal_keeps_code_and_string_only() {
  let envelope = translate(&Failure::new("x").with_code("A.B").with_details("d").with_status_code(1));
  let minimal = envelope.minimal();
  assert_eq!(minimal, ErrorEnvelope::new("A.B", "x"));
}

#[test]
fn test_malformed_stream_becomes_client_encoding_failure() {
  let failure = Failure::from(MalformedStream::UnexpectedBodyTag { offset: 14 });
  let envelope = translate(&failure);
  assert_eq!(envelope.fault_code(), fault_code::CLIENT_MESSAGE_ENCODING);
  assert_eq!(envelope.fault_string(), "Unexpected body tag.");
  assert_eq!(envelope.fault_detail(), Some("decoding stopped at offset 14"));
}

#[test]
fn test_logged_flag_flips_once() {
  let failure = Failure::new("x");
  assert!(!failure.is_logged());
  assert!(failure.mark_logged());
  assert!(!failure.mark_logged());
  assert!(failure.is_logged());
  assert!(!failure.clone().is_logged());
}

#[test]
fn test_defaults() {
  let failure = Failure::new("x");
  assert_eq!(failure.preferred_level(), Severity::Error.level());
  assert!(failure.log_stack_trace());
  assert_eq!(failure.default_log_intro(), "Error handling message: ");
}

#[test]
fn test_causal_chain_follows_sources() {
  let failure = Failure::new("outer").caused_by(Failure::from_error(DiskFull));
  assert_eq!(
    failure.causal_chain(),
    vec![
      "Server.Processing: outer".to_string(),
      "Caused by: Server.Processing: disk full".to_string(),
      "Caused by: disk full".to_string(),
    ]
  );
}
