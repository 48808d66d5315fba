use std::sync::Arc;

use async_trait::async_trait;
use nexus_amf_core_rs::{
  decode, encode, ActionMessage, MessageBody, Node, ObjectGraph, ProxyRegistry, RootedValue, TypedObject, Value,
};
use nexus_amf_remote_rs::{
  fault_code, ConfigOption, ErrorEnvelope, ExtendedData, Failure, MemoryLogSink, MessageProcessor, MessagingConfig,
  ServiceCall, ServiceInvoker, Severity,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct ScriptedInvoker;

#[async_trait]
impl ServiceInvoker for ScriptedInvoker {
  async fn invoke(&self, call: &ServiceCall, body: &MessageBody, graph: &ObjectGraph) -> Result<RootedValue, Failure> {
    match call.operation.as_str() {
      "echo" => {
        let mut result = ObjectGraph::new();
        let root = result.import(graph, body.data());
        Ok(RootedValue::new(result, root))
      }
      "fail" => Err(
        Failure::new("operation failed")
          .with_code("App.Failed")
          .with_status_code(503)
          .with_extended_data(ExtendedData::new().with_entry("retryAfter", 30)),
      ),
      other => Err(Failure::new(format!("unknown operation {}", other))),
    }
  }
}

fn init_logger() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .try_init();
}

fn processor(sink: Arc<MemoryLogSink>) -> MessageProcessor {
  let config = MessagingConfig::from([
    ConfigOption::with_service("echo"),
    ConfigOption::with_minimum_severity(Severity::Info),
  ]);
  MessageProcessor::new(config, ProxyRegistry::with_defaults(), Arc::new(ScriptedInvoker), sink)
}

fn decode_reply(bytes: &[u8]) -> ActionMessage {
  decode(bytes, &ProxyRegistry::with_defaults()).unwrap().0
}

fn request(bodies: &[(&str, &str)]) -> (ActionMessage, Vec<u8>) {
  let mut message = ActionMessage::new();
  for (index, (target, _)) in bodies.iter().enumerate() {
    let payload = message.graph_mut().object(
      TypedObject::new("example.Greeting")
        .with_field("text", bodies[index].1)
        .with_field("index", index as i32),
    );
    message.add_body(MessageBody::new(*target, format!("/{}", index + 1), payload));
  }
  let bytes = encode(&message, &ProxyRegistry::with_defaults()).unwrap();
  (message, bytes)
}

#[tokio::test]
async fn test_successful_call_replies_on_result() {
  init_logger();
  let sink = Arc::new(MemoryLogSink::new());
  let (request, bytes) = request(&[("echo.echo", "hello")]);

  let reply = decode_reply(&processor(sink.clone()).process(&bytes).await.unwrap());
  let body = reply.body(0).unwrap();
  assert_eq!(body.target_uri(), "/1/onResult");
  assert_eq!(body.response_uri(), "");
  assert!(request
    .graph()
    .equivalent(request.body(0).unwrap().data(), reply.graph(), body.data()));
  assert!(sink.is_empty());
}

#[tokio::test]
async fn test_failing_call_replies_on_status_with_error_envelope() {
  init_logger();
  let sink = Arc::new(MemoryLogSink::new());
  let (_, bytes) = request(&[("echo.fail", "hello")]);

  let reply = decode_reply(&processor(sink.clone()).process(&bytes).await.unwrap());
  let body = reply.body(0).unwrap();
  assert_eq!(body.target_uri(), "/1/onStatus");

  let object = reply.graph().resolve(body.data()).and_then(Node::as_object).unwrap();
  assert_eq!(object.class_name(), ErrorEnvelope::CLASS_NAME);
  let envelope = ErrorEnvelope::from_value(reply.graph(), body.data()).unwrap();
  assert_eq!(envelope.fault_code(), "App.Failed");
  assert_eq!(envelope.fault_string(), "operation failed");
  assert_eq!(
    envelope.extended_data().and_then(|data| data.get("retryAfter")),
    Some(&Value::from(30))
  );
  assert_eq!(
    reply.header(fault_code::STATUS_CODE_HEADER).map(|header| header.value()),
    Some(&Value::from(503))
  );

  let records = sink.records();
  assert_eq!(records.len(), 1);
  assert_eq!(records[0].severity, Severity::Error);
  assert!(records[0].text.starts_with("Error handling message: App.Failed: operation failed"));
  assert!(records[0].text.contains("incomingMessage: ActionMessage("));
  assert!(records[0].text.contains("errorReply: ErrorMessage(faultCode = App.Failed"));
}

#[tokio::test]
async fn test_invalid_service_id_is_reported_to_the_client() {
  init_logger();
  let sink = Arc::new(MemoryLogSink::new());
  let (_, bytes) = request(&[("foo-service,.echo", "hello")]);

  let reply = decode_reply(&processor(sink.clone()).process(&bytes).await.unwrap());
  let envelope = ErrorEnvelope::from_value(reply.graph(), reply.body(0).unwrap().data()).unwrap();
  assert_eq!(envelope.fault_code(), fault_code::SERVER_RESOURCE_UNAVAILABLE);
  assert_eq!(envelope.fault_string(), "Invalid service id 'foo-service,'.");
  assert_eq!(sink.records()[0].severity, Severity::Warn);
}

#[tokio::test]
async fn test_bodies_are_answered_independently() {
  init_logger();
  let sink = Arc::new(MemoryLogSink::new());
  let (_, bytes) = request(&[("echo.echo", "a"), ("echo.fail", "b"), ("echo.echo", "c")]);

  let reply = decode_reply(&processor(sink.clone()).process(&bytes).await.unwrap());
  let targets = reply.bodies().iter().map(|body| body.target_uri()).collect::<Vec<_>>();
  assert_eq!(targets, vec!["/1/onResult", "/2/onStatus", "/3/onResult"]);
  assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_body_tag_in_value_position_yields_no_message() {
  init_logger();
  let sink = Arc::new(MemoryLogSink::new());
  let processor = processor(sink.clone());
  let bytes = [0x00, 0x03, 0x00, 0x00, 0x00, 0x01, 0xB0, 0x00, 0x01, b'a', 0x00, 0x02, b'/', b'1', 0xB0];

  let failure = processor.decode_request(&bytes).unwrap_err();
  assert_eq!(failure.message(), "Unexpected body tag.");

  let reply = decode_reply(&processor.process(&bytes).await.unwrap());
  let envelope = ErrorEnvelope::from_value(reply.graph(), reply.body(0).unwrap().data()).unwrap();
  assert_eq!(envelope.fault_string(), "Unexpected body tag.");
}

#[test]
fn test_invalid_service_id_in_configuration() {
  let config = MessagingConfig::from([ConfigOption::with_service("foo-service,")]);
  let failure = config.validate().unwrap_err();
  assert_eq!(failure.message(), "Invalid service id 'foo-service,'.");
}
