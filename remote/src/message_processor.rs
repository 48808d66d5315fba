use std::fmt::{Display, Formatter};
use std::sync::Arc;

use nexus_amf_core_rs::{
  decode_with_config, encode_with_config, ActionMessage, EncodeError, MessageBody, MessageHeader, ProxyRegistry,
  RootedValue,
};

use crate::config::MessagingConfig;
use crate::fault::{fault_code, translate, ErrorEnvelope, Failure};
use crate::logging::{HingePointLogger, LogSink};
use crate::service::{ServiceDirectory, ServiceInvoker};


const RESULT_SUFFIX: &str = "/onResult";
const STATUS_SUFFIX: &str = "/onStatus";

/// Log intro for requests that could not be decoded.
pub const DESERIALIZATION_LOG_INTRO: &str = "Error deserializing request: ";

/// Request context logged for input that never became a message.
#[derive(Debug, Clone, Copy)]
struct UndecodableRequest {
  len: usize,
}

impl Display for UndecodableRequest {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "undecodable request ({} bytes)", self.len)
  }
}

enum Outcome {
  Result(RootedValue),
  Fault(ErrorEnvelope),
}

/// Turns request bytes into reply bytes: decode, invoke each body, translate and log failures,
/// encode.
#[derive(Debug, Clone)]
pub struct MessageProcessor {
  config: MessagingConfig,
  registry: ProxyRegistry,
  directory: ServiceDirectory,
  invoker: Arc<dyn ServiceInvoker>,
  logger: HingePointLogger,
}

impl MessageProcessor {
  pub fn new(
    config: MessagingConfig,
    registry: ProxyRegistry,
    invoker: Arc<dyn ServiceInvoker>,
    sink: Arc<dyn LogSink>,
  ) -> Self {
    let logger = HingePointLogger::new(sink, config.minimum_severity()).with_causal_chains(config.log_stack_trace());
    Self {
      directory: ServiceDirectory::from_config(&config),
      config,
      registry,
      invoker,
      logger,
    }
  }

  pub fn config(&self) -> &MessagingConfig {
    &self.config
  }

  pub fn logger(&self) -> &HingePointLogger {
    &self.logger
  }

  pub fn decode_request(&self, bytes: &[u8]) -> Result<ActionMessage, Failure> {
    let (message, _) = decode_with_config(bytes, &self.registry, self.config.codec_config())?;
    Ok(message)
  }

  /// Produces the reply for `bytes`. Every failure after this point ends up as an error body;
  /// `Err` is returned only if not even a minimal error reply can be encoded.
  pub async fn process(&self, bytes: &[u8]) -> Result<Vec<u8>, EncodeError> {
    let request = match self.decode_request(bytes) {
      Ok(request) => request,
      Err(failure) => {
        let envelope = translate(&failure);
        self.logger.report(
          &failure,
          &UndecodableRequest { len: bytes.len() },
          Some(&envelope),
          Some(DESERIALIZATION_LOG_INTRO),
        );
        let mut reply = ActionMessage::new();
        Self::add_fault(&mut reply, STATUS_SUFFIX.to_string(), &envelope);
        return encode_with_config(&reply, &self.registry, self.config.codec_config());
      }
    };
    tracing::debug!("processing {}", request);

    let mut outcomes = Vec::with_capacity(request.bodies().len());
    for body in request.bodies() {
      let outcome = match self.invoke(&request, body).await {
        Ok(result) => Outcome::Result(result),
        Err(failure) => {
          let envelope = translate(&failure);
          self.logger.report(&failure, &request, Some(&envelope), None);
          Outcome::Fault(envelope)
        }
      };
      outcomes.push(outcome);
    }

    let mut reply = ActionMessage::new();
    for (body, outcome) in request.bodies().iter().zip(outcomes.iter()) {
      match outcome {
        Outcome::Result(result) => {
          let data = result.import_into(reply.graph_mut());
          reply.add_body(MessageBody::new(format!("{}{}", body.response_uri(), RESULT_SUFFIX), "", data));
        }
        Outcome::Fault(envelope) => {
          Self::add_fault(&mut reply, format!("{}{}", body.response_uri(), STATUS_SUFFIX), envelope);
        }
      }
    }

    match encode_with_config(&reply, &self.registry, self.config.codec_config()) {
      Ok(bytes) => Ok(bytes),
      Err(error) => self.encode_fallback(&request, error),
    }
  }

  async fn invoke(&self, request: &ActionMessage, body: &MessageBody) -> Result<RootedValue, Failure> {
    let call = self.directory.route(body.target_uri())?;
    self.invoker.invoke(&call, body, request.graph()).await
  }

  fn add_fault(reply: &mut ActionMessage, target_uri: String, envelope: &ErrorEnvelope) {
    if let Some(status_code) = envelope.status_code() {
      if reply.header(fault_code::STATUS_CODE_HEADER).is_none() {
        reply.add_header(MessageHeader::new(fault_code::STATUS_CODE_HEADER, false, status_code));
      }
    }
    let data = envelope.to_value(reply.graph_mut());
    reply.add_body(MessageBody::new(target_uri, "", data));
  }

  /// Replaces every body with a minimal error envelope describing the encoding failure.
  fn encode_fallback(&self, request: &ActionMessage, error: EncodeError) -> Result<Vec<u8>, EncodeError> {
    let failure = Failure::from(error);
    let envelope = translate(&failure);
    self.logger.report(&failure, request, Some(&envelope), None);
    let minimal = envelope.minimal();
    let mut reply = ActionMessage::new();
    for body in request.bodies() {
      Self::add_fault(&mut reply, format!("{}{}", body.response_uri(), STATUS_SUFFIX), &minimal);
    }
    encode_with_config(&reply, &self.registry, self.config.codec_config())
  }
}
