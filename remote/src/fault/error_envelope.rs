use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use nexus_amf_core_rs::{Node, ObjectGraph, TypedObject, Value};

use crate::fault::fault_code;
use crate::fault::ExtendedData;

/// Cause attached to an error envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum RootCause {
  Envelope(Box<ErrorEnvelope>),
  Opaque(OpaqueCause),
}

/// A non-translatable cause, reduced to its type name and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueCause {
  type_name: String,
  description: String,
}

impl OpaqueCause {
  pub fn new(type_name: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      type_name: type_name.into(),
      description: description.into(),
    }
  }

  pub fn type_name(&self) -> &str {
    &self.type_name
  }

  pub fn description(&self) -> &str {
    &self.description
  }
}

/// Client-facing description of a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEnvelope {
  fault_code: String,
  fault_string: String,
  fault_detail: Option<String>,
  root_cause: Option<RootCause>,
  extended_data: Option<ExtendedData>,
  headers: BTreeMap<String, Value>,
}

impl ErrorEnvelope {
  pub const CLASS_NAME: &'static str = "flex.messaging.messages.ErrorMessage";

  /// An empty `fault_code` falls back to `Server.Processing`.
  pub fn new(fault_code: impl Into<String>, fault_string: impl Into<String>) -> Self {
    let fault_code = fault_code.into();
    Self {
      fault_code: if fault_code.is_empty() {
        fault_code::SERVER_PROCESSING.to_string()
      } else {
        fault_code
      },
      fault_string: fault_string.into(),
      fault_detail: None,
      root_cause: None,
      extended_data: None,
      headers: BTreeMap::new(),
    }
  }

  pub fn with_fault_detail(mut self, fault_detail: impl Into<String>) -> Self {
    self.fault_detail = Some(fault_detail.into());
    self
  }

  pub fn with_root_cause(mut self, root_cause: RootCause) -> Self {
    self.root_cause = Some(root_cause);
    self
  }

  pub fn with_extended_data(mut self, extended_data: ExtendedData) -> Self {
    self.extended_data = Some(extended_data);
    self
  }

  pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    self.headers.insert(name.into(), value.into());
    self
  }

  pub fn fault_code(&self) -> &str {
    &self.fault_code
  }

  pub fn fault_string(&self) -> &str {
    &self.fault_string
  }

  pub fn fault_detail(&self) -> Option<&str> {
    self.fault_detail.as_deref()
  }

  pub fn root_cause(&self) -> Option<&RootCause> {
    self.root_cause.as_ref()
  }

  pub fn extended_data(&self) -> Option<&ExtendedData> {
    self.extended_data.as_ref()
  }

  pub fn headers(&self) -> &BTreeMap<String, Value> {
    &self.headers
  }

  pub fn status_code(&self) -> Option<i32> {
    self
      .headers
      .get(fault_code::STATUS_CODE_HEADER)
      .and_then(Value::as_i64)
      .and_then(|code| i32::try_from(code).ok())
  }

  /// Code and string only; used when the full envelope cannot be sent.
  pub fn minimal(&self) -> Self {
    Self::new(self.fault_code.clone(), self.fault_string.clone())
  }

  /// Renders this envelope as a typed object in `graph`.
  pub fn to_value(&self, graph: &mut ObjectGraph) -> Value {
    let root_cause = match &self.root_cause {
      Some(RootCause::Envelope(envelope)) => envelope.to_value(graph),
      Some(RootCause::Opaque(cause)) => graph.object(
        TypedObject::anonymous()
          .with_field("type", cause.type_name.as_str())
          .with_field("message", cause.description.as_str()),
      ),
      None => Value::Null,
    };
    let extended_data = match &self.extended_data {
      Some(data) => data.to_value(graph),
      None => Value::Null,
    };
    let headers = graph.map(self.headers.clone());
    graph.object(
      TypedObject::new(Self::CLASS_NAME)
        .with_field("faultCode", self.fault_code.as_str())
        .with_field("faultString", self.fault_string.as_str())
        .with_field("faultDetail", self.fault_detail.clone())
        .with_field("rootCause", root_cause)
        .with_field("extendedData", extended_data)
        .with_field("headers", headers),
    )
  }

  /// Reads an envelope rendered by [`ErrorEnvelope::to_value`] back.
  pub fn from_value(graph: &ObjectGraph, value: &Value) -> Option<Self> {
    let object = graph.resolve(value)?.as_object()?;
    if object.class_name() != Self::CLASS_NAME {
      return None;
    }
    let text = |name: &str| object.field(name).and_then(Value::as_str).map(str::to_string);
    let mut envelope = Self::new(text("faultCode")?, text("faultString").unwrap_or_default());
    envelope.fault_detail = text("faultDetail");
    envelope.root_cause = object.field("rootCause").and_then(|cause| Self::cause_from_value(graph, cause));
    envelope.extended_data = object
      .field("extendedData")
      .and_then(|data| ExtendedData::from_value(graph, data));
    if let Some(Node::Map(headers)) = object.field("headers").and_then(|headers| graph.resolve(headers)) {
      envelope.headers = headers
        .iter()
        .filter(|(_, value)| value.as_node().is_none())
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    }
    Some(envelope)
  }

  fn cause_from_value(graph: &ObjectGraph, value: &Value) -> Option<RootCause> {
    let object = graph.resolve(value)?.as_object()?;
    if object.class_name() == Self::CLASS_NAME {
      return Self::from_value(graph, value).map(|envelope| RootCause::Envelope(Box::new(envelope)));
    }
    let text = |name: &str| object.field(name).and_then(Value::as_str).unwrap_or_default().to_string();
    Some(RootCause::Opaque(OpaqueCause::new(text("type"), text("message"))))
  }
}

impl Display for ErrorEnvelope {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "ErrorMessage(faultCode = {}, faultString = {:?}", self.fault_code, self.fault_string)?;
    if let Some(detail) = &self.fault_detail {
      write!(f, ", faultDetail = {:?}", detail)?;
    }
    if let Some(status) = self.status_code() {
      write!(f, ", {} = {}", fault_code::STATUS_CODE_HEADER, status)?;
    }
    write!(f, ")")
  }
}
