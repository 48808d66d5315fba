use crate::value::Value;

/// One request or reply inside an envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageBody {
  target_uri: String,
  response_uri: String,
  data: Value,
}

impl MessageBody {
  pub fn new(target_uri: impl Into<String>, response_uri: impl Into<String>, data: impl Into<Value>) -> Self {
    Self {
      target_uri: target_uri.into(),
      response_uri: response_uri.into(),
      data: data.into(),
    }
  }

  pub fn target_uri(&self) -> &str {
    &self.target_uri
  }

  pub fn response_uri(&self) -> &str {
    &self.response_uri
  }

  /// Payload; node references resolve in the owning message's graph.
  pub fn data(&self) -> &Value {
    &self.data
  }

  pub fn set_data(&mut self, data: impl Into<Value>) {
    self.data = data.into();
  }
}
