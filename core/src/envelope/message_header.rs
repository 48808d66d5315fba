use crate::value::Value;

/// Out-of-band entry of an envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageHeader {
  name: String,
  must_understand: bool,
  value: Value,
}

impl MessageHeader {
  pub fn new(name: impl Into<String>, must_understand: bool, value: impl Into<Value>) -> Self {
    Self {
      name: name.into(),
      must_understand,
      value: value.into(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn must_understand(&self) -> bool {
    self.must_understand
  }

  pub fn value(&self) -> &Value {
    &self.value
  }
}
