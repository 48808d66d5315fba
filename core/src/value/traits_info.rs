/// Shape descriptor of a typed object: class name, ordered sealed field names and flags.
///
/// Traits are the unit cached by the reference table, so repeated objects of one shape only carry
/// their field names once per message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TraitInfo {
  class_name: String,
  properties: Vec<String>,
  dynamic: bool,
  externalizable: bool,
}

impl TraitInfo {
  pub fn new(class_name: impl Into<String>, properties: Vec<String>, dynamic: bool) -> Self {
    Self {
      class_name: class_name.into(),
      properties,
      dynamic,
      externalizable: false,
    }
  }

  pub fn sealed(class_name: impl Into<String>, properties: Vec<String>) -> Self {
    Self::new(class_name, properties, false)
  }

  pub fn anonymous(properties: Vec<String>, dynamic: bool) -> Self {
    Self::new(String::new(), properties, dynamic)
  }

  pub fn with_externalizable(mut self, externalizable: bool) -> Self {
    self.externalizable = externalizable;
    self
  }

  pub fn class_name(&self) -> &str {
    &self.class_name
  }

  pub fn is_anonymous(&self) -> bool {
    self.class_name.is_empty()
  }

  pub fn properties(&self) -> &[String] {
    &self.properties
  }

  pub fn property_count(&self) -> usize {
    self.properties.len()
  }

  pub fn is_dynamic(&self) -> bool {
    self.dynamic
  }

  pub fn is_externalizable(&self) -> bool {
    self.externalizable
  }

  pub(crate) fn push_property(&mut self, name: String) {
    self.properties.push(name);
  }

  pub(crate) fn set_dynamic(&mut self, dynamic: bool) {
    self.dynamic = dynamic;
  }
}
