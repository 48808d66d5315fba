use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::codec::byte_writer::ByteWriter;
use crate::codec::{
  CodecConfig, EncodeError, Marker, ReferenceTable, ENVELOPE_VERSION, INTEGER_MAX, INTEGER_MIN, MAX_SAFE_INTEGER,
};
use crate::envelope::ActionMessage;
use crate::registry::{Capability, Decomposed, ProxyRegistry};
use crate::value::{AmfDate, NativeObject, Node, NodeId, ObjectGraph, RootedValue, TraitInfo, Value};

/// Encodes a complete message.
pub fn encode(message: &ActionMessage, registry: &ProxyRegistry) -> Result<Vec<u8>, EncodeError> {
  encode_with_config(message, registry, CodecConfig::default())
}

pub fn encode_with_config(
  message: &ActionMessage,
  registry: &ProxyRegistry,
  config: CodecConfig,
) -> Result<Vec<u8>, EncodeError> {
  let mut encoder = Encoder::new(message.graph(), registry, config);
  encoder.write_message(message)?;
  let (bytes, table) = encoder.finish();
  tracing::debug!("encoded {} into {} bytes: {}", message, bytes.len(), table);
  Ok(bytes)
}

/// Encodes a single value without envelope framing.
pub fn encode_value(value: &RootedValue, registry: &ProxyRegistry, config: CodecConfig) -> Result<Vec<u8>, EncodeError> {
  let mut encoder = Encoder::new(value.graph(), registry, config);
  encoder.write_value(value.root())?;
  Ok(encoder.finish().0)
}

/// Stateful writer for one transcode over one graph.
#[derive(Debug)]
pub struct Encoder<'a> {
  writer: ByteWriter,
  registry: &'a ProxyRegistry,
  config: CodecConfig,
  graph: &'a ObjectGraph,
  table: ReferenceTable,
  // Marker a node was first written with; back-references repeat it.
  node_markers: HashMap<NodeId, Marker>,
  depth: usize,
}

impl<'a> Encoder<'a> {
  pub fn new(graph: &'a ObjectGraph, registry: &'a ProxyRegistry, config: CodecConfig) -> Self {
    Self {
      writer: ByteWriter::new(),
      registry,
      config,
      graph,
      table: ReferenceTable::new(),
      node_markers: HashMap::new(),
      depth: 0,
    }
  }

  pub fn len(&self) -> usize {
    self.writer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.writer.len() == 0
  }

  pub fn finish(self) -> (Vec<u8>, ReferenceTable) {
    (self.writer.into_bytes(), self.table)
  }

  pub fn write_message(&mut self, message: &ActionMessage) -> Result<(), EncodeError> {
    self.writer.write_u16(ENVELOPE_VERSION);
    self.write_count(message.headers().len())?;
    for header in message.headers() {
      self.writer.write_utf8(header.name())?;
      self.writer.write_u8(header.must_understand() as u8);
      self.write_value(header.value())?;
    }
    self.write_count(message.bodies().len())?;
    for body in message.bodies() {
      self.writer.write_u8(Marker::BodyTag.into());
      self.writer.write_utf8(body.target_uri())?;
      self.writer.write_utf8(body.response_uri())?;
      self.write_value(body.data())?;
    }
    Ok(())
  }

  fn write_count(&mut self, count: usize) -> Result<(), EncodeError> {
    let count = u16::try_from(count).map_err(|_| EncodeError::LengthOverflow {
      length: count,
      limit: u16::MAX as usize,
    })?;
    self.writer.write_u16(count);
    Ok(())
  }

  fn write_marker(&mut self, marker: Marker) {
    self.writer.write_u8(marker.into());
  }

  pub fn write_value(&mut self, value: &Value) -> Result<(), EncodeError> {
    match value {
      Value::Undefined => self.write_marker(Marker::Undefined),
      Value::Null => self.write_marker(Marker::Null),
      Value::Boolean(false) => self.write_marker(Marker::False),
      Value::Boolean(true) => self.write_marker(Marker::True),
      Value::Integer(i) => self.write_integer(*i)?,
      Value::Double(d) => self.write_double(*d)?,
      Value::String(s) => {
        self.write_marker(Marker::String);
        self.write_string(s)?;
      }
      Value::Date(date) => self.write_date(*date)?,
      Value::Xml(text) => {
        self.write_marker(Marker::Xml);
        self.table.add_object(value.clone());
        self.writer.write_header(text.len(), true)?;
        self.writer.write_bytes(text.as_bytes());
      }
      Value::ByteArray(bytes) => self.write_byte_array(bytes)?,
      Value::Node(id) => self.write_node(*id)?,
    }
    Ok(())
  }

  fn write_integer(&mut self, value: i64) -> Result<(), EncodeError> {
    if (INTEGER_MIN..=INTEGER_MAX).contains(&value) {
      self.write_marker(Marker::Integer);
      return self.writer.write_i29(value);
    }
    if value.unsigned_abs() > MAX_SAFE_INTEGER as u64 {
      return Err(EncodeError::IntegerOutOfRange(value));
    }
    self.write_marker(Marker::Double);
    self.writer.write_f64(value as f64);
    Ok(())
  }

  /// Integral doubles in the compact range go out as integers; `-0.0` keeps the double marker.
  fn write_double(&mut self, value: f64) -> Result<(), EncodeError> {
    let integral = value.fract() == 0.0
      && (INTEGER_MIN as f64..=INTEGER_MAX as f64).contains(&value)
      && !(value == 0.0 && value.is_sign_negative());
    if integral {
      return self.write_integer(value as i64);
    }
    self.write_marker(Marker::Double);
    self.writer.write_f64(value);
    Ok(())
  }

  fn write_string(&mut self, value: &str) -> Result<(), EncodeError> {
    if value.is_empty() {
      return self.writer.write_header(0, true);
    }
    if let Some(index) = self.table.string_index(value) {
      return self.writer.write_header(index, false);
    }
    self.table.add_string(value);
    self.writer.write_header(value.len(), true)?;
    self.writer.write_bytes(value.as_bytes());
    Ok(())
  }

  fn write_date(&mut self, date: AmfDate) -> Result<(), EncodeError> {
    self.write_marker(Marker::Date);
    self.table.add_object(Value::Date(date));
    self.writer.write_header(0, true)?;
    self.writer.write_f64(date.millis());
    Ok(())
  }

  fn write_byte_array(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
    self.write_marker(Marker::ByteArray);
    self.table.add_object(Value::ByteArray(bytes.to_vec()));
    self.writer.write_header(bytes.len(), true)?;
    self.writer.write_bytes(bytes);
    Ok(())
  }

  fn enter(&mut self) -> Result<(), EncodeError> {
    self.depth += 1;
    if self.depth > self.config.max_depth {
      return Err(EncodeError::DepthExceeded {
        limit: self.config.max_depth,
      });
    }
    Ok(())
  }

  fn leave(&mut self) {
    self.depth -= 1;
  }

  /// Takes the object slot for `id` and remembers which marker it went out with.
  fn register_node(&mut self, id: NodeId, marker: Marker) {
    self.write_marker(marker);
    self.table.add_object(Value::Node(id));
    self.node_markers.insert(id, marker);
  }

  fn write_node(&mut self, id: NodeId) -> Result<(), EncodeError> {
    if let (Some(index), Some(marker)) = (self.table.object_index(id), self.node_markers.get(&id).copied()) {
      self.write_marker(marker);
      return self.writer.write_header(index, false);
    }
    let graph = self.graph;
    let node = graph.get(id).ok_or(EncodeError::DanglingReference(id))?;
    self.enter()?;
    match node {
      Node::Array(values) => {
        self.register_node(id, Marker::Array);
        self.write_array_body(values)?;
      }
      Node::Map(entries) => {
        self.register_node(id, Marker::AssociativeArray);
        self.write_map_body(entries)?;
      }
      Node::Object(object) => {
        self.register_node(id, Marker::Object);
        self.write_object_body(object.traits(), object.sealed_values(), object.dynamic_fields())?;
      }
      Node::Native(native) => self.write_native(id, native)?,
    }
    self.leave();
    Ok(())
  }

  fn write_array_body(&mut self, values: &[Value]) -> Result<(), EncodeError> {
    self.writer.write_header(values.len(), true)?;
    // Dense arrays always carry an empty associative section.
    self.write_string("")?;
    for value in values {
      self.write_value(value)?;
    }
    Ok(())
  }

  fn write_map_body(&mut self, entries: &BTreeMap<String, Value>) -> Result<(), EncodeError> {
    self.writer.write_header(entries.len(), true)?;
    for (key, value) in entries {
      self.write_string(key)?;
      self.write_value(value)?;
    }
    Ok(())
  }

  fn write_object_body(
    &mut self,
    traits: &TraitInfo,
    values: &[Value],
    dynamic_fields: &[(String, Value)],
  ) -> Result<(), EncodeError> {
    if traits.is_externalizable() {
      return Err(EncodeError::unsupported_type(
        traits.class_name(),
        "externalizable objects are not supported",
      ));
    }
    if traits.property_count() != values.len() {
      return Err(EncodeError::unsupported_type(
        traits.class_name(),
        format!(
          "{} sealed value(s) for {} declared field(s)",
          values.len(),
          traits.property_count()
        ),
      ));
    }
    if !traits.is_dynamic() && !dynamic_fields.is_empty() {
      return Err(EncodeError::unsupported_type(
        traits.class_name(),
        "dynamic fields on a sealed class",
      ));
    }

    match self.table.trait_index(traits) {
      // Object inline, trait by reference.
      Some(index) => self.writer.write_u29(((index as u32) << 2) | 0b01)?,
      None => {
        self.table.add_trait(traits.clone());
        let flags = ((traits.property_count() as u32) << 4) | ((traits.is_dynamic() as u32) << 3) | 0b011;
        self.writer.write_u29(flags)?;
        self.write_string(traits.class_name())?;
        for property in traits.properties() {
          self.write_string(property)?;
        }
      }
    }

    for value in values {
      self.write_value(value)?;
    }
    if traits.is_dynamic() {
      for (name, value) in dynamic_fields {
        if name.is_empty() {
          return Err(EncodeError::unsupported_type(
            traits.class_name(),
            "dynamic field with an empty name",
          ));
        }
        self.write_string(name)?;
        self.write_value(value)?;
      }
      self.write_string("")?;
    }
    Ok(())
  }

  fn write_native(&mut self, id: NodeId, native: &Arc<dyn NativeObject>) -> Result<(), EncodeError> {
    let descriptor = native.type_descriptor();
    if descriptor.has_capability(Capability::OrderedSequence) && descriptor.has_capability(Capability::KeyValueMapping) {
      return Err(EncodeError::unsupported_type(
        descriptor.type_name(),
        "mixed dense and associative array",
      ));
    }
    let proxy = self
      .registry
      .lookup(&descriptor)
      .ok_or_else(|| EncodeError::unsupported_type(descriptor.type_name(), "no proxy registered"))?;
    let decomposed = proxy
      .decompose(native.as_ref())
      .map_err(|source| EncodeError::Proxy {
        type_name: descriptor.type_name().to_string(),
        source,
      })?;
    match decomposed {
      Decomposed::Aggregate(object) => {
        self.register_node(id, Marker::Object);
        self.write_object_body(object.traits(), object.sealed_values(), object.dynamic_fields())
      }
      Decomposed::Sequence(values) => {
        self.register_node(id, Marker::Array);
        self.write_array_body(&values)
      }
      Decomposed::Mapping(entries) => {
        self.register_node(id, Marker::AssociativeArray);
        self.write_map_body(&entries)
      }
      Decomposed::Date(date) => {
        self.register_node(id, Marker::Date);
        self.writer.write_header(0, true)?;
        self.writer.write_f64(date.millis());
        Ok(())
      }
      Decomposed::Bytes(bytes) => {
        self.register_node(id, Marker::ByteArray);
        self.writer.write_header(bytes.len(), true)?;
        self.writer.write_bytes(&bytes);
        Ok(())
      }
    }
  }
}
