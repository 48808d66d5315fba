use std::collections::BTreeMap;

use crate::codec::byte_reader::ByteReader;
use crate::codec::{CodecConfig, MalformedStream, Marker, ReferenceKind, ReferenceTable, ENVELOPE_VERSION};
use crate::envelope::{ActionMessage, MessageBody, MessageHeader};
use crate::registry::{Capability, ProxyRegistry};
use crate::value::{AmfDate, Node, NodeId, ObjectGraph, RootedValue, TraitInfo, TypedObject, Value};

/// Decodes a complete message.
pub fn decode(bytes: &[u8], registry: &ProxyRegistry) -> Result<(ActionMessage, ReferenceTable), MalformedStream> {
  decode_with_config(bytes, registry, CodecConfig::default())
}

pub fn decode_with_config(
  bytes: &[u8],
  registry: &ProxyRegistry,
  config: CodecConfig,
) -> Result<(ActionMessage, ReferenceTable), MalformedStream> {
  let mut decoder = Decoder::new(bytes, registry, config);
  let message = decoder.read_message()?;
  let table = decoder.finish()?;
  tracing::debug!("decoded {}: {}", message, table);
  Ok((message, table))
}

/// Decodes a single value without envelope framing.
pub fn decode_value(
  bytes: &[u8],
  registry: &ProxyRegistry,
  config: CodecConfig,
) -> Result<(RootedValue, ReferenceTable), MalformedStream> {
  let mut decoder = Decoder::new(bytes, registry, config);
  let root = decoder.read_value()?;
  let graph = std::mem::take(&mut decoder.graph);
  let table = decoder.finish()?;
  Ok((RootedValue::new(graph, root), table))
}

enum Header {
  Reference(usize),
  Inline(u32),
}

/// Stateful reader for one transcode.
#[derive(Debug)]
pub struct Decoder<'a> {
  reader: ByteReader<'a>,
  registry: &'a ProxyRegistry,
  config: CodecConfig,
  table: ReferenceTable,
  graph: ObjectGraph,
  depth: usize,
}

impl<'a> Decoder<'a> {
  pub fn new(bytes: &'a [u8], registry: &'a ProxyRegistry, config: CodecConfig) -> Self {
    Self {
      reader: ByteReader::new(bytes),
      registry,
      config,
      table: ReferenceTable::new(),
      graph: ObjectGraph::new(),
      depth: 0,
    }
  }

  pub fn position(&self) -> usize {
    self.reader.position()
  }

  /// Fails if unread bytes remain, otherwise hands back the reference table.
  pub fn finish(self) -> Result<ReferenceTable, MalformedStream> {
    let remaining = self.reader.remaining();
    if remaining > 0 {
      return Err(MalformedStream::TrailingBytes {
        offset: self.reader.position(),
        remaining,
      });
    }
    Ok(self.table)
  }

  pub fn read_message(&mut self) -> Result<ActionMessage, MalformedStream> {
    let offset = self.reader.position();
    let version = self.reader.read_u16()?;
    if version != ENVELOPE_VERSION {
      return Err(MalformedStream::UnsupportedVersion { offset, version });
    }

    let header_count = self.reader.read_u16()?;
    let mut headers = Vec::with_capacity((header_count as usize).min(self.reader.remaining()));
    for _ in 0..header_count {
      let name = self.reader.read_utf8()?;
      let must_understand = self.reader.read_u8()? != 0;
      let value = self.read_value()?;
      headers.push(MessageHeader::new(name, must_understand, value));
    }

    let body_count = self.reader.read_u16()?;
    let mut bodies = Vec::with_capacity((body_count as usize).min(self.reader.remaining()));
    for _ in 0..body_count {
      let offset = self.reader.position();
      let tag = self.reader.read_u8()?;
      if tag != u8::from(Marker::BodyTag) {
        return Err(MalformedStream::MissingBodyTag { offset, found: tag });
      }
      let target_uri = self.reader.read_utf8()?;
      let response_uri = self.reader.read_utf8()?;
      let data = self.read_value()?;
      bodies.push(MessageBody::new(target_uri, response_uri, data));
    }

    let graph = std::mem::take(&mut self.graph);
    Ok(ActionMessage::from_parts(version, headers, bodies, graph))
  }

  pub fn read_value(&mut self) -> Result<Value, MalformedStream> {
    let offset = self.reader.position();
    let byte = self.reader.read_u8()?;
    let marker = Marker::try_from(byte).map_err(|_| MalformedStream::UnknownMarker { offset, marker: byte })?;
    match marker {
      Marker::Undefined => Ok(Value::Undefined),
      Marker::Null => Ok(Value::Null),
      Marker::False => Ok(Value::Boolean(false)),
      Marker::True => Ok(Value::Boolean(true)),
      Marker::Integer => self.reader.read_i29().map(Value::Integer),
      Marker::Double => self.reader.read_f64().map(Value::Double),
      Marker::String => self.read_string().map(Value::String),
      Marker::XmlDocument | Marker::Xml => self.read_xml(),
      Marker::Date => self.read_date(),
      Marker::ByteArray => self.read_byte_array(),
      Marker::Array => self.read_array(offset),
      Marker::AssociativeArray => self.read_associative_array(offset),
      Marker::Object => self.read_object(offset),
      Marker::BodyTag => Err(MalformedStream::UnexpectedBodyTag { offset }),
    }
  }

  fn enter(&mut self, offset: usize) -> Result<(), MalformedStream> {
    self.depth += 1;
    if self.depth > self.config.max_depth {
      return Err(MalformedStream::DepthExceeded {
        offset,
        limit: self.config.max_depth,
      });
    }
    Ok(())
  }

  fn leave(&mut self) {
    self.depth -= 1;
  }

  fn read_header(&mut self) -> Result<Header, MalformedStream> {
    let header = self.reader.read_u29()?;
    if header & 1 == 0 {
      Ok(Header::Reference((header >> 1) as usize))
    } else {
      Ok(Header::Inline(header >> 1))
    }
  }

  fn object_at(&self, offset: usize, index: usize) -> Result<Value, MalformedStream> {
    self
      .table
      .object(index)
      .cloned()
      .ok_or(MalformedStream::InvalidReference {
        offset,
        kind: ReferenceKind::Object,
        index,
      })
  }

  fn read_string(&mut self) -> Result<String, MalformedStream> {
    let offset = self.reader.position();
    match self.read_header()? {
      Header::Reference(index) => self
        .table
        .string(index)
        .map(str::to_string)
        .ok_or(MalformedStream::InvalidReference {
          offset,
          kind: ReferenceKind::String,
          index,
        }),
      Header::Inline(len) => {
        let bytes = self.reader.read_bytes(len as usize)?;
        let value = std::str::from_utf8(bytes).map_err(|_| MalformedStream::InvalidUtf8 { offset })?;
        self.table.add_string(value);
        Ok(value.to_string())
      }
    }
  }

  fn read_xml(&mut self) -> Result<Value, MalformedStream> {
    let offset = self.reader.position();
    match self.read_header()? {
      Header::Reference(index) => self.object_at(offset, index),
      Header::Inline(len) => {
        let bytes = self.reader.read_bytes(len as usize)?;
        let text = std::str::from_utf8(bytes).map_err(|_| MalformedStream::InvalidUtf8 { offset })?;
        let value = Value::Xml(text.to_string());
        self.table.add_object(value.clone());
        Ok(value)
      }
    }
  }

  fn read_date(&mut self) -> Result<Value, MalformedStream> {
    let offset = self.reader.position();
    match self.read_header()? {
      Header::Reference(index) => self.object_at(offset, index),
      Header::Inline(_) => {
        let value = Value::Date(AmfDate::from_millis(self.reader.read_f64()?));
        self.table.add_object(value.clone());
        Ok(value)
      }
    }
  }

  fn read_byte_array(&mut self) -> Result<Value, MalformedStream> {
    let offset = self.reader.position();
    match self.read_header()? {
      Header::Reference(index) => self.object_at(offset, index),
      Header::Inline(len) => {
        let value = Value::ByteArray(self.reader.read_bytes(len as usize)?.to_vec());
        self.table.add_object(value.clone());
        Ok(value)
      }
    }
  }

  /// Reserves a graph slot and registers it in the object table before any child is read, so
  /// children can refer back to their parent.
  fn reserve_slot(&mut self) -> NodeId {
    let id = self.graph.reserve();
    self.table.add_object(Value::Node(id));
    id
  }

  fn read_array(&mut self, offset: usize) -> Result<Value, MalformedStream> {
    let header_offset = self.reader.position();
    let dense_len = match self.read_header()? {
      Header::Reference(index) => return self.object_at(header_offset, index),
      Header::Inline(len) => len as usize,
    };
    self.enter(offset)?;
    let id = self.reserve_slot();

    let mut associative = BTreeMap::new();
    loop {
      let key = self.read_string()?;
      if key.is_empty() {
        break;
      }
      let value = self.read_value()?;
      associative.insert(key, value);
    }

    let node = if associative.is_empty() {
      let mut values = Vec::with_capacity(dense_len.min(self.reader.remaining()));
      for _ in 0..dense_len {
        values.push(self.read_value()?);
      }
      Node::Array(values)
    } else if dense_len == 0 {
      Node::Map(associative)
    } else {
      return Err(MalformedStream::MixedArray { offset });
    };
    self.graph.replace(id, node);
    self.leave();
    Ok(Value::Node(id))
  }

  fn read_associative_array(&mut self, offset: usize) -> Result<Value, MalformedStream> {
    let header_offset = self.reader.position();
    let count = match self.read_header()? {
      Header::Reference(index) => return self.object_at(header_offset, index),
      Header::Inline(count) => count,
    };
    self.enter(offset)?;
    let id = self.reserve_slot();
    let mut entries = BTreeMap::new();
    for _ in 0..count {
      let key = self.read_string()?;
      let value = self.read_value()?;
      entries.insert(key, value);
    }
    self.graph.replace(id, Node::Map(entries));
    self.leave();
    Ok(Value::Node(id))
  }

  fn read_traits(&mut self, offset: usize, header: u32) -> Result<TraitInfo, MalformedStream> {
    if header & 1 == 0 {
      let index = (header >> 1) as usize;
      return self.table.trait_at(index).cloned().ok_or(MalformedStream::InvalidReference {
        offset,
        kind: ReferenceKind::Trait,
        index,
      });
    }
    let flags = header >> 1;
    let externalizable = flags & 0b01 != 0;
    let dynamic = flags & 0b10 != 0;
    let sealed_count = (flags >> 2) as usize;
    let class_name = self.read_string()?;
    if externalizable {
      return Err(MalformedStream::ExternalizableTrait { offset, class_name });
    }
    let mut properties = Vec::with_capacity(sealed_count.min(self.reader.remaining()));
    for _ in 0..sealed_count {
      properties.push(self.read_string()?);
    }
    let traits = TraitInfo::new(class_name, properties, dynamic);
    self.table.add_trait(traits.clone());
    Ok(traits)
  }

  fn read_object(&mut self, offset: usize) -> Result<Value, MalformedStream> {
    let header_offset = self.reader.position();
    let header = match self.read_header()? {
      Header::Reference(index) => return self.object_at(header_offset, index),
      Header::Inline(header) => header,
    };
    self.enter(offset)?;
    let traits = self.read_traits(header_offset, header)?;
    let id = self.reserve_slot();

    let mut values = Vec::with_capacity(traits.property_count().min(self.reader.remaining()));
    for _ in 0..traits.property_count() {
      values.push(self.read_value()?);
    }
    let mut dynamic_fields = Vec::new();
    if traits.is_dynamic() {
      loop {
        let name = self.read_string()?;
        if name.is_empty() {
          break;
        }
        let value = self.read_value()?;
        dynamic_fields.push((name, value));
      }
    }

    let node = self.recompose(offset, traits, values, dynamic_fields)?;
    self.graph.replace(id, node);
    self.leave();
    Ok(Value::Node(id))
  }

  fn recompose(
    &self,
    offset: usize,
    traits: TraitInfo,
    values: Vec<Value>,
    dynamic_fields: Vec<(String, Value)>,
  ) -> Result<Node, MalformedStream> {
    let proxy = if traits.is_anonymous() {
      None
    } else {
      self
        .registry
        .lookup_type_name(traits.class_name())
        .or_else(|| self.registry.lookup_capability(Capability::NamedAggregate))
    };
    match proxy {
      Some(proxy) => proxy
        .recompose(&traits, values, dynamic_fields)
        .map_err(|source| MalformedStream::RecomposeFailed { offset, source }),
      None => Ok(Node::Object(TypedObject::from_parts(traits, values, dynamic_fields))),
    }
  }
}
