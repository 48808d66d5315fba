use crate::codec::MalformedStream;

/// Cursor over an input buffer; all multi-byte numbers are big-endian.
#[derive(Debug)]
pub(crate) struct ByteReader<'a> {
  bytes: &'a [u8],
  position: usize,
}

impl<'a> ByteReader<'a> {
  pub(crate) fn new(bytes: &'a [u8]) -> Self {
    Self { bytes, position: 0 }
  }

  pub(crate) fn position(&self) -> usize {
    self.position
  }

  pub(crate) fn remaining(&self) -> usize {
    self.bytes.len() - self.position
  }

  pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], MalformedStream> {
    if self.remaining() < len {
      return Err(MalformedStream::Truncated {
        offset: self.position,
        needed: len - self.remaining(),
      });
    }
    let slice = &self.bytes[self.position..self.position + len];
    self.position += len;
    Ok(slice)
  }

  pub(crate) fn read_u8(&mut self) -> Result<u8, MalformedStream> {
    self.read_bytes(1).map(|b| b[0])
  }

  pub(crate) fn read_u16(&mut self) -> Result<u16, MalformedStream> {
    let bytes = self.read_bytes(2)?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
  }

  pub(crate) fn read_f64(&mut self) -> Result<f64, MalformedStream> {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(self.read_bytes(8)?);
    Ok(f64::from_be_bytes(buf))
  }

  /// Variable-length unsigned 29-bit integer: up to three 7-bit groups with a continuation bit,
  /// then one full byte.
  pub(crate) fn read_u29(&mut self) -> Result<u32, MalformedStream> {
    let mut result = 0u32;
    for _ in 0..3 {
      let byte = self.read_u8()?;
      if byte & 0x80 == 0 {
        return Ok((result << 7) | byte as u32);
      }
      result = (result << 7) | (byte & 0x7F) as u32;
    }
    let byte = self.read_u8()?;
    Ok((result << 8) | byte as u32)
  }

  pub(crate) fn read_i29(&mut self) -> Result<i64, MalformedStream> {
    let raw = self.read_u29()? as i64;
    if raw & 0x1000_0000 != 0 {
      Ok(raw - (1 << 29))
    } else {
      Ok(raw)
    }
  }

  /// Envelope string: u16 length followed by UTF-8 bytes.
  pub(crate) fn read_utf8(&mut self) -> Result<String, MalformedStream> {
    let offset = self.position;
    let len = self.read_u16()? as usize;
    let bytes = self.read_bytes(len)?;
    std::str::from_utf8(bytes)
      .map(str::to_string)
      .map_err(|_| MalformedStream::InvalidUtf8 { offset })
  }
}
