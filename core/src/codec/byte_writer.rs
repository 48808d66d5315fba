use crate::codec::{EncodeError, U29_MAX};

#[derive(Debug, Default)]
pub(crate) struct ByteWriter {
  buffer: Vec<u8>,
}

impl ByteWriter {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn len(&self) -> usize {
    self.buffer.len()
  }

  pub(crate) fn into_bytes(self) -> Vec<u8> {
    self.buffer
  }

  pub(crate) fn write_u8(&mut self, value: u8) {
    self.buffer.push(value);
  }

  pub(crate) fn write_u16(&mut self, value: u16) {
    self.buffer.extend_from_slice(&value.to_be_bytes());
  }

  pub(crate) fn write_f64(&mut self, value: f64) {
    self.buffer.extend_from_slice(&value.to_be_bytes());
  }

  pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
    self.buffer.extend_from_slice(bytes);
  }

  pub(crate) fn write_u29(&mut self, value: u32) -> Result<(), EncodeError> {
    match value {
      0..=0x7F => self.write_u8(value as u8),
      0x80..=0x3FFF => {
        self.write_u8(((value >> 7) | 0x80) as u8);
        self.write_u8((value & 0x7F) as u8);
      }
      0x4000..=0x1F_FFFF => {
        self.write_u8(((value >> 14) | 0x80) as u8);
        self.write_u8((((value >> 7) & 0x7F) | 0x80) as u8);
        self.write_u8((value & 0x7F) as u8);
      }
      0x20_0000..=U29_MAX => {
        self.write_u8((((value >> 22) & 0x7F) | 0x80) as u8);
        self.write_u8((((value >> 15) & 0x7F) | 0x80) as u8);
        self.write_u8((((value >> 8) & 0x7F) | 0x80) as u8);
        self.write_u8((value & 0xFF) as u8);
      }
      _ => {
        return Err(EncodeError::LengthOverflow {
          length: value as usize,
          limit: U29_MAX as usize,
        })
      }
    }
    Ok(())
  }

  /// Writes `value` as a signed 29-bit integer; the caller checks the range.
  pub(crate) fn write_i29(&mut self, value: i64) -> Result<(), EncodeError> {
    self.write_u29((value as u32) & U29_MAX)
  }

  /// Reference header: `(payload << 1) | inline`.
  pub(crate) fn write_header(&mut self, payload: usize, inline: bool) -> Result<(), EncodeError> {
    let limit = (U29_MAX >> 1) as usize;
    if payload > limit {
      return Err(EncodeError::LengthOverflow { length: payload, limit });
    }
    self.write_u29(((payload as u32) << 1) | inline as u32)
  }

  pub(crate) fn write_utf8(&mut self, value: &str) -> Result<(), EncodeError> {
    let len = u16::try_from(value.len()).map_err(|_| EncodeError::LengthOverflow {
      length: value.len(),
      limit: u16::MAX as usize,
    })?;
    self.write_u16(len);
    self.write_bytes(value.as_bytes());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use rstest::rstest;

  use super::*;
  use crate::codec::byte_reader::ByteReader;
  use crate::codec::MalformedStream;

  #[rstest]
  #[case(0, vec![0x00])]
  #[case(0x7F, vec![0x7F])]
  #[case(0x80, vec![0x81, 0x00])]
  #[case(0x3FFF, vec![0xFF, 0x7F])]
  #[case(0x4000, vec![0x81, 0x80, 0x00])]
  #[case(0x1F_FFFF, vec![0xFF, 0xFF, 0x7F])]
  #[case(0x20_0000, vec![0x80, 0xC0, 0x80, 0x00])]
  #[case(U29_MAX, vec![0xFF, 0xFF, 0xFF, 0xFF])]
  fn test_u29_boundaries(#[case] value: u32, #[case] expected: Vec<u8>) {
    let mut writer = ByteWriter::new();
    writer.write_u29(value).unwrap();
    let bytes = writer.into_bytes();
    assert_eq!(bytes, expected);
    assert_eq!(ByteReader::new(&bytes).read_u29().unwrap(), value);
  }

  #[rstest]
  #[case(-1)]
  #[case(-(1 << 28))]
  #[case((1 << 28) - 1)]
  fn test_i29_sign_extension(#[case] value: i64) {
    let mut writer = ByteWriter::new();
    writer.write_i29(value).unwrap();
    let bytes = writer.into_bytes();
    assert_eq!(ByteReader::new(&bytes).read_i29().unwrap(), value);
  }

  #[test]
  fn test_u29_overflow_is_rejected() {
    let mut writer = ByteWriter::new();
    assert!(matches!(
      writer.write_u29(U29_MAX + 1),
      Err(EncodeError::LengthOverflow { .. })
    ));
  }

  #[test]
  fn test_truncated_read_reports_offset() {
    let mut reader = ByteReader::new(&[0x81]);
    assert_eq!(
      reader.read_u29(),
      Err(MalformedStream::Truncated { offset: 1, needed: 1 })
    );
  }
}
