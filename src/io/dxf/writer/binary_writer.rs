//! Binary DXF writer

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use encoding_rs::Encoding;

use super::stream_writer::{value_text, DxfStreamWriter};
use crate::error::{DxfError, Result};
use crate::io::dxf::reader::BINARY_SENTINEL;
use crate::io::dxf::{CodePair, CodeValue, GroupCodeValueType};
use crate::types::DxfVersion;

/// Escape byte announcing a 16-bit code in single-byte-code files
const EXTENDED_CODE_ESCAPE: u8 = 255;

/// Binary DXF stream writer
///
/// Value widths follow the group code, whatever variant the pair holds.
pub struct DxfBinaryWriter<W: Write> {
    writer: W,
    /// Pre-AC1012 files use one-byte group codes
    single_byte_codes: bool,
    encoding: Option<&'static Encoding>,
}

impl<W: Write> DxfBinaryWriter<W> {
    /// Create a new binary DXF writer for a file at `version`; writes the
    /// sentinel.
    pub fn new(mut writer: W, version: DxfVersion) -> Result<Self> {
        writer.write_all(BINARY_SENTINEL)?;
        Ok(Self {
            writer,
            single_byte_codes: version < DxfVersion::AC1012,
            encoding: None,
        })
    }

    pub fn set_encoding(&mut self, encoding: Option<&'static Encoding>) {
        self.encoding = encoding;
    }

    /// Get the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_code(&mut self, code: i32) -> Result<()> {
        let wide = i16::try_from(code).map_err(|_| DxfError::Custom(format!("group code {} out of range", code)))?;
        if self.single_byte_codes {
            match u8::try_from(code) {
                Ok(byte) if byte != EXTENDED_CODE_ESCAPE => self.writer.write_u8(byte)?,
                _ => {
                    self.writer.write_u8(EXTENDED_CODE_ESCAPE)?;
                    self.writer.write_i16::<LittleEndian>(wide)?;
                }
            }
        } else {
            self.writer.write_i16::<LittleEndian>(wide)?;
        }
        Ok(())
    }

    /// Write a NUL-terminated string
    fn write_null_string(&mut self, value: &str) -> Result<()> {
        match self.encoding {
            Some(encoding) => {
                let (bytes, _, _) = encoding.encode(value);
                self.writer.write_all(&bytes)?;
            }
            None => self.writer.write_all(value.as_bytes())?,
        }
        self.writer.write_u8(0)?;
        Ok(())
    }
}

impl<W: Write> DxfStreamWriter for DxfBinaryWriter<W> {
    fn write_pair(&mut self, pair: &CodePair) -> Result<()> {
        self.write_code(pair.code)?;
        let value = &pair.value;
        match GroupCodeValueType::from_raw_code(pair.code) {
            GroupCodeValueType::String | GroupCodeValueType::None | GroupCodeValueType::Handle => {
                let text = value_text(value);
                self.write_null_string(&text)?;
            }
            GroupCodeValueType::Double => self.writer.write_f64::<LittleEndian>(value.to_f64())?,
            // byte codes are 16 bits wide on the wire
            GroupCodeValueType::Int16 | GroupCodeValueType::Byte => {
                self.writer.write_i16::<LittleEndian>(value.to_i16())?
            }
            GroupCodeValueType::Int32 => self.writer.write_i32::<LittleEndian>(value.to_i32())?,
            GroupCodeValueType::Int64 => self.writer.write_i64::<LittleEndian>(value.to_i64())?,
            GroupCodeValueType::Bool => {
                let byte = match value {
                    CodeValue::Integer(i) => *i as u8,
                    other => u8::from(other.to_bool()),
                };
                self.writer.write_u8(byte)?;
            }
            GroupCodeValueType::BinaryData => {
                let data: &[u8] = match value {
                    CodeValue::Binary(data) => data,
                    _ => &[],
                };
                let length = u8::try_from(data.len()).map_err(|_| {
                    DxfError::Custom(format!(
                        "binary chunk of {} bytes too long for group code {}",
                        data.len(),
                        pair.code
                    ))
                })?;
                self.writer.write_u8(length)?;
                self.writer.write_all(data)?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::dxf::reader::{DxfBinaryReader, DxfStreamReader};
    use crate::types::Handle;
    use std::io::Cursor;

    const SENTINEL_LEN: usize = BINARY_SENTINEL.len();

    fn render(pairs: &[CodePair], version: DxfVersion) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer = DxfBinaryWriter::new(&mut buf, version).unwrap();
            writer.write_pairs(pairs).unwrap();
        }
        buf
    }

    #[test]
    fn test_binary_sentinel() {
        let buf = render(&[], DxfVersion::AC1015);
        assert_eq!(buf, BINARY_SENTINEL.to_vec());
    }

    #[test]
    fn test_write_string() {
        let buf = render(&[CodePair::new(0, "LINE")], DxfVersion::AC1015);
        assert_eq!(buf[SENTINEL_LEN..SENTINEL_LEN + 2], [0, 0]);
        assert_eq!(&buf[SENTINEL_LEN + 2..SENTINEL_LEN + 6], b"LINE");
        assert_eq!(buf[SENTINEL_LEN + 6], 0);
    }

    #[test]
    fn test_value_widths_follow_code() {
        let buf = render(
            &[
                CodePair::new(10, 1.5),
                CodePair::new(62, 7i16),
                CodePair::new(280, 1i16),
                CodePair::new(90, 70000i32),
                CodePair::new(290, true),
            ],
            DxfVersion::AC1015,
        );
        let body = &buf[SENTINEL_LEN..];
        assert_eq!(body[0..2], [10, 0]);
        assert_eq!(body[2..10], 1.5f64.to_le_bytes());
        assert_eq!(body[10..12], [62, 0]);
        assert_eq!(body[12..14], [7, 0]);
        assert_eq!(body[14..16], 280i16.to_le_bytes());
        assert_eq!(body[16..18], [1, 0]);
        assert_eq!(body[18..20], [90, 0]);
        assert_eq!(body[20..24], 70000i32.to_le_bytes());
        assert_eq!(body[24..26], 290i16.to_le_bytes());
        assert_eq!(body[26], 1);
        assert_eq!(body.len(), 27);
    }

    #[test]
    fn test_single_byte_codes_before_r13() {
        let buf = render(&[CodePair::new(0, "SECTION"), CodePair::new(1001, "ACAD")], DxfVersion::AC1009);
        let body = &buf[SENTINEL_LEN..];
        assert_eq!(body[0], 0);
        assert_eq!(&body[1..9], b"SECTION\0");
        assert_eq!(body[9], EXTENDED_CODE_ESCAPE);
        assert_eq!(body[10..12], 1001i16.to_le_bytes());
    }

    #[test]
    fn test_reads_back() {
        let pairs = vec![
            CodePair::new(0, "SECTION"),
            CodePair::new(5, "1F"),
            CodePair::new(330, Handle::new(0x2)),
            CodePair::new(310, vec![1u8, 2, 3]),
            CodePair::new(160, 1i64 << 40),
            CodePair::new(1071, 12i32),
        ];
        for version in [DxfVersion::AC1009, DxfVersion::AC1015] {
            let buf = render(&pairs, version);
            let mut reader = DxfBinaryReader::new(Cursor::new(buf[SENTINEL_LEN..].to_vec())).unwrap();
            let mut back = Vec::new();
            while let Some(pair) = reader.read_pair().unwrap() {
                back.push(pair);
            }
            assert_eq!(back, pairs);
        }
    }
}
