//! DXF binary reader

use std::io::{self, BufRead};

use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::Encoding;

use super::stream_reader::DxfStreamReader;
use crate::error::{DxfError, Result};
use crate::io::dxf::value_parser::parse_handle;
use crate::io::dxf::{CodePair, CodeValue, GroupCodeValueType, PairOffset};

/// Sentinel opening every binary DXF file
pub const BINARY_SENTINEL: &[u8; 22] = b"AutoCAD Binary DXF\r\n\x1a\x00";

/// Escape byte announcing a 16-bit code in single-byte-code files
const EXTENDED_CODE_ESCAPE: u8 = 255;

/// DXF binary file reader
///
/// Expects the source positioned right after [`BINARY_SENTINEL`]. Values have
/// no type tags on the wire; their width follows from the group code.
pub struct DxfBinaryReader<R: BufRead> {
    reader: R,
    position: u64,
    /// Pre-AC1012 files use one-byte group codes
    single_byte_codes: bool,
    encoding: Option<&'static Encoding>,
}

impl<R: BufRead> DxfBinaryReader<R> {
    /// Create a new DXF binary reader
    pub fn new(mut reader: R) -> Result<Self> {
        // The first pair is `0 SECTION`: one-byte codes put 'S' right after
        // the zero code, two-byte codes put a second zero there.
        let opening = reader.fill_buf()?;
        let single_byte_codes =
            opening.len() >= 2 && opening[0] == 0 && (0x20..0x7F).contains(&opening[1]);

        Ok(Self {
            reader,
            position: BINARY_SENTINEL.len() as u64,
            single_byte_codes,
            encoding: None,
        })
    }

    /// Whether the file uses pre-AC1012 one-byte group codes
    pub fn uses_single_byte_codes(&self) -> bool {
        self.single_byte_codes
    }

    fn truncated(&self, code: Option<i32>, offset: PairOffset) -> impl Fn(io::Error) -> DxfError {
        let expected = match code {
            Some(code) => format!("value for group code {}", code),
            None => "group code".to_string(),
        };
        move |err| {
            if err.kind() == io::ErrorKind::UnexpectedEof {
                DxfError::UnexpectedEndOfStream {
                    expected: expected.clone(),
                    offset,
                }
            } else {
                DxfError::Io(err)
            }
        }
    }

    fn read_code(&mut self, offset: PairOffset) -> Result<Option<i32>> {
        let mut first = [0u8; 1];
        if self.reader.read(&mut first)? == 0 {
            return Ok(None);
        }
        self.position += 1;

        let code = if self.single_byte_codes {
            if first[0] == EXTENDED_CODE_ESCAPE {
                let code = self
                    .reader
                    .read_i16::<LittleEndian>()
                    .map_err(self.truncated(None, offset))?;
                self.position += 2;
                i32::from(code)
            } else {
                i32::from(first[0])
            }
        } else {
            let high = self.reader.read_u8().map_err(self.truncated(None, offset))?;
            self.position += 1;
            i32::from(i16::from_le_bytes([first[0], high]))
        };
        Ok(Some(code))
    }

    fn read_terminated(&mut self, code: i32, offset: PairOffset) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.reader.read_until(0, &mut bytes)?;
        self.position += bytes.len() as u64;
        if bytes.pop() != Some(0) {
            return Err(self.truncated(Some(code), offset)(io::ErrorKind::UnexpectedEof.into()));
        }
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> String {
        match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => match self.encoding {
                Some(encoding) => encoding.decode_without_bom_handling(bytes).0.into_owned(),
                None => String::from_utf8_lossy(bytes).into_owned(),
            },
        }
    }

    fn read_value(&mut self, code: i32, offset: PairOffset) -> Result<CodeValue> {
        let eof = self.truncated(Some(code), offset);
        let value = match GroupCodeValueType::from_raw_code(code) {
            GroupCodeValueType::String | GroupCodeValueType::None => {
                let bytes = self.read_terminated(code, offset)?;
                CodeValue::Str(self.decode(&bytes))
            }
            GroupCodeValueType::Handle => {
                let bytes = self.read_terminated(code, offset)?;
                let text = self.decode(&bytes);
                let handle = parse_handle(&text).ok_or(DxfError::InvalidValue {
                    code,
                    text,
                    offset,
                })?;
                CodeValue::Handle(handle)
            }
            GroupCodeValueType::Double => {
                self.position += 8;
                CodeValue::Double(self.reader.read_f64::<LittleEndian>().map_err(eof)?)
            }
            GroupCodeValueType::Int16 | GroupCodeValueType::Byte => {
                self.position += 2;
                CodeValue::Integer(self.reader.read_i16::<LittleEndian>().map_err(eof)?.into())
            }
            GroupCodeValueType::Int32 => {
                self.position += 4;
                CodeValue::Integer(self.reader.read_i32::<LittleEndian>().map_err(eof)?.into())
            }
            GroupCodeValueType::Int64 => {
                self.position += 8;
                CodeValue::Integer(self.reader.read_i64::<LittleEndian>().map_err(eof)?)
            }
            GroupCodeValueType::Bool => {
                self.position += 1;
                match self.reader.read_u8().map_err(eof)? {
                    0 => CodeValue::Bool(false),
                    1 => CodeValue::Bool(true),
                    other => CodeValue::Integer(other.into()),
                }
            }
            GroupCodeValueType::BinaryData => {
                let length = self.reader.read_u8().map_err(&eof)? as usize;
                let mut data = vec![0u8; length];
                self.reader.read_exact(&mut data).map_err(eof)?;
                self.position += 1 + length as u64;
                CodeValue::Binary(data)
            }
        };
        Ok(value)
    }
}

impl<R: BufRead> DxfStreamReader for DxfBinaryReader<R> {
    fn read_pair(&mut self) -> Result<Option<CodePair>> {
        let offset = PairOffset::Byte(self.position);
        let code = match self.read_code(offset)? {
            Some(code) => code,
            None => return Ok(None),
        };
        let value = self.read_value(code, offset)?;
        Ok(Some(CodePair {
            code,
            value,
            offset,
        }))
    }

    fn position(&self) -> PairOffset {
        PairOffset::Byte(self.position)
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}
