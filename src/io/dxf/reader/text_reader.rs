//! DXF ASCII text reader

use std::io::BufRead;

use encoding_rs::Encoding;

use super::stream_reader::DxfStreamReader;
use crate::error::{DxfError, Result};
use crate::io::dxf::value_parser::{
    parse_code, parse_handle, parse_hex_bytes, parse_integer, parse_real,
};
use crate::io::dxf::{CodePair, CodeValue, GroupCodeValueType, PairOffset};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// DXF ASCII text file reader
///
/// Each pair is two lines: the group code, then the value. Lines end in LF
/// or CRLF.
pub struct DxfTextReader<R: BufRead> {
    reader: R,
    line_number: usize,
    /// Code page for non-UTF-8 bytes. `None` means Latin-1 (byte-to-char).
    encoding: Option<&'static Encoding>,
}

impl<R: BufRead> DxfTextReader<R> {
    /// Create a new DXF text reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            encoding: None,
        }
    }

    /// Read a single line without its terminator.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut bytes = Vec::new();
        if self.reader.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        while matches!(bytes.last(), Some(b'\n') | Some(b'\r')) {
            bytes.pop();
        }
        let mut line: &[u8] = &bytes;
        if self.line_number == 1 {
            line = line.strip_prefix(UTF8_BOM).unwrap_or(line);
        }
        Ok(Some(self.decode(line)))
    }

    fn decode(&self, bytes: &[u8]) -> String {
        match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => match self.encoding {
                Some(encoding) => encoding.decode_without_bom_handling(bytes).0.into_owned(),
                None => bytes.iter().map(|&b| b as char).collect(),
            },
        }
    }
}

/// Decode a value line according to the value kind of `code`.
pub(crate) fn decode_text_value(code: i32, text: &str, offset: PairOffset) -> Result<CodeValue> {
    let invalid = || DxfError::InvalidValue {
        code,
        text: text.to_string(),
        offset,
    };
    let value = match GroupCodeValueType::from_raw_code(code) {
        GroupCodeValueType::String | GroupCodeValueType::None => CodeValue::Str(unescape(text)),
        GroupCodeValueType::Double => CodeValue::Double(parse_real(text).ok_or_else(invalid)?),
        GroupCodeValueType::Byte
        | GroupCodeValueType::Int16
        | GroupCodeValueType::Int32
        | GroupCodeValueType::Int64 => CodeValue::Integer(parse_integer(text).ok_or_else(invalid)?),
        GroupCodeValueType::Bool => match parse_integer(text).ok_or_else(invalid)? {
            0 => CodeValue::Bool(false),
            1 => CodeValue::Bool(true),
            other => CodeValue::Integer(other),
        },
        GroupCodeValueType::Handle => CodeValue::Handle(parse_handle(text).ok_or_else(invalid)?),
        GroupCodeValueType::BinaryData => CodeValue::Binary(parse_hex_bytes(text).ok_or_else(invalid)?),
    };
    Ok(value)
}

/// Undo caret escapes: `^J` is a line feed, `^ ` a literal caret.
pub(crate) fn unescape(text: &str) -> String {
    if !text.contains('^') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '^' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some(' ') => {
                chars.next();
                out.push('^');
            }
            Some(next @ '@'..='_') => {
                chars.next();
                out.push(char::from(next as u8 - 0x40));
            }
            _ => out.push('^'),
        }
    }
    out
}

impl<R: BufRead> DxfStreamReader for DxfTextReader<R> {
    fn read_pair(&mut self) -> Result<Option<CodePair>> {
        let code_line = match self.read_line()? {
            Some(line) => line,
            None => return Ok(None),
        };
        let offset = PairOffset::Line(self.line_number);

        // trailing blank lines after EOF are tolerated
        if code_line.trim().is_empty() {
            let mut rest = Vec::new();
            self.reader.read_to_end(&mut rest)?;
            if rest.iter().all(|b| b.is_ascii_whitespace()) {
                return Ok(None);
            }
        }

        let code = parse_code(&code_line).ok_or_else(|| DxfError::InvalidCode {
            text: code_line.clone(),
            offset,
        })?;

        let value_line = self.read_line()?.ok_or_else(|| DxfError::UnexpectedEndOfStream {
            expected: format!("value for group code {}", code),
            offset,
        })?;

        let value = decode_text_value(code, &value_line, offset)?;
        Ok(Some(CodePair {
            code,
            value,
            offset,
        }))
    }

    fn position(&self) -> PairOffset {
        PairOffset::Line(self.line_number + 1)
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}
