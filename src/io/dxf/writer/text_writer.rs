//! ASCII DXF writer

use std::borrow::Cow;
use std::io::Write;

use encoding_rs::Encoding;

use super::stream_writer::{value_text, DxfStreamWriter};
use crate::error::Result;
use crate::io::dxf::{CodePair, CodeValue};

/// ASCII DXF stream writer
pub struct DxfTextWriter<W: Write> {
    writer: W,
    /// Code page for strings; `None` writes UTF-8
    encoding: Option<&'static Encoding>,
}

impl<W: Write> DxfTextWriter<W> {
    /// Create a new ASCII DXF writer
    pub fn new(writer: W) -> Self {
        Self { writer, encoding: None }
    }

    pub fn set_encoding(&mut self, encoding: Option<&'static Encoding>) {
        self.encoding = encoding;
    }

    /// Get the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        match self.encoding {
            Some(encoding) => {
                let (bytes, _, _) = encoding.encode(text);
                self.writer.write_all(&bytes)?;
            }
            None => self.writer.write_all(text.as_bytes())?,
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Apply caret escapes: control characters become `^` plus a letter, a
/// literal caret becomes `^ `.
pub(crate) fn escape(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| c == '^' || c.is_ascii_control()) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        match c {
            '^' => out.push_str("^ "),
            c if c.is_ascii_control() && (c as u8) < 0x20 => {
                out.push('^');
                out.push(char::from(c as u8 + 0x40));
            }
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

impl<W: Write> DxfStreamWriter for DxfTextWriter<W> {
    fn write_pair(&mut self, pair: &CodePair) -> Result<()> {
        // right-aligned in a 3-character field
        self.write_line(&format!("{:>3}", pair.code))?;
        match &pair.value {
            CodeValue::Str(s) => {
                let escaped = escape(s);
                self.write_line(&escaped)
            }
            other => {
                let text = value_text(other);
                self.write_line(&text)
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::dxf::reader::text_reader::unescape;
    use crate::types::Handle;

    fn render(pairs: &[CodePair]) -> String {
        let mut buf = Vec::new();
        {
            let mut writer = DxfTextWriter::new(&mut buf);
            writer.write_pairs(pairs).unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_string() {
        assert_eq!(render(&[CodePair::new(0, "LINE")]), "  0\nLINE\n");
    }

    #[test]
    fn test_write_code_formatting() {
        let output = render(&[
            CodePair::new(5, Handle::new(0x100)),
            CodePair::new(62, 7i16),
            CodePair::new(100, "AcDbEntity"),
            CodePair::new(1001, "ACAD"),
        ]);
        assert_eq!(output, "  5\n100\n 62\n7\n100\nAcDbEntity\n1001\nACAD\n");
    }

    #[test]
    fn test_write_reals() {
        let output = render(&[CodePair::new(10, 1.0), CodePair::new(20, 0.1), CodePair::new(40, 1e-7)]);
        assert_eq!(output, " 10\n1.0\n 20\n0.1\n 40\n0.0000001\n");
    }

    #[test]
    fn test_caret_escapes() {
        let text = "line one\nline two ^ caret\ttab";
        let escaped = escape(text);
        assert_eq!(escaped, "line one^Jline two ^  caret^Itab");
        assert_eq!(unescape(&escaped), text);
        assert!(matches!(escape("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_code_page_output() {
        let mut buf = Vec::new();
        {
            let mut writer = DxfTextWriter::new(&mut buf);
            writer.set_encoding(Some(encoding_rs::WINDOWS_1252));
            writer.write_pair(&CodePair::new(1, "caf\u{e9}")).unwrap();
        }
        assert_eq!(buf, b"  1\ncaf\xe9\n");
    }
}
