//! DXF stream writer trait and common types

use std::borrow::Cow;

use crate::error::Result;
use crate::io::dxf::value_parser::format_real;
use crate::io::dxf::{CodePair, CodeValue};

/// Sink for code pairs; the push side of the pair stream.
pub trait DxfStreamWriter {
    /// Emit one pair
    fn write_pair(&mut self, pair: &CodePair) -> Result<()>;

    /// Flush the writer
    fn flush(&mut self) -> Result<()>;

    /// Emit pairs in order
    fn write_pairs(&mut self, pairs: &[CodePair]) -> Result<()> {
        for pair in pairs {
            self.write_pair(pair)?;
        }
        Ok(())
    }
}

/// The textual form of a value, unescaped.
///
/// Reals keep a decimal point so they never read back as integers; handles
/// and binary chunks are upper-case hex.
pub(crate) fn value_text(value: &CodeValue) -> Cow<'_, str> {
    match value {
        CodeValue::Str(s) => Cow::Borrowed(s),
        CodeValue::Integer(i) => Cow::Owned(i.to_string()),
        CodeValue::Double(d) => Cow::Owned(format_real(*d)),
        CodeValue::Bool(b) => Cow::Borrowed(if *b { "1" } else { "0" }),
        CodeValue::Handle(h) => Cow::Owned(h.to_hex()),
        CodeValue::Binary(bytes) => Cow::Owned(bytes.iter().map(|b| format!("{:02X}", b)).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Handle;

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&CodeValue::Integer(-3)), "-3");
        assert_eq!(value_text(&CodeValue::Double(2.0)), "2.0");
        assert_eq!(value_text(&CodeValue::Bool(true)), "1");
        assert_eq!(value_text(&CodeValue::Handle(Handle::new(0x2AF))), "2AF");
        assert_eq!(value_text(&CodeValue::Binary(vec![0x0A, 0xFF])), "0AFF");
    }
}
