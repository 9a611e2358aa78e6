//! Group-code/value pairs, the unit of every DXF stream

use std::fmt;

use super::GroupCodeValueType;
use crate::types::Handle;

/// Position of a pair in its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairOffset {
    /// Built in memory, not read from a stream
    #[default]
    Unknown,
    /// 1-based line number of the code line in a text file
    Line(usize),
    /// Byte offset of the code in a binary file
    Byte(u64),
}

impl fmt::Display for PairOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairOffset::Unknown => write!(f, "unknown position"),
            PairOffset::Line(line) => write!(f, "line {}", line),
            PairOffset::Byte(offset) => write!(f, "byte {}", offset),
        }
    }
}

/// A typed pair value.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeValue {
    Str(String),
    Integer(i64),
    Double(f64),
    Bool(bool),
    Handle(Handle),
    Binary(Vec<u8>),
}

impl CodeValue {
    /// The zero value of a code's value kind.
    pub fn default_for_code(code: i32) -> CodeValue {
        match GroupCodeValueType::from_raw_code(code) {
            GroupCodeValueType::Double => CodeValue::Double(0.0),
            GroupCodeValueType::Byte
            | GroupCodeValueType::Int16
            | GroupCodeValueType::Int32
            | GroupCodeValueType::Int64 => CodeValue::Integer(0),
            GroupCodeValueType::Bool => CodeValue::Bool(false),
            GroupCodeValueType::Handle => CodeValue::Handle(Handle::NULL),
            GroupCodeValueType::BinaryData => CodeValue::Binary(Vec::new()),
            GroupCodeValueType::String | GroupCodeValueType::None => CodeValue::Str(String::new()),
        }
    }

    /// Whether this is the zero value of its kind.
    pub fn is_default(&self) -> bool {
        match self {
            CodeValue::Str(s) => s.is_empty(),
            CodeValue::Integer(i) => *i == 0,
            CodeValue::Double(d) => *d == 0.0,
            CodeValue::Bool(b) => !*b,
            CodeValue::Handle(h) => h.is_null(),
            CodeValue::Binary(b) => b.is_empty(),
        }
    }

    pub fn to_i64(&self) -> i64 {
        match self {
            CodeValue::Integer(i) => *i,
            CodeValue::Double(d) => *d as i64,
            CodeValue::Bool(b) => i64::from(*b),
            CodeValue::Handle(h) => h.value() as i64,
            CodeValue::Str(s) => s.trim().parse().unwrap_or(0),
            CodeValue::Binary(_) => 0,
        }
    }

    pub fn to_i16(&self) -> i16 {
        self.to_i64() as i16
    }

    pub fn to_i32(&self) -> i32 {
        self.to_i64() as i32
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            CodeValue::Double(d) => *d,
            CodeValue::Integer(i) => *i as f64,
            CodeValue::Bool(b) => f64::from(u8::from(*b)),
            CodeValue::Str(s) => s.trim().parse().unwrap_or(0.0),
            CodeValue::Handle(_) | CodeValue::Binary(_) => 0.0,
        }
    }

    pub fn to_bool(&self) -> bool {
        match self {
            CodeValue::Bool(b) => *b,
            other => other.to_i64() != 0,
        }
    }

    /// Resolve a handle written as a handle value, hex string or integer.
    pub fn to_handle(&self) -> Handle {
        match self {
            CodeValue::Handle(h) => *h,
            CodeValue::Str(s) => Handle::from_hex(s).unwrap_or(Handle::NULL),
            CodeValue::Integer(i) => Handle::new(*i as u64),
            _ => Handle::NULL,
        }
    }

    /// Borrow a string value; other kinds yield `""`.
    pub fn as_str(&self) -> &str {
        match self {
            CodeValue::Str(s) => s,
            _ => "",
        }
    }

    pub fn into_string(self) -> String {
        match self {
            CodeValue::Str(s) => s,
            other => other.to_string(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            CodeValue::Binary(bytes) => bytes,
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for CodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeValue::Str(s) => write!(f, "{}", s),
            CodeValue::Integer(i) => write!(f, "{}", i),
            CodeValue::Double(d) => write!(f, "{}", d),
            CodeValue::Bool(b) => write!(f, "{}", u8::from(*b)),
            CodeValue::Handle(h) => write!(f, "{:X}", h),
            CodeValue::Binary(bytes) => {
                for byte in bytes {
                    write!(f, "{:02X}", byte)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for CodeValue {
    fn from(value: &str) -> Self {
        CodeValue::Str(value.to_string())
    }
}

impl From<String> for CodeValue {
    fn from(value: String) -> Self {
        CodeValue::Str(value)
    }
}

impl From<&String> for CodeValue {
    fn from(value: &String) -> Self {
        CodeValue::Str(value.clone())
    }
}

impl From<f64> for CodeValue {
    fn from(value: f64) -> Self {
        CodeValue::Double(value)
    }
}

impl From<i16> for CodeValue {
    fn from(value: i16) -> Self {
        CodeValue::Integer(value.into())
    }
}

impl From<i32> for CodeValue {
    fn from(value: i32) -> Self {
        CodeValue::Integer(value.into())
    }
}

impl From<i64> for CodeValue {
    fn from(value: i64) -> Self {
        CodeValue::Integer(value)
    }
}

impl From<u8> for CodeValue {
    fn from(value: u8) -> Self {
        CodeValue::Integer(value.into())
    }
}

impl From<bool> for CodeValue {
    fn from(value: bool) -> Self {
        CodeValue::Bool(value)
    }
}

impl From<Handle> for CodeValue {
    fn from(value: Handle) -> Self {
        CodeValue::Handle(value)
    }
}

impl From<Vec<u8>> for CodeValue {
    fn from(value: Vec<u8>) -> Self {
        CodeValue::Binary(value)
    }
}

/// One group code and its value.
///
/// Equality ignores the source position.
#[derive(Debug, Clone)]
pub struct CodePair {
    pub code: i32,
    pub value: CodeValue,
    pub offset: PairOffset,
}

impl CodePair {
    pub fn new(code: i32, value: impl Into<CodeValue>) -> Self {
        Self {
            code,
            value: value.into(),
            offset: PairOffset::Unknown,
        }
    }

    pub fn with_offset(mut self, offset: PairOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Whether this pair is `code` carrying exactly the string `text`.
    pub fn is(&self, code: i32, text: &str) -> bool {
        self.code == code && matches!(&self.value, CodeValue::Str(s) if s == text)
    }

    /// The value kind the pair's code declares.
    pub fn value_type(&self) -> GroupCodeValueType {
        GroupCodeValueType::from_raw_code(self.code)
    }
}

impl PartialEq for CodePair {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.value == other.value
    }
}

impl fmt::Display for CodePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.code, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_offset() {
        let a = CodePair::new(0, "SECTION").with_offset(PairOffset::Line(1));
        let b = CodePair::new(0, "SECTION");
        assert_eq!(a, b);
        assert!(a.is(0, "SECTION"));
        assert!(!a.is(2, "SECTION"));
    }

    #[test]
    fn test_defaults_by_code() {
        assert_eq!(CodeValue::default_for_code(40), CodeValue::Double(0.0));
        assert_eq!(CodeValue::default_for_code(70), CodeValue::Integer(0));
        assert_eq!(CodeValue::default_for_code(291), CodeValue::Bool(false));
        assert_eq!(CodeValue::default_for_code(340), CodeValue::Handle(Handle::NULL));
        assert!(CodeValue::Integer(0).is_default());
        assert!(!CodeValue::Str("X".into()).is_default());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(CodeValue::Str("1F".into()).to_handle(), Handle::new(0x1F));
        assert_eq!(CodeValue::Double(2.9).to_i64(), 2);
        assert!(CodeValue::Integer(3).to_bool());
        assert_eq!(CodeValue::Binary(vec![0xAB, 0x01]).to_string(), "AB01");
        assert_eq!(CodeValue::Bool(true).to_string(), "1");
    }
}
