//! Group code value types
//!
//! Determines how to interpret the value associated with a DXF group code.
//! The binary form carries no type hints, so this table alone decides the
//! wire width of every value.

/// Type of value associated with a group code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupCodeValueType {
    /// Unknown code; treated as a string
    None,
    /// String value
    String,
    /// Boolean value (0 or 1), one byte in binary
    Bool,
    /// 8-bit integer, written as 16 bits in binary
    Byte,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// Double-precision floating-point
    Double,
    /// Binary chunk (hex string in text)
    BinaryData,
    /// Object handle (hex string)
    Handle,
}

impl GroupCodeValueType {
    /// Determine the value type from a raw integer group code.
    pub fn from_raw_code(code: i32) -> Self {
        match code {
            0..=9 | 100..=109 | 300..=309 | 410..=419 | 430..=439 | 470..=479 | 999 => {
                GroupCodeValueType::String
            }
            10..=59 | 110..=149 | 210..=239 | 460..=469 => GroupCodeValueType::Double,
            60..=79 | 170..=179 | 270..=279 | 370..=389 | 400..=409 => GroupCodeValueType::Int16,
            280..=289 => GroupCodeValueType::Byte,
            90..=99 | 420..=429 | 440..=459 => GroupCodeValueType::Int32,
            160..=169 => GroupCodeValueType::Int64,
            290..=299 => GroupCodeValueType::Bool,
            310..=319 => GroupCodeValueType::BinaryData,
            320..=369 | 390..=399 | 480..=481 => GroupCodeValueType::Handle,

            // Extended data
            1004 => GroupCodeValueType::BinaryData,
            1005 => GroupCodeValueType::Handle,
            1000..=1009 => GroupCodeValueType::String,
            1010..=1059 => GroupCodeValueType::Double,
            1060..=1070 => GroupCodeValueType::Int16,
            1071 => GroupCodeValueType::Int32,

            _ => GroupCodeValueType::None,
        }
    }

    /// Whether values of this type are integers on the wire
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            GroupCodeValueType::Byte
                | GroupCodeValueType::Int16
                | GroupCodeValueType::Int32
                | GroupCodeValueType::Int64
        )
    }
}
