//! Handle type for drawing objects
//!
//! Handles are the integer identifiers objects use to reference each other
//! in the serialized stream. They are written as upper-case hexadecimal.

use std::fmt;

/// A unique identifier for a drawing object within one document.
///
/// Handle 0 is reserved and means "no handle yet" (or, in a pointer field,
/// "no target").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Handle(u64);

impl Handle {
    /// The null handle (0)
    pub const NULL: Handle = Handle(0);

    #[inline]
    pub const fn new(value: u64) -> Self {
        Handle(value)
    }

    /// Get the raw u64 value
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Parse the hexadecimal form used in the stream. Blank text is the null handle.
    pub fn from_hex(text: &str) -> Option<Handle> {
        let text = text.trim();
        if text.is_empty() {
            return Some(Handle::NULL);
        }
        u64::from_str_radix(text, 16).ok().map(Handle)
    }

    /// Upper-case hexadecimal form without prefix
    pub fn to_hex(&self) -> String {
        format!("{:X}", self.0)
    }
}

impl From<u64> for Handle {
    fn from(value: u64) -> Self {
        Handle(value)
    }
}

impl From<Handle> for u64 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#X}", self.0)
    }
}

impl fmt::UpperHex for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}
