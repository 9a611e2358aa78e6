//! Error types for dxf-codec

use std::io;
use thiserror::Error;

use crate::io::dxf::PairOffset;
use crate::types::Handle;

/// Main error type for dxf-codec operations
///
/// Everything except [`DxfError::Io`], [`DxfError::DuplicateHandle`] and
/// [`DxfError::Custom`] is a structural failure of the pair stream and carries
/// the position of the pair that caused it.
#[derive(Debug, Error)]
pub enum DxfError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The stream ended while more pairs were required
    #[error("Unexpected end of stream at {offset}: expected {expected}")]
    UnexpectedEndOfStream { expected: String, offset: PairOffset },

    /// A code line could not be parsed as an integer group code
    #[error("Invalid DXF code {text:?} at {offset}")]
    InvalidCode { text: String, offset: PairOffset },

    /// A value could not be parsed according to its group code's value kind
    #[error("Invalid value {text:?} for group code {code} at {offset}")]
    InvalidValue {
        code: i32,
        text: String,
        offset: PairOffset,
    },

    /// `0 SECTION` was not followed by a `2 <name>` pair
    #[error("Section name expected after SECTION at {offset}, found group code {found}")]
    MissingSectionName { found: i32, offset: PairOffset },

    /// A section was left without its `0 ENDSEC` marker
    #[error("Missing ENDSEC for section {section} at {offset}, found {found}")]
    MissingEndSection {
        section: String,
        found: String,
        offset: PairOffset,
    },

    /// A pair appeared where the framing or a schema forbids it
    #[error("Unexpected pair ({code}, {value:?}) at {offset}: expected {expected}")]
    UnexpectedPair {
        expected: String,
        code: i32,
        value: String,
        offset: PairOffset,
    },

    /// A required field of an object kind never appeared
    #[error("Missing required field {field} (group code {code}) of {object_type} at {offset}")]
    MissingRequiredField {
        object_type: String,
        field: &'static str,
        code: i32,
        offset: PairOffset,
    },

    /// The binary sentinel was malformed
    #[error("Invalid sentinel: {0}")]
    InvalidSentinel(String),

    /// A handle is already owned by another object in the same document
    #[error("Duplicate handle: {0:#X}")]
    DuplicateHandle(Handle),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

impl DxfError {
    /// Whether this error describes malformed framing or object layout in the stream.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            DxfError::Io(_) | DxfError::DuplicateHandle(_) | DxfError::Custom(_)
        )
    }

    /// Position of the offending pair, when the error carries one.
    pub fn offset(&self) -> Option<PairOffset> {
        match self {
            DxfError::UnexpectedEndOfStream { offset, .. }
            | DxfError::InvalidCode { offset, .. }
            | DxfError::InvalidValue { offset, .. }
            | DxfError::MissingSectionName { offset, .. }
            | DxfError::MissingEndSection { offset, .. }
            | DxfError::UnexpectedPair { offset, .. }
            | DxfError::MissingRequiredField { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

/// Result type alias for dxf-codec operations
pub type Result<T> = std::result::Result<T, DxfError>;

impl From<String> for DxfError {
    fn from(s: String) -> Self {
        DxfError::Custom(s)
    }
}

impl From<&str> for DxfError {
    fn from(s: &str) -> Self {
        DxfError::Custom(s.to_string())
    }
}
