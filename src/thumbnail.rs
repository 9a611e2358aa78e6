//! Preview image (THUMBNAILIMAGE section).
//!
//! The section holds the raw bytes of a preview bitmap: a byte count at
//! code 90, then the data as hex chunks at code 310.

use tracing::trace;

use crate::error::{DxfError, Result};
use crate::io::dxf::reader::PairStream;
use crate::io::dxf::CodePair;
use crate::types::DxfVersion;

/// Bytes per 310 chunk on write.
const CHUNK_SIZE: usize = 128;

/// First version carrying a THUMBNAILIMAGE section.
pub const THUMBNAIL_SINCE: DxfVersion = DxfVersion::AC1015;

/// Type of media stored in the preview image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewType {
    Unknown,
    /// BMP bitmap image.
    Bmp,
    /// Windows Metafile (WMF) image.
    Wmf,
    /// PNG image.
    Png,
}

impl PreviewType {
    /// Detect the media type from the leading bytes.
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(b"BM") {
            Self::Bmp
        } else if data.starts_with(&[0x89, b'P', b'N', b'G']) {
            Self::Png
        } else if data.starts_with(&[0xD7, 0xCD, 0xC6, 0x9A]) || data.starts_with(&[0x01, 0x00, 0x09, 0x00]) {
            Self::Wmf
        } else {
            Self::Unknown
        }
    }
}

/// Preview image of a drawing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThumbnailImage {
    /// Raw image bytes
    pub data: Vec<u8>,
}

impl ThumbnailImage {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn preview_type(&self) -> PreviewType {
        PreviewType::detect(&self.data)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read the section body. The declared byte count must match the data.
    pub(crate) fn read(stream: &mut PairStream<'_>) -> Result<Self> {
        let mut declared = None;
        let mut data = Vec::new();
        while let Some(code) = stream.peek_code()? {
            if code == 0 {
                break;
            }
            let pair = stream.expect_pair("thumbnail data")?;
            match pair.code {
                90 => declared = Some((pair.value.to_i64().max(0) as usize, pair.offset)),
                310 => data.extend(pair.value.into_bytes()),
                other => trace!(code = other, "ignored pair in THUMBNAILIMAGE"),
            }
        }
        if let Some((count, offset)) = declared {
            if count != data.len() {
                return Err(DxfError::InvalidValue {
                    code: 90,
                    text: format!("{} bytes declared, {} present", count, data.len()),
                    offset,
                });
            }
        }
        Ok(Self { data })
    }

    pub(crate) fn write(&self, out: &mut Vec<CodePair>) {
        out.push(CodePair::new(90, self.data.len() as i32));
        out.extend(self.data.chunks(CHUNK_SIZE).map(|chunk| CodePair::new(310, chunk.to_vec())));
    }
}
