//! DXF file reader

mod binary_reader;
mod section_reader;
mod stream_reader;
pub(crate) mod text_reader;

pub use binary_reader::{DxfBinaryReader, BINARY_SENTINEL};
pub use stream_reader::{DxfStreamReader, PairListReader, PairStream};
pub use text_reader::DxfTextReader;

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use tracing::debug;

use section_reader::SectionReader;

use crate::document::CadDocument;
use crate::error::Result;
use crate::types::DxfVersion;

const PREFIX_LEN: usize = BINARY_SENTINEL.len() + 2;

/// Configuration for the DXF reader.
#[derive(Debug, Clone, Default)]
pub struct DxfReaderConfiguration {
    /// When `true`, a structural error inside a section body is reported as
    /// an `Error` notification and the rest of that section is skipped.
    /// Framing errors and truncation still abort the read.
    ///
    /// Default: `false`
    pub failsafe: bool,
}

/// DXF file reader
pub struct DxfReader<'a> {
    stream: PairStream<'a>,
    config: DxfReaderConfiguration,
}

impl<'a> DxfReader<'a> {
    /// Create a reader over any byte source, detecting text or binary from
    /// the opening bytes.
    pub fn from_reader<R: Read + 'a>(mut reader: R) -> Result<Self> {
        // sentinel plus the first code, which tells one-byte codes from two
        let mut prefix = Vec::with_capacity(PREFIX_LEN);
        reader.by_ref().take(PREFIX_LEN as u64).read_to_end(&mut prefix)?;

        let stream = if prefix.starts_with(BINARY_SENTINEL) {
            debug!("binary DXF detected");
            let rest = prefix.split_off(BINARY_SENTINEL.len());
            PairStream::new(DxfBinaryReader::new(BufReader::new(Cursor::new(rest).chain(reader)))?)
        } else {
            PairStream::new(DxfTextReader::new(BufReader::new(Cursor::new(prefix).chain(reader))))
        };
        Ok(Self {
            stream,
            config: DxfReaderConfiguration::default(),
        })
    }

    /// Create a reader over a pair source that is already decoded.
    pub fn from_stream(stream: PairStream<'a>) -> Self {
        Self {
            stream,
            config: DxfReaderConfiguration::default(),
        }
    }

    /// Set the reader configuration.
    pub fn with_configuration(mut self, config: DxfReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Read every section and resolve the pointers between objects.
    pub fn read(mut self) -> Result<CadDocument> {
        // a file without $ACADVER stays at the version it is parsed as
        let mut document = CadDocument::with_version(DxfVersion::DEFAULT_READ);
        SectionReader::new(&mut self.stream, &self.config).read(&mut document)?;
        document.resolve_pending();
        debug!(
            objects = document.object_count(),
            notifications = document.notifications().len(),
            "document loaded"
        );
        Ok(document)
    }
}

impl DxfReader<'static> {
    /// Create a new DXF reader from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }
}
