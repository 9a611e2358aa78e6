//! DXF writer module

mod binary_writer;
mod section_writer;
mod stream_writer;
mod text_writer;

pub use binary_writer::DxfBinaryWriter;
pub use stream_writer::DxfStreamWriter;
pub use text_writer::DxfTextWriter;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use section_writer::SectionWriter;

use crate::document::CadDocument;
use crate::error::Result;
use crate::io::dxf::{code_page, CodePair};
use crate::notification::NotificationCollection;
use crate::types::DxfVersion;

/// DXF file writer
///
/// ```no_run
/// # use dxf_codec::{CadDocument, DxfVersion};
/// # use dxf_codec::io::dxf::DxfWriter;
/// let doc = CadDocument::with_defaults();
/// let notes = DxfWriter::new(&doc)
///     .version(DxfVersion::AC1009)
///     .include_handles(false)
///     .write_to_file("drawing.dxf")?;
/// # Ok::<(), dxf_codec::DxfError>(())
/// ```
pub struct DxfWriter<'d> {
    document: &'d CadDocument,
    version: DxfVersion,
    binary: bool,
    include_handles: bool,
}

impl<'d> DxfWriter<'d> {
    /// Writer for text output at the document's own version, with handles
    pub fn new(document: &'d CadDocument) -> Self {
        Self {
            document,
            version: document.version,
            binary: false,
            include_handles: true,
        }
    }

    /// Target format version
    pub fn version(mut self, version: DxfVersion) -> Self {
        self.version = version;
        self
    }

    /// Write the binary encoding instead of text
    pub fn binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }

    /// Write object handles and `$HANDSEED`
    pub fn include_handles(mut self, include_handles: bool) -> Self {
        self.include_handles = include_handles;
        self
    }

    /// The complete pair sequence of the file, without encoding it.
    pub fn pairs(&self) -> (Vec<CodePair>, NotificationCollection) {
        SectionWriter::new(self.document, self.version, self.include_handles).write()
    }

    /// Write to any sink. Returns the notifications raised while writing.
    pub fn write<W: Write>(&self, sink: W) -> Result<NotificationCollection> {
        let (pairs, notifications) = self.pairs();
        let encoding = code_page::encoding_for(self.version, self.document.header.code_page());

        if self.binary {
            let mut writer = DxfBinaryWriter::new(sink, self.version)?;
            writer.set_encoding(encoding);
            writer.write_pairs(&pairs)?;
            writer.flush()?;
        } else {
            let mut writer = DxfTextWriter::new(sink);
            writer.set_encoding(encoding);
            writer.write_pairs(&pairs)?;
            writer.flush()?;
        }
        debug!(
            version = self.version.as_str(),
            binary = self.binary,
            pairs = pairs.len(),
            notifications = notifications.len(),
            "document written"
        );
        Ok(notifications)
    }

    /// Write to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<NotificationCollection> {
        let file = File::create(path)?;
        self.write(BufWriter::new(file))
    }

    /// Write to a byte vector (useful for testing)
    pub fn write_to_vec(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(buffer)
    }

    /// Get a reference to the document
    pub fn document(&self) -> &CadDocument {
        self.document
    }
}
