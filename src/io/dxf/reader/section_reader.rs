//! Section dispatcher: file framing and per-section readers

use tracing::{debug, trace, warn};

use super::{DxfReaderConfiguration, PairStream};
use crate::classes::DxfClass;
use crate::document::{BlockDefinition, CadDocument};
use crate::error::{DxfError, Result};
use crate::io::dxf::section::{
    DxfSection, BLOCK, CLASS, END_BLOCK, END_OF_FILE, END_SECTION, END_TABLE, SECTION, TABLE,
};
use crate::io::dxf::CodePair;
use crate::notification::NotificationKind;
use crate::objects::{CadObject, ObjectCategory, ObjectData, ObjectId};
use crate::schema::{FieldReader, Trailing};
use crate::tables::{SymbolTable, TableHeader};
use crate::thumbnail::ThumbnailImage;
use crate::types::DxfVersion;

/// Reads `0 SECTION / 2 <name> ... 0 ENDSEC` groups until `0 EOF` or the end
/// of the stream, routing each body to its reader.
pub(crate) struct SectionReader<'s, 'a> {
    stream: &'s mut PairStream<'a>,
    config: &'s DxfReaderConfiguration,
    fields: FieldReader,
}

fn unexpected(pair: CodePair, expected: &str) -> DxfError {
    DxfError::UnexpectedPair {
        expected: expected.to_string(),
        code: pair.code,
        value: pair.value.to_string(),
        offset: pair.offset,
    }
}

impl<'s, 'a> SectionReader<'s, 'a> {
    pub fn new(stream: &'s mut PairStream<'a>, config: &'s DxfReaderConfiguration) -> Self {
        Self {
            stream,
            config,
            fields: FieldReader::new(DxfVersion::DEFAULT_READ),
        }
    }

    pub fn read(&mut self, document: &mut CadDocument) -> Result<()> {
        loop {
            let pair = match self.stream.advance()? {
                Some(pair) => pair,
                None => {
                    debug!("stream ended without EOF marker");
                    return Ok(());
                }
            };
            if pair.is(0, END_OF_FILE) {
                return Ok(());
            }
            if !pair.is(0, SECTION) {
                return Err(unexpected(pair, "0 SECTION or 0 EOF"));
            }

            let name_pair = self.stream.expect_pair("section name")?;
            if name_pair.code != 2 {
                return Err(DxfError::MissingSectionName {
                    found: name_pair.code,
                    offset: name_pair.offset,
                });
            }
            let name = name_pair.value.into_string();

            match DxfSection::from_name(&name) {
                Some(section) => {
                    debug!(%section, "reading section");
                    if let Err(err) = self.read_section(section, document) {
                        if !self.recoverable(&err) {
                            return Err(err);
                        }
                        warn!(%section, %err, "section body skipped");
                        document
                            .notifications
                            .notify(NotificationKind::Error(format!("error reading {} section: {}", section, err)));
                        self.skip_body()?;
                    }
                }
                None => {
                    let skipped_pairs = self.skip_body()?;
                    debug!(section = %name, skipped_pairs, "unknown section skipped");
                    document.notifications.notify(NotificationKind::UnknownSection {
                        name: name.clone(),
                        skipped_pairs,
                    });
                }
            }

            self.expect_end_section(&name)?;
        }
    }

    /// Whether failsafe mode may skip past `err`.
    fn recoverable(&self, err: &DxfError) -> bool {
        self.config.failsafe
            && err.is_structural()
            && !matches!(err, DxfError::UnexpectedEndOfStream { .. } | DxfError::InvalidSentinel(_))
    }

    fn read_section(&mut self, section: DxfSection, document: &mut CadDocument) -> Result<()> {
        match section {
            DxfSection::Header => self.read_header(document),
            DxfSection::Classes => self.read_classes(document),
            DxfSection::Tables => self.read_tables(document),
            DxfSection::Blocks => self.read_blocks(document),
            DxfSection::Entities => {
                let ids = self.read_objects(document, ObjectCategory::Entity)?;
                document.entity_ids.extend(ids);
                Ok(())
            }
            DxfSection::Objects => {
                let ids = self.read_objects(document, ObjectCategory::Object)?;
                document.object_ids.extend(ids);
                Ok(())
            }
            DxfSection::ThumbnailImage => {
                document.thumbnail = Some(ThumbnailImage::read(self.stream)?);
                Ok(())
            }
        }
    }

    /// Whether the next pair closes the current section body: `0 ENDSEC`, a
    /// stray `0 SECTION` or `0 EOF`, or the end of the stream.
    fn at_boundary(&mut self) -> Result<bool> {
        Ok(match self.stream.peek()? {
            None => true,
            Some(pair) => pair.is(0, END_SECTION) || pair.is(0, SECTION) || pair.is(0, END_OF_FILE),
        })
    }

    /// Consume pairs up to, not including, `0 ENDSEC`.
    fn skip_body(&mut self) -> Result<usize> {
        let mut skipped = 0;
        while let Some(pair) = self.stream.peek()? {
            if pair.is(0, END_SECTION) {
                break;
            }
            self.stream.advance()?;
            skipped += 1;
        }
        Ok(skipped)
    }

    fn expect_end_section(&mut self, section: &str) -> Result<()> {
        match self.stream.advance()? {
            Some(pair) if pair.is(0, END_SECTION) => Ok(()),
            Some(pair) => Err(DxfError::MissingEndSection {
                section: section.to_string(),
                found: pair.to_string(),
                offset: pair.offset,
            }),
            None => Err(DxfError::UnexpectedEndOfStream {
                expected: format!("0 ENDSEC closing {}", section),
                offset: self.stream.position(),
            }),
        }
    }

    /// Consume `0 <marker>`, failing on anything else.
    fn expect_marker(&mut self, marker: &str) -> Result<()> {
        let pair = self.stream.expect_pair(marker)?;
        if pair.is(0, marker) {
            Ok(())
        } else {
            Err(unexpected(pair, &format!("0 {}", marker)))
        }
    }

    /// Read the object whose `0 <type>` pair comes next.
    fn read_object(&mut self, category: ObjectCategory) -> Result<CadObject> {
        let pair = self.stream.expect_pair("object type")?;
        if pair.code != 0 {
            return Err(unexpected(pair, "0 <object type>"));
        }
        let data = ObjectData::for_type(pair.value.as_str(), category);
        if data.is_unknown() {
            trace!(kind = pair.value.as_str(), ?category, "no schema, keeping raw pairs");
        }
        CadObject::read(data, &self.fields, self.stream)
    }

    fn read_header(&mut self, document: &mut CadDocument) -> Result<()> {
        let version = document.header.read(self.stream, &mut document.notifications)?;
        debug!(version = %version.as_str(), "header read");
        document.version = version;
        self.fields = FieldReader::new(version);
        if let Some(seed) = document.header.handle_seed() {
            document.reserve_handles_below(seed);
        }
        Ok(())
    }

    fn read_classes(&mut self, document: &mut CadDocument) -> Result<()> {
        while !self.at_boundary()? {
            self.expect_marker(CLASS)?;
            let mut class = DxfClass::default();
            let extra = self
                .fields
                .read(DxfClass::schema(), &mut class, self.stream, Trailing::Capture)?;
            if !extra.is_empty() {
                trace!(class = %class.dxf_name, pairs = extra.len(), "dropped trailing class pairs");
            }
            document.classes.add_or_update(class);
        }
        Ok(())
    }

    fn read_tables(&mut self, document: &mut CadDocument) -> Result<()> {
        while !self.at_boundary()? {
            self.expect_marker(TABLE)?;
            let name_pair = self.stream.expect_pair("table name")?;
            if name_pair.code != 2 {
                return Err(unexpected(name_pair, "2 <table name>"));
            }
            let name = name_pair.value.into_string();

            let header = CadObject::read(ObjectData::from(TableHeader::default()), &self.fields, self.stream)?;
            let header = document.attach_read(header);
            let mut table = SymbolTable::new(name.clone(), header);

            loop {
                if self.stream.next_is(0, END_TABLE)? {
                    self.stream.advance()?;
                    break;
                }
                if self.at_boundary()? {
                    let pair = self.stream.expect_pair("0 ENDTAB")?;
                    return Err(unexpected(pair, "0 ENDTAB"));
                }
                let record = self.read_object(ObjectCategory::TableRecord)?;
                table.entries.push(document.attach_read(record));
            }
            trace!(table = %name, entries = table.len(), "table read");

            match document.tables.get_mut(&name) {
                Some(existing) => {
                    warn!(table = %name, "table appears twice, merging entries");
                    existing.entries.extend(table.entries);
                }
                None => {
                    document.tables.insert(name, table);
                }
            }
        }
        Ok(())
    }

    fn read_blocks(&mut self, document: &mut CadDocument) -> Result<()> {
        while !self.at_boundary()? {
            if !self.stream.next_is(0, BLOCK)? {
                let pair = self.stream.expect_pair("0 BLOCK")?;
                return Err(unexpected(pair, "0 BLOCK"));
            }
            let begin = self.read_object(ObjectCategory::BlockBoundary)?;
            let begin = document.attach_read(begin);

            let mut entities = Vec::new();
            while !self.stream.next_is(0, END_BLOCK)? {
                if self.at_boundary()? {
                    let pair = self.stream.expect_pair("0 ENDBLK")?;
                    return Err(unexpected(pair, "0 ENDBLK"));
                }
                let entity = self.read_object(ObjectCategory::Entity)?;
                entities.push(document.attach_read(entity));
            }
            let end = self.read_object(ObjectCategory::BlockBoundary)?;
            let end = document.attach_read(end);

            document.blocks.push(BlockDefinition { begin, entities, end });
        }
        Ok(())
    }

    fn read_objects(&mut self, document: &mut CadDocument, category: ObjectCategory) -> Result<Vec<ObjectId>> {
        let mut ids = Vec::new();
        while !self.at_boundary()? {
            let object = self.read_object(category)?;
            ids.push(document.attach_read(object));
        }
        Ok(ids)
    }
}
