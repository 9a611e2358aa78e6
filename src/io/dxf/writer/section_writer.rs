//! Section writer: lays the document out as one ordered pair sequence

use ahash::AHashMap;
use tracing::{debug, trace};

use crate::classes::DxfClass;
use crate::document::CadDocument;
use crate::io::dxf::section::{DxfSection, CLASS, END_OF_FILE, END_SECTION, END_TABLE, SECTION, TABLE};
use crate::io::dxf::CodePair;
use crate::notification::{NotificationCollection, NotificationKind};
use crate::objects::{ObjectCategory, ObjectData, ObjectId, Pointer};
use crate::schema::{FieldWriter, PointerHandles};
use crate::tables::SymbolTable;
use crate::types::{DxfVersion, Handle};

/// Handles used for one save.
///
/// Objects keep their registered handle; objects without one get the next
/// free handle, in arena order, so saving twice gives the same result.
pub(crate) struct WriteHandles {
    handles: AHashMap<ObjectId, Handle>,
    next: Handle,
}

impl WriteHandles {
    pub fn new(document: &CadDocument) -> Self {
        let mut next = document.next_handle().value();
        let mut handles = AHashMap::with_capacity(document.object_count());
        for (id, _) in document.all_objects() {
            let handle = document.handle_of(id).unwrap_or_else(|| {
                let fresh = Handle::new(next);
                next += 1;
                fresh
            });
            handles.insert(id, handle);
        }
        Self {
            handles,
            next: Handle::new(next),
        }
    }

    pub fn of(&self, id: ObjectId) -> Handle {
        self.handles.get(&id).copied().unwrap_or(Handle::NULL)
    }

    /// First handle no written object uses; the `$HANDSEED` value
    pub fn seed(&self) -> Handle {
        self.next
    }
}

impl PointerHandles for WriteHandles {
    fn handle_for(&self, pointer: &Pointer) -> Handle {
        pointer
            .target
            .and_then(|target| self.handles.get(&target).copied())
            .unwrap_or(pointer.handle)
    }
}

pub(crate) struct SectionWriter<'d> {
    document: &'d CadDocument,
    version: DxfVersion,
    include_handles: bool,
    handles: WriteHandles,
    out: Vec<CodePair>,
    notifications: NotificationCollection,
}

impl<'d> SectionWriter<'d> {
    pub fn new(document: &'d CadDocument, version: DxfVersion, include_handles: bool) -> Self {
        Self {
            document,
            version,
            include_handles,
            handles: WriteHandles::new(document),
            out: Vec::new(),
            notifications: NotificationCollection::new(),
        }
    }

    /// Produce every section in canonical order, then `0 EOF`.
    pub fn write(mut self) -> (Vec<CodePair>, NotificationCollection) {
        for section in DxfSection::CANONICAL_ORDER {
            if !self.should_write(section) {
                continue;
            }
            debug!(%section, "writing section");
            self.out.push(CodePair::new(0, SECTION));
            self.out.push(CodePair::new(2, section.name()));
            match section {
                DxfSection::Header => self.write_header(),
                DxfSection::Classes => self.write_classes(),
                DxfSection::Tables => self.write_tables(),
                DxfSection::Blocks => self.write_blocks(),
                DxfSection::Entities => {
                    for id in self.document.entity_ids() {
                        self.write_object(*id);
                    }
                }
                DxfSection::Objects => {
                    for id in self.document.object_ids() {
                        self.write_object(*id);
                    }
                }
                DxfSection::ThumbnailImage => {
                    if let Some(thumbnail) = &self.document.thumbnail {
                        thumbnail.write(&mut self.out);
                    }
                }
            }
            self.out.push(CodePair::new(0, END_SECTION));
        }
        self.out.push(CodePair::new(0, END_OF_FILE));
        (self.out, self.notifications)
    }

    /// Sections introduced after R12 are written from their first version
    /// on, and before that only when they hold something.
    fn should_write(&mut self, section: DxfSection) -> bool {
        let at_version = section.min_version().map_or(true, |min| self.version >= min);
        match section {
            DxfSection::Header | DxfSection::Tables | DxfSection::Blocks | DxfSection::Entities => true,
            DxfSection::Objects => at_version || !self.document.object_ids().is_empty(),
            DxfSection::Classes => {
                if !at_version && !self.document.classes.is_empty() {
                    self.skip_kind(section.name());
                }
                at_version
            }
            DxfSection::ThumbnailImage => {
                let present = self.document.thumbnail.is_some();
                if present && !at_version {
                    self.skip_kind(section.name());
                }
                present && at_version
            }
        }
    }

    fn skip_kind(&mut self, object_type: &str) {
        debug!(kind = object_type, version = self.version.as_str(), "not written at this version");
        self.notifications.notify(NotificationKind::UnsupportedVersion {
            object_type: object_type.to_string(),
            field: None,
            version: self.version,
        });
    }

    fn write_header(&mut self) {
        self.document.header.write(
            self.version,
            self.include_handles,
            self.handles.seed(),
            &mut self.out,
            &mut self.notifications,
        );
    }

    fn write_classes(&mut self) {
        let fields = FieldWriter::new(self.version, self.include_handles, &self.handles);
        for class in self.document.classes.iter() {
            self.out.push(CodePair::new(0, CLASS));
            fields.write(DxfClass::schema(), class, &mut self.out, &mut self.notifications);
        }
    }

    fn write_tables(&mut self) {
        let mut tables: Vec<&SymbolTable> = self.document.tables().collect();
        tables.sort_by_key(|table| table.order());

        for table in tables {
            if !ObjectData::for_type(&table.name, ObjectCategory::TableRecord).applies_to(self.version) {
                self.skip_kind(&table.name);
                continue;
            }
            let entries: Vec<ObjectId> = table
                .entries
                .iter()
                .copied()
                .filter(|id| self.applies(*id))
                .collect();

            self.out.push(CodePair::new(0, TABLE));
            self.out.push(CodePair::new(2, table.name.as_str()));
            if let Some(header) = self.document.get(table.header) {
                let mut header = header.clone();
                if let ObjectData::TableHeader(data) = &mut header.data {
                    data.max_entries = i16::try_from(entries.len()).unwrap_or(i16::MAX);
                }
                let fields = FieldWriter::new(self.version, self.include_handles, &self.handles);
                header.write(self.handles.of(table.header), &fields, &mut self.out, &mut self.notifications);
            }
            for id in table.entries.iter().copied() {
                self.write_object(id);
            }
            self.out.push(CodePair::new(0, END_TABLE));
            trace!(table = %table.name, entries = entries.len(), "table written");
        }
    }

    fn write_blocks(&mut self) {
        for block in self.document.blocks() {
            self.write_object(block.begin);
            for id in &block.entities {
                self.write_object(*id);
            }
            self.write_object(block.end);
        }
    }

    fn applies(&self, id: ObjectId) -> bool {
        self.document
            .get(id)
            .map_or(false, |object| object.data.applies_to(self.version))
    }

    /// Emit `0 <type>` and the object's fields, or skip a kind that does not
    /// exist at the target version.
    fn write_object(&mut self, id: ObjectId) {
        let Some(object) = self.document.get(id) else {
            return;
        };
        if !object.data.applies_to(self.version) {
            self.skip_kind(object.type_name());
            return;
        }
        self.out.push(CodePair::new(0, object.type_name()));
        let fields = FieldWriter::new(self.version, self.include_handles, &self.handles);
        object.write(self.handles.of(id), &fields, &mut self.out, &mut self.notifications);
    }
}
