//! CAD document structure

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use indexmap::IndexMap;
use tracing::warn;

use crate::classes::DxfClassCollection;
use crate::error::{DxfError, Result};
use crate::handle_registry::HandleRegistry;
use crate::header::HeaderSection;
use crate::io::dxf::{DxfReader, DxfSection, DxfWriter};
use crate::notification::NotificationCollection;
use crate::objects::{CadObject, ObjectCategory, ObjectId, Pointer};
use crate::tables::{AppId, Layer, LineType, SymbolTable, TableHeader, TextStyle};
use crate::thumbnail::ThumbnailImage;
use crate::types::{DxfVersion, Handle};

/// A block definition: its `BLOCK` object, body entities and `ENDBLK` object.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDefinition {
    pub begin: ObjectId,
    pub entities: Vec<ObjectId>,
    pub end: ObjectId,
}

/// A CAD document
///
/// Every object, whatever its section, lives in one arena keyed by
/// [`ObjectId`]. Sections keep the ids of their objects in file order, and
/// the handle registry maps the arena to the handles used in the stream.
#[derive(Debug, Clone)]
pub struct CadDocument {
    /// Version the document was read as; the default save version
    pub version: DxfVersion,

    /// Header variables (HEADER section)
    pub header: HeaderSection,

    /// DXF class definitions (CLASSES section)
    pub classes: DxfClassCollection,

    /// Preview image (THUMBNAILIMAGE section)
    pub thumbnail: Option<ThumbnailImage>,

    arena: IndexMap<ObjectId, CadObject>,
    next_id: u32,
    registry: HandleRegistry,

    pub(crate) tables: IndexMap<String, SymbolTable>,
    pub(crate) blocks: Vec<BlockDefinition>,
    pub(crate) entity_ids: Vec<ObjectId>,
    pub(crate) object_ids: Vec<ObjectId>,

    pub(crate) notifications: NotificationCollection,
}

impl CadDocument {
    /// Create a new empty document
    pub fn new() -> Self {
        CadDocument {
            version: DxfVersion::default(),
            header: HeaderSection::new(),
            classes: DxfClassCollection::new(),
            thumbnail: None,
            arena: IndexMap::new(),
            next_id: 0,
            registry: HandleRegistry::new(),
            tables: IndexMap::new(),
            blocks: Vec::new(),
            entity_ids: Vec::new(),
            object_ids: Vec::new(),
            notifications: NotificationCollection::new(),
        }
    }

    /// Create a document with a specific version
    pub fn with_version(version: DxfVersion) -> Self {
        CadDocument {
            version,
            ..Self::new()
        }
    }

    /// Create a document holding the standard table entries: layer "0",
    /// the Continuous line type, the STANDARD text style and the ACAD
    /// application id.
    pub fn with_defaults() -> Self {
        let mut doc = Self::new();
        doc.initialize_defaults();
        doc
    }

    fn initialize_defaults(&mut self) {
        let defaults: [CadObject; 4] = [
            Layer::layer_0().into(),
            LineType::continuous().into(),
            TextStyle::standard().into(),
            AppId::acad().into(),
        ];
        for record in defaults {
            // fresh records carry no handle, so registration cannot collide
            if let Err(err) = self.add_table_record(record) {
                warn!(%err, "default table record not added");
            }
        }
    }

    /// Load a document from any byte source, text or binary.
    pub fn load<R: Read>(reader: R) -> Result<CadDocument> {
        DxfReader::from_reader(reader)?.read()
    }

    /// Load a document from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<CadDocument> {
        DxfReader::from_file(path)?.read()
    }

    /// Save as text DXF at `version`.
    ///
    /// Returns the notifications raised while writing.
    pub fn save<W: Write>(&self, sink: W, version: DxfVersion, include_handles: bool) -> Result<NotificationCollection> {
        DxfWriter::new(self)
            .version(version)
            .include_handles(include_handles)
            .write(sink)
    }

    /// Save as text DXF to a file path.
    pub fn save_file<P: AsRef<Path>>(
        &self,
        path: P,
        version: DxfVersion,
        include_handles: bool,
    ) -> Result<NotificationCollection> {
        let file = File::create(path)?;
        self.save(BufWriter::new(file), version, include_handles)
    }

    /// Put an object in the arena, registering its handle if it has one.
    fn attach(&mut self, object: CadObject) -> Result<ObjectId> {
        let id = ObjectId(self.next_id);
        if !object.handle().is_null() {
            self.registry.register(id, object.handle())?;
        }
        self.next_id += 1;
        self.arena.insert(id, object);
        Ok(id)
    }

    /// Put an object read from a stream in the arena. A handle already owned
    /// by another object is reported and left unregistered; the object gets
    /// a fresh handle when saved.
    pub(crate) fn attach_read(&mut self, object: CadObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        let handle = object.handle();
        if !handle.is_null() && self.registry.register(id, handle).is_err() {
            warn!(%handle, kind = object.type_name(), "duplicate handle");
            self.notifications
                .warn(format!("duplicate handle {:X} on {}", handle, object.type_name()));
        }
        self.next_id += 1;
        self.arena.insert(id, object);
        id
    }

    fn check_category(object: &CadObject, expected: ObjectCategory) -> Result<()> {
        if object.category() == expected {
            Ok(())
        } else {
            Err(DxfError::Custom(format!(
                "{} is a {:?}, expected a {:?}",
                object.type_name(),
                object.category(),
                expected
            )))
        }
    }

    /// Add an entity to the ENTITIES section
    pub fn add_entity(&mut self, entity: impl Into<CadObject>) -> Result<ObjectId> {
        let entity = entity.into();
        Self::check_category(&entity, ObjectCategory::Entity)?;
        let id = self.attach(entity)?;
        self.entity_ids.push(id);
        Ok(id)
    }

    /// Add a non-graphical object to the OBJECTS section
    pub fn add_object(&mut self, object: impl Into<CadObject>) -> Result<ObjectId> {
        let object = object.into();
        Self::check_category(&object, ObjectCategory::Object)?;
        let id = self.attach(object)?;
        self.object_ids.push(id);
        Ok(id)
    }

    /// Add a record to the symbol table named after its type, creating the
    /// table on first use. A record without an owner is owned by its table.
    pub fn add_table_record(&mut self, record: impl Into<CadObject>) -> Result<ObjectId> {
        let mut record = record.into();
        Self::check_category(&record, ObjectCategory::TableRecord)?;
        let name = record.type_name().to_string();
        let header = match self.tables.get(&name) {
            Some(table) => table.header,
            None => {
                let header = self.attach(CadObject::new(TableHeader::default()))?;
                self.tables.insert(name.clone(), SymbolTable::new(name.clone(), header));
                header
            }
        };
        if record.header.owner.is_null() {
            record.header.owner = Pointer::to(header);
        }
        let id = self.attach(record)?;
        if let Some(table) = self.tables.get_mut(&name) {
            table.entries.push(id);
        }
        Ok(id)
    }

    /// Add a block definition made of `block` (a `BLOCK` object) and its body.
    pub fn add_block(
        &mut self,
        block: impl Into<CadObject>,
        entities: impl IntoIterator<Item = CadObject>,
    ) -> Result<ObjectId> {
        let block = block.into();
        if block.type_name() != crate::io::dxf::section::BLOCK {
            return Err(DxfError::Custom(format!("{} does not open a block", block.type_name())));
        }
        let entities: Vec<CadObject> = entities.into_iter().collect();
        for entity in &entities {
            Self::check_category(entity, ObjectCategory::Entity)?;
        }
        let begin = self.attach(block)?;
        let mut body = Vec::with_capacity(entities.len());
        for entity in entities {
            body.push(self.attach(entity)?);
        }
        let end = self.attach(CadObject::new(crate::entities::BlockEnd::default()))?;
        self.blocks.push(BlockDefinition {
            begin,
            entities: body,
            end,
        });
        Ok(begin)
    }

    pub fn get(&self, id: ObjectId) -> Option<&CadObject> {
        self.arena.get(&id)
    }

    /// Mutable access to an object. Use [`set_handle`](Self::set_handle)
    /// rather than writing `header.handle` directly.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut CadObject> {
        self.arena.get_mut(&id)
    }

    /// Change the handle of an object, keeping the registry in step.
    pub fn set_handle(&mut self, id: ObjectId, handle: Handle) -> Result<Handle> {
        if !self.arena.contains_key(&id) {
            return Err(DxfError::Custom(format!("no object {}", id)));
        }
        if let Some(owner) = self.registry.lookup(handle) {
            if owner != id {
                return Err(DxfError::DuplicateHandle(handle));
            }
        }
        self.registry.unregister(id);
        let assigned = self.registry.register(id, handle)?;
        if let Some(object) = self.arena.get_mut(&id) {
            object.header.handle = assigned;
        }
        Ok(assigned)
    }

    /// The id registered under `handle`
    pub fn id_by_handle(&self, handle: Handle) -> Option<ObjectId> {
        self.registry.lookup(handle)
    }

    pub fn object_by_handle(&self, handle: Handle) -> Option<&CadObject> {
        self.id_by_handle(handle).and_then(|id| self.get(id))
    }

    /// Follow a pointer: its resolved target, else its raw handle.
    pub fn resolve(&self, pointer: &Pointer) -> Option<&CadObject> {
        match pointer.target {
            Some(id) => self.get(id),
            None if pointer.handle.is_null() => None,
            None => self.object_by_handle(pointer.handle),
        }
    }

    /// Entities of the ENTITIES section, in order
    pub fn entities(&self) -> impl Iterator<Item = &CadObject> {
        self.entity_ids.iter().filter_map(move |id| self.get(*id))
    }

    pub fn entity_ids(&self) -> &[ObjectId] {
        &self.entity_ids
    }

    /// Objects of the OBJECTS section, in order
    pub fn objects(&self) -> impl Iterator<Item = &CadObject> {
        self.object_ids.iter().filter_map(move |id| self.get(*id))
    }

    pub fn object_ids(&self) -> &[ObjectId] {
        &self.object_ids
    }

    /// Symbol tables in the order they were read or created
    pub fn tables(&self) -> impl Iterator<Item = &SymbolTable> {
        self.tables.values()
    }

    pub fn table(&self, name: &str) -> Option<&SymbolTable> {
        self.tables.get(name)
    }

    /// Records of one table
    pub fn table_records(&self, name: &str) -> impl Iterator<Item = &CadObject> {
        self.tables
            .get(name)
            .into_iter()
            .flat_map(|table| table.entries.iter())
            .filter_map(move |id| self.get(*id))
    }

    pub fn blocks(&self) -> &[BlockDefinition] {
        &self.blocks
    }

    /// Every object of the document, in creation order
    pub fn all_objects(&self) -> impl Iterator<Item = (ObjectId, &CadObject)> {
        self.arena.iter().map(|(id, object)| (*id, object))
    }

    /// Number of objects in the arena
    pub fn object_count(&self) -> usize {
        self.arena.len()
    }

    pub fn handle_of(&self, id: ObjectId) -> Option<Handle> {
        self.registry.handle_of(id)
    }

    /// The handle the next allocation would use
    pub fn next_handle(&self) -> Handle {
        self.registry.next_handle()
    }

    pub(crate) fn reserve_handles_below(&mut self, seed: Handle) {
        if seed.value() > 1 {
            self.registry.reserve(Handle::new(seed.value() - 1));
        }
    }

    fn remove_objects(&mut self, ids: Vec<ObjectId>) {
        for id in ids {
            self.registry.unregister(id);
            self.arena.shift_remove(&id);
        }
    }

    /// Empty one section. Objects removed from the arena leave their
    /// handles retired; pointers into them stop resolving.
    pub fn clear_section(&mut self, section: DxfSection) {
        match section {
            DxfSection::Header => self.header.clear(),
            DxfSection::Classes => self.classes.clear(),
            DxfSection::ThumbnailImage => self.thumbnail = None,
            DxfSection::Tables => {
                let ids = std::mem::take(&mut self.tables)
                    .into_values()
                    .flat_map(|table| std::iter::once(table.header).chain(table.entries))
                    .collect();
                self.remove_objects(ids);
            }
            DxfSection::Blocks => {
                let ids = std::mem::take(&mut self.blocks)
                    .into_iter()
                    .flat_map(|block| {
                        std::iter::once(block.begin)
                            .chain(block.entities)
                            .chain(std::iter::once(block.end))
                    })
                    .collect();
                self.remove_objects(ids);
            }
            DxfSection::Entities => {
                let ids = std::mem::take(&mut self.entity_ids);
                self.remove_objects(ids);
            }
            DxfSection::Objects => {
                let ids = std::mem::take(&mut self.object_ids);
                self.remove_objects(ids);
            }
        }
    }

    /// Give every object without a registered handle a fresh one, then copy
    /// each resolved pointer's target handle into the pointer.
    pub fn assign_missing_handles(&mut self) -> Result<()> {
        for (id, object) in self.arena.iter_mut() {
            if self.registry.handle_of(*id).is_none() {
                object.header.handle = self.registry.register(*id, Handle::NULL)?;
            }
        }
        let registry = &self.registry;
        for object in self.arena.values_mut() {
            object.visit_pointers_mut(&mut |_, _, pointer| {
                if let Some(handle) = pointer.target.and_then(|target| registry.handle_of(target)) {
                    pointer.handle = handle;
                }
            });
        }
        Ok(())
    }

    /// Resolve raw pointer handles against the registry. Dangling
    /// references are added to [`notifications`](Self::notifications).
    pub fn resolve_pending(&mut self) {
        let notes = self.registry.resolve_pending(&mut self.arena);
        self.notifications.extend(notes);
    }

    /// Notifications collected while loading
    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }
}

impl Default for CadDocument {
    fn default() -> Self {
        Self::new()
    }
}
