//! Drawing objects and the non-graphical object kinds (OBJECTS section)
//!
//! Every object in a document, whatever section it lives in, is a
//! [`CadObject`]: the common header every kind shares (handle, owner,
//! reactors, extension dictionary), a typed [`ObjectData`] payload, and the
//! trailing pairs no field claimed. Payload kinds describe their layout as a
//! schema through [`DxfKind`]; reading and writing dispatch on the variant.

mod dictionary;
mod group;
mod pointer;
mod sun_study;

pub use dictionary::Dictionary;
pub use group::Group;
pub use pointer::{NamedPointer, ObjectId, Pointer};
pub use sun_study::{SunStudy, SunStudyDate};

use once_cell::sync::Lazy;
use tracing::trace;

use crate::entities::{Block, BlockEnd, Circle, Line, LwPolyline, Text};
use crate::error::Result;
use crate::io::dxf::reader::PairStream;
use crate::io::dxf::CodePair;
use crate::notification::NotificationCollection;
use crate::schema::{Cardinality, FieldReader, FieldWriter, ObjectSchema, SchemaBuilder, Trailing};
use crate::tables::{AppId, BlockRecord, Layer, LineType, TableHeader, TextStyle};
use crate::types::{DxfVersion, Handle};

/// Where an object kind may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectCategory {
    /// Graphical entity (ENTITIES section or a block body)
    Entity,
    /// `BLOCK` / `ENDBLK` markers of a block definition
    BlockBoundary,
    /// Entry of a symbol table
    TableRecord,
    /// The `TABLE` object heading a symbol table
    TableHeader,
    /// Non-graphical object (OBJECTS section)
    Object,
}

/// An object kind with a static field schema.
pub trait DxfKind: Default + Sized + 'static {
    /// Type name written at group code 0
    const TYPE_NAME: &'static str;
    const CATEGORY: ObjectCategory;

    fn schema() -> &'static ObjectSchema<Self>;
}

/// Fields every object carries ahead of its kind-specific fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectHeader {
    /// Own handle (DXF code 5)
    pub handle: Handle,
    /// Owner (DXF code 330, soft pointer)
    pub owner: Pointer,
    /// Persistent reactors (`102 {ACAD_REACTORS` group)
    pub reactors: Vec<Pointer>,
    /// Extension dictionary (`102 {ACAD_XDICTIONARY` group)
    pub extension_dictionary: Pointer,
}

static HEADER_SCHEMA: Lazy<ObjectSchema<ObjectHeader>> = Lazy::new(|| {
    SchemaBuilder::<ObjectHeader>::new("AcDbObject")
        .value("handle", 5, |h| h.handle.to_hex().into(), |h, v| h.handle = v.to_handle())
        .handles_only()
        .when(|h| !h.handle.is_null())
        .pointers(
            "reactors",
            330,
            Cardinality::Sentinel {
                code: 102,
                open: "{ACAD_REACTORS",
                close: "}",
            },
            |h| &h.reactors,
            |h| &mut h.reactors,
        )
        .since(DxfVersion::AC1012)
        .when(|h| !h.reactors.is_empty())
        .pointer(
            "extension_dictionary",
            360,
            |h| &h.extension_dictionary,
            |h| &mut h.extension_dictionary,
        )
        .cardinality(Cardinality::Sentinel {
            code: 102,
            open: "{ACAD_XDICTIONARY",
            close: "}",
        })
        .since(DxfVersion::AC1012)
        .when(|h| !h.extension_dictionary.is_null())
        .pointer("owner", 330, |h| &h.owner, |h| &mut h.owner)
        .since(DxfVersion::AC1012)
        .when(|h| !h.owner.is_null())
        .build()
});

impl ObjectHeader {
    pub fn schema() -> &'static ObjectSchema<ObjectHeader> {
        &HEADER_SCHEMA
    }
}

/// Generates [`ObjectData`] and its dispatch over the supported kinds.
macro_rules! object_kinds {
    ($($variant:ident($kind:ty)),+ $(,)?) => {
        /// Typed payload of an object, one variant per supported kind.
        #[derive(Debug, Clone, PartialEq)]
        pub enum ObjectData {
            $($variant($kind),)+
            /// A kind without a schema; all its pairs are extension pairs
            Unknown {
                type_name: String,
                category: ObjectCategory,
            },
        }

        $(
            impl From<$kind> for ObjectData {
                fn from(data: $kind) -> Self {
                    ObjectData::$variant(data)
                }
            }

            impl From<$kind> for CadObject {
                fn from(data: $kind) -> Self {
                    CadObject::new(data)
                }
            }
        )+

        impl ObjectData {
            /// Empty payload for a type name met where `category` objects live.
            pub fn for_type(type_name: &str, category: ObjectCategory) -> ObjectData {
                $(
                    if type_name == <$kind as DxfKind>::TYPE_NAME
                        && category == <$kind as DxfKind>::CATEGORY
                    {
                        return ObjectData::$variant(<$kind>::default());
                    }
                )+
                ObjectData::Unknown {
                    type_name: type_name.to_string(),
                    category,
                }
            }

            pub fn type_name(&self) -> &str {
                match self {
                    $(ObjectData::$variant(_) => <$kind as DxfKind>::TYPE_NAME,)+
                    ObjectData::Unknown { type_name, .. } => type_name,
                }
            }

            pub fn category(&self) -> ObjectCategory {
                match self {
                    $(ObjectData::$variant(_) => <$kind as DxfKind>::CATEGORY,)+
                    ObjectData::Unknown { category, .. } => *category,
                }
            }

            /// Whether the kind exists at `version`.
            pub fn applies_to(&self, version: DxfVersion) -> bool {
                match self {
                    $(ObjectData::$variant(_) => <$kind as DxfKind>::schema().applies_to(version),)+
                    ObjectData::Unknown { .. } => true,
                }
            }

            pub fn is_unknown(&self) -> bool {
                matches!(self, ObjectData::Unknown { .. })
            }

            /// Read the kind's fields; returns the trailing extension pairs.
            pub(crate) fn read(&mut self, reader: &FieldReader, stream: &mut PairStream<'_>) -> Result<Vec<CodePair>> {
                match self {
                    $(
                        ObjectData::$variant(data) => {
                            reader.read(<$kind as DxfKind>::schema(), data, stream, Trailing::Capture)
                        }
                    )+
                    ObjectData::Unknown { .. } => reader.capture_rest(stream),
                }
            }

            pub(crate) fn write(
                &self,
                writer: &FieldWriter<'_>,
                out: &mut Vec<CodePair>,
                notifications: &mut NotificationCollection,
            ) {
                match self {
                    $(
                        ObjectData::$variant(data) => {
                            writer.write(<$kind as DxfKind>::schema(), data, out, notifications)
                        }
                    )+
                    ObjectData::Unknown { .. } => {}
                }
            }

            pub fn visit_pointers(&self, visit: &mut dyn FnMut(&'static str, i32, &Pointer)) {
                match self {
                    $(ObjectData::$variant(data) => <$kind as DxfKind>::schema().visit_pointers(data, visit),)+
                    ObjectData::Unknown { .. } => {}
                }
            }

            pub fn visit_pointers_mut(&mut self, visit: &mut dyn FnMut(&'static str, i32, &mut Pointer)) {
                match self {
                    $(ObjectData::$variant(data) => <$kind as DxfKind>::schema().visit_pointers_mut(data, visit),)+
                    ObjectData::Unknown { .. } => {}
                }
            }
        }
    };
}

object_kinds! {
    Line(Line),
    Circle(Circle),
    Text(Text),
    LwPolyline(LwPolyline),
    Block(Block),
    BlockEnd(BlockEnd),
    Layer(Layer),
    LineType(LineType),
    TextStyle(TextStyle),
    AppId(AppId),
    BlockRecord(BlockRecord),
    TableHeader(TableHeader),
    Dictionary(Dictionary),
    Group(Group),
    SunStudy(SunStudy),
}

impl From<ObjectData> for CadObject {
    fn from(data: ObjectData) -> Self {
        CadObject::new(data)
    }
}

/// One object of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct CadObject {
    pub header: ObjectHeader,
    pub data: ObjectData,
    /// Trailing pairs no field accepted, written back verbatim
    pub extension_pairs: Vec<CodePair>,
}

impl CadObject {
    /// Create an object without a handle.
    pub fn new(data: impl Into<ObjectData>) -> Self {
        Self {
            header: ObjectHeader::default(),
            data: data.into(),
            extension_pairs: Vec::new(),
        }
    }

    /// Builder: set the handle
    pub fn with_handle(mut self, handle: Handle) -> Self {
        self.header.handle = handle;
        self
    }

    /// Builder: set the owner
    pub fn with_owner(mut self, owner: impl Into<Pointer>) -> Self {
        self.header.owner = owner.into();
        self
    }

    pub fn handle(&self) -> Handle {
        self.header.handle
    }

    pub fn type_name(&self) -> &str {
        self.data.type_name()
    }

    pub fn category(&self) -> ObjectCategory {
        self.data.category()
    }

    /// Visit the header's pointers, then the payload's.
    pub fn visit_pointers(&self, visit: &mut dyn FnMut(&'static str, i32, &Pointer)) {
        ObjectHeader::schema().visit_pointers(&self.header, visit);
        self.data.visit_pointers(visit);
    }

    pub fn visit_pointers_mut(&mut self, visit: &mut dyn FnMut(&'static str, i32, &mut Pointer)) {
        ObjectHeader::schema().visit_pointers_mut(&mut self.header, visit);
        self.data.visit_pointers_mut(visit);
    }

    /// Read the object that follows its `0 <type>` pair.
    pub(crate) fn read(data: ObjectData, reader: &FieldReader, stream: &mut PairStream<'_>) -> Result<CadObject> {
        let mut object = CadObject::new(data);
        reader.read(ObjectHeader::schema(), &mut object.header, stream, Trailing::Stop)?;
        object.extension_pairs = object.data.read(reader, stream)?;
        trace!(
            kind = object.type_name(),
            handle = %object.header.handle,
            extension = object.extension_pairs.len(),
            "read object"
        );
        Ok(object)
    }

    /// Write the object's pairs after its `0 <type>` pair, with `handle`
    /// in place of its own.
    pub(crate) fn write(
        &self,
        handle: Handle,
        writer: &FieldWriter<'_>,
        out: &mut Vec<CodePair>,
        notifications: &mut NotificationCollection,
    ) {
        let mut header = ObjectHeader {
            handle,
            ..self.header.clone()
        };
        // owner links do not exist before R13
        if writer.version() < DxfVersion::AC1012 {
            header.owner = Pointer::NULL;
            header.reactors.clear();
            header.extension_dictionary = Pointer::NULL;
        }
        writer.write(ObjectHeader::schema(), &header, out, notifications);
        self.data.write(writer, out, notifications);
        out.extend(self.extension_pairs.iter().cloned());
    }
}
