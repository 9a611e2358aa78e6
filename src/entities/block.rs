//! Block definition markers

use once_cell::sync::Lazy;

use super::{common_fields, EntityCommon};
use crate::objects::{DxfKind, ObjectCategory};
use crate::schema::{ObjectSchema, SchemaBuilder};
use crate::types::{DxfVersion, Vector3};

/// Block entity - opens a block definition in the BLOCKS section
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Common entity data
    pub common: EntityCommon,
    /// Block name
    pub name: String,
    /// Block-type flags (DXF code 70)
    pub flags: i16,
    /// Base point
    pub base_point: Vector3,
    /// Xref path name
    pub xref_path: String,
    /// Block description (DXF code 4)
    pub description: String,
}

impl Block {
    /// Create a new block definition start
    pub fn new(name: impl Into<String>, base_point: Vector3) -> Self {
        Block {
            common: EntityCommon::new(),
            name: name.into(),
            flags: 0,
            base_point,
            xref_path: String::new(),
            description: String::new(),
        }
    }

    /// Builder: set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::new("", Vector3::ZERO)
    }
}

/// BlockEnd entity - closes a block definition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockEnd {
    /// Common entity data
    pub common: EntityCommon,
}

impl BlockEnd {
    pub fn new() -> Self {
        Self::default()
    }
}

static BLOCK_SCHEMA: Lazy<ObjectSchema<Block>> = Lazy::new(|| {
    common_fields(SchemaBuilder::<Block>::new("BLOCK"))
        .subclass("AcDbBlockBegin")
        .value("name", 2, |b| b.name.as_str().into(), |b, v| b.name = v.into_string())
        .required()
        .value("flags", 70, |b| b.flags.into(), |b, v| b.flags = v.to_i16())
        .point("base_point", [10, 20, 30], |b| b.base_point, |b, v| b.base_point = v)
        // the name is repeated; the first occurrence wins
        .value("name_repeat", 3, |b| b.name.as_str().into(), |_, _| {})
        .value("xref_path", 1, |b| b.xref_path.as_str().into(), |b, v| b.xref_path = v.into_string())
        .when(|b| !b.xref_path.is_empty())
        .value("description", 4, |b| b.description.as_str().into(), |b, v| b.description = v.into_string())
        .since(DxfVersion::AC1015)
        .when(|b| !b.description.is_empty())
        .build()
});

static BLOCK_END_SCHEMA: Lazy<ObjectSchema<BlockEnd>> = Lazy::new(|| {
    common_fields(SchemaBuilder::<BlockEnd>::new("ENDBLK"))
        .subclass("AcDbBlockEnd")
        .build()
});

impl DxfKind for Block {
    const TYPE_NAME: &'static str = "BLOCK";
    const CATEGORY: ObjectCategory = ObjectCategory::BlockBoundary;

    fn schema() -> &'static ObjectSchema<Self> {
        &BLOCK_SCHEMA
    }
}

impl DxfKind for BlockEnd {
    const TYPE_NAME: &'static str = "ENDBLK";
    const CATEGORY: ObjectCategory = ObjectCategory::BlockBoundary;

    fn schema() -> &'static ObjectSchema<Self> {
        &BLOCK_END_SCHEMA
    }
}
