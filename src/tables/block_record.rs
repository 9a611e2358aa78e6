//! Block record table entry

use once_cell::sync::Lazy;

use super::record_fields;
use crate::objects::{DxfKind, ObjectCategory, Pointer};
use crate::schema::{ObjectSchema, SchemaBuilder};
use crate::types::DxfVersion;

/// A block record table entry (R13 and later)
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRecord {
    /// Block name
    pub name: String,
    /// Associated layout (DXF code 340)
    pub layout: Pointer,
    /// Insertion units (DXF code 70)
    pub units: i16,
    /// Block is explodable (DXF code 280)
    pub explodable: bool,
    /// Block can be scaled non-uniformly (DXF code 281)
    pub scalable: bool,
}

impl BlockRecord {
    /// Create a new block record
    pub fn new(name: impl Into<String>) -> Self {
        BlockRecord {
            name: name.into(),
            layout: Pointer::NULL,
            units: 0,
            explodable: true,
            scalable: true,
        }
    }

    /// Create the model space block record
    pub fn model_space() -> Self {
        Self::new("*Model_Space")
    }

    /// Create the paper space block record
    pub fn paper_space() -> Self {
        Self::new("*Paper_Space")
    }
}

impl Default for BlockRecord {
    fn default() -> Self {
        Self::new("")
    }
}

static SCHEMA: Lazy<ObjectSchema<BlockRecord>> = Lazy::new(|| {
    record_fields(SchemaBuilder::<BlockRecord>::new("BLOCK_RECORD"), "AcDbBlockTableRecord")
        .kind_since(DxfVersion::AC1012)
        .pointer("layout", 340, |b| &b.layout, |b| &mut b.layout)
        .since(DxfVersion::AC1015)
        .value("units", 70, |b| b.units.into(), |b, v| b.units = v.to_i16())
        .since(DxfVersion::AC1018)
        .value("explodable", 280, |b| i16::from(b.explodable).into(), |b, v| b.explodable = v.to_bool())
        .since(DxfVersion::AC1018)
        .value("scalable", 281, |b| i16::from(b.scalable).into(), |b, v| b.scalable = v.to_bool())
        .since(DxfVersion::AC1018)
        .build()
});

impl DxfKind for BlockRecord {
    const TYPE_NAME: &'static str = "BLOCK_RECORD";
    const CATEGORY: ObjectCategory = ObjectCategory::TableRecord;

    fn schema() -> &'static ObjectSchema<Self> {
        &SCHEMA
    }
}
