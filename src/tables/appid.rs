//! Registered application table entry

use once_cell::sync::Lazy;

use super::record_fields;
use crate::objects::{DxfKind, ObjectCategory};
use crate::schema::{ObjectSchema, SchemaBuilder};

/// Application ID table entry, registering an extended-data owner
#[derive(Debug, Clone, PartialEq)]
pub struct AppId {
    /// Application name
    pub name: String,
    /// Standard flags (DXF code 70)
    pub flags: i16,
}

impl AppId {
    /// Create a new application ID
    pub fn new(name: impl Into<String>) -> Self {
        AppId {
            name: name.into(),
            flags: 0,
        }
    }

    /// The ACAD application ID every drawing registers
    pub fn acad() -> Self {
        Self::new("ACAD")
    }
}

impl Default for AppId {
    fn default() -> Self {
        Self::new("")
    }
}

static SCHEMA: Lazy<ObjectSchema<AppId>> = Lazy::new(|| {
    record_fields(SchemaBuilder::<AppId>::new("APPID"), "AcDbRegAppTableRecord")
        .value("flags", 70, |a| a.flags.into(), |a, v| a.flags = v.to_i16())
        .build()
});

impl DxfKind for AppId {
    const TYPE_NAME: &'static str = "APPID";
    const CATEGORY: ObjectCategory = ObjectCategory::TableRecord;

    fn schema() -> &'static ObjectSchema<Self> {
        &SCHEMA
    }
}
