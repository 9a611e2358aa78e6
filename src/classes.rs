//! Class definitions (CLASSES section)
//!
//! Each custom object or entity kind used in a drawing is declared once by a
//! `CLASS` record naming its DXF type, its C++ class and the owning
//! application.

use bitflags::bitflags;
use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::schema::{ObjectSchema, SchemaBuilder};
use crate::types::DxfVersion;

bitflags! {
    /// Operations allowed on proxies of a class (DXF code 90)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ProxyFlags: i32 {
        const ERASE_ALLOWED = 1;
        const TRANSFORM_ALLOWED = 2;
        const COLOR_CHANGE_ALLOWED = 4;
        const LAYER_CHANGE_ALLOWED = 8;
        const LINETYPE_CHANGE_ALLOWED = 16;
        const LINETYPE_SCALE_CHANGE_ALLOWED = 32;
        const VISIBILITY_CHANGE_ALLOWED = 64;
        const CLONING_ALLOWED = 128;
        const LINEWEIGHT_CHANGE_ALLOWED = 256;
        const PLOT_STYLE_NAME_CHANGE_ALLOWED = 512;
        const DISABLES_PROXY_WARNING_DIALOG = 1024;
        const IS_R13_FORMAT_PROXY = 32768;
    }
}

/// A class record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DxfClass {
    /// Record name used in the stream (DXF code 1)
    pub dxf_name: String,
    /// C++ class name (DXF code 2)
    pub cpp_class_name: String,
    /// Application name (DXF code 3)
    pub application_name: String,
    /// Proxy capability flags (DXF code 90)
    pub proxy_flags: ProxyFlags,
    /// Number of instances in the drawing (DXF code 91, R2004+)
    pub instance_count: i32,
    /// Class was loaded as a proxy (DXF code 280)
    pub was_zombie: bool,
    /// Instances are entities rather than objects (DXF code 281)
    pub is_an_entity: bool,
}

impl DxfClass {
    pub fn new(
        dxf_name: impl Into<String>,
        cpp_class_name: impl Into<String>,
        application_name: impl Into<String>,
    ) -> Self {
        Self {
            dxf_name: dxf_name.into(),
            cpp_class_name: cpp_class_name.into(),
            application_name: application_name.into(),
            ..Default::default()
        }
    }

    pub fn schema() -> &'static ObjectSchema<DxfClass> {
        &SCHEMA
    }
}

static SCHEMA: Lazy<ObjectSchema<DxfClass>> = Lazy::new(|| {
    SchemaBuilder::<DxfClass>::new("CLASS")
        .kind_since(DxfVersion::AC1012)
        .value("dxf_name", 1, |c| c.dxf_name.as_str().into(), |c, v| c.dxf_name = v.into_string())
        .required()
        .value(
            "cpp_class_name",
            2,
            |c| c.cpp_class_name.as_str().into(),
            |c, v| c.cpp_class_name = v.into_string(),
        )
        .value(
            "application_name",
            3,
            |c| c.application_name.as_str().into(),
            |c, v| c.application_name = v.into_string(),
        )
        .value("proxy_flags", 90, |c| c.proxy_flags.bits().into(), |c, v| {
            c.proxy_flags = ProxyFlags::from_bits_retain(v.to_i32())
        })
        .value("instance_count", 91, |c| c.instance_count.into(), |c, v| c.instance_count = v.to_i32())
        .since(DxfVersion::AC1018)
        .value("was_zombie", 280, |c| i16::from(c.was_zombie).into(), |c, v| c.was_zombie = v.to_bool())
        .value(
            "is_an_entity",
            281,
            |c| i16::from(c.is_an_entity).into(),
            |c, v| c.is_an_entity = v.to_bool(),
        )
        .build()
});

/// Classes of a drawing keyed by DXF name, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DxfClassCollection {
    classes: IndexMap<String, DxfClass>,
}

impl DxfClassCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class, replacing any class of the same DXF name.
    pub fn add_or_update(&mut self, class: DxfClass) {
        self.classes.insert(class.dxf_name.clone(), class);
    }

    pub fn get(&self, dxf_name: &str) -> Option<&DxfClass> {
        self.classes.get(dxf_name)
    }

    pub fn contains(&self, dxf_name: &str) -> bool {
        self.classes.contains_key(dxf_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DxfClass> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn clear(&mut self) {
        self.classes.clear();
    }
}
