//! Lightweight polyline entity

use once_cell::sync::Lazy;

use super::{common_fields, EntityCommon};
use crate::io::dxf::CodeValue;
use crate::objects::{DxfKind, ObjectCategory};
use crate::schema::{Cardinality, ObjectSchema, SchemaBuilder};
use crate::types::{DxfVersion, Vector3};

/// A vertex in a lightweight polyline
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LwVertex {
    pub x: f64,
    pub y: f64,
    /// Starting width (DXF code 40)
    pub start_width: f64,
    /// Ending width (DXF code 41)
    pub end_width: f64,
    /// Bulge (DXF code 42)
    pub bulge: f64,
}

impl LwVertex {
    /// Create a new vertex at a location
    pub fn new(x: f64, y: f64) -> Self {
        LwVertex {
            x,
            y,
            ..Default::default()
        }
    }

    /// Create a new vertex with bulge
    pub fn with_bulge(x: f64, y: f64, bulge: f64) -> Self {
        LwVertex {
            bulge,
            ..Self::new(x, y)
        }
    }
}

/// Closed polyline flag bit
pub const LWPOLYLINE_CLOSED: i16 = 1;

/// A lightweight polyline: planar vertices stored inline (R14 and later)
#[derive(Debug, Clone, PartialEq)]
pub struct LwPolyline {
    /// Common entity data
    pub common: EntityCommon,
    /// Vertices
    pub vertices: Vec<LwVertex>,
    /// Polyline flags (DXF code 70)
    pub flags: i16,
    /// Constant width (DXF code 43)
    pub constant_width: f64,
    /// Elevation (DXF code 38)
    pub elevation: f64,
    /// Thickness (DXF code 39)
    pub thickness: f64,
    /// Normal vector
    pub normal: Vector3,
}

impl LwPolyline {
    /// Create a new empty polyline
    pub fn new() -> Self {
        LwPolyline {
            common: EntityCommon::new(),
            vertices: Vec::new(),
            flags: 0,
            constant_width: 0.0,
            elevation: 0.0,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Add a vertex
    pub fn add_vertex(&mut self, vertex: LwVertex) {
        self.vertices.push(vertex);
    }

    pub fn is_closed(&self) -> bool {
        self.flags & LWPOLYLINE_CLOSED != 0
    }

    /// Close the polyline
    pub fn close(&mut self) {
        self.flags |= LWPOLYLINE_CLOSED;
    }
}

impl Default for LwPolyline {
    fn default() -> Self {
        Self::new()
    }
}

fn vertex_element(v: &LwVertex) -> Vec<CodeValue> {
    vec![
        v.x.into(),
        v.y.into(),
        v.start_width.into(),
        v.end_width.into(),
        v.bulge.into(),
    ]
}

fn element_vertex(element: &[CodeValue]) -> LwVertex {
    let member = |i: usize| element.get(i).map_or(0.0, CodeValue::to_f64);
    LwVertex {
        x: member(0),
        y: member(1),
        start_width: member(2),
        end_width: member(3),
        bulge: member(4),
    }
}

static SCHEMA: Lazy<ObjectSchema<LwPolyline>> = Lazy::new(|| {
    common_fields(SchemaBuilder::<LwPolyline>::new("LWPOLYLINE"))
        .kind_since(DxfVersion::AC1014)
        .subclass("AcDbPolyline")
        // derived from the vertex list
        .value("vertex_count", 90, |p| (p.vertices.len() as i32).into(), |_, _| {})
        .value("flags", 70, |p| p.flags.into(), |p, v| p.flags = v.to_i16())
        .value("constant_width", 43, |p| p.constant_width.into(), |p, v| p.constant_width = v.to_f64())
        .when(|p| p.constant_width != 0.0)
        .value("elevation", 38, |p| p.elevation.into(), |p, v| p.elevation = v.to_f64())
        .when(|p| p.elevation != 0.0)
        .value("thickness", 39, |p| p.thickness.into(), |p, v| p.thickness = v.to_f64())
        .when(|p| p.thickness != 0.0)
        .list(
            "vertices",
            &[10, 20, 40, 41, 42],
            Cardinality::Repeated,
            |p| p.vertices.iter().map(vertex_element).collect(),
            |p, elements| p.vertices = elements.iter().map(|e| element_vertex(e)).collect(),
        )
        .point("normal", [210, 220, 230], |p| p.normal, |p, v| p.normal = v)
        .when(|p| p.normal != Vector3::UNIT_Z)
        .build()
});

impl DxfKind for LwPolyline {
    const TYPE_NAME: &'static str = "LWPOLYLINE";
    const CATEGORY: ObjectCategory = ObjectCategory::Entity;

    fn schema() -> &'static ObjectSchema<Self> {
        &SCHEMA
    }
}
