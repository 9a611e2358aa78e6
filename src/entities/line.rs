//! Line entity

use once_cell::sync::Lazy;

use super::{common_fields, EntityCommon};
use crate::objects::{DxfKind, ObjectCategory};
use crate::schema::{ObjectSchema, SchemaBuilder};
use crate::types::Vector3;

/// A line entity defined by two endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Common entity data
    pub common: EntityCommon,
    /// Start point of the line
    pub start: Vector3,
    /// End point of the line
    pub end: Vector3,
    /// Thickness (extrusion in Z direction)
    pub thickness: f64,
    /// Normal vector
    pub normal: Vector3,
}

impl Line {
    /// Create a new line from origin to origin
    pub fn new() -> Self {
        Line {
            common: EntityCommon::new(),
            start: Vector3::ZERO,
            end: Vector3::ZERO,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Create a new line between two points
    pub fn from_points(start: Vector3, end: Vector3) -> Self {
        Line {
            start,
            end,
            ..Self::new()
        }
    }

    /// Create a new line from coordinates
    pub fn from_coords(x1: f64, y1: f64, z1: f64, x2: f64, y2: f64, z2: f64) -> Self {
        Line::from_points(Vector3::new(x1, y1, z1), Vector3::new(x2, y2, z2))
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

static SCHEMA: Lazy<ObjectSchema<Line>> = Lazy::new(|| {
    common_fields(SchemaBuilder::<Line>::new("LINE"))
        .subclass("AcDbLine")
        .value("thickness", 39, |l| l.thickness.into(), |l, v| l.thickness = v.to_f64())
        .when(|l| l.thickness != 0.0)
        .point("start", [10, 20, 30], |l| l.start, |l, v| l.start = v)
        .point("end", [11, 21, 31], |l| l.end, |l, v| l.end = v)
        .point("normal", [210, 220, 230], |l| l.normal, |l, v| l.normal = v)
        .when(|l| l.normal != Vector3::UNIT_Z)
        .build()
});

impl DxfKind for Line {
    const TYPE_NAME: &'static str = "LINE";
    const CATEGORY: ObjectCategory = ObjectCategory::Entity;

    fn schema() -> &'static ObjectSchema<Self> {
        &SCHEMA
    }
}
