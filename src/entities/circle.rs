//! Circle entity

use once_cell::sync::Lazy;

use super::{common_fields, EntityCommon};
use crate::objects::{DxfKind, ObjectCategory};
use crate::schema::{ObjectSchema, SchemaBuilder};
use crate::types::Vector3;

/// A circle entity
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    /// Common entity data
    pub common: EntityCommon,
    /// Center point of the circle
    pub center: Vector3,
    /// Radius of the circle
    pub radius: f64,
    /// Thickness (extrusion in Z direction)
    pub thickness: f64,
    /// Normal vector
    pub normal: Vector3,
}

impl Circle {
    /// Create a new circle at the origin with radius 1
    pub fn new() -> Self {
        Circle {
            common: EntityCommon::new(),
            center: Vector3::ZERO,
            radius: 1.0,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Create a new circle with center and radius
    pub fn from_center_radius(center: Vector3, radius: f64) -> Self {
        Circle {
            center,
            radius,
            ..Self::new()
        }
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self::new()
    }
}

static SCHEMA: Lazy<ObjectSchema<Circle>> = Lazy::new(|| {
    common_fields(SchemaBuilder::<Circle>::new("CIRCLE"))
        .subclass("AcDbCircle")
        .value("thickness", 39, |c| c.thickness.into(), |c, v| c.thickness = v.to_f64())
        .when(|c| c.thickness != 0.0)
        .point("center", [10, 20, 30], |c| c.center, |c, v| c.center = v)
        .value("radius", 40, |c| c.radius.into(), |c, v| c.radius = v.to_f64())
        .point("normal", [210, 220, 230], |c| c.normal, |c, v| c.normal = v)
        .when(|c| c.normal != Vector3::UNIT_Z)
        .build()
});

impl DxfKind for Circle {
    const TYPE_NAME: &'static str = "CIRCLE";
    const CATEGORY: ObjectCategory = ObjectCategory::Entity;

    fn schema() -> &'static ObjectSchema<Self> {
        &SCHEMA
    }
}
