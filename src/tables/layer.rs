//! Layer table entry

use bitflags::bitflags;
use once_cell::sync::Lazy;

use super::record_fields;
use crate::objects::{DxfKind, ObjectCategory, Pointer};
use crate::schema::{ObjectSchema, SchemaBuilder};
use crate::types::{Color, DxfVersion};

bitflags! {
    /// Layer flags (DXF code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LayerFlags: i16 {
        /// Layer is frozen
        const FROZEN = 1;
        /// Frozen by default in new viewports
        const FROZEN_IN_NEW_VIEWPORTS = 2;
        /// Layer is locked
        const LOCKED = 4;
        /// Depends on an external reference
        const XREF_DEPENDENT = 16;
        /// The external reference is resolved
        const XREF_RESOLVED = 32;
        /// Referenced by at least one entity
        const REFERENCED = 64;
    }
}

/// Line weight meaning "the drawing default".
pub const LINE_WEIGHT_DEFAULT: i16 = -3;

/// A layer table entry
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer name
    pub name: String,
    /// Layer flags
    pub flags: LayerFlags,
    /// Layer color
    pub color: Color,
    /// Layer is off; written as a negative color index
    pub off: bool,
    /// Line type name
    pub line_type: String,
    /// Is this layer plottable?
    pub is_plottable: bool,
    /// Line weight (DXF code 370)
    pub line_weight: i16,
    /// Plot style (DXF code 390)
    pub plot_style: Pointer,
    /// Material (DXF code 347)
    pub material: Pointer,
}

impl Layer {
    /// Create a new layer with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Layer {
            name: name.into(),
            flags: LayerFlags::empty(),
            color: Color::WHITE,
            off: false,
            line_type: "Continuous".to_string(),
            is_plottable: true,
            line_weight: LINE_WEIGHT_DEFAULT,
            plot_style: Pointer::NULL,
            material: Pointer::NULL,
        }
    }

    /// Create the standard "0" layer
    pub fn layer_0() -> Self {
        Self::new("0")
    }

    /// Create a layer with a specific color
    pub fn with_color(name: impl Into<String>, color: Color) -> Self {
        Layer {
            color,
            ..Self::new(name)
        }
    }

    /// Check if the layer is frozen
    pub fn is_frozen(&self) -> bool {
        self.flags.contains(LayerFlags::FROZEN)
    }

    /// Check if the layer is locked
    pub fn is_locked(&self) -> bool {
        self.flags.contains(LayerFlags::LOCKED)
    }

    /// Check if the layer is visible (not off and not frozen)
    pub fn is_visible(&self) -> bool {
        !self.off && !self.is_frozen()
    }

    fn signed_color(&self) -> i16 {
        if self.off {
            -self.color.index()
        } else {
            self.color.index()
        }
    }

    fn set_signed_color(&mut self, index: i16) {
        self.off = index < 0;
        self.color = Color::from_index(index.saturating_abs());
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::layer_0()
    }
}

static SCHEMA: Lazy<ObjectSchema<Layer>> = Lazy::new(|| {
    record_fields(SchemaBuilder::<Layer>::new("LAYER"), "AcDbLayerTableRecord")
        .value("flags", 70, |l| l.flags.bits().into(), |l, v| {
            l.flags = LayerFlags::from_bits_retain(v.to_i16())
        })
        .value("color", 62, |l| l.signed_color().into(), |l, v| l.set_signed_color(v.to_i16()))
        .value("line_type", 6, |l| l.line_type.as_str().into(), |l, v| l.line_type = v.into_string())
        .value("is_plottable", 290, |l| l.is_plottable.into(), |l, v| l.is_plottable = v.to_bool())
        .since(DxfVersion::AC1015)
        .when(|l| !l.is_plottable)
        .value("line_weight", 370, |l| l.line_weight.into(), |l, v| l.line_weight = v.to_i16())
        .since(DxfVersion::AC1015)
        .pointer("plot_style", 390, |l| &l.plot_style, |l| &mut l.plot_style)
        .since(DxfVersion::AC1015)
        .pointer("material", 347, |l| &l.material, |l| &mut l.material)
        .since(DxfVersion::AC1021)
        .when(|l| !l.material.is_null())
        .build()
});

impl DxfKind for Layer {
    const TYPE_NAME: &'static str = "LAYER";
    const CATEGORY: ObjectCategory = ObjectCategory::TableRecord;

    fn schema() -> &'static ObjectSchema<Self> {
        &SCHEMA
    }
}
