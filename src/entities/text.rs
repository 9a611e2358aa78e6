//! Text entity

use once_cell::sync::Lazy;

use super::{common_fields, EntityCommon};
use crate::objects::{DxfKind, ObjectCategory};
use crate::schema::{ObjectSchema, SchemaBuilder};
use crate::types::Vector3;

/// Text horizontal alignment (DXF code 72)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextHorizontalAlignment {
    /// Left aligned
    #[default]
    Left,
    /// Center aligned
    Center,
    /// Right aligned
    Right,
    /// Aligned (fit between two points)
    Aligned,
    /// Middle (centered horizontally and vertically)
    Middle,
    /// Fit (fit between two points, adjust height)
    Fit,
}

impl TextHorizontalAlignment {
    pub fn from_code(code: i16) -> Self {
        match code {
            1 => Self::Center,
            2 => Self::Right,
            3 => Self::Aligned,
            4 => Self::Middle,
            5 => Self::Fit,
            _ => Self::Left,
        }
    }

    pub fn code(&self) -> i16 {
        *self as i16
    }
}

/// Text vertical alignment (DXF code 73)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextVerticalAlignment {
    /// Baseline
    #[default]
    Baseline,
    /// Bottom
    Bottom,
    /// Middle
    Middle,
    /// Top
    Top,
}

impl TextVerticalAlignment {
    pub fn from_code(code: i16) -> Self {
        match code {
            1 => Self::Bottom,
            2 => Self::Middle,
            3 => Self::Top,
            _ => Self::Baseline,
        }
    }

    pub fn code(&self) -> i16 {
        *self as i16
    }
}

/// A single-line text entity
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// Common entity data
    pub common: EntityCommon,
    /// Text content
    pub value: String,
    /// Insertion point (first alignment point)
    pub insertion_point: Vector3,
    /// Second alignment point, used by any justification but left/baseline
    pub alignment_point: Vector3,
    /// Text height
    pub height: f64,
    /// Rotation angle in degrees
    pub rotation: f64,
    /// Width scale factor
    pub width_factor: f64,
    /// Oblique angle in degrees
    pub oblique_angle: f64,
    /// Text style name
    pub style: String,
    /// Mirroring flags (DXF code 71)
    pub generation_flags: i16,
    /// Horizontal alignment
    pub horizontal_alignment: TextHorizontalAlignment,
    /// Vertical alignment
    pub vertical_alignment: TextVerticalAlignment,
    /// Thickness
    pub thickness: f64,
    /// Normal vector
    pub normal: Vector3,
}

impl Text {
    /// Create a new text entity
    pub fn new() -> Self {
        Text {
            common: EntityCommon::new(),
            value: String::new(),
            insertion_point: Vector3::ZERO,
            alignment_point: Vector3::ZERO,
            height: 1.0,
            rotation: 0.0,
            width_factor: 1.0,
            oblique_angle: 0.0,
            style: "STANDARD".to_string(),
            generation_flags: 0,
            horizontal_alignment: TextHorizontalAlignment::Left,
            vertical_alignment: TextVerticalAlignment::Baseline,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Create a new text with value and position
    pub fn with_value(value: impl Into<String>, position: Vector3) -> Self {
        Text {
            value: value.into(),
            insertion_point: position,
            ..Self::new()
        }
    }

    /// Set the text height
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Whether the second alignment point is meaningful
    pub fn is_justified(&self) -> bool {
        self.horizontal_alignment != TextHorizontalAlignment::Left
            || self.vertical_alignment != TextVerticalAlignment::Baseline
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new()
    }
}

static SCHEMA: Lazy<ObjectSchema<Text>> = Lazy::new(|| {
    common_fields(SchemaBuilder::<Text>::new("TEXT"))
        .subclass("AcDbText")
        .value("thickness", 39, |t| t.thickness.into(), |t, v| t.thickness = v.to_f64())
        .when(|t| t.thickness != 0.0)
        .point("insertion_point", [10, 20, 30], |t| t.insertion_point, |t, v| t.insertion_point = v)
        .value("height", 40, |t| t.height.into(), |t, v| t.height = v.to_f64())
        .value("value", 1, |t| t.value.as_str().into(), |t, v| t.value = v.into_string())
        .value("rotation", 50, |t| t.rotation.into(), |t, v| t.rotation = v.to_f64())
        .when(|t| t.rotation != 0.0)
        .value("width_factor", 41, |t| t.width_factor.into(), |t, v| t.width_factor = v.to_f64())
        .when(|t| t.width_factor != 1.0)
        .value("oblique_angle", 51, |t| t.oblique_angle.into(), |t, v| t.oblique_angle = v.to_f64())
        .when(|t| t.oblique_angle != 0.0)
        .value("style", 7, |t| t.style.as_str().into(), |t, v| t.style = v.into_string())
        .when(|t| t.style != "STANDARD")
        .value(
            "generation_flags",
            71,
            |t| t.generation_flags.into(),
            |t, v| t.generation_flags = v.to_i16(),
        )
        .when(|t| t.generation_flags != 0)
        .value(
            "horizontal_alignment",
            72,
            |t| t.horizontal_alignment.code().into(),
            |t, v| t.horizontal_alignment = TextHorizontalAlignment::from_code(v.to_i16()),
        )
        .when(|t| t.horizontal_alignment != TextHorizontalAlignment::Left)
        .point("alignment_point", [11, 21, 31], |t| t.alignment_point, |t, v| t.alignment_point = v)
        .when(Text::is_justified)
        .point("normal", [210, 220, 230], |t| t.normal, |t, v| t.normal = v)
        .when(|t| t.normal != Vector3::UNIT_Z)
        .subclass("AcDbText")
        .value(
            "vertical_alignment",
            73,
            |t| t.vertical_alignment.code().into(),
            |t, v| t.vertical_alignment = TextVerticalAlignment::from_code(v.to_i16()),
        )
        .when(|t| t.vertical_alignment != TextVerticalAlignment::Baseline)
        .build()
});

impl DxfKind for Text {
    const TYPE_NAME: &'static str = "TEXT";
    const CATEGORY: ObjectCategory = ObjectCategory::Entity;

    fn schema() -> &'static ObjectSchema<Self> {
        &SCHEMA
    }
}
