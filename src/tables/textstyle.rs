//! Text style table entry

use once_cell::sync::Lazy;

use super::record_fields;
use crate::objects::{DxfKind, ObjectCategory};
use crate::schema::{ObjectSchema, SchemaBuilder};

/// Text generation flag: mirrored in X
pub const TEXT_BACKWARD: i16 = 2;
/// Text generation flag: mirrored in Y
pub const TEXT_UPSIDE_DOWN: i16 = 4;

/// A text style table entry
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Style name
    pub name: String,
    /// Standard flags (DXF code 70)
    pub flags: i16,
    /// Fixed text height; 0 when not fixed
    pub height: f64,
    /// Width factor
    pub width_factor: f64,
    /// Oblique angle in degrees
    pub oblique_angle: f64,
    /// Generation flags (DXF code 71)
    pub generation_flags: i16,
    /// Last height used
    pub last_height: f64,
    /// Primary font file name
    pub font_file: String,
    /// Big font file name
    pub big_font_file: String,
}

impl TextStyle {
    /// Create a new text style
    pub fn new(name: impl Into<String>) -> Self {
        TextStyle {
            name: name.into(),
            flags: 0,
            height: 0.0,
            width_factor: 1.0,
            oblique_angle: 0.0,
            generation_flags: 0,
            last_height: 2.5,
            font_file: "txt".to_string(),
            big_font_file: String::new(),
        }
    }

    /// Create the standard text style
    pub fn standard() -> Self {
        Self::new("STANDARD")
    }

    pub fn is_backward(&self) -> bool {
        self.generation_flags & TEXT_BACKWARD != 0
    }

    pub fn is_upside_down(&self) -> bool {
        self.generation_flags & TEXT_UPSIDE_DOWN != 0
    }

    pub fn has_fixed_height(&self) -> bool {
        self.height > 0.0
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::standard()
    }
}

static SCHEMA: Lazy<ObjectSchema<TextStyle>> = Lazy::new(|| {
    record_fields(SchemaBuilder::<TextStyle>::new("STYLE"), "AcDbTextStyleTableRecord")
        .value("flags", 70, |s| s.flags.into(), |s, v| s.flags = v.to_i16())
        .value("height", 40, |s| s.height.into(), |s, v| s.height = v.to_f64())
        .value("width_factor", 41, |s| s.width_factor.into(), |s, v| s.width_factor = v.to_f64())
        .value("oblique_angle", 50, |s| s.oblique_angle.into(), |s, v| s.oblique_angle = v.to_f64())
        .value(
            "generation_flags",
            71,
            |s| s.generation_flags.into(),
            |s, v| s.generation_flags = v.to_i16(),
        )
        .value("last_height", 42, |s| s.last_height.into(), |s, v| s.last_height = v.to_f64())
        .value("font_file", 3, |s| s.font_file.as_str().into(), |s, v| s.font_file = v.into_string())
        .value(
            "big_font_file",
            4,
            |s| s.big_font_file.as_str().into(),
            |s, v| s.big_font_file = v.into_string(),
        )
        .build()
});

impl DxfKind for TextStyle {
    const TYPE_NAME: &'static str = "STYLE";
    const CATEGORY: ObjectCategory = ObjectCategory::TableRecord;

    fn schema() -> &'static ObjectSchema<Self> {
        &SCHEMA
    }
}
