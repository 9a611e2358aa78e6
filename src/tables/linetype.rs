//! Line type table entry

use once_cell::sync::Lazy;

use super::record_fields;
use crate::io::dxf::CodeValue;
use crate::objects::{DxfKind, ObjectCategory};
use crate::schema::{Cardinality, Element, ObjectSchema, SchemaBuilder};
use crate::types::{DxfVersion, Handle};

/// Codes of one pattern element from R13 on, in stream order.
const ELEMENT_CODES: [i32; 9] = [49, 74, 75, 340, 46, 50, 44, 45, 9];

/// Line type element (dash, dot, space), optionally with an embedded shape or text
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineTypeElement {
    /// Length of the element (positive = dash, negative = space, 0 = dot)
    pub length: f64,
    /// Complex element flags (DXF code 74); 0 for a plain dash
    pub shape_flags: i16,
    /// Shape number, or text index (DXF code 75)
    pub shape_number: i16,
    /// Text style holding the shape (DXF code 340)
    pub style: Handle,
    /// Scale (DXF code 46)
    pub scale: f64,
    /// Rotation in degrees (DXF code 50)
    pub rotation: f64,
    /// X offset (DXF code 44)
    pub offset_x: f64,
    /// Y offset (DXF code 45)
    pub offset_y: f64,
    /// Embedded text (DXF code 9)
    pub text: String,
}

impl LineTypeElement {
    /// Create a dash element
    pub fn dash(length: f64) -> Self {
        LineTypeElement {
            length: length.abs(),
            ..Default::default()
        }
    }

    /// Create a space element
    pub fn space(length: f64) -> Self {
        LineTypeElement {
            length: -length.abs(),
            ..Default::default()
        }
    }

    /// Create a dot element
    pub fn dot() -> Self {
        Self::default()
    }

    pub fn is_dash(&self) -> bool {
        self.length > 0.0
    }

    pub fn is_space(&self) -> bool {
        self.length < 0.0
    }

    pub fn is_dot(&self) -> bool {
        self.length == 0.0
    }

    /// Carries a shape or a text
    pub fn is_complex(&self) -> bool {
        self.shape_flags != 0
    }

    fn to_element(&self) -> Element {
        let mut element = vec![CodeValue::from(self.length), CodeValue::from(self.shape_flags)];
        if self.is_complex() {
            element.extend([
                CodeValue::from(self.shape_number),
                CodeValue::from(self.style),
                CodeValue::from(self.scale),
                CodeValue::from(self.rotation),
                CodeValue::from(self.offset_x),
                CodeValue::from(self.offset_y),
                CodeValue::from(self.text.as_str()),
            ]);
        }
        element
    }

    fn from_element(element: &Element) -> Self {
        let value = |i: usize| element.get(i).cloned().unwrap_or(CodeValue::Integer(0));
        LineTypeElement {
            length: value(0).to_f64(),
            shape_flags: value(1).to_i16(),
            shape_number: value(2).to_i16(),
            style: value(3).to_handle(),
            scale: value(4).to_f64(),
            rotation: value(5).to_f64(),
            offset_x: value(6).to_f64(),
            offset_y: value(7).to_f64(),
            text: element.get(8).map(|v| v.as_str().to_string()).unwrap_or_default(),
        }
    }
}

/// A line type table entry
#[derive(Debug, Clone, PartialEq)]
pub struct LineType {
    /// Line type name
    pub name: String,
    /// Standard flags (DXF code 70)
    pub flags: i16,
    /// Description
    pub description: String,
    /// Alignment code, always `'A'` (65)
    pub alignment: i16,
    /// Total pattern length
    pub pattern_length: f64,
    /// Pattern elements
    pub elements: Vec<LineTypeElement>,
}

impl LineType {
    /// Create a new line type
    pub fn new(name: impl Into<String>) -> Self {
        LineType {
            name: name.into(),
            flags: 0,
            description: String::new(),
            alignment: 65,
            pattern_length: 0.0,
            elements: Vec::new(),
        }
    }

    /// Create the standard "Continuous" line type
    pub fn continuous() -> Self {
        LineType {
            description: "Solid line".to_string(),
            ..Self::new("Continuous")
        }
    }

    /// Create the "ByLayer" line type
    pub fn by_layer() -> Self {
        Self::new("ByLayer")
    }

    /// Create the "ByBlock" line type
    pub fn by_block() -> Self {
        Self::new("ByBlock")
    }

    /// Append an element and extend the pattern length
    pub fn add_element(&mut self, element: LineTypeElement) {
        self.pattern_length += element.length.abs();
        self.elements.push(element);
    }

    /// Check if this is a continuous (solid) line type
    pub fn is_continuous(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for LineType {
    fn default() -> Self {
        Self::new("")
    }
}

static SCHEMA: Lazy<ObjectSchema<LineType>> = Lazy::new(|| {
    record_fields(SchemaBuilder::<LineType>::new("LTYPE"), "AcDbLinetypeTableRecord")
        .value("flags", 70, |l| l.flags.into(), |l, v| l.flags = v.to_i16())
        .value(
            "description",
            3,
            |l| l.description.as_str().into(),
            |l, v| l.description = v.into_string(),
        )
        .value("alignment", 72, |l| l.alignment.into(), |l, v| l.alignment = v.to_i16())
        .value("element_count", 73, |l| (l.elements.len() as i16).into(), |_, _| {})
        .value("pattern_length", 40, |l| l.pattern_length.into(), |l, v| l.pattern_length = v.to_f64())
        .list(
            "elements",
            &[49],
            Cardinality::Repeated,
            |l| l.elements.iter().map(|e| vec![CodeValue::from(e.length)]).collect(),
            |l, elements| l.elements = elements.iter().map(LineTypeElement::from_element).collect(),
        )
        .until(DxfVersion::AC1009)
        .list(
            "elements",
            &ELEMENT_CODES,
            Cardinality::Repeated,
            |l| l.elements.iter().map(LineTypeElement::to_element).collect(),
            |l, elements| l.elements = elements.iter().map(LineTypeElement::from_element).collect(),
        )
        .since(DxfVersion::AC1012)
        .build()
});

impl DxfKind for LineType {
    const TYPE_NAME: &'static str = "LTYPE";
    const CATEGORY: ObjectCategory = ObjectCategory::TableRecord;

    fn schema() -> &'static ObjectSchema<Self> {
        &SCHEMA
    }
}
