//! CAD entity types and traits

use crate::schema::SchemaBuilder;
use crate::types::{Color, DxfVersion};

pub mod block;
pub mod circle;
pub mod line;
pub mod lwpolyline;
pub mod text;

pub use block::{Block, BlockEnd};
pub use circle::Circle;
pub use line::Line;
pub use lwpolyline::{LwPolyline, LwVertex};
pub use text::{Text, TextHorizontalAlignment, TextVerticalAlignment};

/// Line weight meaning "as the layer".
pub const LINE_WEIGHT_BY_LAYER: i16 = -1;

/// Default linetype name.
pub const BY_LAYER: &str = "BYLAYER";

/// Base trait for all CAD entities
pub trait Entity {
    /// Common entity data
    fn common(&self) -> &EntityCommon;

    fn common_mut(&mut self) -> &mut EntityCommon;

    /// Get the entity's layer name
    fn layer(&self) -> &str {
        &self.common().layer
    }

    /// Set the entity's layer name
    fn set_layer(&mut self, layer: impl Into<String>)
    where
        Self: Sized,
    {
        self.common_mut().layer = layer.into();
    }

    /// Get the entity's color
    fn color(&self) -> Color {
        self.common().color
    }

    /// Set the entity's color
    fn set_color(&mut self, color: Color) {
        self.common_mut().color = color;
    }
}

/// Common entity data shared by all entities
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    /// Layer name (DXF code 8)
    pub layer: String,
    /// Linetype name (DXF code 6)
    pub linetype: String,
    /// Color (DXF code 62)
    pub color: Color,
    /// Line weight in hundredths of a millimetre (DXF code 370)
    pub line_weight: i16,
    /// Linetype scale (DXF code 48)
    pub linetype_scale: f64,
    /// Lives in paper space (DXF code 67)
    pub paper_space: bool,
    /// Visibility flag (DXF code 60)
    pub invisible: bool,
}

impl EntityCommon {
    /// Create new common entity data with defaults
    pub fn new() -> Self {
        EntityCommon {
            layer: "0".to_string(),
            linetype: BY_LAYER.to_string(),
            color: Color::ByLayer,
            line_weight: LINE_WEIGHT_BY_LAYER,
            linetype_scale: 1.0,
            paper_space: false,
            invisible: false,
        }
    }

    /// Create with a specific layer
    pub fn with_layer(layer: impl Into<String>) -> Self {
        EntityCommon {
            layer: layer.into(),
            ..Self::new()
        }
    }
}

impl Default for EntityCommon {
    fn default() -> Self {
        Self::new()
    }
}

/// Append the `AcDbEntity` fields every entity starts with.
pub(crate) fn common_fields<T: Entity + 'static>(builder: SchemaBuilder<T>) -> SchemaBuilder<T> {
    builder
        .subclass("AcDbEntity")
        .value(
            "paper_space",
            67,
            |e| i16::from(e.common().paper_space).into(),
            |e, v| e.common_mut().paper_space = v.to_bool(),
        )
        .when(|e| e.common().paper_space)
        .value(
            "layer",
            8,
            |e| e.common().layer.as_str().into(),
            |e, v| e.common_mut().layer = v.into_string(),
        )
        .value(
            "linetype",
            6,
            |e| e.common().linetype.as_str().into(),
            |e, v| e.common_mut().linetype = v.into_string(),
        )
        .when(|e| e.common().linetype != BY_LAYER)
        .value(
            "color",
            62,
            |e| e.common().color.index().into(),
            |e, v| e.common_mut().color = Color::from_index(v.to_i16()),
        )
        .when(|e| e.common().color != Color::ByLayer)
        .value(
            "line_weight",
            370,
            |e| e.common().line_weight.into(),
            |e, v| e.common_mut().line_weight = v.to_i16(),
        )
        .since(DxfVersion::AC1015)
        .when(|e| e.common().line_weight != LINE_WEIGHT_BY_LAYER)
        .value(
            "linetype_scale",
            48,
            |e| e.common().linetype_scale.into(),
            |e, v| e.common_mut().linetype_scale = v.to_f64(),
        )
        .since(DxfVersion::AC1012)
        .when(|e| e.common().linetype_scale != 1.0)
        .value(
            "invisible",
            60,
            |e| i16::from(e.common().invisible).into(),
            |e, v| e.common_mut().invisible = v.to_bool(),
        )
        .since(DxfVersion::AC1012)
        .when(|e| e.common().invisible)
}

macro_rules! impl_entity {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl Entity for $kind {
                fn common(&self) -> &EntityCommon {
                    &self.common
                }

                fn common_mut(&mut self) -> &mut EntityCommon {
                    &mut self.common
                }
            }
        )+
    };
}

impl_entity!(Line, Circle, Text, LwPolyline, Block, BlockEnd);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::dxf::CodePair;
    use crate::notification::{NotificationCollection, NotificationType};
    use crate::objects::DxfKind;
    use crate::schema::{FieldWriter, RawHandles};

    fn write_line(line: &Line, version: DxfVersion) -> (Vec<CodePair>, NotificationCollection) {
        let mut pairs = Vec::new();
        let mut notes = NotificationCollection::new();
        FieldWriter::new(version, true, &RawHandles).write(Line::schema(), line, &mut pairs, &mut notes);
        (pairs, notes)
    }

    #[test]
    fn test_defaults_are_not_written() {
        let (pairs, _) = write_line(&Line::new(), DxfVersion::AC1015);
        let codes: Vec<i32> = pairs.iter().map(|p| p.code).collect();
        assert_eq!(codes, vec![100, 8, 100, 10, 20, 30, 11, 21, 31]);
    }

    #[test]
    fn test_common_overrides() {
        let mut line = Line::new();
        line.set_layer("WALLS");
        line.set_color(Color::RED);
        line.common.line_weight = 25;
        line.common.linetype = "DASHED".into();
        let (pairs, _) = write_line(&line, DxfVersion::AC1015);
        assert_eq!(pairs[1], CodePair::new(8, "WALLS"));
        assert_eq!(pairs[2], CodePair::new(6, "DASHED"));
        assert_eq!(pairs[3], CodePair::new(62, 1i16));
        assert_eq!(pairs[4], CodePair::new(370, 25i16));
        assert_eq!(line.layer(), "WALLS");
    }

    #[test]
    fn test_line_weight_needs_r2000() {
        let mut line = Line::new();
        line.common.line_weight = 25;
        let (pairs, notes) = write_line(&line, DxfVersion::AC1012);
        assert!(pairs.iter().all(|p| p.code != 370));
        assert!(notes.has_type(NotificationType::UnsupportedVersion));
    }
}
