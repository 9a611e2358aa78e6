//! Symbol tables (TABLES section)
//!
//! A table is a `TABLE` object carrying the table's own fields, followed by
//! its records. Records are named; the table name matches the record type
//! name (`LAYER` records live in the `LAYER` table).

use once_cell::sync::Lazy;

use crate::objects::{DxfKind, ObjectCategory, ObjectId};
use crate::schema::{ObjectSchema, SchemaBuilder};

pub mod appid;
pub mod block_record;
pub mod layer;
pub mod linetype;
pub mod textstyle;

pub use appid::AppId;
pub use block_record::BlockRecord;
pub use layer::{Layer, LayerFlags};
pub use linetype::{LineType, LineTypeElement};
pub use textstyle::TextStyle;

/// Order tables are written in.
pub const TABLE_ORDER: [&str; 9] = [
    "VPORT",
    "LTYPE",
    "LAYER",
    "STYLE",
    "VIEW",
    "UCS",
    "APPID",
    "DIMSTYLE",
    "BLOCK_RECORD",
];

/// Base trait for all table entries
pub trait TableEntry {
    /// Get the entry's name
    fn name(&self) -> &str;

    /// Set the entry's name
    fn set_name(&mut self, name: String);
}

/// Append the fields every record starts with: the two subclass markers and
/// the record name.
pub(crate) fn record_fields<T: TableEntry + 'static>(
    builder: SchemaBuilder<T>,
    subclass: &'static str,
) -> SchemaBuilder<T> {
    builder
        .subclass("AcDbSymbolTableRecord")
        .subclass(subclass)
        .value("name", 2, |r| r.name().into(), |r, v| r.set_name(v.into_string()))
        .required()
}

/// The `TABLE` object opening a symbol table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableHeader {
    /// Maximum number of entries (DXF code 70); rewritten on save
    pub max_entries: i16,
}

static TABLE_SCHEMA: Lazy<ObjectSchema<TableHeader>> = Lazy::new(|| {
    SchemaBuilder::<TableHeader>::new("TABLE")
        .subclass("AcDbSymbolTable")
        .value("max_entries", 70, |t| t.max_entries.into(), |t, v| t.max_entries = v.to_i16())
        .build()
});

impl DxfKind for TableHeader {
    const TYPE_NAME: &'static str = "TABLE";
    const CATEGORY: ObjectCategory = ObjectCategory::TableHeader;

    fn schema() -> &'static ObjectSchema<Self> {
        &TABLE_SCHEMA
    }
}

/// A symbol table: its `TABLE` object and its records, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTable {
    /// Table name, e.g. `LAYER`
    pub name: String,
    /// The `TABLE` object
    pub header: ObjectId,
    /// Records
    pub entries: Vec<ObjectId>,
}

impl SymbolTable {
    pub fn new(name: impl Into<String>, header: ObjectId) -> Self {
        Self {
            name: name.into(),
            header,
            entries: Vec::new(),
        }
    }

    /// Position in the canonical write order; unknown tables go last.
    pub fn order(&self) -> usize {
        TABLE_ORDER
            .iter()
            .position(|name| *name == self.name)
            .unwrap_or(TABLE_ORDER.len())
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

macro_rules! impl_table_entry {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl TableEntry for $kind {
                fn name(&self) -> &str {
                    &self.name
                }

                fn set_name(&mut self, name: String) {
                    self.name = name;
                }
            }
        )+
    };
}

impl_table_entry!(Layer, LineType, TextStyle, AppId, BlockRecord);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order() {
        let layer = SymbolTable::new("LAYER", ObjectId(0));
        let ltype = SymbolTable::new("LTYPE", ObjectId(1));
        let custom = SymbolTable::new("CUSTOM", ObjectId(2));
        assert!(ltype.order() < layer.order());
        assert_eq!(custom.order(), TABLE_ORDER.len());
    }

    #[test]
    fn test_record_names() {
        let mut layer = Layer::new("WALLS");
        assert_eq!(layer.name(), "WALLS");
        layer.set_name("DOORS".into());
        assert_eq!(layer.name, "DOORS");
    }
}
