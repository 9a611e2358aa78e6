//! Dictionary object

use once_cell::sync::Lazy;

use super::{DxfKind, NamedPointer, ObjectCategory, Pointer};
use crate::schema::{ObjectSchema, SchemaBuilder};
use crate::types::DxfVersion;

/// Dictionary object - maps names to owned or referenced objects
///
/// Entries keep file order. A hard-owner dictionary writes its entries as
/// hard-owner handles (code 360) instead of soft-owner handles (code 350).
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    /// Dictionary entries (key -> pointer)
    pub entries: Vec<NamedPointer>,
    /// Hard owner flag (DXF code 280)
    pub hard_owner: bool,
    /// Duplicate record cloning flag (DXF code 281)
    pub duplicate_cloning: i16,
}

impl Dictionary {
    /// Create a new dictionary
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            hard_owner: false,
            duplicate_cloning: 1,
        }
    }

    /// Add an entry to the dictionary
    pub fn add_entry(&mut self, key: impl Into<String>, pointer: impl Into<Pointer>) {
        self.entries.push(NamedPointer::new(key, pointer.into()));
    }

    /// Get a pointer by key
    pub fn get(&self, key: &str) -> Option<&Pointer> {
        self.entries
            .iter()
            .find(|entry| entry.name == key)
            .map(|entry| &entry.pointer)
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

static SCHEMA: Lazy<ObjectSchema<Dictionary>> = Lazy::new(|| {
    SchemaBuilder::<Dictionary>::new("DICTIONARY")
        .subclass("AcDbDictionary")
        .value("hard_owner", 280, |d| d.hard_owner.into(), |d, v| d.hard_owner = v.to_bool())
        .since(DxfVersion::AC1015)
        .when(|d| d.hard_owner)
        .value(
            "duplicate_cloning",
            281,
            |d| d.duplicate_cloning.into(),
            |d, v| d.duplicate_cloning = v.to_i16(),
        )
        .since(DxfVersion::AC1015)
        .named_pointers(
            "entries",
            &[3, 350, 360],
            |d| &d.entries,
            |d| &mut d.entries,
            |d| if d.hard_owner { 360 } else { 350 },
        )
        .build()
});

impl DxfKind for Dictionary {
    const TYPE_NAME: &'static str = "DICTIONARY";
    const CATEGORY: ObjectCategory = ObjectCategory::Object;

    fn schema() -> &'static ObjectSchema<Self> {
        &SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::dxf::reader::PairStream;
    use crate::io::dxf::CodePair;
    use crate::notification::NotificationCollection;
    use crate::schema::{FieldReader, FieldWriter, RawHandles, Trailing};
    use crate::types::Handle;

    #[test]
    fn test_dictionary_entries() {
        let mut dict = Dictionary::new();
        assert!(dict.is_empty());

        dict.add_entry("KEY1", Handle::new(100));
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("KEY1"), Some(&Pointer::from_handle(Handle::new(100))));
        assert_eq!(dict.get("KEY2"), None);
    }

    #[test]
    fn test_hard_owner_writes_360() {
        let mut dict = Dictionary::new();
        dict.hard_owner = true;
        dict.add_entry("ACAD_GROUP", Handle::new(0xD));

        let mut pairs = Vec::new();
        let mut notes = NotificationCollection::new();
        FieldWriter::new(DxfVersion::AC1015, true, &RawHandles).write(
            Dictionary::schema(),
            &dict,
            &mut pairs,
            &mut notes,
        );
        assert_eq!(
            pairs,
            vec![
                CodePair::new(100, "AcDbDictionary"),
                CodePair::new(280, true),
                CodePair::new(281, 1i16),
                CodePair::new(3, "ACAD_GROUP"),
                CodePair::new(360, Handle::new(0xD)),
            ]
        );
    }

    #[test]
    fn test_reads_either_owner_code() {
        let mut stream = PairStream::from_pairs(vec![
            CodePair::new(100, "AcDbDictionary"),
            CodePair::new(3, "A"),
            CodePair::new(350, Handle::new(0x10)),
            CodePair::new(3, "B"),
            CodePair::new(360, Handle::new(0x11)),
            CodePair::new(0, "DICTIONARY"),
        ]);
        let mut dict = Dictionary::new();
        let extension = FieldReader::new(DxfVersion::AC1015)
            .read(Dictionary::schema(), &mut dict, &mut stream, Trailing::Capture)
            .unwrap();
        assert!(extension.is_empty());
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("B"), Some(&Pointer::from_handle(Handle::new(0x11))));
    }
}
