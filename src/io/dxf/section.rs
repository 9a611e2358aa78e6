//! Section names and framing markers

use std::fmt;

use crate::types::DxfVersion;

pub const SECTION: &str = "SECTION";
pub const END_SECTION: &str = "ENDSEC";
pub const TABLE: &str = "TABLE";
pub const END_TABLE: &str = "ENDTAB";
pub const BLOCK: &str = "BLOCK";
pub const END_BLOCK: &str = "ENDBLK";
pub const CLASS: &str = "CLASS";
pub const END_OF_FILE: &str = "EOF";

/// A top-level section of a DXF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DxfSection {
    Header,
    Classes,
    Tables,
    Blocks,
    Entities,
    Objects,
    ThumbnailImage,
}

impl DxfSection {
    /// Every section, in the order sections are written.
    pub const CANONICAL_ORDER: [DxfSection; 7] = [
        DxfSection::Header,
        DxfSection::Classes,
        DxfSection::Tables,
        DxfSection::Blocks,
        DxfSection::Entities,
        DxfSection::Objects,
        DxfSection::ThumbnailImage,
    ];

    /// Name carried by the `2` pair after `0 SECTION`
    pub fn name(&self) -> &'static str {
        match self {
            DxfSection::Header => "HEADER",
            DxfSection::Classes => "CLASSES",
            DxfSection::Tables => "TABLES",
            DxfSection::Blocks => "BLOCKS",
            DxfSection::Entities => "ENTITIES",
            DxfSection::Objects => "OBJECTS",
            DxfSection::ThumbnailImage => "THUMBNAILIMAGE",
        }
    }

    /// Look up a section by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<DxfSection> {
        Self::CANONICAL_ORDER.iter().copied().find(|s| s.name() == name)
    }

    /// First version whose files may carry this section even when empty.
    pub fn min_version(&self) -> Option<DxfVersion> {
        match self {
            DxfSection::Classes | DxfSection::Objects => Some(DxfVersion::AC1012),
            DxfSection::ThumbnailImage => Some(DxfVersion::AC1015),
            _ => None,
        }
    }
}

impl fmt::Display for DxfSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_case_sensitive() {
        assert_eq!(DxfSection::from_name("OBJECTS"), Some(DxfSection::Objects));
        assert_eq!(DxfSection::from_name("objects"), None);
        assert_eq!(DxfSection::from_name("ACDSDATA"), None);
    }

    #[test]
    fn test_canonical_order() {
        let names: Vec<&str> = DxfSection::CANONICAL_ORDER.iter().map(DxfSection::name).collect();
        assert_eq!(
            names,
            vec!["HEADER", "CLASSES", "TABLES", "BLOCKS", "ENTITIES", "OBJECTS", "THUMBNAILIMAGE"]
        );
    }
}
