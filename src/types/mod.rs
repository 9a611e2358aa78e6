//! Core types used throughout dxf-codec

pub mod color;
pub mod handle;
pub mod vector;

pub use color::Color;
pub use handle::Handle;
pub use vector::Vector3;

/// DXF format version, ordered earliest to latest.
///
/// Every field gate and every object kind's applicable range is expressed
/// against this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DxfVersion {
    /// AutoCAD R10 (AC1006)
    AC1006,
    /// AutoCAD R11 and R12 (AC1009)
    AC1009,
    /// AutoCAD R13 (AC1012)
    AC1012,
    /// AutoCAD R14 (AC1014)
    AC1014,
    /// AutoCAD 2000 (AC1015)
    AC1015,
    /// AutoCAD 2004 (AC1018)
    AC1018,
    /// AutoCAD 2007 (AC1021)
    AC1021,
    /// AutoCAD 2010 (AC1024)
    AC1024,
    /// AutoCAD 2013 (AC1027)
    AC1027,
    /// AutoCAD 2018 (AC1032)
    AC1032,
}

impl DxfVersion {
    /// All versions, earliest first.
    pub const ALL: [DxfVersion; 10] = [
        DxfVersion::AC1006,
        DxfVersion::AC1009,
        DxfVersion::AC1012,
        DxfVersion::AC1014,
        DxfVersion::AC1015,
        DxfVersion::AC1018,
        DxfVersion::AC1021,
        DxfVersion::AC1024,
        DxfVersion::AC1027,
        DxfVersion::AC1032,
    ];

    /// Version assumed when a file carries no `$ACADVER`.
    pub const DEFAULT_READ: DxfVersion = DxfVersion::AC1009;

    /// Get the version string (e.g., "AC1015")
    pub fn as_str(&self) -> &'static str {
        match self {
            DxfVersion::AC1006 => "AC1006",
            DxfVersion::AC1009 => "AC1009",
            DxfVersion::AC1012 => "AC1012",
            DxfVersion::AC1014 => "AC1014",
            DxfVersion::AC1015 => "AC1015",
            DxfVersion::AC1018 => "AC1018",
            DxfVersion::AC1021 => "AC1021",
            DxfVersion::AC1024 => "AC1024",
            DxfVersion::AC1027 => "AC1027",
            DxfVersion::AC1032 => "AC1032",
        }
    }

    /// Marketing release name (e.g., "R2000")
    pub fn release_name(&self) -> &'static str {
        match self {
            DxfVersion::AC1006 => "R10",
            DxfVersion::AC1009 => "R12",
            DxfVersion::AC1012 => "R13",
            DxfVersion::AC1014 => "R14",
            DxfVersion::AC1015 => "R2000",
            DxfVersion::AC1018 => "R2004",
            DxfVersion::AC1021 => "R2007",
            DxfVersion::AC1024 => "R2010",
            DxfVersion::AC1027 => "R2013",
            DxfVersion::AC1032 => "R2018",
        }
    }

    /// Parse version from string (e.g., "AC1015")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }

    /// Resolve a `$ACADVER` string to the closest known version.
    ///
    /// Returns the version and whether the string was recognised. Unknown
    /// `ACnnnn` strings map to the latest known version not newer than them,
    /// anything else to the latest version.
    pub fn from_version_string(s: &str) -> (Self, bool) {
        if let Some(version) = Self::parse(s) {
            return (version, true);
        }
        let closest = s
            .trim()
            .strip_prefix("AC")
            .and_then(|digits| digits.parse::<u16>().ok())
            .and_then(|code| {
                Self::ALL
                    .iter()
                    .rev()
                    .copied()
                    .find(|v| v.version_code() <= code)
            })
            .unwrap_or(DxfVersion::AC1032);
        (closest, false)
    }

    /// Get the numeric version code
    pub fn version_code(&self) -> u16 {
        match self {
            DxfVersion::AC1006 => 1006,
            DxfVersion::AC1009 => 1009,
            DxfVersion::AC1012 => 1012,
            DxfVersion::AC1014 => 1014,
            DxfVersion::AC1015 => 1015,
            DxfVersion::AC1018 => 1018,
            DxfVersion::AC1021 => 1021,
            DxfVersion::AC1024 => 1024,
            DxfVersion::AC1027 => 1027,
            DxfVersion::AC1032 => 1032,
        }
    }

    /// Default `$ACADMAINTVER` value for this version.
    pub fn maintenance_version(&self) -> i16 {
        match self {
            DxfVersion::AC1015 => 20,
            DxfVersion::AC1018 => 104,
            DxfVersion::AC1021 => 50,
            DxfVersion::AC1024 => 226,
            DxfVersion::AC1027 => 125,
            DxfVersion::AC1032 => 228,
            _ => 0,
        }
    }

    /// Whether `self` lies in the inclusive range `[min, max]`; open ends are unbounded.
    pub fn within(&self, min: Option<DxfVersion>, max: Option<DxfVersion>) -> bool {
        min.map_or(true, |min| *self >= min) && max.map_or(true, |max| *self <= max)
    }
}

impl Default for DxfVersion {
    fn default() -> Self {
        DxfVersion::AC1015
    }
}

impl std::fmt::Display for DxfVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string() {
        assert_eq!(DxfVersion::AC1015.as_str(), "AC1015");
        assert_eq!(DxfVersion::AC1032.to_string(), "AC1032");
        assert_eq!(DxfVersion::AC1009.release_name(), "R12");
    }

    #[test]
    fn test_version_parse() {
        assert_eq!(DxfVersion::parse("AC1018"), Some(DxfVersion::AC1018));
        assert_eq!(DxfVersion::parse("INVALID"), None);
    }

    #[test]
    fn test_version_ordering() {
        assert!(DxfVersion::AC1006 < DxfVersion::AC1009);
        assert!(DxfVersion::AC1027 < DxfVersion::AC1032);
        let mut sorted = DxfVersion::ALL;
        sorted.sort();
        assert_eq!(sorted, DxfVersion::ALL);
    }

    #[test]
    fn test_unknown_version_string() {
        assert_eq!(
            DxfVersion::from_version_string("AC1016"),
            (DxfVersion::AC1015, false)
        );
        assert_eq!(
            DxfVersion::from_version_string("AC1040"),
            (DxfVersion::AC1032, false)
        );
        assert_eq!(
            DxfVersion::from_version_string("garbage"),
            (DxfVersion::AC1032, false)
        );
        assert_eq!(
            DxfVersion::from_version_string("AC1024"),
            (DxfVersion::AC1024, true)
        );
    }

    #[test]
    fn test_within() {
        let v = DxfVersion::AC1015;
        assert!(v.within(None, None));
        assert!(v.within(Some(DxfVersion::AC1012), None));
        assert!(!v.within(None, Some(DxfVersion::AC1014)));
        assert!(v.within(Some(DxfVersion::AC1015), Some(DxfVersion::AC1015)));
    }
}
