//! Header variables (HEADER section)
//!
//! Variables are kept as an ordered map from `$NAME` to the pairs following
//! its `9 $NAME` marker. Only the variables the codec itself depends on
//! (`$ACADVER`, `$HANDSEED`, `$HANDLING`, `$DWGCODEPAGE`) are interpreted;
//! the rest round-trip untouched.

use indexmap::IndexMap;
use tracing::trace;

use crate::error::Result;
use crate::io::dxf::reader::PairStream;
use crate::io::dxf::{code_page, CodePair, CodeValue};
use crate::notification::{NotificationCollection, NotificationKind};
use crate::types::{DxfVersion, Handle};

pub const ACADVER: &str = "$ACADVER";
pub const HANDSEED: &str = "$HANDSEED";
pub const HANDLING: &str = "$HANDLING";
pub const DWGCODEPAGE: &str = "$DWGCODEPAGE";

/// Group code of a variable name marker.
const VARIABLE_CODE: i32 = 9;

/// Versions a variable is written in; unlisted variables are always written.
fn variable_range(name: &str) -> (Option<DxfVersion>, Option<DxfVersion>) {
    use DxfVersion::*;
    match name {
        HANDLING => (None, Some(AC1009)),
        "$ACADMAINTVER" | "$TDUCREATE" | "$TDUUPDATE" | "$PLINEGEN" | "$PSLTSCALE" | "$TREEDEPTH"
        | "$CMLSTYLE" | "$CMLJUST" | "$CMLSCALE" | "$PROXYGRAPHICS" | "$MEASUREMENT" => (Some(AC1012), None),
        "$CELWEIGHT" | "$ENDCAPS" | "$JOINSTYLE" | "$LWDISPLAY" | "$INSUNITS" | "$HYPERLINKBASE"
        | "$STYLESHEET" | "$XEDIT" | "$CEPSNTYPE" | "$PSTYLEMODE" | "$FINGERPRINTGUID" | "$VERSIONGUID"
        | "$EXTNAMES" | "$PSVPSCALE" | "$OLESTARTUP" | "$SORTENTS" | "$INDEXCTL" | "$HIDETEXT"
        | "$XCLIPFRAME" | "$HALOGAP" | "$OBSCOLOR" | "$OBSLTYPE" | "$INTERSECTIONDISPLAY"
        | "$INTERSECTIONCOLOR" | "$DIMASSOC" | "$PROJECTNAME" => (Some(AC1015), None),
        "$CAMERADISPLAY" | "$LENSLENGTH" | "$CAMERAHEIGHT" | "$STEPSPERSEC" | "$STEPSIZE" | "$3DDWFPREC"
        | "$PSOLWIDTH" | "$PSOLHEIGHT" | "$LOFTANG1" | "$LOFTANG2" | "$LOFTMAG1" | "$LOFTMAG2"
        | "$LOFTPARAM" | "$LOFTNORMALS" | "$LATITUDE" | "$LONGITUDE" | "$NORTHDIRECTION" | "$TIMEZONE"
        | "$LIGHTGLYPHDISPLAY" | "$TILEMODELIGHTSYNCH" | "$CMATERIAL" | "$SOLIDHIST" | "$SHOWHIST"
        | "$DWFFRAME" | "$DGNFRAME" | "$REALWORLDSCALE" | "$INTERFERECOLOR" | "$CSHADOW"
        | "$SHADOWPLANELOCATION" => (Some(AC1021), None),
        "$REQUIREDVERSIONS" => (Some(AC1024), None),
        _ => (None, None),
    }
}

/// The HEADER section.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderSection {
    variables: IndexMap<String, Vec<CodePair>>,
}

impl HeaderSection {
    pub fn new() -> Self {
        Self {
            variables: IndexMap::new(),
        }
    }

    /// Pairs of a variable
    pub fn get(&self, name: &str) -> Option<&[CodePair]> {
        self.variables.get(name).map(Vec::as_slice)
    }

    /// First value of a variable
    pub fn value(&self, name: &str) -> Option<&CodeValue> {
        self.get(name).and_then(|pairs| pairs.first()).map(|pair| &pair.value)
    }

    /// Set a variable to the given pairs, keeping its position if it exists.
    pub fn set(&mut self, name: impl Into<String>, pairs: Vec<CodePair>) {
        self.variables.insert(name.into(), pairs);
    }

    /// Set a single-pair variable.
    pub fn set_value(&mut self, name: impl Into<String>, code: i32, value: impl Into<CodeValue>) {
        self.set(name, vec![CodePair::new(code, value)]);
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<CodePair>> {
        self.variables.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CodePair])> {
        self.variables.iter().map(|(name, pairs)| (name.as_str(), pairs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn clear(&mut self) {
        self.variables.clear();
    }

    /// The `$ACADVER` string, if present
    pub fn version_string(&self) -> Option<&str> {
        self.value(ACADVER).map(CodeValue::as_str)
    }

    /// The `$HANDSEED` value
    pub fn handle_seed(&self) -> Option<Handle> {
        self.value(HANDSEED).map(CodeValue::to_handle)
    }

    /// The `$DWGCODEPAGE` value
    pub fn code_page(&self) -> Option<&str> {
        self.value(DWGCODEPAGE).map(CodeValue::as_str)
    }

    /// Read `9 $NAME` groups up to the end of the section body.
    ///
    /// `$ACADVER` is interpreted as soon as it is seen so that a later
    /// `$DWGCODEPAGE` can switch the stream encoding for pre-R2007 files.
    pub(crate) fn read(&mut self, stream: &mut PairStream<'_>, notes: &mut NotificationCollection) -> Result<DxfVersion> {
        let mut version = DxfVersion::DEFAULT_READ;
        while let Some(pair) = stream.peek()? {
            if pair.code == 0 {
                break;
            }
            let marker = stream.expect_pair("header variable")?;
            if marker.code != VARIABLE_CODE {
                trace!(code = marker.code, "pair outside a header variable");
                continue;
            }
            let name = marker.value.into_string();
            let mut pairs = Vec::new();
            while let Some(code) = stream.peek_code()? {
                if code == 0 || code == VARIABLE_CODE {
                    break;
                }
                pairs.extend(stream.advance()?);
            }

            match name.as_str() {
                ACADVER => {
                    let text = pairs.first().map(|p| p.value.as_str()).unwrap_or_default();
                    let (resolved, known) = DxfVersion::from_version_string(text);
                    if !known {
                        notes.notify(NotificationKind::UnsupportedVersion {
                            object_type: format!("$ACADVER {}", text),
                            field: None,
                            version: resolved,
                        });
                    }
                    version = resolved;
                }
                DWGCODEPAGE => {
                    let page = pairs.first().map(|p| p.value.as_str()).unwrap_or_default();
                    if let Some(encoding) = code_page::encoding_for(version, Some(page)) {
                        stream.set_encoding(encoding);
                    }
                }
                _ => {}
            }
            trace!(variable = %name, pairs = pairs.len(), "header variable");
            self.variables.insert(name, pairs);
        }
        Ok(version)
    }

    /// Emit the variables for `version`.
    ///
    /// `$ACADVER` always comes first and names the target version.
    /// `$HANDSEED` carries `next_handle` when handles are written and is
    /// dropped otherwise; pre-R13 files with handles get `$HANDLING 1`.
    pub(crate) fn write(
        &self,
        version: DxfVersion,
        include_handles: bool,
        next_handle: Handle,
        out: &mut Vec<CodePair>,
        notes: &mut NotificationCollection,
    ) {
        let mut emit = |name: &str, pairs: &[CodePair]| {
            out.push(CodePair::new(VARIABLE_CODE, name));
            out.extend(pairs.iter().cloned());
        };

        emit(ACADVER, &[CodePair::new(1, version.as_str())]);
        if include_handles && version <= DxfVersion::AC1009 {
            emit(HANDLING, &[CodePair::new(70, 1i16)]);
        }

        for (name, pairs) in &self.variables {
            match name.as_str() {
                ACADVER | HANDSEED | HANDLING => continue,
                _ => {}
            }
            let (min, max) = variable_range(name);
            if !version.within(min, max) {
                notes.notify(NotificationKind::UnsupportedVersion {
                    object_type: name.clone(),
                    field: None,
                    version,
                });
                continue;
            }
            emit(name, pairs);
        }

        if include_handles {
            emit(HANDSEED, &[CodePair::new(5, next_handle.to_hex())]);
        }
    }
}

impl Default for HeaderSection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationType;

    fn read(pairs: Vec<CodePair>) -> (HeaderSection, DxfVersion, NotificationCollection) {
        let mut stream = PairStream::from_pairs(pairs);
        let mut header = HeaderSection::new();
        let mut notes = NotificationCollection::new();
        let version = header.read(&mut stream, &mut notes).unwrap();
        (header, version, notes)
    }

    #[test]
    fn test_read_variables_in_order() {
        let (header, version, notes) = read(vec![
            CodePair::new(9, "$ACADVER"),
            CodePair::new(1, "AC1015"),
            CodePair::new(9, "$INSBASE"),
            CodePair::new(10, 1.0),
            CodePair::new(20, 2.0),
            CodePair::new(30, 0.0),
            CodePair::new(9, "$HANDSEED"),
            CodePair::new(5, "2A"),
            CodePair::new(0, "ENDSEC"),
        ]);
        assert_eq!(version, DxfVersion::AC1015);
        assert!(notes.is_empty());
        assert_eq!(header.len(), 3);
        assert_eq!(header.get("$INSBASE").map(<[CodePair]>::len), Some(3));
        assert_eq!(header.handle_seed(), Some(Handle::new(0x2A)));
        let names: Vec<&str> = header.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["$ACADVER", "$INSBASE", "$HANDSEED"]);
    }

    #[test]
    fn test_missing_version_defaults_to_r12() {
        let (_, version, _) = read(vec![CodePair::new(9, "$INSUNITS"), CodePair::new(70, 4i16)]);
        assert_eq!(version, DxfVersion::AC1009);
    }

    #[test]
    fn test_unknown_version_is_reported() {
        let (_, version, notes) = read(vec![CodePair::new(9, "$ACADVER"), CodePair::new(1, "AC1040")]);
        assert_eq!(version, DxfVersion::AC1032);
        assert!(notes.has_type(NotificationType::UnsupportedVersion));
    }

    #[test]
    fn test_write_rewrites_version_and_seed() {
        let mut header = HeaderSection::new();
        header.set_value(ACADVER, 1, "AC1015");
        header.set_value("$LWDISPLAY", 290, true);
        header.set_value(HANDSEED, 5, "1");
        let mut out = Vec::new();
        let mut notes = NotificationCollection::new();
        header.write(DxfVersion::AC1009, true, Handle::new(0x30), &mut out, &mut notes);
        assert_eq!(
            out,
            vec![
                CodePair::new(9, "$ACADVER"),
                CodePair::new(1, "AC1009"),
                CodePair::new(9, "$HANDLING"),
                CodePair::new(70, 1i16),
                CodePair::new(9, "$HANDSEED"),
                CodePair::new(5, "30"),
            ]
        );
        assert_eq!(notes.of_type(NotificationType::UnsupportedVersion).len(), 1);
    }

    #[test]
    fn test_write_without_handles_drops_seed() {
        let mut header = HeaderSection::new();
        header.set_value(HANDSEED, 5, "1");
        let mut out = Vec::new();
        let mut notes = NotificationCollection::new();
        header.write(DxfVersion::AC1015, false, Handle::new(0x30), &mut out, &mut notes);
        assert_eq!(out.len(), 2);
    }
}
