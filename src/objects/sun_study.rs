//! Sun study object

use once_cell::sync::Lazy;

use super::{DxfKind, ObjectCategory, Pointer};
use crate::io::dxf::CodeValue;
use crate::schema::{Cardinality, ObjectSchema, SchemaBuilder};
use crate::types::DxfVersion;

/// A calendar date of a sun study, as stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SunStudyDate {
    /// Julian day number
    pub julian_day: i32,
    /// Milliseconds past midnight
    pub milliseconds: i32,
}

/// Sun study object - sun and shadow analysis settings
///
/// Only exists up to R2013.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SunStudy {
    /// Version number (DXF code 90)
    pub version: i32,
    /// Sun setup name (DXF code 1)
    pub sun_setup_name: String,
    /// Description (DXF code 2)
    pub description: String,
    /// Output type (DXF code 70)
    pub output_type: i16,
    /// Sheet set name (DXF code 3)
    pub sheet_set_name: String,
    /// Use a sheet subset (DXF code 290)
    pub use_subset: bool,
    /// Sheet subset name (DXF code 4)
    pub sheet_subset_name: String,
    /// Dates are picked from a calendar (DXF code 291)
    pub select_dates_from_calendar: bool,
    /// Study dates (DXF code 91 count, then 90/90 per date)
    pub dates: Vec<SunStudyDate>,
    /// A range of times is selected (DXF code 292)
    pub select_range_of_dates: bool,
    /// Start time in seconds past midnight (DXF code 93)
    pub start_time_seconds: i32,
    /// End time in seconds past midnight (DXF code 94)
    pub end_time_seconds: i32,
    /// Interval in seconds (DXF code 95)
    pub interval_seconds: i32,
    /// Selected hours (DXF code 73 count, then 290 per hour)
    pub hours: Vec<i16>,
    /// Page setup wizard (DXF code 340)
    pub page_setup_wizard: Pointer,
    /// View (DXF code 341)
    pub view: Pointer,
    /// Visual style (DXF code 342)
    pub visual_style: Pointer,
    /// Shade plot type (DXF code 74)
    pub shade_plot_type: i16,
    /// Viewports per page (DXF code 75)
    pub viewports_per_page: i16,
    /// Viewport distribution rows (DXF code 76)
    pub viewport_rows: i16,
    /// Viewport distribution columns (DXF code 77)
    pub viewport_columns: i16,
    /// Spacing (DXF code 40)
    pub spacing: f64,
    /// Lock viewports (DXF code 293)
    pub lock_viewports: bool,
    /// Label viewports (DXF code 294)
    pub label_viewports: bool,
    /// Text style (DXF code 343)
    pub text_style: Pointer,
}

impl SunStudy {
    pub fn new() -> Self {
        Self::default()
    }
}

static SCHEMA: Lazy<ObjectSchema<SunStudy>> = Lazy::new(|| {
    SchemaBuilder::<SunStudy>::new("SUNSTUDY")
        .kind_until(DxfVersion::AC1027)
        .subclass("AcDbSunStudy")
        .value("version", 90, |s| s.version.into(), |s, v| s.version = v.to_i32())
        .required()
        .value(
            "sun_setup_name",
            1,
            |s| s.sun_setup_name.as_str().into(),
            |s, v| s.sun_setup_name = v.into_string(),
        )
        .when(|s| !s.sun_setup_name.is_empty())
        .value(
            "description",
            2,
            |s| s.description.as_str().into(),
            |s, v| s.description = v.into_string(),
        )
        .when(|s| !s.description.is_empty())
        .value("output_type", 70, |s| s.output_type.into(), |s, v| s.output_type = v.to_i16())
        .when(|s| s.output_type != 0)
        .value(
            "sheet_set_name",
            3,
            |s| s.sheet_set_name.as_str().into(),
            |s, v| s.sheet_set_name = v.into_string(),
        )
        .when(|s| !s.sheet_set_name.is_empty())
        .value("use_subset", 290, |s| s.use_subset.into(), |s, v| s.use_subset = v.to_bool())
        .when(|s| s.use_subset || !s.sheet_set_name.is_empty())
        .value(
            "sheet_subset_name",
            4,
            |s| s.sheet_subset_name.as_str().into(),
            |s, v| s.sheet_subset_name = v.into_string(),
        )
        .when(|s| !s.sheet_subset_name.is_empty())
        .value(
            "select_dates_from_calendar",
            291,
            |s| s.select_dates_from_calendar.into(),
            |s, v| s.select_dates_from_calendar = v.to_bool(),
        )
        .list(
            "dates",
            &[90, 90],
            Cardinality::CountPrefixed { count_code: 91 },
            |s| {
                s.dates
                    .iter()
                    .map(|d| vec![CodeValue::from(d.julian_day), CodeValue::from(d.milliseconds)])
                    .collect()
            },
            |s, elements| {
                s.dates = elements
                    .iter()
                    .map(|e| SunStudyDate {
                        julian_day: e.first().map_or(0, CodeValue::to_i32),
                        milliseconds: e.get(1).map_or(0, CodeValue::to_i32),
                    })
                    .collect()
            },
        )
        .value(
            "select_range_of_dates",
            292,
            |s| s.select_range_of_dates.into(),
            |s, v| s.select_range_of_dates = v.to_bool(),
        )
        .value(
            "start_time_seconds",
            93,
            |s| s.start_time_seconds.into(),
            |s, v| s.start_time_seconds = v.to_i32(),
        )
        .when(|s| s.select_range_of_dates)
        .value(
            "end_time_seconds",
            94,
            |s| s.end_time_seconds.into(),
            |s, v| s.end_time_seconds = v.to_i32(),
        )
        .when(|s| s.select_range_of_dates)
        .value(
            "interval_seconds",
            95,
            |s| s.interval_seconds.into(),
            |s, v| s.interval_seconds = v.to_i32(),
        )
        .when(|s| s.select_range_of_dates)
        .list(
            "hours",
            &[290],
            Cardinality::CountPrefixed { count_code: 73 },
            |s| s.hours.iter().map(|h| vec![CodeValue::from(*h)]).collect(),
            |s, elements| {
                s.hours = elements
                    .iter()
                    .map(|e| e.first().map_or(0, CodeValue::to_i16))
                    .collect()
            },
        )
        .pointer("page_setup_wizard", 340, |s| &s.page_setup_wizard, |s| &mut s.page_setup_wizard)
        .pointer("view", 341, |s| &s.view, |s| &mut s.view)
        .pointer("visual_style", 342, |s| &s.visual_style, |s| &mut s.visual_style)
        .value(
            "shade_plot_type",
            74,
            |s| s.shade_plot_type.into(),
            |s, v| s.shade_plot_type = v.to_i16(),
        )
        .value(
            "viewports_per_page",
            75,
            |s| s.viewports_per_page.into(),
            |s, v| s.viewports_per_page = v.to_i16(),
        )
        .value("viewport_rows", 76, |s| s.viewport_rows.into(), |s, v| s.viewport_rows = v.to_i16())
        .value(
            "viewport_columns",
            77,
            |s| s.viewport_columns.into(),
            |s, v| s.viewport_columns = v.to_i16(),
        )
        .value("spacing", 40, |s| s.spacing.into(), |s, v| s.spacing = v.to_f64())
        .value(
            "lock_viewports",
            293,
            |s| s.lock_viewports.into(),
            |s, v| s.lock_viewports = v.to_bool(),
        )
        .value(
            "label_viewports",
            294,
            |s| s.label_viewports.into(),
            |s, v| s.label_viewports = v.to_bool(),
        )
        .pointer("text_style", 343, |s| &s.text_style, |s| &mut s.text_style)
        .build()
});

impl DxfKind for SunStudy {
    const TYPE_NAME: &'static str = "SUNSTUDY";
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

    fn write(study: &SunStudy, version: DxfVersion) -> (Vec<CodePair>, NotificationCollection) {
        let mut pairs = Vec::new();
        let mut notes = NotificationCollection::new();
        FieldWriter::new(version, false, &RawHandles).write(SunStudy::schema(), study, &mut pairs, &mut notes);
        (pairs, notes)
    }

    fn codes(pairs: &[CodePair]) -> Vec<i32> {
        pairs.iter().map(|p| p.code).collect()
    }

    #[test]
    fn test_default_layout() {
        let (pairs, notes) = write(&SunStudy::new(), DxfVersion::AC1009);
        assert!(notes.is_empty());
        assert_eq!(
            codes(&pairs),
            vec![90, 291, 91, 292, 73, 340, 341, 342, 74, 75, 76, 77, 40, 293, 294, 343]
        );
        assert_eq!(pairs[5], CodePair::new(340, Handle::NULL));
    }

    #[test]
    fn test_conditional_fields() {
        let study = SunStudy {
            sun_setup_name: "noon".into(),
            sheet_set_name: "sheets".into(),
            select_range_of_dates: true,
            start_time_seconds: 3600,
            dates: vec![SunStudyDate {
                julian_day: 2459000,
                milliseconds: 43_200_000,
            }],
            hours: vec![9, 12],
            ..SunStudy::default()
        };
        let (pairs, _) = write(&study, DxfVersion::AC1024);
        assert_eq!(
            codes(&pairs),
            vec![
                100, 90, 1, 3, 290, 291, 91, 90, 90, 292, 93, 94, 95, 73, 290, 290, 340, 341, 342, 74, 75,
                76, 77, 40, 293, 294, 343
            ]
        );

        let mut stream = PairStream::from_pairs(pairs);
        let mut back = SunStudy::new();
        let extension = FieldReader::new(DxfVersion::AC1024)
            .read(SunStudy::schema(), &mut back, &mut stream, Trailing::Capture)
            .unwrap();
        assert!(extension.is_empty());
        assert_eq!(back, study);
    }

    #[test]
    fn test_subset_flag_without_sheet_set() {
        let study = SunStudy {
            use_subset: true,
            ..SunStudy::default()
        };
        let (pairs, _) = write(&study, DxfVersion::AC1024);
        assert_eq!(&codes(&pairs)[..4], &[100, 90, 290, 291]);

        let mut stream = PairStream::from_pairs(pairs);
        let mut back = SunStudy::new();
        FieldReader::new(DxfVersion::AC1024)
            .read(SunStudy::schema(), &mut back, &mut stream, Trailing::Capture)
            .unwrap();
        assert!(back.use_subset);
        assert_eq!(back, study);
    }

    #[test]
    fn test_kind_ends_at_r2013() {
        assert!(SunStudy::schema().applies_to(DxfVersion::AC1027));
        assert!(SunStudy::schema().applies_to(DxfVersion::AC1009));
        assert!(!SunStudy::schema().applies_to(DxfVersion::AC1032));
    }

    #[test]
    fn test_missing_version_is_rejected() {
        let mut stream = PairStream::from_pairs(vec![CodePair::new(291, false), CodePair::new(0, "ENDSEC")]);
        let mut study = SunStudy::new();
        let err = FieldReader::new(DxfVersion::AC1009)
            .read(SunStudy::schema(), &mut study, &mut stream, Trailing::Capture)
            .unwrap_err();
        assert!(err.is_structural());
    }
}
