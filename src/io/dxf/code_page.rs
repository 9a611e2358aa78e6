//! `$DWGCODEPAGE` to text encoding mapping.
//!
//! Files before AC1021 store strings in the code page named by the header;
//! from AC1021 on every string is UTF-8.

use encoding_rs::Encoding;

use crate::types::DxfVersion;

const CODE_PAGES: &[(&str, &Encoding)] = &[
    ("ANSI_874", encoding_rs::WINDOWS_874),
    ("ANSI_932", encoding_rs::SHIFT_JIS),
    ("ANSI_936", encoding_rs::GBK),
    ("ANSI_949", encoding_rs::EUC_KR),
    ("ANSI_950", encoding_rs::BIG5),
    ("ANSI_1250", encoding_rs::WINDOWS_1250),
    ("ANSI_1251", encoding_rs::WINDOWS_1251),
    ("ANSI_1252", encoding_rs::WINDOWS_1252),
    ("ANSI_1253", encoding_rs::WINDOWS_1253),
    ("ANSI_1254", encoding_rs::WINDOWS_1254),
    ("ANSI_1255", encoding_rs::WINDOWS_1255),
    ("ANSI_1256", encoding_rs::WINDOWS_1256),
    ("ANSI_1257", encoding_rs::WINDOWS_1257),
    ("ANSI_1258", encoding_rs::WINDOWS_1258),
    ("GB2312", encoding_rs::GBK),
    ("BIG5", encoding_rs::BIG5),
    ("KOREAN", encoding_rs::EUC_KR),
    ("JOHAB", encoding_rs::EUC_KR),
    ("DOS850", encoding_rs::WINDOWS_1252),
    ("DOS852", encoding_rs::WINDOWS_1250),
    ("DOS855", encoding_rs::IBM866),
    ("DOS866", encoding_rs::IBM866),
    ("DOS857", encoding_rs::WINDOWS_1254),
    ("DOS869", encoding_rs::WINDOWS_1253),
    ("ISO8859-1", encoding_rs::WINDOWS_1252),
    ("ISO8859-2", encoding_rs::ISO_8859_2),
    ("ISO8859-5", encoding_rs::ISO_8859_5),
    ("ISO8859-7", encoding_rs::ISO_8859_7),
    ("ISO8859-9", encoding_rs::WINDOWS_1254),
    ("ISO8859-15", encoding_rs::ISO_8859_15),
    ("KOI8-R", encoding_rs::KOI8_R),
    ("KOI8-U", encoding_rs::KOI8_U),
];

/// Get the encoding for a `$DWGCODEPAGE` value.
///
/// `None` means UTF-8 (no transcoding). Unrecognised names fall back to
/// Windows-1252.
pub fn encoding_from_code_page(code_page: &str) -> Option<&'static Encoding> {
    let name = code_page.trim().to_ascii_lowercase().replace('_', "-");
    match name.as_str() {
        "ascii" | "utf-8" | "utf8" | "unicode" | "" => return None,
        _ => {}
    }
    let found = CODE_PAGES.iter().find(|(page, _)| {
        let page = page.to_ascii_lowercase().replace('_', "-");
        page == name || page.replace("iso", "iso-") == name
    });
    Some(found.map_or(encoding_rs::WINDOWS_1252, |(_, encoding)| *encoding))
}

/// Encoding for strings of a file at `version` declaring `code_page`.
pub fn encoding_for(version: DxfVersion, code_page: Option<&str>) -> Option<&'static Encoding> {
    if version >= DxfVersion::AC1021 {
        return None;
    }
    code_page.and_then(encoding_from_code_page)
}

/// `$DWGCODEPAGE` name for an encoding, used when writing pre-AC1021 files.
pub fn code_page_for_encoding(encoding: &'static Encoding) -> &'static str {
    CODE_PAGES
        .iter()
        .find(|(page, candidate)| *candidate == encoding && page.starts_with("ANSI"))
        .map_or("ANSI_1252", |(page, _)| *page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_code_pages() {
        assert_eq!(encoding_from_code_page("ANSI_1251"), Some(encoding_rs::WINDOWS_1251));
        assert_eq!(encoding_from_code_page("ansi_932"), Some(encoding_rs::SHIFT_JIS));
        assert_eq!(encoding_from_code_page("ISO8859-2"), Some(encoding_rs::ISO_8859_2));
        assert_eq!(encoding_from_code_page("koi8-r"), Some(encoding_rs::KOI8_R));
    }

    #[test]
    fn test_utf8_and_fallback() {
        assert_eq!(encoding_from_code_page("UTF-8"), None);
        assert_eq!(encoding_from_code_page("mystery"), Some(encoding_rs::WINDOWS_1252));
    }

    #[test]
    fn test_version_rule() {
        assert_eq!(encoding_for(DxfVersion::AC1024, Some("ANSI_1251")), None);
        assert_eq!(
            encoding_for(DxfVersion::AC1015, Some("ANSI_1251")),
            Some(encoding_rs::WINDOWS_1251)
        );
        assert_eq!(encoding_for(DxfVersion::AC1015, None), None);
    }

    #[test]
    fn test_reverse_lookup() {
        assert_eq!(code_page_for_encoding(encoding_rs::WINDOWS_1251), "ANSI_1251");
        assert_eq!(code_page_for_encoding(encoding_rs::WINDOWS_1252), "ANSI_1252");
    }
}
