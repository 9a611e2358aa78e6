//! Parsers for the textual forms of pair values.
//!
//! Text files render every value as a line; binary files use the same
//! textual form for handles. Surrounding blanks are ignored everywhere.

use nom::{
    bytes::complete::take_while_m_n,
    character::complete::{digit1, hex_digit1, one_of, space0},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::many0,
    number::complete::double,
    sequence::{delimited, pair},
    IResult,
};

use crate::types::Handle;

fn signed_integer(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), |digits: &str| {
        digits.parse::<i64>()
    })(input)
}

fn integer_line(input: &str) -> IResult<&str, i64> {
    all_consuming(delimited(space0, signed_integer, space0))(input)
}

fn real_line(input: &str) -> IResult<&str, f64> {
    all_consuming(delimited(space0, double, space0))(input)
}

fn hex_line(input: &str) -> IResult<&str, &str> {
    all_consuming(delimited(space0, hex_digit1, space0))(input)
}

fn hex_byte(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        |hex: &str| u8::from_str_radix(hex, 16),
    )(input)
}

fn hex_bytes(input: &str) -> IResult<&str, Vec<u8>> {
    all_consuming(many0(hex_byte))(input)
}

/// Parse a group code line.
pub fn parse_code(text: &str) -> Option<i32> {
    integer_line(text)
        .ok()
        .and_then(|(_, code)| i32::try_from(code).ok())
}

/// Parse an integer value. Integral reals such as `1.0` are accepted.
pub fn parse_integer(text: &str) -> Option<i64> {
    match integer_line(text) {
        Ok((_, value)) => Some(value),
        Err(_) => parse_real(text)
            .filter(|value| value.fract() == 0.0 && value.is_finite())
            .map(|value| value as i64),
    }
}

/// Parse a real value.
pub fn parse_real(text: &str) -> Option<f64> {
    real_line(text).ok().map(|(_, value)| value)
}

/// Parse a hexadecimal handle. A blank value is the null handle.
pub fn parse_handle(text: &str) -> Option<Handle> {
    if text.trim().is_empty() {
        return Some(Handle::NULL);
    }
    hex_line(text)
        .ok()
        .and_then(|(_, hex)| u64::from_str_radix(hex, 16).ok())
        .map(Handle::new)
}

/// Parse a binary chunk written as pairs of hex digits.
pub fn parse_hex_bytes(text: &str) -> Option<Vec<u8>> {
    hex_bytes(text.trim()).ok().map(|(_, bytes)| bytes)
}

/// Render a real so that it parses back to the identical value.
///
/// Uses the shortest exact decimal form, never exponent notation, and always
/// includes a decimal point.
pub fn format_real(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let mut text = value.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("  0"), Some(0));
        assert_eq!(parse_code("330"), Some(330));
        assert_eq!(parse_code("-5"), Some(-5));
        assert_eq!(parse_code("1071 "), Some(1071));
        assert_eq!(parse_code("SECTION"), None);
        assert_eq!(parse_code(""), None);
        assert_eq!(parse_code("99999999999"), None);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("  70"), Some(70));
        assert_eq!(parse_integer("1.0"), Some(1));
        assert_eq!(parse_integer("1.5"), None);
        assert_eq!(parse_integer("abc"), None);
    }

    #[test]
    fn test_parse_real() {
        assert_eq!(parse_real("0.0"), Some(0.0));
        assert_eq!(parse_real(" -12.5 "), Some(-12.5));
        assert_eq!(parse_real("1e-3"), Some(0.001));
        assert_eq!(parse_real("12,5"), None);
    }

    #[test]
    fn test_parse_handle() {
        assert_eq!(parse_handle("1F"), Some(Handle::new(0x1F)));
        assert_eq!(parse_handle("0"), Some(Handle::NULL));
        assert_eq!(parse_handle(""), Some(Handle::NULL));
        assert_eq!(parse_handle("G1"), None);
    }

    #[test]
    fn test_parse_hex_bytes() {
        assert_eq!(parse_hex_bytes("00FFa0"), Some(vec![0x00, 0xFF, 0xA0]));
        assert_eq!(parse_hex_bytes(""), Some(vec![]));
        assert_eq!(parse_hex_bytes("ABC"), None);
    }

    #[test]
    fn test_format_real() {
        assert_eq!(format_real(0.0), "0.0");
        assert_eq!(format_real(1.0), "1.0");
        assert_eq!(format_real(0.1), "0.1");
        assert_eq!(format_real(-2.5), "-2.5");
        assert_eq!(format_real(1e-20), "0.00000000000000000001");
        assert_eq!(parse_real(&format_real(1.0 / 3.0)), Some(1.0 / 3.0));
    }
}
