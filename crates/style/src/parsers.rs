//! Low-level nom parser functions for resolved style values.
//!
//! The style resolver hands over computed values, but fixtures and hand-written
//! inputs commonly spell them as CSS text ("12px", "50%", "10 20"). These
//! parsers turn that text back into typed values.

use crate::dimension::{Dimension, Margins};
use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{char, space1};
use nom::combinator::{map, opt, value};
use nom::multi::separated_list1;
use nom::number::complete::float;
use nom::sequence::terminated;
use nom::{IResult, Parser};
use thiserror::Error;

/// Errors that can occur during style parsing.
#[derive(Error, Debug, Clone)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },
}

// --- Unit & Dimension Parsers ---

fn parse_unit(input: &str) -> IResult<&str, f32> {
    alt((
        value(1.0, tag_no_case("px")),
        value(4.0 / 3.0, tag_no_case("pt")),
        value(96.0, tag_no_case("in")),
        value(37.795, tag_no_case("cm")),
        value(3.7795, tag_no_case("mm")),
    ))
    .parse(input)
}

/// Parses a length value with optional unit (e.g., "12px", "9pt", "1in"). Unitless values are pixels.
pub fn parse_length(input: &str) -> IResult<&str, f32> {
    let (input, number) = float(input)?;
    let (input, multiplier) = opt(parse_unit).parse(input)?;
    Ok((input, number * multiplier.unwrap_or(1.0)))
}

/// Parses a dimension value (length, percentage, or "auto").
pub fn parse_dimension(input: &str) -> IResult<&str, Dimension> {
    alt((
        value(Dimension::Auto, tag_no_case("auto")),
        map(terminated(float, char('%')), Dimension::Percent),
        map(parse_length, Dimension::Px),
    ))
    .parse(input)
}

/// Parses CSS shorthand edges (1, 2, 3 or 4 values).
pub fn parse_shorthand_margins(input: &str) -> Result<Margins, StyleParseError> {
    let parts_res = separated_list1(space1, parse_length).parse(input.trim());

    match parts_res {
        Ok(("", parts)) => match parts.as_slice() {
            [all] => Ok(Margins::all(*all)),
            [y, x] => Ok(Margins {
                top: *y,
                right: *x,
                bottom: *y,
                left: *x,
            }),
            [top, x, bottom] => Ok(Margins {
                top: *top,
                right: *x,
                bottom: *bottom,
                left: *x,
            }),
            [top, right, bottom, left] => Ok(Margins {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => Err(StyleParseError::Parse(format!(
                "Invalid number of values for edge shorthand: got {}, expected 1 to 4.",
                parts.len()
            ))),
        },
        _ => Err(StyleParseError::Parse(format!(
            "Failed to parse edge value: '{}'",
            input
        ))),
    }
}

/// Helper to run a nom parser and convert its result to a `Result<T, StyleParseError>`.
pub fn run_parser<'a, T, F>(parser: F, input: &'a str) -> Result<T, StyleParseError>
where
    F: Fn(&'a str) -> IResult<&'a str, T>,
{
    match parser(input.trim()) {
        Ok(("", result)) => Ok(result),
        Ok((rem, _)) => Err(StyleParseError::Parse(format!(
            "Parser did not consume all input. Remainder: '{}'",
            rem
        ))),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length_units() {
        assert_eq!(run_parser(parse_length, "12").unwrap(), 12.0);
        assert_eq!(run_parser(parse_length, "12px").unwrap(), 12.0);
        assert!((run_parser(parse_length, "9pt").unwrap() - 12.0).abs() < 0.01);
        assert_eq!(run_parser(parse_length, "-4px").unwrap(), -4.0);
    }

    #[test]
    fn test_parse_dimension_variants() {
        assert_eq!(run_parser(parse_dimension, "auto").unwrap(), Dimension::Auto);
        assert_eq!(run_parser(parse_dimension, "50%").unwrap(), Dimension::Percent(50.0));
        assert_eq!(run_parser(parse_dimension, "120px").unwrap(), Dimension::Px(120.0));
    }

    #[test]
    fn test_parse_dimension_rejects_trailing_garbage() {
        assert!(run_parser(parse_dimension, "12px solid").is_err());
    }

    #[test]
    fn test_shorthand_margins() {
        assert_eq!(parse_shorthand_margins("10").unwrap(), Margins::all(10.0));
        let two = parse_shorthand_margins("10 20").unwrap();
        assert_eq!((two.top, two.right, two.bottom, two.left), (10.0, 20.0, 10.0, 20.0));
        let three = parse_shorthand_margins("1 2 3").unwrap();
        assert_eq!((three.top, three.right, three.bottom, three.left), (1.0, 2.0, 3.0, 2.0));
        assert!(parse_shorthand_margins("1 2 3 4 5").is_err());
        assert!(parse_shorthand_margins("wide").is_err());
    }
}
