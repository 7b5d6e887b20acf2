//! [ISO 8601](https://en.wikipedia.org/wiki/ISO_8601) reading and writing.
//!
//! Both the extended (`2017-06-30T23:03:33`) and the basic (`20170630T230333`) notations are read.
//! Values are always written with the extended notation.

use crate::calendar::CivilFields;
use crate::date_time::DateTime;
use crate::error::DateTimeField;
use crate::format::{write_fraction, write_year};
use crate::parser::{ParseErrorKind, ParseOptions, build_value, two_digits_frag};
use crate::precision::Precision;
use crate::timezone::{format_offset, parse_offset_label};
use std::fmt;

/// Whether the input looks like an ISO 8601 date and time: a `T` after an extended or basic date.
pub(crate) fn is_iso8601_shaped(input: &str) -> bool {
    let b = input.as_bytes();
    let year = b.iter().take_while(|c| c.is_ascii_digit()).count();
    let at = |i: usize, c: u8| b.get(i) == Some(&c);
    (year >= 4 && at(year, b'-') && at(year + 3, b'-') && at(year + 6, b'T'))
        || (year == 8 && at(8, b'T'))
}

/// Reads `[±]YYYY[-MM[-DD]][THH[:mm[:SS[.f+]]]][Z|±HH[:MM]]`, its basic variant or a time `THH[:mm[:SS[.f+]]]`.
pub(crate) fn parse_iso8601(
    input: &str,
    options: &ParseOptions,
) -> Result<DateTime, ParseErrorKind> {
    let (fields, precision, time_only, rest) = if let Some(time) = input.strip_prefix('T') {
        let (fields, precision, rest) = time_frag(CivilFields::ZERO, time)?;
        (fields, precision, true, rest)
    } else {
        let (fields, precision, rest) = date_frag(input)?;
        if let Some(time) = rest.strip_prefix('T') {
            if precision != Precision::Day {
                return Err(ParseErrorKind::Separator('-'));
            }
            let (fields, precision, rest) = time_frag(fields, time)?;
            (fields, precision, false, rest)
        } else {
            (fields, precision, false, rest)
        }
    };
    let zone = zone_frag(rest)?;
    build_value(fields, zone, precision, time_only, options)
}

/// Reads the date, with a precision of year, month or day.
fn date_frag(input: &str) -> Result<(CivilFields, Precision, &str), ParseErrorKind> {
    let (negative, unsigned) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    let year_digits = if digits == 8 && !unsigned[digits..].starts_with('-') {
        4
    } else {
        digits
    };
    if year_digits < 4 {
        return Err(ParseErrorKind::Digits {
            field: DateTimeField::Year,
            count: 4,
        });
    }
    let year = unsigned[..year_digits]
        .parse::<i64>()
        .map_err(|_| ParseErrorKind::Overflow)?;
    let mut fields = CivilFields {
        year: if negative { -year } else { year },
        ..CivilFields::ZERO
    };
    let rest = &unsigned[year_digits..];
    if year_digits != digits {
        // Basic notation YYYYMMDD
        let (month, rest) = two_digits_frag(rest, DateTimeField::Month)?;
        let (day, rest) = two_digits_frag(rest, DateTimeField::Day)?;
        fields.month = month;
        fields.day = day;
        return Ok((fields, Precision::Day, rest));
    }
    let Some(rest) = rest.strip_prefix('-') else {
        return Ok((fields, Precision::Year, rest));
    };
    let (month, rest) = two_digits_frag(rest, DateTimeField::Month)?;
    fields.month = month;
    let Some(rest) = rest.strip_prefix('-') else {
        return Ok((fields, Precision::Month, rest));
    };
    let (day, rest) = two_digits_frag(rest, DateTimeField::Day)?;
    fields.day = day;
    Ok((fields, Precision::Day, rest))
}

/// Reads the time of day after the `T`.
fn time_frag(
    fields: CivilFields,
    input: &str,
) -> Result<(CivilFields, Precision, &str), ParseErrorKind> {
    let mut fields = fields;
    let (hour, rest) = two_digits_frag(input, DateTimeField::Hour)?;
    fields.hour = hour;
    let extended = rest.starts_with(':');
    let Some(rest) = next_component(rest, extended) else {
        return Ok((fields, Precision::Hour, rest));
    };
    let (minute, rest) = two_digits_frag(rest, DateTimeField::Minute)?;
    fields.minute = minute;
    let Some(rest) = next_component(rest, extended) else {
        return Ok((fields, Precision::Minute, rest));
    };
    let (second, rest) = two_digits_frag(rest, DateTimeField::Second)?;
    fields.second = second;
    let Some(rest) = rest.strip_prefix(['.', ',']) else {
        return Ok((fields, Precision::Second, rest));
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(ParseErrorKind::Digits {
            field: DateTimeField::Nanosecond,
            count: 1,
        });
    }
    fields.nanosecond = rest[..digits]
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(9)
        .fold(0, |value, digit| value * 10 + u32::from(digit - b'0'));
    Ok((
        fields,
        Precision::from_fraction_digits(digits),
        &rest[digits..],
    ))
}

/// The input following the separator of the next time component, if there is a next component.
fn next_component(input: &str, extended: bool) -> Option<&str> {
    if extended {
        input.strip_prefix(':')
    } else {
        input
            .starts_with(|c: char| c.is_ascii_digit())
            .then_some(input)
    }
}

/// Reads the optional zone designator, kept verbatim.
fn zone_frag(input: &str) -> Result<Option<String>, ParseErrorKind> {
    if input.is_empty() {
        return Ok(None);
    }
    if input != "Z" && !input.starts_with(['+', '-']) {
        return Err(ParseErrorKind::Trailing(input.into()));
    }
    parse_offset_label(input).ok_or_else(|| ParseErrorKind::Offset(input.into()))?;
    Ok(Some(input.into()))
}

/// Writes the value with as many components as its precision.
///
/// The zone designator is written if the value zone is significant: `Z` for a `Z` label, the given offset otherwise.
pub(crate) fn write_iso8601(
    f: &mut impl fmt::Write,
    value: &DateTime,
    offset: Option<i32>,
) -> fmt::Result {
    let precision = value.precision();
    if value.is_time_only() {
        f.write_char('T')?;
    } else {
        write_year(f, value.year())?;
        if precision <= Precision::Month {
            write!(f, "-{:02}", value.month())?;
        }
        if precision <= Precision::Day {
            write!(f, "-{:02}", value.day())?;
        }
        if precision <= Precision::Hour {
            f.write_char('T')?;
        }
    }
    if precision <= Precision::Hour {
        write!(f, "{:02}", value.hour())?;
    }
    if precision <= Precision::Minute {
        write!(f, ":{:02}", value.minute())?;
    }
    if precision <= Precision::Second {
        write!(f, ":{:02}", value.second())?;
    }
    if precision < Precision::Second {
        f.write_char('.')?;
        write_fraction(
            f,
            value.nanosecond(),
            u8::try_from(precision.fraction_digits()).unwrap_or(9),
        )?;
    }
    match offset {
        Some(offset) => f.write_str(&format_offset(offset)),
        None if value.is_zone_significant() && value.zone().trim().eq_ignore_ascii_case("Z") => {
            f.write_char('Z')
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DateTimeFormat;
    use std::error::Error;

    fn parse(input: &str) -> Result<DateTime, ParseErrorKind> {
        parse_iso8601(input, &ParseOptions::default())
    }

    #[test]
    fn shapes() {
        assert!(is_iso8601_shaped("2017-06-30T23:03"));
        assert!(is_iso8601_shaped("20170630T2303"));
        assert!(!is_iso8601_shaped("2017-06-30 23:03"));
        assert!(!is_iso8601_shaped("2017-06-30"));
    }

    #[test]
    fn full_precision_with_offset() -> Result<(), Box<dyn Error>> {
        let date = parse("2017-06-30T23:03:33.123456789-06:00")?;
        assert_eq!(
            (date.year(), date.month(), date.day(), date.hour(), date.minute()),
            (2017, 6, 30, 23, 3)
        );
        assert_eq!(date.second(), 33);
        assert_eq!(date.nanosecond(), 123_456_789);
        assert_eq!(date.zone(), "-06:00");
        assert_eq!(date.precision(), Precision::Nanosecond);
        assert!(date.is_zone_significant());
        Ok(())
    }

    #[test]
    fn fraction_widths() -> Result<(), Box<dyn Error>> {
        for (input, precision, nanosecond) in [
            ("2020-01-01T00:00:00.5", Precision::Hsecond, 500_000_000),
            ("2020-01-01T00:00:00.12", Precision::Hsecond, 120_000_000),
            ("2020-01-01T00:00:00,123", Precision::Millisecond, 123_000_000),
            ("2020-01-01T00:00:00.1234", Precision::Microsecond, 123_400_000),
            ("2020-01-01T00:00:00.123456", Precision::Microsecond, 123_456_000),
            ("2020-01-01T00:00:00.1234567", Precision::Nanosecond, 123_456_700),
            ("2020-01-01T00:00:00.123456789123", Precision::Nanosecond, 123_456_789),
        ] {
            let date = parse(input)?;
            assert_eq!(date.precision(), precision, "{input}");
            assert_eq!(date.nanosecond(), nanosecond, "{input}");
        }
        Ok(())
    }

    #[test]
    fn reduced_precisions() -> Result<(), Box<dyn Error>> {
        assert_eq!(parse("2020")?.precision(), Precision::Year);
        assert_eq!(parse("2020-05")?.precision(), Precision::Month);
        assert_eq!(parse("2020-05-17")?.precision(), Precision::Day);
        assert_eq!(parse("2020-05-17T10")?.precision(), Precision::Hour);
        assert_eq!(parse("2020-05-17T10:30Z")?.zone(), "Z");
        Ok(())
    }

    #[test]
    fn basic_notation() -> Result<(), Box<dyn Error>> {
        let date = parse("20170630T230333+0530")?;
        assert_eq!(date, DateTime::new(2017, 6, 30, 23, 3, 33)?);
        assert_eq!(date.zone(), "+0530");
        assert_eq!(parse("20170630T2303")?.precision(), Precision::Minute);
        Ok(())
    }

    #[test]
    fn signed_and_long_years() -> Result<(), Box<dyn Error>> {
        assert_eq!(parse("-0044-03-15")?.year(), -44);
        assert_eq!(parse("+12020-01-01")?.year(), 12_020);
        Ok(())
    }

    #[test]
    fn time_only() -> Result<(), Box<dyn Error>> {
        let time = parse("T10:15:30")?;
        assert!(time.is_time_only());
        assert_eq!((time.hour(), time.minute(), time.second()), (10, 15, 30));
        assert_eq!(time.format(DateTimeFormat::Iso8601)?, "T10:15:30");
        Ok(())
    }

    #[test]
    fn hour_24() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            parse("2020-12-31T24:00:00")?,
            DateTime::new(2021, 1, 1, 0, 0, 0)?
        );
        assert!(parse("2020-12-31T24:00:01").is_err());
        Ok(())
    }

    #[test]
    fn invalid() {
        for input in [
            "2020-13-01",
            "2020-02-30T00:00",
            "2020-01-01T25:00",
            "2020-01-01T10:60",
            "2020-01-01T10:00:00.",
            "2020-01-01T10:00:00+25:00",
            "2020-01-01T10:00:00 PST",
            "2020-01T10:00",
            "20-01-01",
        ] {
            assert!(parse(input).is_err(), "{input}");
        }
    }

    #[test]
    fn write() -> Result<(), Box<dyn Error>> {
        let mut date = parse("2017-06-30T23:03:33.123-06:00")?;
        assert_eq!(
            date.format(DateTimeFormat::Iso8601)?,
            "2017-06-30T23:03:33.123-06:00"
        );
        date.set_zone("PST");
        assert_eq!(
            date.format(DateTimeFormat::Iso8601)?,
            "2017-06-30T23:03:33.123-08:00"
        );
        date.set_zone_significant(false);
        assert_eq!(
            date.format(DateTimeFormat::Iso8601)?,
            "2017-06-30T23:03:33.123"
        );
        date.set_precision(Precision::Hour);
        assert_eq!(date.format(DateTimeFormat::Iso8601)?, "2017-06-30T23");
        date.set_precision(Precision::Month);
        assert_eq!(date.format(DateTimeFormat::Iso8601)?, "2017-06");
        Ok(())
    }
}
