use crate::calendar::CivilFields;
use crate::date_time::{DateTime, check_fields};
use crate::error::{DateTimeField, InvalidFieldError};
use crate::format::{DateTimeFormat, MONTH_NAMES, Token};
use crate::iso8601::{is_iso8601_shaped, parse_iso8601};
use crate::precision::{DateTimeMode, Precision, ValidationMode};
use crate::timezone::parse_offset_label;
use std::str::FromStr;
use tracing::debug;

/// Two digit years before this value are in the 21st century, the other ones in the 20th.
pub const DEFAULT_TWO_DIGIT_YEAR_PIVOT: u8 = 30;

/// Options of the [`DateTime`] parsers.
///
/// ```
/// use oxdatetime::{DateTime, DateTimeFormat, ParseOptions};
///
/// let options = ParseOptions::default().with_two_digit_year_pivot(50);
/// let date = DateTime::parse_with_format_and_options("01/02/45", DateTimeFormat::UsShortDate, &options)?;
/// assert_eq!(date.year(), 2045);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct ParseOptions {
    two_digit_year_pivot: u8,
    validation: ValidationMode,
}

impl ParseOptions {
    #[inline]
    #[must_use]
    pub fn with_two_digit_year_pivot(mut self, pivot: u8) -> Self {
        self.two_digit_year_pivot = pivot.min(100);
        self
    }

    /// The validation mode of the parsed values.
    ///
    /// Parsing itself always validates the fields.
    #[inline]
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    #[inline]
    pub fn two_digit_year_pivot(&self) -> u8 {
        self.two_digit_year_pivot
    }

    /// Maps `00..=99` to a full year using the pivot.
    #[inline]
    pub fn expand_two_digit_year(&self, year: u8) -> i64 {
        if year < self.two_digit_year_pivot {
            2000 + i64::from(year)
        } else {
            1900 + i64::from(year)
        }
    }
}

impl Default for ParseOptions {
    #[inline]
    fn default() -> Self {
        Self {
            two_digit_year_pivot: DEFAULT_TWO_DIGIT_YEAR_PIVOT,
            validation: ValidationMode::Strict,
        }
    }
}

impl DateTime {
    /// Parses a value, guessing the layout from the input length and separators.
    ///
    /// A trailing time zone label (`PST`, `+05:30`...) is allowed after a space and makes the zone significant.
    /// Layouts that collide with another one of the same length are only usable with [`DateTime::parse_with_format`].
    ///
    /// ```
    /// use oxdatetime::{DateTime, Precision};
    ///
    /// let date = DateTime::parse("06/30/2017 23:03")?;
    /// assert_eq!(date.precision(), Precision::Minute);
    /// assert_eq!(date.to_string(), "2017-06-30 23:03");
    ///
    /// let date = DateTime::parse("30Jun2017 EST")?;
    /// assert_eq!(date.zone(), "EST");
    /// assert_eq!(date.to_string(), "2017-06-30 EST");
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    #[inline]
    pub fn parse(input: &str) -> Result<Self, ParseDateTimeError> {
        Self::parse_with_options(input, &ParseOptions::default())
    }

    pub fn parse_with_options(
        input: &str,
        options: &ParseOptions,
    ) -> Result<Self, ParseDateTimeError> {
        parse_auto(input.trim(), options).map_err(|kind| ParseDateTimeError {
            input: input.into(),
            kind,
        })
    }

    /// Parses a value with the given layout.
    ///
    /// ```
    /// use oxdatetime::{DateTime, DateTimeFormat};
    ///
    /// let time = DateTime::parse_with_format("0930", DateTimeFormat::TimeCompactMinute)?;
    /// assert!(time.is_time_only());
    /// assert_eq!((time.hour(), time.minute()), (9, 30));
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    #[inline]
    pub fn parse_with_format(
        input: &str,
        format: DateTimeFormat,
    ) -> Result<Self, ParseDateTimeError> {
        Self::parse_with_format_and_options(input, format, &ParseOptions::default())
    }

    pub fn parse_with_format_and_options(
        input: &str,
        format: DateTimeFormat,
        options: &ParseOptions,
    ) -> Result<Self, ParseDateTimeError> {
        parse_with_layout(input.trim(), format, options).map_err(|kind| ParseDateTimeError {
            input: input.into(),
            kind,
        })
    }

    /// Parses into an existing value, which is only changed on success.
    pub fn parse_into(&mut self, input: &str) -> Result<(), ParseDateTimeError> {
        *self = Self::parse(input)?;
        Ok(())
    }
}

impl FromStr for DateTime {
    type Err = ParseDateTimeError;

    #[inline]
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

/// The layout [`DateTime::parse`] would use for the input.
///
/// ```
/// use oxdatetime::{DateTimeFormat, detect_format};
///
/// assert_eq!(detect_format("2020-01-01 10:00"), Some(DateTimeFormat::DateMinute));
/// assert_eq!(detect_format("2020-01-01 10:00 PST"), Some(DateTimeFormat::DateMinuteZone));
/// assert_eq!(detect_format("20200101"), Some(DateTimeFormat::CompactDate));
/// assert_eq!(detect_format("2020-01-01T10:00Z"), Some(DateTimeFormat::Iso8601));
/// assert_eq!(detect_format("next tuesday"), None);
/// ```
pub fn detect_format(input: &str) -> Option<DateTimeFormat> {
    let input = input.trim();
    if is_iso8601_shaped(input.strip_prefix(['-', '+']).unwrap_or(input)) {
        return Some(DateTimeFormat::Iso8601);
    }
    let (body, zone) = split_zone(input);
    let layout = detect_layout(body)?;
    Some(match zone {
        Some(_) => with_zone(layout).unwrap_or(layout),
        None => layout,
    })
}

fn parse_auto(input: &str, options: &ParseOptions) -> Result<DateTime, ParseErrorKind> {
    if is_iso8601_shaped(input.strip_prefix(['-', '+']).unwrap_or(input)) {
        debug!(input, "parsing as ISO 8601");
        return parse_iso8601(input, options);
    }
    let (body, zone) = split_zone(input);
    let layout = detect_layout(body).ok_or(ParseErrorKind::UnrecognizedLayout)?;
    debug!(input, %layout, zone, "detected date/time layout");
    let (fields, _) = parse_tokens(body, layout, options)?;
    build_value(
        fields,
        zone.map(Into::into),
        layout.precision(),
        layout.is_time_only(),
        options,
    )
}

fn parse_with_layout(
    input: &str,
    format: DateTimeFormat,
    options: &ParseOptions,
) -> Result<DateTime, ParseErrorKind> {
    if format == DateTimeFormat::Iso8601 {
        return parse_iso8601(input, options);
    }
    let (fields, zone) = parse_tokens(input, format, options)?;
    build_value(
        fields,
        zone,
        format.precision(),
        format.is_time_only(),
        options,
    )
}

/// Splits a trailing zone label, i.e. a last word with a letter in it or a signed number.
fn split_zone(input: &str) -> (&str, Option<&str>) {
    let Some((body, last)) = input.rsplit_once(' ') else {
        return (input, None);
    };
    let is_zone = last.bytes().any(|b| b.is_ascii_alphabetic())
        || (last.starts_with(['+', '-']) && last[1..].starts_with(|c: char| c.is_ascii_digit()));
    if is_zone {
        (body.trim_end(), Some(last))
    } else {
        (input, None)
    }
}

/// The length and separator positions dispatch table.
fn detect_layout(input: &str) -> Option<DateTimeFormat> {
    let (negative, input) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    let b = input.as_bytes();
    // Years of more than 4 digits, alone or followed by a dash
    let year_digits = b.iter().take_while(|c| c.is_ascii_digit()).count();
    let extra_year_digits = if year_digits > 4
        && ((year_digits == b.len() && year_digits < 8) || b.get(year_digits) == Some(&b'-'))
    {
        year_digits - 4
    } else {
        0
    };
    let b = &b[extra_year_digits..];
    let at = |i: usize, c: u8| b.get(i) == Some(&c);
    let letters = |from: usize, to: usize| {
        b.get(from..to)
            .is_some_and(|s| s.iter().all(u8::is_ascii_alphabetic))
    };
    let all_digits = b.iter().all(u8::is_ascii_digit);
    let layout = match b.len() {
        2 if all_digits => DateTimeFormat::TimeHour,
        4 if all_digits => DateTimeFormat::Year,
        5 if at(2, b':') => DateTimeFormat::TimeMinute,
        7 if at(4, b'-') => DateTimeFormat::YearMonth,
        7 if at(2, b'/') => DateTimeFormat::UsMonthYear,
        7 if letters(0, 3) => DateTimeFormat::MonthNameYear,
        8 if all_digits => DateTimeFormat::CompactDate,
        8 if at(2, b'/') && at(5, b'/') => DateTimeFormat::UsShortDate,
        8 if at(2, b':') => DateTimeFormat::TimeSecond,
        9 if letters(2, 5) => DateTimeFormat::DayMonthNameYear,
        10 if at(4, b'-') => DateTimeFormat::Date,
        10 if at(2, b'/') => DateTimeFormat::UsDate,
        11 if at(2, b'-') && letters(3, 6) => DateTimeFormat::DashedDayMonthNameYear,
        11 if at(8, b'.') => DateTimeFormat::TimeHsecond,
        12 if all_digits => DateTimeFormat::CompactMinute,
        12 if at(8, b'.') => DateTimeFormat::TimeMillisecond,
        13 if at(4, b'-') && at(10, b' ') => DateTimeFormat::DateHour,
        14 if all_digits => DateTimeFormat::CompactSecond,
        14 if letters(2, 5) && at(9, b' ') => DateTimeFormat::DayMonthNameYearMinute,
        15 if at(8, b'.') => DateTimeFormat::TimeMicrosecond,
        16 if at(4, b'-') => DateTimeFormat::DateMinute,
        16 if at(2, b'/') => DateTimeFormat::UsDateMinute,
        18 if letters(2, 5) => DateTimeFormat::DayMonthNameYearSecond,
        18 if at(8, b'.') => DateTimeFormat::TimeNanosecond,
        19 if at(4, b'-') => DateTimeFormat::DateSecond,
        19 if at(2, b'/') => DateTimeFormat::UsDateSecond,
        22 if at(19, b'.') => DateTimeFormat::DateHsecond,
        23 if at(19, b'.') => DateTimeFormat::DateMillisecond,
        26 if at(19, b'.') => DateTimeFormat::DateMicrosecond,
        29 if at(19, b'.') => DateTimeFormat::DateNanosecond,
        _ => return None,
    };
    // Only layouts starting with the year may hold a negative or long year
    if (negative || extra_year_digits > 0) && !layout.pattern().starts_with("YYYY") {
        return None;
    }
    Some(layout)
}

/// The layout with a trailing zone label matching the given one.
fn with_zone(layout: DateTimeFormat) -> Option<DateTimeFormat> {
    Some(match layout {
        DateTimeFormat::Year => DateTimeFormat::YearZone,
        DateTimeFormat::YearMonth => DateTimeFormat::YearMonthZone,
        DateTimeFormat::Date => DateTimeFormat::DateZone,
        DateTimeFormat::DateHour => DateTimeFormat::DateHourZone,
        DateTimeFormat::DateMinute => DateTimeFormat::DateMinuteZone,
        DateTimeFormat::DateSecond => DateTimeFormat::DateSecondZone,
        DateTimeFormat::DateHsecond => DateTimeFormat::DateHsecondZone,
        DateTimeFormat::DateMillisecond => DateTimeFormat::DateMillisecondZone,
        DateTimeFormat::DateMicrosecond => DateTimeFormat::DateMicrosecondZone,
        DateTimeFormat::DateNanosecond => DateTimeFormat::DateNanosecondZone,
        _ => return None,
    })
}

/// Reads the input following the layout pattern.
///
/// Returns the raw fields and the zone label if the layout has one.
fn parse_tokens(
    input: &str,
    format: DateTimeFormat,
    options: &ParseOptions,
) -> Result<(CivilFields, Option<String>), ParseErrorKind> {
    let mut fields = CivilFields::ZERO;
    let mut zone = None;
    let mut rest = input;
    let tokens = format.tokens().collect::<Vec<_>>();
    for (i, token) in tokens.iter().copied().enumerate() {
        rest = match token {
            Token::Year4 => {
                let (year, rest) = year_frag(rest, fixed_digits_width(&tokens[i + 1..]))?;
                fields.year = year;
                rest
            }
            Token::Year2 => {
                let (year, rest) = two_digits_frag(rest, DateTimeField::Year)?;
                fields.year = options.expand_two_digit_year(year);
                rest
            }
            Token::Month2 => {
                let (month, rest) = two_digits_frag(rest, DateTimeField::Month)?;
                fields.month = month;
                rest
            }
            Token::MonthName => {
                let (month, rest) = month_name_frag(rest)?;
                fields.month = month;
                rest
            }
            Token::Day2 => {
                let (day, rest) = two_digits_frag(rest, DateTimeField::Day)?;
                fields.day = day;
                rest
            }
            Token::Hour2 => {
                let (hour, rest) = two_digits_frag(rest, DateTimeField::Hour)?;
                fields.hour = hour;
                rest
            }
            Token::Minute2 => {
                let (minute, rest) = two_digits_frag(rest, DateTimeField::Minute)?;
                fields.minute = minute;
                rest
            }
            Token::Second2 => {
                let (second, rest) = two_digits_frag(rest, DateTimeField::Second)?;
                fields.second = second;
                rest
            }
            Token::Fraction(digits) => {
                let (value, rest) = digits_frag(rest, digits.into(), DateTimeField::Nanosecond)?;
                fields.nanosecond = value * 10_u32.pow(9 - u32::from(digits.min(9)));
                rest
            }
            Token::Zone => {
                let (label, rest) = word_frag(rest);
                if label.is_empty() {
                    return Err(ParseErrorKind::MissingZone);
                }
                zone = Some(label.into());
                rest
            }
            Token::Offset => {
                let (label, rest) = word_frag(rest);
                parse_offset_label(label).ok_or_else(|| ParseErrorKind::Offset(label.into()))?;
                zone = Some(label.into());
                rest
            }
            Token::Literal(c) => expect_char(rest, c)?,
        };
    }
    if !rest.is_empty() {
        return Err(ParseErrorKind::Trailing(rest.into()));
    }
    Ok((fields, zone))
}

/// Builds a strictly validated value from raw parsed fields.
///
/// `24:00:00` is read as midnight of the next day.
pub(crate) fn build_value(
    fields: CivilFields,
    zone: Option<String>,
    precision: Precision,
    time_only: bool,
    options: &ParseOptions,
) -> Result<DateTime, ParseErrorKind> {
    let fields = if fields.hour == 24 {
        if (fields.minute, fields.second, fields.nanosecond) != (0, 0, 0) {
            return Err(InvalidFieldError::new(DateTimeField::Hour, 24, 0, 23).into());
        }
        let midnight = CivilFields { hour: 0, ..fields };
        check_fields(&midnight)?;
        if time_only {
            midnight
        } else {
            midnight.plus_days(1).ok_or(ParseErrorKind::Overflow)?
        }
    } else {
        check_fields(&fields)?;
        fields
    };
    let mode = DateTimeMode {
        precision,
        validation: options.validation,
        zone_significant: zone.is_some(),
        time_only,
    };
    Ok(DateTime::from_parts(fields, zone.unwrap_or_default(), mode))
}

/// Reads an optional `-` sign and at least 4 digits, leaving `reserved` digits to the next fields.
fn year_frag(input: &str, reserved: usize) -> Result<(i64, &str), ParseErrorKind> {
    let (negative, input) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    let count = input
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count()
        .saturating_sub(reserved)
        .max(4);
    let digits = input
        .get(..count)
        .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
        .ok_or(ParseErrorKind::Digits {
            field: DateTimeField::Year,
            count: 4,
        })?;
    let year = digits.parse::<i64>().map_err(|_| ParseErrorKind::Overflow)?;
    Ok((if negative { -year } else { year }, &input[count..]))
}

/// The digits taken by the leading fixed width numeric tokens, like `MMDD` in `YYYYMMDD`.
fn fixed_digits_width(tokens: &[Token]) -> usize {
    tokens
        .iter()
        .map_while(|token| match token {
            Token::Year2
            | Token::Month2
            | Token::Day2
            | Token::Hour2
            | Token::Minute2
            | Token::Second2 => Some(2),
            Token::Fraction(digits) => Some(usize::from(*digits)),
            _ => None,
        })
        .sum()
}

fn month_name_frag(input: &str) -> Result<(u8, &str), ParseErrorKind> {
    let name = input
        .get(..3)
        .ok_or_else(|| ParseErrorKind::MonthName(input.into()))?;
    let month = MONTH_NAMES
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(name))
        .ok_or_else(|| ParseErrorKind::MonthName(name.into()))?;
    Ok((u8::try_from(month + 1).map_err(|_| ParseErrorKind::Overflow)?, &input[3..]))
}

pub(crate) fn two_digits_frag(
    input: &str,
    field: DateTimeField,
) -> Result<(u8, &str), ParseErrorKind> {
    let (value, rest) = digits_frag(input, 2, field)?;
    Ok((u8::try_from(value).map_err(|_| ParseErrorKind::Overflow)?, rest))
}

/// Reads exactly `count` ASCII digits.
fn digits_frag(
    input: &str,
    count: usize,
    field: DateTimeField,
) -> Result<(u32, &str), ParseErrorKind> {
    let error = || ParseErrorKind::Digits { field, count };
    let digits = input
        .get(..count)
        .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(error)?;
    Ok((digits.parse().map_err(|_| error())?, &input[count..]))
}

/// Reads the characters up to the next whitespace.
fn word_frag(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    input.split_at(input.find(char::is_whitespace).unwrap_or(input.len()))
}

pub(crate) fn expect_char(input: &str, constant: char) -> Result<&str, ParseErrorKind> {
    input
        .strip_prefix(constant)
        .ok_or(ParseErrorKind::Separator(constant))
}

/// An error raised while parsing a [`DateTime`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid date/time '{input}': {kind}")]
pub struct ParseDateTimeError {
    input: String,
    kind: ParseErrorKind,
}

impl ParseDateTimeError {
    /// The rejected text.
    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The component that could not be read or is out of range, if the error is about a single component.
    pub fn field(&self) -> Option<DateTimeField> {
        match &self.kind {
            ParseErrorKind::Digits { field, .. } => Some(*field),
            ParseErrorKind::InvalidField(error) => Some(error.field()),
            ParseErrorKind::MonthName(_) => Some(DateTimeField::Month),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub(crate) enum ParseErrorKind {
    #[error("the layout is not recognized")]
    UnrecognizedLayout,
    #[error("expected {count} digits for the {field}")]
    Digits { field: DateTimeField, count: usize },
    #[error("expected '{0}'")]
    Separator(char),
    #[error("unknown month name '{0}'")]
    MonthName(String),
    #[error("a time zone label is expected")]
    MissingZone,
    #[error("invalid time zone offset '{0}'")]
    Offset(String),
    #[error("unexpected trailing text '{0}'")]
    Trailing(String),
    #[error(transparent)]
    InvalidField(#[from] InvalidFieldError),
    #[error("overflow during date/time computation")]
    Overflow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn auto_dispatch() -> Result<(), Box<dyn Error>> {
        for (input, expected) in [
            ("23", "23"),
            ("2020", "2020"),
            ("10:15", "10:15"),
            ("2020-07", "2020-07"),
            ("07/2020", "2020-07"),
            ("jul2020", "2020-07"),
            ("20200704", "2020-07-04"),
            ("07/04/20", "2020-07-04"),
            ("07/04/75", "1975-07-04"),
            ("10:15:30", "10:15:30"),
            ("04Jul2020", "2020-07-04"),
            ("2020-07-04", "2020-07-04"),
            ("07/04/2020", "2020-07-04"),
            ("04-JUL-2020", "2020-07-04"),
            ("10:15:30.25", "10:15:30.25"),
            ("202007041015", "2020-07-04 10:15"),
            ("10:15:30.250", "10:15:30.250"),
            ("2020-07-04 10", "2020-07-04 10"),
            ("20200704101530", "2020-07-04 10:15:30"),
            ("04Jul2020 1015", "2020-07-04 10:15"),
            ("10:15:30.250000", "10:15:30.250000"),
            ("2020-07-04 10:15", "2020-07-04 10:15"),
            ("07/04/2020 10:15", "2020-07-04 10:15"),
            ("04Jul2020 10:15:30", "2020-07-04 10:15:30"),
            ("10:15:30.250000001", "10:15:30.250000001"),
            ("2020-07-04 10:15:30", "2020-07-04 10:15:30"),
            ("07/04/2020 10:15:30", "2020-07-04 10:15:30"),
            ("2020-07-04 10:15:30.25", "2020-07-04 10:15:30.25"),
            ("2020-07-04 10:15:30.250", "2020-07-04 10:15:30.250"),
            ("2020-07-04 10:15:30.250001", "2020-07-04 10:15:30.250001"),
            ("2020-07-04 10:15:30.250000001", "2020-07-04 10:15:30.250000001"),
            ("  2020-07-04  ", "2020-07-04"),
            ("-0044-03-15", "-0044-03-15"),
        ] {
            assert_eq!(DateTime::parse(input)?.to_string(), expected, "{input}");
        }
        Ok(())
    }

    #[test]
    fn auto_dispatch_with_zone() -> Result<(), Box<dyn Error>> {
        let date = DateTime::parse("2020-07-04 10:15 PDT")?;
        assert_eq!(date.zone(), "PDT");
        assert!(date.is_zone_significant());
        assert_eq!(date.to_string(), "2020-07-04 10:15 PDT");
        let date = DateTime::parse("07/04/2020 10:15:30 -05:00")?;
        assert_eq!(date.zone(), "-05:00");
        assert_eq!(date.to_string(), "2020-07-04 10:15:30 -05:00");
        let date = DateTime::parse("2020-07-04 10")?;
        assert_eq!(date.zone(), "");
        Ok(())
    }

    #[test]
    fn iso_path() -> Result<(), Box<dyn Error>> {
        let date = DateTime::parse("2017-06-30T23:03:33.123456789-06:00")?;
        assert_eq!(date.second(), 33);
        assert_eq!(date.nanosecond(), 123_456_789);
        assert_eq!(date.zone(), "-06:00");
        assert_eq!(date.precision(), Precision::Nanosecond);
        assert_eq!(DateTime::parse("20170630T230333")?.precision(), Precision::Second);
        Ok(())
    }

    #[test]
    fn explicit_layouts_round_trip() -> Result<(), Box<dyn Error>> {
        let mut value = DateTime::new(1987, 11, 9, 8, 7, 6)?;
        value.set_precision(Precision::Nanosecond);
        value.set_nanosecond(987_654_321)?;
        value.set_zone("CET");
        for format in DateTimeFormat::ALL {
            let mut expected = value.clone();
            expected.set_precision(format.precision());
            if format.is_time_only() {
                expected.set_date(0, 1, 1)?;
            }
            let text = expected.format(format)?;
            let parsed = DateTime::parse_with_format(&text, format)?;
            assert_eq!(parsed, expected, "{format}: {text}");
            assert_eq!(parsed.precision(), format.precision(), "{format}: {text}");
        }
        Ok(())
    }

    #[test]
    fn auto_format_round_trip() -> Result<(), Box<dyn Error>> {
        for precision in Precision::ALL {
            let mut value = DateTime::new(2004, 2, 29, 13, 59, 58)?;
            value.set_precision(Precision::Nanosecond);
            value.set_nanosecond(123_456_789)?;
            value.set_precision(precision);
            let parsed = DateTime::parse(&value.to_string())?;
            assert_eq!(parsed, value, "{precision}");
            assert_eq!(parsed.precision(), precision);
        }
        Ok(())
    }

    #[test]
    fn long_and_negative_years_round_trip() -> Result<(), Box<dyn Error>> {
        for year in [12345, -44, -12345, 9999] {
            let value = DateTime::from_date(year, 1, 2)?;
            for format in [
                DateTimeFormat::Date,
                DateTimeFormat::CompactDate,
                DateTimeFormat::UsDate,
            ] {
                let text = value.format(format)?;
                assert_eq!(DateTime::parse_with_format(&text, format)?, value, "{text}");
            }
            assert_eq!(DateTime::parse(&value.to_string())?, value, "{year}");
        }
        let value = DateTime::new(12345, 6, 7, 8, 9, 10)?;
        assert_eq!(value.to_string(), "12345-06-07 08:09:10");
        assert_eq!(DateTime::parse(&value.to_string())?, value);
        let text = value.format(DateTimeFormat::CompactSecond)?;
        assert_eq!(text, "123450607080910");
        assert_eq!(
            DateTime::parse_with_format(&text, DateTimeFormat::CompactSecond)?,
            value
        );
        let text = value.format(DateTimeFormat::Iso8601)?;
        assert_eq!(text, "12345-06-07T08:09:10");
        assert_eq!(DateTime::parse(&text)?, value);

        let mut year = DateTime::from_date(12345, 1, 1)?;
        year.set_precision(Precision::Year);
        assert_eq!(year.to_string(), "12345");
        assert_eq!(DateTime::parse("12345")?, year);
        assert_eq!(DateTime::parse("12345 PST")?.zone(), "PST");
        Ok(())
    }

    #[test]
    fn zone_label_is_a_single_word() -> Result<(), Box<dyn Error>> {
        let date = DateTime::parse_with_format("2020-01-01 PST", DateTimeFormat::DateZone)?;
        assert_eq!(date.zone(), "PST");
        assert!(
            DateTime::parse_with_format("2020-01-01 PST extra", DateTimeFormat::DateZone).is_err()
        );
        assert!(
            DateTime::parse_with_format(
                "2020-01-01T10:00:00+01:00 x",
                DateTimeFormat::IsoSecondOffset
            )
            .is_err()
        );
        assert!(DateTime::parse("2020-01-01 PST extra").is_err());
        Ok(())
    }

    #[test]
    fn validation() {
        for (input, field) in [
            ("2023-02-29", Some(DateTimeField::Day)),
            ("2024-13-01", Some(DateTimeField::Month)),
            ("2024-01-01 24:30", Some(DateTimeField::Hour)),
            ("2024-01-01 23:60", Some(DateTimeField::Minute)),
            ("2024-01-01 23:59:60", Some(DateTimeField::Second)),
            ("2024-0a-01", Some(DateTimeField::Month)),
            ("01Foo2020", Some(DateTimeField::Month)),
            ("not a date", None),
            ("", None),
        ] {
            let error = DateTime::parse(input).unwrap_err();
            assert_eq!(error.field(), field, "{input}: {error}");
            assert_eq!(error.input(), input);
        }
    }

    #[test]
    fn hour_24_is_next_midnight() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            DateTime::parse("2020-02-29 24:00")?,
            DateTime::new(2020, 3, 1, 0, 0, 0)?
        );
        assert!(DateTime::parse("2020-02-30 24:00").is_err());
        Ok(())
    }

    #[test]
    fn collisions_need_explicit_layout() -> Result<(), Box<dyn Error>> {
        assert_eq!(DateTime::parse("0930")?.year(), 930);
        let time = DateTime::parse_with_format("0930", DateTimeFormat::TimeCompactMinute)?;
        assert_eq!((time.hour(), time.minute()), (9, 30));
        Ok(())
    }

    #[test]
    fn explicit_layout_mismatch() {
        let error = DateTime::parse_with_format("13/01/2020", DateTimeFormat::UsDate).unwrap_err();
        assert_eq!(error.field(), Some(DateTimeField::Month));
        let error = DateTime::parse_with_format("2020-01-01", DateTimeFormat::UsDate).unwrap_err();
        assert_eq!(error.field(), None);
        assert!(DateTime::parse_with_format("2020-01-01 10", DateTimeFormat::Date).is_err());
        assert!(DateTime::parse_with_format("2020-01-01", DateTimeFormat::DateZone).is_err());
    }

    #[test]
    fn parse_into_is_atomic() -> Result<(), Box<dyn Error>> {
        let mut date = DateTime::parse("2020-01-01")?;
        assert!(date.parse_into("2020-02-30").is_err());
        assert_eq!(date, DateTime::from_date(2020, 1, 1)?);
        date.parse_into("2021-01-01 10:00")?;
        assert_eq!(date, DateTime::new(2021, 1, 1, 10, 0, 0)?);
        Ok(())
    }

    #[test]
    fn parsed_validation_mode() -> Result<(), Box<dyn Error>> {
        let options = ParseOptions::default().with_validation(ValidationMode::Fast);
        let date = DateTime::parse_with_options("2020-01-01", &options)?;
        assert_eq!(date.validation(), ValidationMode::Fast);
        assert!(DateTime::parse_with_options("2020-01-32", &options).is_err());
        Ok(())
    }

    #[test]
    fn two_digit_year_pivot() {
        let options = ParseOptions::default();
        assert_eq!(options.expand_two_digit_year(29), 2029);
        assert_eq!(options.expand_two_digit_year(30), 1930);
        let options = options.with_two_digit_year_pivot(0);
        assert_eq!(options.expand_two_digit_year(5), 1905);
    }
}
