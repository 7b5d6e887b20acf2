//! The catalog of fixed text layouts and the formatting of [`DateTime`] values.

use crate::date_time::DateTime;
use crate::iso8601::write_iso8601;
use crate::precision::{DateTimeMode, Precision};
use crate::timezone::{TimeZoneError, TimeZoneTable, format_offset};
use std::fmt;
use std::str::FromStr;

pub(crate) const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A text layout of a [`DateTime`].
///
/// Each layout has a pattern where `YYYY` is a 4 digits year, `YY` a 2 digits year, `MM` a month,
/// `Mon` an English month abbreviation, `DD` a day, `HH` an hour, `mm` a minute, `SS` a second,
/// a run of `n` the fraction of second digits, `ZZZ` a time zone label and `+HH:MM` a numeric offset.
///
/// ```
/// use oxdatetime::{DateTime, DateTimeFormat, Precision};
///
/// let format: DateTimeFormat = "UsDate".parse()?;
/// assert_eq!(format.pattern(), "MM/DD/YYYY");
/// assert_eq!(format.precision(), Precision::Day);
/// assert_eq!(DateTime::from_date(2020, 7, 4)?.format(format)?, "07/04/2020");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum DateTimeFormat {
    Year,
    YearZone,
    YearMonth,
    YearMonthZone,
    UsMonthYear,
    MonthNameYear,
    Date,
    DateZone,
    CompactDate,
    UsDate,
    UsShortDate,
    DayMonthNameYear,
    DashedDayMonthNameYear,
    DateHour,
    DateHourZone,
    DateMinute,
    DateMinuteZone,
    DateSecond,
    DateSecondZone,
    DateHsecond,
    DateHsecondZone,
    DateMillisecond,
    DateMillisecondZone,
    DateMicrosecond,
    DateMicrosecondZone,
    DateNanosecond,
    DateNanosecondZone,
    UsDateMinute,
    UsDateSecond,
    DayMonthNameYearMinute,
    DayMonthNameYearSecond,
    CompactMinute,
    CompactSecond,
    BasicIso,
    IsoMinute,
    IsoSecond,
    IsoSecondOffset,
    /// ISO 8601 with as many fields as the value precision, and the zone offset if the zone is significant.
    Iso8601,
    TimeHour,
    TimeMinute,
    /// `HHmm`, only reachable by name because it collides with [`DateTimeFormat::Year`].
    TimeCompactMinute,
    TimeSecond,
    TimeHsecond,
    TimeMillisecond,
    TimeMicrosecond,
    TimeNanosecond,
}

struct Layout {
    name: &'static str,
    pattern: &'static str,
    precision: Precision,
}

impl DateTimeFormat {
    pub const ALL: [Self; 46] = [
        Self::Year,
        Self::YearZone,
        Self::YearMonth,
        Self::YearMonthZone,
        Self::UsMonthYear,
        Self::MonthNameYear,
        Self::Date,
        Self::DateZone,
        Self::CompactDate,
        Self::UsDate,
        Self::UsShortDate,
        Self::DayMonthNameYear,
        Self::DashedDayMonthNameYear,
        Self::DateHour,
        Self::DateHourZone,
        Self::DateMinute,
        Self::DateMinuteZone,
        Self::DateSecond,
        Self::DateSecondZone,
        Self::DateHsecond,
        Self::DateHsecondZone,
        Self::DateMillisecond,
        Self::DateMillisecondZone,
        Self::DateMicrosecond,
        Self::DateMicrosecondZone,
        Self::DateNanosecond,
        Self::DateNanosecondZone,
        Self::UsDateMinute,
        Self::UsDateSecond,
        Self::DayMonthNameYearMinute,
        Self::DayMonthNameYearSecond,
        Self::CompactMinute,
        Self::CompactSecond,
        Self::BasicIso,
        Self::IsoMinute,
        Self::IsoSecond,
        Self::IsoSecondOffset,
        Self::Iso8601,
        Self::TimeHour,
        Self::TimeMinute,
        Self::TimeCompactMinute,
        Self::TimeSecond,
        Self::TimeHsecond,
        Self::TimeMillisecond,
        Self::TimeMicrosecond,
        Self::TimeNanosecond,
    ];

    const fn layout(self) -> Layout {
        let (name, pattern, precision) = match self {
            Self::Year => ("Year", "YYYY", Precision::Year),
            Self::YearZone => ("YearZone", "YYYY ZZZ", Precision::Year),
            Self::YearMonth => ("YearMonth", "YYYY-MM", Precision::Month),
            Self::YearMonthZone => ("YearMonthZone", "YYYY-MM ZZZ", Precision::Month),
            Self::UsMonthYear => ("UsMonthYear", "MM/YYYY", Precision::Month),
            Self::MonthNameYear => ("MonthNameYear", "MonYYYY", Precision::Month),
            Self::Date => ("Date", "YYYY-MM-DD", Precision::Day),
            Self::DateZone => ("DateZone", "YYYY-MM-DD ZZZ", Precision::Day),
            Self::CompactDate => ("CompactDate", "YYYYMMDD", Precision::Day),
            Self::UsDate => ("UsDate", "MM/DD/YYYY", Precision::Day),
            Self::UsShortDate => ("UsShortDate", "MM/DD/YY", Precision::Day),
            Self::DayMonthNameYear => ("DayMonthNameYear", "DDMonYYYY", Precision::Day),
            Self::DashedDayMonthNameYear => {
                ("DashedDayMonthNameYear", "DD-Mon-YYYY", Precision::Day)
            }
            Self::DateHour => ("DateHour", "YYYY-MM-DD HH", Precision::Hour),
            Self::DateHourZone => ("DateHourZone", "YYYY-MM-DD HH ZZZ", Precision::Hour),
            Self::DateMinute => ("DateMinute", "YYYY-MM-DD HH:mm", Precision::Minute),
            Self::DateMinuteZone => ("DateMinuteZone", "YYYY-MM-DD HH:mm ZZZ", Precision::Minute),
            Self::DateSecond => ("DateSecond", "YYYY-MM-DD HH:mm:SS", Precision::Second),
            Self::DateSecondZone => (
                "DateSecondZone",
                "YYYY-MM-DD HH:mm:SS ZZZ",
                Precision::Second,
            ),
            Self::DateHsecond => ("DateHsecond", "YYYY-MM-DD HH:mm:SS.nn", Precision::Hsecond),
            Self::DateHsecondZone => (
                "DateHsecondZone",
                "YYYY-MM-DD HH:mm:SS.nn ZZZ",
                Precision::Hsecond,
            ),
            Self::DateMillisecond => (
                "DateMillisecond",
                "YYYY-MM-DD HH:mm:SS.nnn",
                Precision::Millisecond,
            ),
            Self::DateMillisecondZone => (
                "DateMillisecondZone",
                "YYYY-MM-DD HH:mm:SS.nnn ZZZ",
                Precision::Millisecond,
            ),
            Self::DateMicrosecond => (
                "DateMicrosecond",
                "YYYY-MM-DD HH:mm:SS.nnnnnn",
                Precision::Microsecond,
            ),
            Self::DateMicrosecondZone => (
                "DateMicrosecondZone",
                "YYYY-MM-DD HH:mm:SS.nnnnnn ZZZ",
                Precision::Microsecond,
            ),
            Self::DateNanosecond => (
                "DateNanosecond",
                "YYYY-MM-DD HH:mm:SS.nnnnnnnnn",
                Precision::Nanosecond,
            ),
            Self::DateNanosecondZone => (
                "DateNanosecondZone",
                "YYYY-MM-DD HH:mm:SS.nnnnnnnnn ZZZ",
                Precision::Nanosecond,
            ),
            Self::UsDateMinute => ("UsDateMinute", "MM/DD/YYYY HH:mm", Precision::Minute),
            Self::UsDateSecond => ("UsDateSecond", "MM/DD/YYYY HH:mm:SS", Precision::Second),
            Self::DayMonthNameYearMinute => (
                "DayMonthNameYearMinute",
                "DDMonYYYY HHmm",
                Precision::Minute,
            ),
            Self::DayMonthNameYearSecond => (
                "DayMonthNameYearSecond",
                "DDMonYYYY HH:mm:SS",
                Precision::Second,
            ),
            Self::CompactMinute => ("CompactMinute", "YYYYMMDDHHmm", Precision::Minute),
            Self::CompactSecond => ("CompactSecond", "YYYYMMDDHHmmSS", Precision::Second),
            Self::BasicIso => ("BasicIso", "YYYYMMDDTHHmmSS", Precision::Second),
            Self::IsoMinute => ("IsoMinute", "YYYY-MM-DDTHH:mm", Precision::Minute),
            Self::IsoSecond => ("IsoSecond", "YYYY-MM-DDTHH:mm:SS", Precision::Second),
            Self::IsoSecondOffset => (
                "IsoSecondOffset",
                "YYYY-MM-DDTHH:mm:SS+HH:MM",
                Precision::Second,
            ),
            Self::Iso8601 => (
                "Iso8601",
                "YYYY-MM-DDTHH:mm:SS.nnnnnnnnn+HH:MM",
                Precision::Nanosecond,
            ),
            Self::TimeHour => ("TimeHour", "HH", Precision::Hour),
            Self::TimeMinute => ("TimeMinute", "HH:mm", Precision::Minute),
            Self::TimeCompactMinute => ("TimeCompactMinute", "HHmm", Precision::Minute),
            Self::TimeSecond => ("TimeSecond", "HH:mm:SS", Precision::Second),
            Self::TimeHsecond => ("TimeHsecond", "HH:mm:SS.nn", Precision::Hsecond),
            Self::TimeMillisecond => ("TimeMillisecond", "HH:mm:SS.nnn", Precision::Millisecond),
            Self::TimeMicrosecond => (
                "TimeMicrosecond",
                "HH:mm:SS.nnnnnn",
                Precision::Microsecond,
            ),
            Self::TimeNanosecond => (
                "TimeNanosecond",
                "HH:mm:SS.nnnnnnnnn",
                Precision::Nanosecond,
            ),
        };
        Layout {
            name,
            pattern,
            precision,
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        self.layout().name
    }

    #[inline]
    pub const fn pattern(self) -> &'static str {
        self.layout().pattern
    }

    /// The precision of the values this layout holds.
    ///
    /// [`DateTimeFormat::Iso8601`] has a variable precision, this returns the finest one.
    #[inline]
    pub const fn precision(self) -> Precision {
        self.layout().precision
    }

    /// The layout only holds a time of day.
    #[inline]
    pub fn is_time_only(self) -> bool {
        self.pattern().starts_with("HH")
    }

    /// The layout holds a time zone label or offset.
    ///
    /// [`DateTimeFormat::Iso8601`] only holds it when the zone is significant.
    #[inline]
    pub fn has_zone(self) -> bool {
        self.tokens()
            .any(|token| matches!(token, Token::Zone | Token::Offset))
    }

    /// The layout used when no explicit one is given.
    ///
    /// It only depends on the precision, on the time-only flag and on whether a significant zone label is set,
    /// so that the output is parsed back to the same precision.
    pub fn auto(mode: &DateTimeMode, has_zone_label: bool) -> Self {
        let precision = mode.effective_precision();
        if mode.time_only {
            return match precision {
                Precision::Nanosecond => Self::TimeNanosecond,
                Precision::Microsecond => Self::TimeMicrosecond,
                Precision::Millisecond => Self::TimeMillisecond,
                Precision::Hsecond => Self::TimeHsecond,
                Precision::Second => Self::TimeSecond,
                Precision::Minute => Self::TimeMinute,
                _ => Self::TimeHour,
            };
        }
        let (plain, zoned) = match precision {
            Precision::Nanosecond => (Self::DateNanosecond, Self::DateNanosecondZone),
            Precision::Microsecond => (Self::DateMicrosecond, Self::DateMicrosecondZone),
            Precision::Millisecond => (Self::DateMillisecond, Self::DateMillisecondZone),
            Precision::Hsecond => (Self::DateHsecond, Self::DateHsecondZone),
            Precision::Second => (Self::DateSecond, Self::DateSecondZone),
            Precision::Minute => (Self::DateMinute, Self::DateMinuteZone),
            Precision::Hour => (Self::DateHour, Self::DateHourZone),
            Precision::Day => (Self::Date, Self::DateZone),
            Precision::Month => (Self::YearMonth, Self::YearMonthZone),
            Precision::Year => (Self::Year, Self::YearZone),
        };
        if mode.zone_significant && has_zone_label {
            zoned
        } else {
            plain
        }
    }

    #[inline]
    pub(crate) fn tokens(self) -> PatternTokens {
        PatternTokens {
            rest: self.pattern(),
        }
    }
}

impl fmt::Display for DateTimeFormat {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DateTimeFormat {
    type Err = UnrecognizedFormatError;

    /// Accepts the layout names and patterns, ignoring case for names.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(input) || format.pattern() == input)
            .ok_or_else(|| UnrecognizedFormatError {
                name: input.into(),
            })
    }
}

/// The name is not one of the [`DateTimeFormat`] layouts.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unrecognized date/time format '{name}'")]
pub struct UnrecognizedFormatError {
    name: String,
}

/// An element of a layout pattern.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub(crate) enum Token {
    Year4,
    Year2,
    Month2,
    MonthName,
    Day2,
    Hour2,
    Minute2,
    Second2,
    /// Fraction of second with the given number of digits.
    Fraction(u8),
    Zone,
    Offset,
    Literal(char),
}

const PATTERN_KEYWORDS: [(&str, Token); 10] = [
    ("+HH:MM", Token::Offset),
    ("YYYY", Token::Year4),
    ("YY", Token::Year2),
    ("Mon", Token::MonthName),
    ("MM", Token::Month2),
    ("DD", Token::Day2),
    ("HH", Token::Hour2),
    ("mm", Token::Minute2),
    ("SS", Token::Second2),
    ("ZZZ", Token::Zone),
];

/// Splits a layout pattern into [`Token`]s.
pub(crate) struct PatternTokens {
    rest: &'static str,
}

impl Iterator for PatternTokens {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some((keyword, token)) = PATTERN_KEYWORDS
            .into_iter()
            .find(|(keyword, _)| self.rest.starts_with(keyword))
        {
            self.rest = &self.rest[keyword.len()..];
            return Some(token);
        }
        let fraction_digits = self.rest.bytes().take_while(|b| *b == b'n').count();
        if fraction_digits > 0 {
            self.rest = &self.rest[fraction_digits..];
            return Some(Token::Fraction(
                u8::try_from(fraction_digits).unwrap_or(9),
            ));
        }
        let c = self.rest.chars().next()?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(Token::Literal(c))
    }
}

/// A [`DateTime`] rendered with a layout, see [`DateTime::format`].
struct Formatted<'a> {
    value: &'a DateTime,
    format: DateTimeFormat,
    offset: Option<i32>,
}

impl fmt::Display for Formatted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.format == DateTimeFormat::Iso8601 {
            return write_iso8601(f, self.value, self.offset);
        }
        let value = self.value;
        for token in self.format.tokens() {
            match token {
                Token::Year4 => write_year(f, value.year())?,
                Token::Year2 => write!(f, "{:02}", value.year().rem_euclid(100))?,
                Token::Month2 => write!(f, "{:02}", value.month())?,
                Token::MonthName => f.write_str(
                    usize::from(value.month())
                        .checked_sub(1)
                        .and_then(|i| MONTH_NAMES.get(i))
                        .unwrap_or(&"???"),
                )?,
                Token::Day2 => write!(f, "{:02}", value.day())?,
                Token::Hour2 => write!(f, "{:02}", value.hour())?,
                Token::Minute2 => write!(f, "{:02}", value.minute())?,
                Token::Second2 => write!(f, "{:02}", value.second())?,
                Token::Fraction(digits) => write_fraction(f, value.nanosecond(), digits)?,
                Token::Zone => f.write_str(value.zone().trim())?,
                Token::Offset => match self.offset {
                    Some(offset) => f.write_str(&format_offset(offset))?,
                    None => f.write_str(value.zone().trim())?,
                },
                Token::Literal(c) => fmt::Write::write_char(f, c)?,
            }
        }
        Ok(())
    }
}

/// Writes a year with at least 4 digits and a `-` sign if negative.
pub(crate) fn write_year(f: &mut impl fmt::Write, year: i64) -> fmt::Result {
    if year < 0 {
        f.write_char('-')?;
    }
    write!(f, "{:04}", year.unsigned_abs())
}

/// Writes the first `digits` digits of the fraction of second.
pub(crate) fn write_fraction(f: &mut impl fmt::Write, nanosecond: u32, digits: u8) -> fmt::Result {
    let digits = digits.min(9);
    let value = nanosecond / 10_u32.pow(9 - u32::from(digits));
    write!(f, "{value:0width$}", width = usize::from(digits))
}

impl DateTime {
    /// Formats the value with the given layout.
    ///
    /// Fails if the layout holds a zone and the zone label is empty,
    /// or if a numeric offset is needed and the zone label is not resolvable.
    ///
    /// ```
    /// use oxdatetime::{DateTime, DateTimeFormat};
    ///
    /// let mut date = DateTime::new(2017, 6, 30, 23, 3, 33)?;
    /// date.set_zone("MDT");
    /// assert_eq!(date.format(DateTimeFormat::DayMonthNameYearSecond)?, "30Jun2017 23:03:33");
    /// assert_eq!(date.format(DateTimeFormat::DateSecondZone)?, "2017-06-30 23:03:33 MDT");
    /// assert_eq!(date.format(DateTimeFormat::IsoSecondOffset)?, "2017-06-30T23:03:33-06:00");
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    #[inline]
    pub fn format(&self, format: DateTimeFormat) -> Result<String, TimeZoneError> {
        self.format_in(format, &TimeZoneTable::builtin())
    }

    /// [`DateTime::format`] with custom zones.
    pub fn format_in(
        &self,
        format: DateTimeFormat,
        table: &TimeZoneTable,
    ) -> Result<String, TimeZoneError> {
        let zone = self.zone().trim();
        let needs_offset = if format == DateTimeFormat::Iso8601 {
            self.is_zone_significant() && !zone.is_empty() && !zone.eq_ignore_ascii_case("Z")
        } else {
            if format.has_zone() && zone.is_empty() {
                return Err(TimeZoneError::Unresolvable {
                    abbreviation: String::new(),
                });
            }
            format.tokens().any(|token| token == Token::Offset)
        };
        let offset = if needs_offset {
            Some(table.resolve(zone, self)?)
        } else {
            None
        };
        Ok(Formatted {
            value: self,
            format,
            offset,
        }
        .to_string())
    }

    /// The layout [`Display`](fmt::Display) uses for this value.
    #[inline]
    pub fn auto_format(&self) -> DateTimeFormat {
        DateTimeFormat::auto(&self.mode(), !self.zone().trim().is_empty())
    }
}

impl fmt::Display for DateTime {
    /// Formats with the [automatic layout](DateTime::auto_format).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Formatted {
            value: self,
            format: self.auto_format(),
            offset: None,
        }
        .fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationMode;
    use std::error::Error;

    fn sample() -> Result<DateTime, Box<dyn Error>> {
        let mut date = DateTime::new(2017, 6, 30, 23, 3, 33)?;
        date.set_precision(Precision::Nanosecond);
        date.set_nanosecond(123_456_789)?;
        date.set_zone("PDT");
        Ok(date)
    }

    #[test]
    fn names_are_unique() {
        for (i, a) in DateTimeFormat::ALL.iter().enumerate() {
            for b in &DateTimeFormat::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
                assert_ne!(a.pattern(), b.pattern());
            }
        }
    }

    #[test]
    fn from_str() -> Result<(), UnrecognizedFormatError> {
        for format in DateTimeFormat::ALL {
            assert_eq!(format.name().parse::<DateTimeFormat>()?, format);
            assert_eq!(format.pattern().parse::<DateTimeFormat>()?, format);
        }
        assert_eq!("usdate".parse::<DateTimeFormat>()?, DateTimeFormat::UsDate);
        assert_eq!(
            "Julian".parse::<DateTimeFormat>().unwrap_err().to_string(),
            "unrecognized date/time format 'Julian'"
        );
        Ok(())
    }

    #[test]
    fn tokens() {
        assert_eq!(
            DateTimeFormat::DashedDayMonthNameYear
                .tokens()
                .collect::<Vec<_>>(),
            [
                Token::Day2,
                Token::Literal('-'),
                Token::MonthName,
                Token::Literal('-'),
                Token::Year4
            ]
        );
        assert_eq!(
            DateTimeFormat::DateMillisecondZone
                .tokens()
                .filter(|t| !matches!(t, Token::Literal(_)))
                .collect::<Vec<_>>(),
            [
                Token::Year4,
                Token::Month2,
                Token::Day2,
                Token::Hour2,
                Token::Minute2,
                Token::Second2,
                Token::Fraction(3),
                Token::Zone
            ]
        );
        assert!(DateTimeFormat::IsoSecondOffset.has_zone());
        assert!(!DateTimeFormat::BasicIso.has_zone());
        assert!(DateTimeFormat::TimeCompactMinute.is_time_only());
        assert!(!DateTimeFormat::Date.is_time_only());
    }

    #[test]
    fn format_catalog() -> Result<(), Box<dyn Error>> {
        let date = sample()?;
        for (format, expected) in [
            (DateTimeFormat::Year, "2017"),
            (DateTimeFormat::YearZone, "2017 PDT"),
            (DateTimeFormat::YearMonth, "2017-06"),
            (DateTimeFormat::UsMonthYear, "06/2017"),
            (DateTimeFormat::MonthNameYear, "Jun2017"),
            (DateTimeFormat::Date, "2017-06-30"),
            (DateTimeFormat::CompactDate, "20170630"),
            (DateTimeFormat::UsDate, "06/30/2017"),
            (DateTimeFormat::UsShortDate, "06/30/17"),
            (DateTimeFormat::DayMonthNameYear, "30Jun2017"),
            (DateTimeFormat::DashedDayMonthNameYear, "30-Jun-2017"),
            (DateTimeFormat::DateHour, "2017-06-30 23"),
            (DateTimeFormat::DateMinuteZone, "2017-06-30 23:03 PDT"),
            (DateTimeFormat::DateSecond, "2017-06-30 23:03:33"),
            (DateTimeFormat::DateHsecond, "2017-06-30 23:03:33.12"),
            (DateTimeFormat::DateMillisecondZone, "2017-06-30 23:03:33.123 PDT"),
            (DateTimeFormat::DateMicrosecond, "2017-06-30 23:03:33.123456"),
            (DateTimeFormat::DateNanosecond, "2017-06-30 23:03:33.123456789"),
            (DateTimeFormat::UsDateMinute, "06/30/2017 23:03"),
            (DateTimeFormat::UsDateSecond, "06/30/2017 23:03:33"),
            (DateTimeFormat::DayMonthNameYearMinute, "30Jun2017 2303"),
            (DateTimeFormat::CompactMinute, "201706302303"),
            (DateTimeFormat::CompactSecond, "20170630230333"),
            (DateTimeFormat::BasicIso, "20170630T230333"),
            (DateTimeFormat::IsoMinute, "2017-06-30T23:03"),
            (DateTimeFormat::IsoSecondOffset, "2017-06-30T23:03:33-07:00"),
            (DateTimeFormat::TimeHour, "23"),
            (DateTimeFormat::TimeCompactMinute, "2303"),
            (DateTimeFormat::TimeMillisecond, "23:03:33.123"),
            (DateTimeFormat::TimeNanosecond, "23:03:33.123456789"),
        ] {
            assert_eq!(date.format(format)?, expected, "{format}");
        }
        Ok(())
    }

    #[test]
    fn negative_and_large_years() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            DateTime::from_date(-44, 3, 15)?.format(DateTimeFormat::Date)?,
            "-0044-03-15"
        );
        assert_eq!(
            DateTime::from_date(12345, 1, 2)?.format(DateTimeFormat::Date)?,
            "12345-01-02"
        );
        Ok(())
    }

    #[test]
    fn auto_layout() -> Result<(), Box<dyn Error>> {
        let mut date = sample()?;
        assert_eq!(date.to_string(), "2017-06-30 23:03:33.123456789");
        date.set_zone_significant(true);
        assert_eq!(date.to_string(), "2017-06-30 23:03:33.123456789 PDT");
        date.set_precision(Precision::Millisecond);
        assert_eq!(date.to_string(), "2017-06-30 23:03:33.123 PDT");
        date.set_precision(Precision::Month);
        assert_eq!(date.to_string(), "2017-06 PDT");
        date.set_zone("");
        assert_eq!(date.to_string(), "2017-06");

        let mut time = DateTime::with_mode(
            DateTimeMode::new(Precision::Minute)
                .with_time_only(true)
                .with_validation(ValidationMode::Fast),
        );
        time.set_time(7, 5, 0, 0)?;
        assert_eq!(time.to_string(), "07:05");
        Ok(())
    }

    #[test]
    fn zone_layout_without_zone() -> Result<(), Box<dyn Error>> {
        let date = DateTime::from_date(2020, 1, 1)?;
        assert!(date.format(DateTimeFormat::DateZone).is_err());
        assert!(date.format(DateTimeFormat::IsoSecondOffset).is_err());
        assert_eq!(date.format(DateTimeFormat::Iso8601)?, "2020-01-01");
        Ok(())
    }

    #[test]
    fn custom_zone_offset() -> Result<(), Box<dyn Error>> {
        let table = TimeZoneTable::builtin().with_entry(crate::TimeZoneEntry::new(
            "XST",
            "Example",
            -90,
            crate::DstMode::None,
            0,
        ));
        let mut date = DateTime::new(2020, 1, 1, 0, 0, 0)?;
        date.set_zone("XST");
        assert_eq!(
            date.format_in(DateTimeFormat::IsoSecondOffset, &table)?,
            "2020-01-01T00:00:00-01:30"
        );
        assert!(date.format(DateTimeFormat::IsoSecondOffset).is_err());
        Ok(())
    }
}
