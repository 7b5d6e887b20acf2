use crate::format::UnrecognizedFormatError;
use crate::interval::ParseIntervalError;
use crate::parser::ParseDateTimeError;
use crate::precision::ParsePrecisionError;
use crate::timezone::TimeZoneError;
use crate::virtual_date::VirtualDateError;
use std::fmt;

/// A field of a [`DateTime`](crate::DateTime) or of its mode descriptor.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum DateTimeField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Nanosecond,
    Precision,
    Flags,
}

impl DateTimeField {
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Nanosecond => "nanosecond",
            Self::Precision => "precision",
            Self::Flags => "flags",
        }
    }
}

impl fmt::Display for DateTimeField {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value set on a [`DateTime`](crate::DateTime) field in strict mode is outside of the field range.
#[derive(Eq, PartialEq, Debug, Clone, Copy, thiserror::Error)]
#[error("invalid {field} {value} (must be between {min} and {max})")]
pub struct InvalidFieldError {
    field: DateTimeField,
    value: i64,
    min: i64,
    max: i64,
}

impl InvalidFieldError {
    #[inline]
    pub(crate) const fn new(field: DateTimeField, value: i64, min: i64, max: i64) -> Self {
        Self {
            field,
            value,
            min,
            max,
        }
    }

    /// The field that has been rejected.
    #[inline]
    pub const fn field(&self) -> DateTimeField {
        self.field
    }

    /// The rejected value.
    #[inline]
    pub const fn value(&self) -> i64 {
        self.value
    }

    /// The inclusive range the field accepts.
    #[inline]
    pub const fn range(&self) -> (i64, i64) {
        (self.min, self.max)
    }
}

/// An overflow of the year counter during [`DateTime`](crate::DateTime) arithmetic.
#[derive(Eq, PartialEq, Debug, Clone, Copy, thiserror::Error)]
#[error("overflow during date/time computation")]
pub struct DateTimeOverflowError;

/// Any error raised by this crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DateTimeError {
    #[error(transparent)]
    InvalidField(#[from] InvalidFieldError),
    #[error(transparent)]
    UnrecognizedFormat(#[from] UnrecognizedFormatError),
    #[error(transparent)]
    UnrecognizedInterval(#[from] ParseIntervalError),
    #[error(transparent)]
    UnrecognizedPrecision(#[from] ParsePrecisionError),
    #[error(transparent)]
    TimeZone(#[from] TimeZoneError),
    #[error(transparent)]
    Parse(#[from] ParseDateTimeError),
    #[error(transparent)]
    Overflow(#[from] DateTimeOverflowError),
    #[error(transparent)]
    VirtualDate(#[from] VirtualDateError),
}
