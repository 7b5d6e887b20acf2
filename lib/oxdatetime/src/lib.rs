#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod calendar;
mod date_time;
mod error;
mod format;
mod interval;
mod iso8601;
mod parser;
mod precision;
mod round;
mod timezone;
mod virtual_date;

pub use self::calendar::{
    ParseWeekdayError, Weekday, day_of_year, days_in_month, days_in_year, is_leap_year,
};
pub use self::date_time::DateTime;
pub use self::error::{DateTimeError, DateTimeField, DateTimeOverflowError, InvalidFieldError};
pub use self::format::{DateTimeFormat, UnrecognizedFormatError};
pub use self::interval::{IntervalBase, IntervalSpec, ParseIntervalError};
pub use self::parser::{
    DEFAULT_TWO_DIGIT_YEAR_PIVOT, ParseDateTimeError, ParseOptions, detect_format,
};
pub use self::precision::{
    DateTimeFlags, DateTimeMode, InitialValue, ParsePrecisionError, Precision, ValidationMode,
};
pub use self::round::{ParseRoundDirectionError, RoundDirection};
pub use self::timezone::{
    DstMode, TimeZoneEntry, TimeZoneError, TimeZoneTable, dst_covered_years, dst_transition_days,
    format_offset, is_daylight_saving_time, local_offset_label, offset_delta, resolve_offset,
};
pub use self::virtual_date::{
    NoVirtualDates, VirtualDateError, VirtualDateResolver, VirtualDateSource,
};
