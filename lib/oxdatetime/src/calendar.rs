//! Proleptic Gregorian calendar computations shared by [`DateTime`](crate::DateTime), the rounding
//! code and the parsers.

use std::cmp::min;
use std::fmt;
use std::str::FromStr;

pub(crate) const NANOSECONDS_PER_SECOND: i64 = 1_000_000_000;
const SECONDS_PER_DAY: i128 = 86_400;
/// Days between 0000-03-01 and 1970-01-01.
const UNIX_EPOCH_SHIFT: i64 = 719_468;
const DAYS_PER_ERA: i64 = 146_097;

/// Returns `true` if the year is a leap year in the proleptic Gregorian calendar.
///
/// ```
/// use oxdatetime::is_leap_year;
///
/// assert!(is_leap_year(2000));
/// assert!(!is_leap_year(1900));
/// assert!(is_leap_year(2024));
/// assert!(!is_leap_year(2023));
/// ```
#[inline]
pub fn is_leap_year(year: i64) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

/// The number of days of the given month.
///
/// Months outside of 1..=12 are considered to have 31 days.
#[inline]
pub fn days_in_month(year: i64, month: u8) -> u8 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[inline]
pub fn days_in_year(year: i64) -> u16 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// The 1-based day of the year.
pub fn day_of_year(year: i64, month: u8, day: u8) -> u16 {
    (1..min(month, 13))
        .map(|m| u16::from(days_in_month(year, m)))
        .sum::<u16>()
        + u16::from(day)
}

/// Number of days since 1970-01-01.
///
/// Out of range days are handled linearly so that e.g. the 32nd of January is the 1st of February.
pub(crate) fn days_from_civil(year: i64, month: u8, day: u8) -> Option<i64> {
    let year = if month <= 2 {
        year.checked_sub(1)?
    } else {
        year
    };
    let era = year.div_euclid(400);
    let year_of_era = year.rem_euclid(400);
    let month = i64::from(month);
    let shifted_month = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = (153 * shifted_month + 2) / 5 + i64::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era.checked_mul(DAYS_PER_ERA)?
        .checked_add(day_of_era - UNIX_EPOCH_SHIFT)
}

/// Inverse of [`days_from_civil`].
pub(crate) fn civil_from_days(days: i64) -> Option<(i64, u8, u8)> {
    let days = days.checked_add(UNIX_EPOCH_SHIFT)?;
    let era = days.div_euclid(DAYS_PER_ERA);
    let day_of_era = days.rem_euclid(DAYS_PER_ERA);
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
    let month = if shifted_month < 10 {
        shifted_month + 3
    } else {
        shifted_month - 9
    };
    let year = era.checked_mul(400)?.checked_add(year_of_era)?;
    let year = if month <= 2 {
        year.checked_add(1)?
    } else {
        year
    };
    Some((year, u8::try_from(month).ok()?, u8::try_from(day).ok()?))
}

/// A day of the week.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Self; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// The weekday number, Sunday being 1 and Saturday 7.
    #[inline]
    pub const fn number_from_sunday(self) -> u8 {
        self as u8 + 1
    }

    /// Inverse of [`Weekday::number_from_sunday`].
    #[inline]
    pub fn from_number_from_sunday(number: u8) -> Option<Self> {
        Self::ALL.get(usize::from(number.checked_sub(1)?)).copied()
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }

    pub(crate) fn from_days_since_epoch(days: i64) -> Self {
        // 1970-01-01 is a Thursday
        Self::ALL[usize::try_from((days + 4).rem_euclid(7)).unwrap_or_default()]
    }
}

impl fmt::Display for Weekday {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = ParseWeekdayError;

    /// Accepts the English names, their three letters abbreviations and the numbers 1 (Sunday) to 7.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if let Ok(number) = input.parse::<u8>() {
            return Self::from_number_from_sunday(number).ok_or(ParseWeekdayError);
        }
        Self::ALL
            .into_iter()
            .find(|day| {
                day.name().eq_ignore_ascii_case(input)
                    || (input.len() == 3 && day.name()[..3].eq_ignore_ascii_case(input))
            })
            .ok_or(ParseWeekdayError)
    }
}

/// The given string is not a weekday.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("not a valid day of the week")]
pub struct ParseWeekdayError;

/// The raw calendar fields of a date/time, without any precision, zone or validation logic.
///
/// All `plus_*` operations carry into the coarser fields and return `None` on year overflow.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub(crate) struct CivilFields {
    pub year: i64,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
}

impl CivilFields {
    pub const ZERO: Self = Self {
        year: 0,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
        nanosecond: 0,
    };

    #[inline]
    pub const fn date(year: i64, month: u8, day: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            nanosecond: 0,
        }
    }

    #[inline]
    pub fn absolute_day(&self) -> Option<i64> {
        days_from_civil(self.year, self.month, self.day)
    }

    #[inline]
    pub fn absolute_month(&self) -> Option<i64> {
        self.year
            .checked_mul(12)?
            .checked_add(i64::from(self.month) - 1)
    }

    #[inline]
    pub fn weekday(&self) -> Option<Weekday> {
        Some(Weekday::from_days_since_epoch(self.absolute_day()?))
    }

    /// Nanoseconds since 1970-01-01T00:00:00, ignoring any time zone.
    pub fn timeline_nanoseconds(&self) -> Option<i128> {
        let seconds = i128::from(self.absolute_day()?) * SECONDS_PER_DAY
            + i128::from(self.hour) * 3600
            + i128::from(self.minute) * 60
            + i128::from(self.second);
        Some(seconds * i128::from(NANOSECONDS_PER_SECOND) + i128::from(self.nanosecond))
    }

    pub fn with_absolute_day(self, days: i64) -> Option<Self> {
        let (year, month, day) = civil_from_days(days)?;
        Some(Self {
            year,
            month,
            day,
            ..self
        })
    }

    pub fn plus_nanoseconds(self, delta: i64) -> Option<Self> {
        let total = i64::from(self.nanosecond).checked_add(delta)?;
        let fields = Self {
            nanosecond: u32::try_from(total.rem_euclid(NANOSECONDS_PER_SECOND)).ok()?,
            ..self
        };
        match total.div_euclid(NANOSECONDS_PER_SECOND) {
            0 => Some(fields),
            carry => fields.plus_seconds(carry),
        }
    }

    pub fn plus_seconds(self, delta: i64) -> Option<Self> {
        let total = i64::from(self.second).checked_add(delta)?;
        let fields = Self {
            second: u8::try_from(total.rem_euclid(60)).ok()?,
            ..self
        };
        match total.div_euclid(60) {
            0 => Some(fields),
            carry => fields.plus_minutes(carry),
        }
    }

    pub fn plus_minutes(self, delta: i64) -> Option<Self> {
        let total = i64::from(self.minute).checked_add(delta)?;
        let fields = Self {
            minute: u8::try_from(total.rem_euclid(60)).ok()?,
            ..self
        };
        match total.div_euclid(60) {
            0 => Some(fields),
            carry => fields.plus_hours(carry),
        }
    }

    pub fn plus_hours(self, delta: i64) -> Option<Self> {
        let total = i64::from(self.hour).checked_add(delta)?;
        let fields = Self {
            hour: u8::try_from(total.rem_euclid(24)).ok()?,
            ..self
        };
        match total.div_euclid(24) {
            0 => Some(fields),
            carry => fields.plus_days(carry),
        }
    }

    /// The day carry walks the absolute day counter, which matches a month by month walk
    /// using the days-in-month of each traversed year.
    pub fn plus_days(self, delta: i64) -> Option<Self> {
        if delta == 0 {
            return Some(self);
        }
        self.with_absolute_day(self.absolute_day()?.checked_add(delta)?)
    }

    /// Adds months, clamping the day to the last day of the target month.
    pub fn plus_months(self, delta: i64) -> Option<Self> {
        let total = self.absolute_month()?.checked_add(delta)?;
        let year = total.div_euclid(12);
        let month = u8::try_from(total.rem_euclid(12) + 1).ok()?;
        Some(Self {
            year,
            month,
            day: min(self.day, days_in_month(year, month)),
            ..self
        })
    }

    /// Carries the out of range fields a fast mode value may hold into the coarser ones,
    /// e.g. the day 0 of a month becomes the last day of the previous month.
    pub fn normalized(self) -> Option<Self> {
        let month = self.absolute_month()?;
        Self::date(
            month.div_euclid(12),
            u8::try_from(month.rem_euclid(12) + 1).ok()?,
            1,
        )
        .plus_days(i64::from(self.day) - 1)?
        .plus_hours(self.hour.into())?
        .plus_minutes(self.minute.into())?
        .plus_seconds(self.second.into())?
        .plus_nanoseconds(self.nanosecond.into())
    }

    /// Adds years, clamping February 29th to February 28th on non leap years.
    pub fn plus_years(self, delta: i64) -> Option<Self> {
        let year = self.year.checked_add(delta)?;
        Some(Self {
            year,
            day: min(self.day, days_in_month(year, self.month)),
            ..self
        })
    }
}
