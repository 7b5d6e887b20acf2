use crate::calendar::{
    CivilFields, NANOSECONDS_PER_SECOND, Weekday, day_of_year, days_in_month, days_in_year,
    is_leap_year,
};
use crate::error::{DateTimeError, DateTimeField, DateTimeOverflowError, InvalidFieldError};
use crate::interval::{IntervalBase, IntervalSpec};
use crate::precision::{DateTimeFlags, DateTimeMode, InitialValue, Precision, ValidationMode};
use crate::round::{RoundDirection, round_fields, round_fields_to_day_of_week};
use crate::timezone::{TimeZoneError, TimeZoneTable, format_offset, resolve_offset};
use std::cmp::Ordering;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use tracing::debug;

const SECONDS_PER_DAY: i64 = 86_400;

/// A mutable calendar date and time of day, with a precision, a time zone label and a validation mode.
///
/// The value is a wall-clock reading: there is no hidden absolute instant.
/// Zone conversions go through [`DateTime::shift_to_zone`] that moves the wall-clock by the offset difference.
///
/// ```
/// use oxdatetime::{DateTime, Precision};
///
/// let mut date = DateTime::new(2020, 1, 31, 23, 30, 0)?;
/// date.add_minute(45)?;
/// assert_eq!(date.to_string(), "2020-02-01 00:15:00");
/// date.set_precision(Precision::Day);
/// assert_eq!(date.to_string(), "2020-02-01");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone)]
pub struct DateTime {
    fields: CivilFields,
    zone: String,
    mode: DateTimeMode,
    unmodified: bool,
}

impl DateTime {
    /// `0000-01-01 00:00:00` with [`Precision::Second`] in strict mode.
    #[inline]
    pub fn zero() -> Self {
        Self::with_mode(DateTimeMode::default())
    }

    /// The zero value with the given mode.
    #[inline]
    pub fn with_mode(mode: DateTimeMode) -> Self {
        Self {
            fields: CivilFields::ZERO,
            zone: String::new(),
            mode: normalized_mode(mode),
            unmodified: true,
        }
    }

    /// The current wall-clock time of the process local zone, labeled with its offset (e.g. `+02:00`).
    ///
    /// Uses UTC if the local offset can't be determined.
    pub fn now() -> Self {
        let now = OffsetDateTime::now_local().unwrap_or_else(|error| {
            debug!(%error, "local offset unavailable, using UTC for the current time");
            OffsetDateTime::now_utc()
        });
        let mut value = Self::from(now);
        value.set_precision(Precision::Second);
        value
    }

    /// Builds a value from the legacy combined descriptor.
    ///
    /// ```
    /// use oxdatetime::{DateTime, DateTimeFlags, Precision};
    ///
    /// let date = DateTime::from_flags(DateTimeFlags::MINUTE | DateTimeFlags::TIME_ONLY)?;
    /// assert_eq!(date.precision(), Precision::Minute);
    /// assert!(date.is_time_only());
    /// assert!(date.is_unmodified());
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn from_flags(flags: DateTimeFlags) -> Result<Self, InvalidFieldError> {
        let (mode, initial) = flags.decode()?;
        Ok(match initial {
            InitialValue::Zero => Self::with_mode(mode),
            InitialValue::Current => {
                let mut value = Self::now();
                value.set_mode(mode);
                value
            }
        })
    }

    /// A strictly validated value with [`Precision::Second`].
    pub fn new(
        year: i64,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, InvalidFieldError> {
        let fields = CivilFields {
            hour,
            minute,
            second,
            ..CivilFields::date(year, month, day)
        };
        check_fields(&fields)?;
        Ok(Self::from_parts(fields, String::new(), Precision::Second.into()))
    }

    /// A strictly validated value with [`Precision::Day`].
    pub fn from_date(year: i64, month: u8, day: u8) -> Result<Self, InvalidFieldError> {
        let fields = CivilFields::date(year, month, day);
        check_fields(&fields)?;
        Ok(Self::from_parts(fields, String::new(), Precision::Day.into()))
    }

    /// A copy of `source` shifted to the `target` zone.
    ///
    /// ```
    /// use oxdatetime::DateTime;
    ///
    /// let mut date = DateTime::new(2020, 1, 1, 3, 0, 0)?;
    /// date.set_zone("UTC");
    /// let shifted = DateTime::converted_to_zone(&date, "EST")?;
    /// assert_eq!(shifted.to_string(), "2019-12-31 22:00:00");
    /// assert_eq!(shifted.zone(), "EST");
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn converted_to_zone(source: &Self, target: &str) -> Result<Self, DateTimeError> {
        let mut value = source.clone();
        value.shift_to_zone(target)?;
        Ok(value)
    }

    /// Builds a value from a fractional year like `2020.5`.
    ///
    /// The fraction is spread over the actual length of the year and rounded to the second.
    ///
    /// ```
    /// use oxdatetime::DateTime;
    ///
    /// assert_eq!(DateTime::from_year_fraction(2021.5)?.to_string(), "2021-07-02 12:00:00");
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    #[expect(clippy::cast_possible_truncation)]
    pub fn from_year_fraction(value: f64) -> Result<Self, DateTimeOverflowError> {
        // i64 years beyond this bound lose all their fraction digits
        if !value.is_finite() || value.abs() >= 1e15 {
            return Err(DateTimeOverflowError);
        }
        let year_start = value.floor();
        let year = year_start as i64;
        let year_seconds = f64::from(days_in_year(year)) * 86_400.;
        let seconds = ((value - year_start) * year_seconds).round() as i64;
        let fields = CivilFields::date(year, 1, 1)
            .plus_seconds(seconds)
            .ok_or(DateTimeOverflowError)?;
        Ok(Self::from_parts(
            fields,
            String::new(),
            Precision::Second.into(),
        ))
    }

    /// Inverse of [`DateTime::from_year_fraction`].
    #[expect(clippy::cast_precision_loss)]
    pub fn to_year_fraction(&self) -> f64 {
        let seconds = f64::from(u32::from(self.day_of_year()) - 1) * 86_400.
            + f64::from(self.fields.hour) * 3_600.
            + f64::from(self.fields.minute) * 60.
            + f64::from(self.fields.second)
            + f64::from(self.fields.nanosecond) / 1e9;
        self.fields.year as f64 + seconds / (f64::from(days_in_year(self.fields.year)) * 86_400.)
    }

    /// Builds a value from a Unix timestamp.
    ///
    /// The value is in UTC or shifted to `zone` if set.
    /// Daylight saving time of the target zone is evaluated at the UTC wall-clock.
    ///
    /// ```
    /// use oxdatetime::DateTime;
    ///
    /// let date = DateTime::from_timestamp(86_400, 0, None)?;
    /// assert_eq!(date.to_string(), "1970-01-02 00:00:00");
    /// assert_eq!(date.zone(), "UTC");
    /// assert_eq!(date.to_timestamp()?, (86_400, 0));
    ///
    /// let date = DateTime::from_timestamp(0, 0, Some("PST"))?;
    /// assert_eq!(date.to_string(), "1969-12-31 16:00:00");
    /// assert_eq!(date.to_timestamp()?, (0, 0));
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn from_timestamp(
        seconds: i64,
        nanoseconds: u32,
        zone: Option<&str>,
    ) -> Result<Self, DateTimeError> {
        check(
            DateTimeField::Nanosecond,
            nanoseconds.into(),
            0,
            NANOSECONDS_PER_SECOND - 1,
        )?;
        let second_of_day = seconds.rem_euclid(SECONDS_PER_DAY);
        let fields = CivilFields {
            hour: u8::try_from(second_of_day / 3_600).map_err(|_| DateTimeOverflowError)?,
            minute: u8::try_from(second_of_day % 3_600 / 60).map_err(|_| DateTimeOverflowError)?,
            second: u8::try_from(second_of_day % 60).map_err(|_| DateTimeOverflowError)?,
            nanosecond: nanoseconds,
            ..CivilFields::ZERO
        }
        .with_absolute_day(seconds.div_euclid(SECONDS_PER_DAY))
        .ok_or(DateTimeOverflowError)?;
        let precision = if nanoseconds == 0 {
            Precision::Second
        } else {
            Precision::Nanosecond
        };
        let mut value = Self::from_parts(fields, "UTC".into(), precision.into());
        if let Some(zone) = zone {
            value.shift_to_zone(zone)?;
        }
        Ok(value)
    }

    /// The Unix timestamp of the value, as seconds and nanoseconds.
    ///
    /// Fails if the zone label can't be resolved.
    pub fn to_timestamp(&self) -> Result<(i64, u32), DateTimeError> {
        let offset = resolve_offset(&self.zone, self)?;
        let nanoseconds = self
            .fields
            .timeline_nanoseconds()
            .ok_or(DateTimeOverflowError)?
            - i128::from(offset) * 60 * i128::from(NANOSECONDS_PER_SECOND);
        let nanos_per_second = i128::from(NANOSECONDS_PER_SECOND);
        Ok((
            i64::try_from(nanoseconds.div_euclid(nanos_per_second))
                .map_err(|_| DateTimeOverflowError)?,
            u32::try_from(nanoseconds.rem_euclid(nanos_per_second))
                .map_err(|_| DateTimeOverflowError)?,
        ))
    }

    pub(crate) fn from_parts(fields: CivilFields, zone: String, mode: DateTimeMode) -> Self {
        let mut value = Self {
            fields,
            zone,
            mode: normalized_mode(mode),
            unmodified: false,
        };
        value.pin_finer_fields();
        value
    }

    #[inline]
    pub fn year(&self) -> i64 {
        self.fields.year
    }

    #[inline]
    pub fn month(&self) -> u8 {
        self.fields.month
    }

    #[inline]
    pub fn day(&self) -> u8 {
        self.fields.day
    }

    #[inline]
    pub fn hour(&self) -> u8 {
        self.fields.hour
    }

    #[inline]
    pub fn minute(&self) -> u8 {
        self.fields.minute
    }

    #[inline]
    pub fn second(&self) -> u8 {
        self.fields.second
    }

    /// The fraction of second in nanoseconds.
    #[inline]
    pub fn nanosecond(&self) -> u32 {
        self.fields.nanosecond
    }

    /// The fraction of second in microseconds.
    #[inline]
    pub fn microsecond(&self) -> u32 {
        self.fields.nanosecond / 1_000
    }

    /// The fraction of second in milliseconds.
    #[inline]
    pub fn millisecond(&self) -> u32 {
        self.fields.nanosecond / 1_000_000
    }

    /// The fraction of second in hundredths.
    #[inline]
    pub fn hundredth(&self) -> u32 {
        self.fields.nanosecond / 10_000_000
    }

    /// The time zone label, possibly empty.
    #[inline]
    pub fn zone(&self) -> &str {
        &self.zone
    }

    #[inline]
    pub fn mode(&self) -> DateTimeMode {
        self.mode
    }

    #[inline]
    pub fn precision(&self) -> Precision {
        self.mode.precision
    }

    #[inline]
    pub fn validation(&self) -> ValidationMode {
        self.mode.validation
    }

    #[inline]
    pub fn is_zone_significant(&self) -> bool {
        self.mode.zone_significant
    }

    #[inline]
    pub fn is_time_only(&self) -> bool {
        self.mode.time_only
    }

    /// Whether the fields have never been modified since the value was created as a zero value.
    #[inline]
    pub fn is_unmodified(&self) -> bool {
        self.unmodified
    }

    #[inline]
    pub fn weekday(&self) -> Weekday {
        // The Gregorian calendar repeats every 400 years, a whole number of weeks
        CivilFields {
            year: self.fields.year.rem_euclid(400),
            ..self.fields
        }
        .weekday()
        .unwrap_or(Weekday::Sunday)
    }

    /// The 1-based day of the year.
    #[inline]
    pub fn day_of_year(&self) -> u16 {
        day_of_year(self.fields.year, self.fields.month, self.fields.day)
    }

    /// `year * 12 + month - 1`.
    ///
    /// Returns `None` on overflow.
    #[inline]
    pub fn absolute_month(&self) -> Option<i64> {
        self.fields.absolute_month()
    }

    /// The number of days since 1970-01-01.
    ///
    /// Returns `None` on overflow.
    #[inline]
    pub fn absolute_day(&self) -> Option<i64> {
        self.fields.absolute_day()
    }

    #[inline]
    pub fn is_leap_year(&self) -> bool {
        is_leap_year(self.fields.year)
    }

    /// The number of days of the value's month.
    #[inline]
    pub fn days_in_month(&self) -> u8 {
        days_in_month(self.fields.year, self.fields.month)
    }

    pub fn set_year(&mut self, year: i64) -> Result<(), InvalidFieldError> {
        self.set_fields(CivilFields {
            year,
            ..self.fields
        })
    }

    pub fn set_month(&mut self, month: u8) -> Result<(), InvalidFieldError> {
        self.set_fields(CivilFields {
            month,
            ..self.fields
        })
    }

    pub fn set_day(&mut self, day: u8) -> Result<(), InvalidFieldError> {
        self.set_fields(CivilFields { day, ..self.fields })
    }

    pub fn set_hour(&mut self, hour: u8) -> Result<(), InvalidFieldError> {
        self.set_fields(CivilFields {
            hour,
            ..self.fields
        })
    }

    pub fn set_minute(&mut self, minute: u8) -> Result<(), InvalidFieldError> {
        self.set_fields(CivilFields {
            minute,
            ..self.fields
        })
    }

    pub fn set_second(&mut self, second: u8) -> Result<(), InvalidFieldError> {
        self.set_fields(CivilFields {
            second,
            ..self.fields
        })
    }

    pub fn set_nanosecond(&mut self, nanosecond: u32) -> Result<(), InvalidFieldError> {
        self.set_fields(CivilFields {
            nanosecond,
            ..self.fields
        })
    }

    /// Sets the three date fields at once.
    ///
    /// Unlike successive [`set_year`](Self::set_year), [`set_month`](Self::set_month) and [`set_day`](Self::set_day) calls,
    /// the day is validated against the new month and year only.
    pub fn set_date(&mut self, year: i64, month: u8, day: u8) -> Result<(), InvalidFieldError> {
        self.set_fields(CivilFields {
            year,
            month,
            day,
            ..self.fields
        })
    }

    pub fn set_time(
        &mut self,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
    ) -> Result<(), InvalidFieldError> {
        self.set_fields(CivilFields {
            hour,
            minute,
            second,
            nanosecond,
            ..self.fields
        })
    }

    /// Sets the time zone label.
    ///
    /// The label is not resolved here, resolution happens when an operation needs the offset.
    pub fn set_zone(&mut self, zone: impl Into<String>) {
        self.zone = zone.into();
        self.unmodified = false;
    }

    /// In strict mode, fails without any change if a field is out of its range.
    /// In fast mode, always stores the fields.
    fn set_fields(&mut self, fields: CivilFields) -> Result<(), InvalidFieldError> {
        if !self.mode.is_fast() {
            check_fields(&fields)?;
        }
        self.fields = fields;
        self.unmodified = false;
        Ok(())
    }

    /// Replaces the mode and pins the fields finer than the new precision.
    pub fn set_mode(&mut self, mode: DateTimeMode) {
        self.mode = normalized_mode(mode);
        self.pin_finer_fields();
    }

    /// Sets the precision and pins the fields finer than it.
    ///
    /// ```
    /// use oxdatetime::{DateTime, Precision};
    ///
    /// let mut date = DateTime::new(2020, 5, 17, 13, 45, 12)?;
    /// date.set_precision(Precision::Month);
    /// assert_eq!((date.month(), date.day(), date.hour()), (5, 1, 0));
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn set_precision(&mut self, precision: Precision) {
        self.set_mode(DateTimeMode {
            precision,
            ..self.mode
        });
    }

    #[inline]
    pub fn set_validation(&mut self, validation: ValidationMode) {
        self.mode.validation = validation;
    }

    #[inline]
    pub fn set_zone_significant(&mut self, zone_significant: bool) {
        self.mode.zone_significant = zone_significant;
    }

    /// Time-only values have a precision of at most [`Precision::Hour`].
    pub fn set_time_only(&mut self, time_only: bool) {
        self.set_mode(DateTimeMode {
            time_only,
            ..self.mode
        });
    }

    fn pin_finer_fields(&mut self) {
        let precision = self.mode.precision;
        let fields = &mut self.fields;
        fields.nanosecond -= fields.nanosecond % precision.nanoseconds_per_unit();
        if precision >= Precision::Minute {
            fields.second = 0;
        }
        if precision >= Precision::Hour {
            fields.minute = 0;
        }
        if precision >= Precision::Day {
            fields.hour = 0;
        }
        if precision >= Precision::Month {
            fields.day = 1;
        }
        if precision >= Precision::Year {
            fields.month = 1;
        }
    }

    /// Applies a carrying computation atomically.
    fn update(
        &mut self,
        operation: impl FnOnce(CivilFields) -> Option<CivilFields>,
    ) -> Result<(), DateTimeOverflowError> {
        self.fields = operation(self.fields).ok_or(DateTimeOverflowError)?;
        self.unmodified = false;
        Ok(())
    }

    /// Adds years, clamping February 29th to February 28th on non leap years.
    pub fn add_year(&mut self, delta: i64) -> Result<(), DateTimeOverflowError> {
        self.update(|f| f.plus_years(delta))
    }

    /// Adds months, clamping the day to the last day of the target month.
    ///
    /// ```
    /// use oxdatetime::DateTime;
    ///
    /// let mut date = DateTime::from_date(2021, 1, 31)?;
    /// date.add_month(1)?;
    /// assert_eq!(date.to_string(), "2021-02-28");
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn add_month(&mut self, delta: i64) -> Result<(), DateTimeOverflowError> {
        self.update(|f| f.plus_months(delta))
    }

    pub fn add_week(&mut self, delta: i64) -> Result<(), DateTimeOverflowError> {
        self.update(|f| f.plus_days(delta.checked_mul(7)?))
    }

    pub fn add_day(&mut self, delta: i64) -> Result<(), DateTimeOverflowError> {
        self.update(|f| f.plus_days(delta))
    }

    pub fn add_hour(&mut self, delta: i64) -> Result<(), DateTimeOverflowError> {
        self.update(|f| f.plus_hours(delta))
    }

    pub fn add_minute(&mut self, delta: i64) -> Result<(), DateTimeOverflowError> {
        self.update(|f| f.plus_minutes(delta))
    }

    pub fn add_second(&mut self, delta: i64) -> Result<(), DateTimeOverflowError> {
        self.update(|f| f.plus_seconds(delta))
    }

    pub fn add_millisecond(&mut self, delta: i64) -> Result<(), DateTimeOverflowError> {
        self.update(|f| f.plus_nanoseconds(delta.checked_mul(1_000_000)?))
    }

    pub fn add_microsecond(&mut self, delta: i64) -> Result<(), DateTimeOverflowError> {
        self.update(|f| f.plus_nanoseconds(delta.checked_mul(1_000)?))
    }

    pub fn add_nanosecond(&mut self, delta: i64) -> Result<(), DateTimeOverflowError> {
        self.update(|f| f.plus_nanoseconds(delta))
    }

    /// Adds one interval.
    ///
    /// Irregular and unknown intervals are ignored.
    #[inline]
    pub fn add_interval(&mut self, interval: &IntervalSpec) -> Result<(), DateTimeOverflowError> {
        self.add_intervals(interval, 1)
    }

    /// Adds `count` times the interval.
    ///
    /// ```
    /// use oxdatetime::{DateTime, IntervalSpec};
    ///
    /// let mut date = DateTime::new(2020, 1, 1, 0, 0, 0)?;
    /// date.add_intervals(&"15Minute".parse::<IntervalSpec>()?, 6)?;
    /// assert_eq!(date.to_string(), "2020-01-01 01:30:00");
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn add_intervals(
        &mut self,
        interval: &IntervalSpec,
        count: i64,
    ) -> Result<(), DateTimeOverflowError> {
        let delta = count
            .checked_mul(interval.multiplier().into())
            .ok_or(DateTimeOverflowError)?;
        match interval.base() {
            IntervalBase::Nanosecond => self.add_nanosecond(delta),
            IntervalBase::Microsecond => self.add_microsecond(delta),
            IntervalBase::Millisecond => self.add_millisecond(delta),
            IntervalBase::Hsecond => {
                self.add_nanosecond(delta.checked_mul(10_000_000).ok_or(DateTimeOverflowError)?)
            }
            IntervalBase::Second => self.add_second(delta),
            IntervalBase::Minute => self.add_minute(delta),
            IntervalBase::Hour => self.add_hour(delta),
            IntervalBase::Day => self.add_day(delta),
            IntervalBase::Week => self.add_week(delta),
            IntervalBase::Month => self.add_month(delta),
            IntervalBase::Year => self.add_year(delta),
            IntervalBase::Irregular | IntervalBase::Unknown => Ok(()),
        }
    }

    /// Compares the two values down to `precision`.
    ///
    /// The date is ignored if one of the values is time-only.
    /// The zone labels are ignored.
    ///
    /// ```
    /// use oxdatetime::{DateTime, Precision};
    /// use std::cmp::Ordering;
    ///
    /// let a = DateTime::new(2020, 1, 1, 10, 0, 0)?;
    /// let b = DateTime::new(2020, 12, 31, 0, 0, 0)?;
    /// assert_eq!(a.compare_at_precision(&b, Precision::Year), Ordering::Equal);
    /// assert_eq!(a.compare_at_precision(&b, Precision::Month), Ordering::Less);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn compare_at_precision(&self, other: &Self, precision: Precision) -> Ordering {
        let (a, b) = (&self.fields, &other.fields);
        if self.is_time_only() || other.is_time_only() {
            if precision >= Precision::Day {
                return Ordering::Equal;
            }
        } else {
            for (level, ordering) in [
                (Precision::Year, a.year.cmp(&b.year)),
                (Precision::Month, a.month.cmp(&b.month)),
                (Precision::Day, a.day.cmp(&b.day)),
            ] {
                if ordering.is_ne() || precision >= level {
                    return ordering;
                }
            }
        }
        for (level, ordering) in [
            (Precision::Hour, a.hour.cmp(&b.hour)),
            (Precision::Minute, a.minute.cmp(&b.minute)),
            (Precision::Second, a.second.cmp(&b.second)),
        ] {
            if ordering.is_ne() || precision >= level {
                return ordering;
            }
        }
        let unit = precision.nanoseconds_per_unit();
        (a.nanosecond / unit).cmp(&(b.nanosecond / unit))
    }

    /// Moves the value to an interval boundary.
    ///
    /// A multiplier of 0 or 1 rounds to the unit boundary.
    /// A bigger multiplier rounds to the multiples of it inside the next coarser unit (e.g. `15Minute` boundaries are 00, 15, 30 and 45 of each hour).
    /// Every field finer than the base becomes zero (or one for days and months).
    ///
    /// ```
    /// use oxdatetime::{DateTime, IntervalBase, RoundDirection};
    ///
    /// let mut date = DateTime::new(2020, 1, 1, 5, 30, 0)?;
    /// date.round(RoundDirection::Forward, IntervalBase::Hour, 0)?;
    /// assert_eq!(date.to_string(), "2020-01-01 06:00:00");
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn round(
        &mut self,
        direction: RoundDirection,
        base: IntervalBase,
        multiplier: u32,
    ) -> Result<(), DateTimeOverflowError> {
        self.update(|f| round_fields(f, direction, base, multiplier))
    }

    #[inline]
    pub fn round_to_interval(
        &mut self,
        direction: RoundDirection,
        interval: &IntervalSpec,
    ) -> Result<(), DateTimeOverflowError> {
        self.round(direction, interval.base(), interval.multiplier())
    }

    /// Moves the value to the start of the closest given day of the week in the given direction.
    ///
    /// ```
    /// use oxdatetime::{DateTime, RoundDirection, Weekday};
    ///
    /// let mut date = DateTime::new(2024, 1, 3, 12, 0, 0)?; // Wednesday
    /// date.round_to_day_of_week(RoundDirection::Backward, Weekday::Monday)?;
    /// assert_eq!(date.to_string(), "2024-01-01 00:00:00");
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn round_to_day_of_week(
        &mut self,
        direction: RoundDirection,
        weekday: Weekday,
    ) -> Result<(), DateTimeOverflowError> {
        self.update(|f| round_fields_to_day_of_week(f, direction, weekday))
    }

    /// Moves the wall-clock to the `target` zone and relabels the value.
    ///
    /// Both the current zone label and `target` must be resolvable with the built-in zones.
    ///
    /// ```
    /// use oxdatetime::DateTime;
    ///
    /// let mut date = DateTime::new(2020, 3, 1, 2, 0, 0)?;
    /// date.set_zone("UTC");
    /// date.shift_to_zone("MST")?;
    /// assert_eq!(date.to_string(), "2020-02-29 19:00:00");
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    #[inline]
    pub fn shift_to_zone(&mut self, target: &str) -> Result<(), DateTimeError> {
        self.shift_to_zone_in(&TimeZoneTable::builtin(), target)
    }

    /// [`DateTime::shift_to_zone`] with custom zones.
    pub fn shift_to_zone_in(
        &mut self,
        table: &TimeZoneTable,
        target: &str,
    ) -> Result<(), DateTimeError> {
        let delta = table.offset_delta(&self.zone, target, self)?;
        self.update(|f| f.plus_minutes(delta.into()))?;
        target.clone_into(&mut self.zone);
        Ok(())
    }

    /// The offset with respect to UTC of the value zone, in minutes.
    #[inline]
    pub fn zone_offset(&self) -> Result<i32, TimeZoneError> {
        resolve_offset(&self.zone, self)
    }

    /// The number of months from `self` to `other` ignoring the days.
    pub fn months_until(&self, other: &Self) -> Option<i64> {
        other.absolute_month()?.checked_sub(self.absolute_month()?)
    }

    /// The number of days from `self` to `other` ignoring the time of day.
    pub fn days_until(&self, other: &Self) -> Option<i64> {
        other.absolute_day()?.checked_sub(self.absolute_day()?)
    }

    /// The number of whole wall-clock seconds from `self` to `other`, zone labels being ignored.
    pub fn seconds_until(&self, other: &Self) -> Option<i64> {
        i64::try_from(self.nanoseconds_until(other)? / i128::from(NANOSECONDS_PER_SECOND)).ok()
    }

    fn nanoseconds_until(&self, other: &Self) -> Option<i128> {
        other
            .fields
            .timeline_nanoseconds()?
            .checked_sub(self.fields.timeline_nanoseconds()?)
    }

    /// The number of whole intervals from `self` to `other`.
    ///
    /// Returns `None` for irregular and unknown intervals.
    ///
    /// ```
    /// use oxdatetime::{DateTime, IntervalSpec};
    ///
    /// let start = DateTime::new(2020, 1, 1, 0, 0, 0)?;
    /// let end = DateTime::new(2020, 1, 1, 2, 10, 0)?;
    /// assert_eq!(start.intervals_until(&end, &"15Minute".parse::<IntervalSpec>()?), Some(8));
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn intervals_until(&self, other: &Self, interval: &IntervalSpec) -> Option<i64> {
        let multiplier = i64::from(interval.multiplier());
        let nanoseconds_per_unit: i128 = match interval.base() {
            IntervalBase::Year => return Some(self.months_until(other)? / 12 / multiplier),
            IntervalBase::Month => return Some(self.months_until(other)? / multiplier),
            IntervalBase::Week => return Some(self.days_until(other)? / 7 / multiplier),
            IntervalBase::Day => return Some(self.days_until(other)? / multiplier),
            IntervalBase::Irregular | IntervalBase::Unknown => return None,
            IntervalBase::Hour => 3_600 * i128::from(NANOSECONDS_PER_SECOND),
            IntervalBase::Minute => 60 * i128::from(NANOSECONDS_PER_SECOND),
            IntervalBase::Second => i128::from(NANOSECONDS_PER_SECOND),
            IntervalBase::Hsecond => 10_000_000,
            IntervalBase::Millisecond => 1_000_000,
            IntervalBase::Microsecond => 1_000,
            IntervalBase::Nanosecond => 1,
        };
        i64::try_from(
            self.nanoseconds_until(other)? / (nanoseconds_per_unit * i128::from(multiplier)),
        )
        .ok()
    }
}

impl Default for DateTime {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

/// Equality at nanosecond precision, see [`DateTime::compare_at_precision`].
impl PartialEq for DateTime {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.compare_at_precision(other, Precision::Nanosecond).is_eq()
    }
}

/// Ordering at nanosecond precision, see [`DateTime::compare_at_precision`].
impl PartialOrd for DateTime {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare_at_precision(other, Precision::Nanosecond))
    }
}

impl From<OffsetDateTime> for DateTime {
    /// The wall-clock of the instant in its offset, labeled `±HH:MM` with [`Precision::Nanosecond`].
    fn from(value: OffsetDateTime) -> Self {
        let fields = CivilFields {
            year: value.year().into(),
            month: value.month().into(),
            day: value.day(),
            hour: value.hour(),
            minute: value.minute(),
            second: value.second(),
            nanosecond: value.nanosecond(),
        };
        Self::from_parts(
            fields,
            format_offset(value.offset().whole_minutes().into()),
            Precision::Nanosecond.into(),
        )
    }
}

impl TryFrom<&DateTime> for OffsetDateTime {
    type Error = DateTimeError;

    /// Fails if the zone can't be resolved, if a field set in fast mode is out of its range
    /// or if the year is outside of the supported range of [`OffsetDateTime`].
    fn try_from(value: &DateTime) -> Result<Self, DateTimeError> {
        let offset = UtcOffset::from_whole_seconds(value.zone_offset()? * 60)
            .map_err(|_| DateTimeOverflowError)?;
        check_fields(&value.fields)?;
        // The fields are in range, only the year may not fit
        let date = time::Date::from_calendar_date(
            i32::try_from(value.year()).map_err(|_| DateTimeOverflowError)?,
            time::Month::try_from(value.month()).map_err(|_| DateTimeOverflowError)?,
            value.day(),
        )
        .map_err(|_| DateTimeOverflowError)?;
        let time = time::Time::from_hms_nano(
            value.hour(),
            value.minute(),
            value.second(),
            value.nanosecond(),
        )
        .map_err(|_| DateTimeOverflowError)?;
        Ok(PrimitiveDateTime::new(date, time).assume_offset(offset))
    }
}

fn normalized_mode(mut mode: DateTimeMode) -> DateTimeMode {
    mode.precision = mode.effective_precision();
    mode
}

#[inline]
fn check(field: DateTimeField, value: i64, min: i64, max: i64) -> Result<(), InvalidFieldError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(InvalidFieldError::new(field, value, min, max))
    }
}

/// Checks that every field is in its range, the day range depending on the month and year.
pub(crate) fn check_fields(fields: &CivilFields) -> Result<(), InvalidFieldError> {
    check(DateTimeField::Month, fields.month.into(), 1, 12)?;
    check(
        DateTimeField::Day,
        fields.day.into(),
        1,
        days_in_month(fields.year, fields.month).into(),
    )?;
    check(DateTimeField::Hour, fields.hour.into(), 0, 23)?;
    check(DateTimeField::Minute, fields.minute.into(), 0, 59)?;
    check(DateTimeField::Second, fields.second.into(), 0, 59)?;
    check(
        DateTimeField::Nanosecond,
        fields.nanosecond.into(),
        0,
        NANOSECONDS_PER_SECOND - 1,
    )
}
