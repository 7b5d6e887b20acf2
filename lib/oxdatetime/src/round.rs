//! Rounding of calendar fields to interval boundaries.

use crate::calendar::{CivilFields, Weekday};
use crate::interval::IntervalBase;
use std::fmt;
use std::str::FromStr;

/// The direction of a rounding.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum RoundDirection {
    /// To the boundary at or before the value.
    Backward,
    /// To the boundary at or after the value.
    Forward,
    /// To the closest boundary, [`RoundDirection::Forward`] on ties.
    Nearest,
}

impl RoundDirection {
    /// `+1` is forward, `-1` is backward and `0` is nearest.
    #[inline]
    pub fn from_sign(sign: i64) -> Self {
        match sign.signum() {
            1 => Self::Forward,
            -1 => Self::Backward,
            _ => Self::Nearest,
        }
    }
}

impl fmt::Display for RoundDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Backward => "backward",
            Self::Forward => "forward",
            Self::Nearest => "nearest",
        })
    }
}

impl FromStr for RoundDirection {
    type Err = ParseRoundDirectionError;

    /// Accepts `forward`, `backward`, `nearest` and the signs `1`, `+1`, `-1` and `0`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if let Ok(sign) = input.parse::<i64>() {
            return Ok(Self::from_sign(sign));
        }
        [Self::Backward, Self::Forward, Self::Nearest]
            .into_iter()
            .find(|direction| direction.to_string().eq_ignore_ascii_case(input))
            .ok_or(ParseRoundDirectionError)
    }
}

/// The given string is not a rounding direction.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("not a valid rounding direction, expecting forward, backward, nearest or a sign")]
pub struct ParseRoundDirectionError;

/// Rounds the fields to the boundaries of `multiplier` times `base`.
///
/// Out of range fields are carried first. Returns `None` on overflow.
pub(crate) fn round_fields(
    fields: CivilFields,
    direction: RoundDirection,
    base: IntervalBase,
    multiplier: u32,
) -> Option<CivilFields> {
    if !base.is_regular() {
        return Some(fields);
    }
    let fields = fields.normalized()?;
    let multiplier = multiplier.max(1);
    let backward = truncate(fields, base, multiplier)?;
    if backward == fields || direction == RoundDirection::Backward {
        return Some(backward);
    }
    let forward = next_boundary(backward, base, multiplier)?;
    if direction == RoundDirection::Forward {
        return Some(forward);
    }
    nearest(fields, backward, forward)
}

/// Rounds the fields to the start of the given day of the week.
pub(crate) fn round_fields_to_day_of_week(
    fields: CivilFields,
    direction: RoundDirection,
    weekday: Weekday,
) -> Option<CivilFields> {
    let fields = fields.normalized()?;
    let target = i64::from(weekday.number_from_sunday());
    let day_start = truncate(fields, IntervalBase::Day, 1)?;
    let backward = {
        let current = i64::from(day_start.weekday()?.number_from_sunday());
        day_start.plus_days(-(current - target).rem_euclid(7))?
    };
    if direction == RoundDirection::Backward {
        return Some(backward);
    }
    let forward = {
        let start = if day_start == fields {
            day_start
        } else {
            day_start.plus_days(1)?
        };
        let current = i64::from(start.weekday()?.number_from_sunday());
        start.plus_days((target - current).rem_euclid(7))?
    };
    if direction == RoundDirection::Forward {
        return Some(forward);
    }
    nearest(fields, backward, forward)
}

fn nearest(
    fields: CivilFields,
    backward: CivilFields,
    forward: CivilFields,
) -> Option<CivilFields> {
    let value = fields.timeline_nanoseconds()?;
    Some(
        if value - backward.timeline_nanoseconds()? < forward.timeline_nanoseconds()? - value {
            backward
        } else {
            forward
        },
    )
}

/// The boundary at or before the fields.
fn truncate(fields: CivilFields, base: IntervalBase, multiplier: u32) -> Option<CivilFields> {
    let mut f = fields;
    match base {
        IntervalBase::Nanosecond
        | IntervalBase::Microsecond
        | IntervalBase::Millisecond
        | IntervalBase::Hsecond => {
            let step = u64::from(base.precision()?.nanoseconds_per_unit()) * u64::from(multiplier);
            let nanosecond = u64::from(f.nanosecond);
            f.nanosecond = u32::try_from(nanosecond - nanosecond % step).ok()?;
            return Some(f);
        }
        IntervalBase::Second => {
            f.second -= aligned_offset(f.second.into(), multiplier);
        }
        IntervalBase::Minute => {
            f.second = 0;
            f.minute -= aligned_offset(f.minute.into(), multiplier);
        }
        IntervalBase::Hour => {
            f.second = 0;
            f.minute = 0;
            f.hour -= aligned_offset(f.hour.into(), multiplier);
        }
        IntervalBase::Day | IntervalBase::Week | IntervalBase::Month | IntervalBase::Year => {
            f = CivilFields::date(f.year, f.month, f.day);
            match base {
                IntervalBase::Day => {
                    f.day -= aligned_offset((f.day - 1).into(), multiplier);
                }
                IntervalBase::Week => {
                    // 1970-01-04 is the first Sunday after the epoch
                    let week = f.absolute_day()?.checked_add(4)?.div_euclid(7);
                    let week = week - week.rem_euclid(multiplier.into());
                    f = f.with_absolute_day(week.checked_mul(7)? - 4)?;
                }
                IntervalBase::Month => {
                    f.day = 1;
                    f.month -= aligned_offset((f.month - 1).into(), multiplier);
                }
                _ => {
                    f.day = 1;
                    f.month = 1;
                    f.year -= f.year.rem_euclid(multiplier.into());
                }
            }
        }
        IntervalBase::Irregular | IntervalBase::Unknown => return Some(fields),
    }
    f.nanosecond = 0;
    Some(f)
}

/// `position % multiplier`, the distance to the previous aligned boundary.
#[inline]
fn aligned_offset(position: u32, multiplier: u32) -> u8 {
    u8::try_from(position % multiplier).unwrap_or_default()
}

/// The boundary following `boundary`, never going beyond the next boundary of the parent unit.
fn next_boundary(
    boundary: CivilFields,
    base: IntervalBase,
    multiplier: u32,
) -> Option<CivilFields> {
    let n = i64::from(multiplier);
    let next = match base {
        IntervalBase::Nanosecond => boundary.plus_nanoseconds(n),
        IntervalBase::Microsecond => boundary.plus_nanoseconds(n.checked_mul(1_000)?),
        IntervalBase::Millisecond => boundary.plus_nanoseconds(n.checked_mul(1_000_000)?),
        IntervalBase::Hsecond => boundary.plus_nanoseconds(n.checked_mul(10_000_000)?),
        IntervalBase::Second => boundary.plus_seconds(n),
        IntervalBase::Minute => boundary.plus_minutes(n),
        IntervalBase::Hour => boundary.plus_hours(n),
        IntervalBase::Day => boundary.plus_days(n),
        IntervalBase::Week => boundary.plus_days(n.checked_mul(7)?),
        IntervalBase::Month => boundary.plus_months(n),
        IntervalBase::Year => boundary.plus_years(n),
        IntervalBase::Irregular | IntervalBase::Unknown => Some(boundary),
    }?;
    let parent = match base {
        IntervalBase::Nanosecond
        | IntervalBase::Microsecond
        | IntervalBase::Millisecond
        | IntervalBase::Hsecond => IntervalBase::Second,
        IntervalBase::Second => IntervalBase::Minute,
        IntervalBase::Minute => IntervalBase::Hour,
        IntervalBase::Hour => IntervalBase::Day,
        IntervalBase::Day => IntervalBase::Month,
        IntervalBase::Month => IntervalBase::Year,
        IntervalBase::Week
        | IntervalBase::Year
        | IntervalBase::Irregular
        | IntervalBase::Unknown => return Some(next),
    };
    if multiplier == 1 {
        return Some(next);
    }
    let parent_next = next_boundary(truncate(boundary, parent, 1)?, parent, 1)?;
    Some(next.min(parent_next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DateTime, DateTimeMode, Precision, ValidationMode};
    use std::error::Error;

    fn rounded(
        date: &DateTime,
        direction: RoundDirection,
        interval: &str,
    ) -> Result<DateTime, Box<dyn Error>> {
        let mut date = date.clone();
        date.round_to_interval(direction, &interval.parse()?)?;
        Ok(date)
    }

    #[test]
    fn directions() -> Result<(), ParseRoundDirectionError> {
        assert_eq!("1".parse::<RoundDirection>()?, RoundDirection::Forward);
        assert_eq!("+1".parse::<RoundDirection>()?, RoundDirection::Forward);
        assert_eq!("-1".parse::<RoundDirection>()?, RoundDirection::Backward);
        assert_eq!("0".parse::<RoundDirection>()?, RoundDirection::Nearest);
        assert_eq!("Backward".parse::<RoundDirection>()?, RoundDirection::Backward);
        assert!("sideways".parse::<RoundDirection>().is_err());
        Ok(())
    }

    #[test]
    fn whole_hour() -> Result<(), Box<dyn Error>> {
        let date = DateTime::new(2020, 1, 1, 5, 30, 0)?;
        let mut forward = date.clone();
        forward.round(RoundDirection::Forward, IntervalBase::Hour, 0)?;
        assert_eq!(forward, DateTime::new(2020, 1, 1, 6, 0, 0)?);
        let mut backward = date.clone();
        backward.round(RoundDirection::Backward, IntervalBase::Hour, 0)?;
        assert_eq!(backward, DateTime::new(2020, 1, 1, 5, 0, 0)?);
        assert_eq!(
            rounded(&date, RoundDirection::Nearest, "1Hour")?,
            DateTime::new(2020, 1, 1, 6, 0, 0)?
        );
        assert_eq!(
            rounded(
                &DateTime::new(2020, 1, 1, 5, 29, 59)?,
                RoundDirection::Nearest,
                "1Hour"
            )?,
            DateTime::new(2020, 1, 1, 5, 0, 0)?
        );
        Ok(())
    }

    #[test]
    fn forward_on_boundary_is_unchanged() -> Result<(), Box<dyn Error>> {
        let date = DateTime::new(2020, 1, 1, 5, 45, 0)?;
        assert_eq!(rounded(&date, RoundDirection::Forward, "15Minute")?, date);
        let date = DateTime::from_date(2020, 3, 1)?;
        assert_eq!(rounded(&date, RoundDirection::Forward, "1Month")?, date);
        Ok(())
    }

    #[test]
    fn multiples_inside_parent_unit() -> Result<(), Box<dyn Error>> {
        let date = DateTime::new(2020, 1, 1, 5, 37, 12)?;
        assert_eq!(
            rounded(&date, RoundDirection::Backward, "15Minute")?,
            DateTime::new(2020, 1, 1, 5, 30, 0)?
        );
        assert_eq!(
            rounded(&date, RoundDirection::Forward, "15Minute")?,
            DateTime::new(2020, 1, 1, 5, 45, 0)?
        );
        let date = DateTime::new(2020, 1, 1, 5, 58, 0)?;
        assert_eq!(
            rounded(&date, RoundDirection::Backward, "7Minute")?,
            DateTime::new(2020, 1, 1, 5, 56, 0)?
        );
        assert_eq!(
            rounded(&date, RoundDirection::Forward, "7Minute")?,
            DateTime::new(2020, 1, 1, 6, 0, 0)?
        );
        let date = DateTime::new(2020, 1, 1, 23, 0, 1)?;
        assert_eq!(
            rounded(&date, RoundDirection::Forward, "6Hour")?,
            DateTime::new(2020, 1, 2, 0, 0, 0)?
        );
        Ok(())
    }

    #[test]
    fn sub_seconds() -> Result<(), Box<dyn Error>> {
        let mut date = DateTime::new(2020, 1, 1, 0, 0, 59)?;
        date.set_nanosecond(123_456_789)?;
        assert_eq!(
            rounded(&date, RoundDirection::Backward, "1HSecond")?.nanosecond(),
            120_000_000
        );
        assert_eq!(
            rounded(&date, RoundDirection::Forward, "1Millisecond")?.nanosecond(),
            124_000_000
        );
        assert_eq!(
            rounded(&date, RoundDirection::Forward, "1Second")?,
            DateTime::new(2020, 1, 1, 0, 1, 0)?
        );
        Ok(())
    }

    #[test]
    fn calendar_units() -> Result<(), Box<dyn Error>> {
        let date = DateTime::new(2020, 1, 31, 10, 0, 0)?;
        assert_eq!(
            rounded(&date, RoundDirection::Forward, "1Day")?,
            DateTime::new(2020, 2, 1, 0, 0, 0)?
        );
        // 2024-01-03 is a Wednesday
        let date = DateTime::new(2024, 1, 3, 10, 0, 0)?;
        assert_eq!(
            rounded(&date, RoundDirection::Backward, "1Week")?,
            DateTime::new(2023, 12, 31, 0, 0, 0)?
        );
        assert_eq!(
            rounded(&date, RoundDirection::Forward, "1Week")?,
            DateTime::new(2024, 1, 7, 0, 0, 0)?
        );
        let date = DateTime::new(2020, 5, 15, 0, 0, 0)?;
        assert_eq!(
            rounded(&date, RoundDirection::Backward, "3Month")?,
            DateTime::new(2020, 4, 1, 0, 0, 0)?
        );
        assert_eq!(
            rounded(&date, RoundDirection::Forward, "3Month")?,
            DateTime::new(2020, 7, 1, 0, 0, 0)?
        );
        let date = DateTime::new(2023, 5, 15, 0, 0, 0)?;
        assert_eq!(
            rounded(&date, RoundDirection::Backward, "10Year")?,
            DateTime::new(2020, 1, 1, 0, 0, 0)?
        );
        assert_eq!(
            rounded(&date, RoundDirection::Forward, "10Year")?,
            DateTime::new(2030, 1, 1, 0, 0, 0)?
        );
        Ok(())
    }

    #[test]
    fn irregular_is_noop() -> Result<(), Box<dyn Error>> {
        let date = DateTime::new(2020, 5, 15, 1, 2, 3)?;
        assert_eq!(rounded(&date, RoundDirection::Forward, "IrregularMinute")?, date);
        Ok(())
    }

    #[test]
    fn day_of_week() -> Result<(), Box<dyn Error>> {
        // Wednesday
        let date = DateTime::new(2024, 1, 3, 12, 0, 0)?;
        let round = |direction, weekday| -> Result<DateTime, Box<dyn Error>> {
            let mut date = date.clone();
            date.round_to_day_of_week(direction, weekday)?;
            Ok(date)
        };
        assert_eq!(
            round(RoundDirection::Backward, Weekday::Monday)?,
            DateTime::new(2024, 1, 1, 0, 0, 0)?
        );
        assert_eq!(
            round(RoundDirection::Backward, Weekday::Wednesday)?,
            DateTime::new(2024, 1, 3, 0, 0, 0)?
        );
        assert_eq!(
            round(RoundDirection::Backward, Weekday::Thursday)?,
            DateTime::new(2023, 12, 28, 0, 0, 0)?
        );
        assert_eq!(
            round(RoundDirection::Forward, Weekday::Wednesday)?,
            DateTime::new(2024, 1, 10, 0, 0, 0)?
        );
        assert_eq!(
            round(RoundDirection::Forward, Weekday::Friday)?,
            DateTime::new(2024, 1, 5, 0, 0, 0)?
        );
        assert_eq!(
            round(RoundDirection::Nearest, Weekday::Thursday)?,
            DateTime::new(2024, 1, 4, 0, 0, 0)?
        );
        let midnight = DateTime::new(2024, 1, 3, 0, 0, 0)?;
        let mut forward = midnight.clone();
        forward.round_to_day_of_week(RoundDirection::Forward, Weekday::Wednesday)?;
        assert_eq!(forward, midnight);
        Ok(())
    }

    #[test]
    fn fast_mode_fields_are_carried() -> Result<(), Box<dyn Error>> {
        let mut date = DateTime::with_mode(
            DateTimeMode::new(Precision::Second).with_validation(ValidationMode::Fast),
        );
        date.set_date(2020, 1, 0)?;
        date.set_time(10, 0, 0, 0)?;
        let mut backward = date.clone();
        backward.round(RoundDirection::Backward, IntervalBase::Day, 1)?;
        assert_eq!(backward, DateTime::from_date(2019, 12, 31)?);
        let mut weekday = date.clone();
        // 2019-12-31 is a Tuesday
        weekday.round_to_day_of_week(RoundDirection::Backward, Weekday::Monday)?;
        assert_eq!(weekday, DateTime::from_date(2019, 12, 30)?);

        date.set_date(2020, 0, 15)?;
        date.set_time(25, 0, 0, 0)?;
        let mut forward = date.clone();
        forward.round(RoundDirection::Forward, IntervalBase::Month, 1)?;
        assert_eq!(forward, DateTime::from_date(2020, 1, 1)?);
        let mut hour = date.clone();
        hour.round(RoundDirection::Backward, IntervalBase::Hour, 1)?;
        assert_eq!(hour, DateTime::new(2019, 12, 16, 1, 0, 0)?);
        Ok(())
    }
}
