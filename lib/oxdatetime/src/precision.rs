use crate::error::{DateTimeField, InvalidFieldError};
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

/// The finest field of a [`DateTime`](crate::DateTime) that is significant for comparison, formatting and zero-pinning.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash, Default)]
pub enum Precision {
    Nanosecond,
    Microsecond,
    Millisecond,
    /// Hundredth of a second.
    Hsecond,
    #[default]
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl Precision {
    pub const ALL: [Self; 10] = [
        Self::Nanosecond,
        Self::Microsecond,
        Self::Millisecond,
        Self::Hsecond,
        Self::Second,
        Self::Minute,
        Self::Hour,
        Self::Day,
        Self::Month,
        Self::Year,
    ];

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nanosecond => "Nanosecond",
            Self::Microsecond => "Microsecond",
            Self::Millisecond => "Millisecond",
            Self::Hsecond => "Hsecond",
            Self::Second => "Second",
            Self::Minute => "Minute",
            Self::Hour => "Hour",
            Self::Day => "Day",
            Self::Month => "Month",
            Self::Year => "Year",
        }
    }

    /// Number of nanoseconds in one unit of a sub-second precision.
    ///
    /// Returns one full second for second and coarser precisions.
    #[inline]
    pub const fn nanoseconds_per_unit(self) -> u32 {
        match self {
            Self::Nanosecond => 1,
            Self::Microsecond => 1_000,
            Self::Millisecond => 1_000_000,
            Self::Hsecond => 10_000_000,
            _ => 1_000_000_000,
        }
    }

    /// Number of fraction of second digits printed for this precision.
    #[inline]
    pub const fn fraction_digits(self) -> usize {
        match self {
            Self::Nanosecond => 9,
            Self::Microsecond => 6,
            Self::Millisecond => 3,
            Self::Hsecond => 2,
            _ => 0,
        }
    }

    /// The sub-second precision best matching a run of fraction digits.
    ///
    /// Longer runs are truncated to nanoseconds.
    #[inline]
    pub const fn from_fraction_digits(digits: usize) -> Self {
        match digits {
            0 => Self::Second,
            1 | 2 => Self::Hsecond,
            3 => Self::Millisecond,
            4..=6 => Self::Microsecond,
            _ => Self::Nanosecond,
        }
    }

    #[inline]
    const fn code(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(usize::try_from(code).ok()?).copied()
    }
}

impl fmt::Display for Precision {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Precision {
    type Err = ParsePrecisionError;

    /// Accepts the precision names, ignoring case.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(input.trim()))
            .ok_or_else(|| ParsePrecisionError {
                input: input.into(),
            })
    }
}

/// The string is not a [`Precision`] name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unrecognized precision '{input}'")]
pub struct ParsePrecisionError {
    input: String,
}

/// Whether [`DateTime`](crate::DateTime) setters validate their input.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum ValidationMode {
    /// Every setter checks the field range and fails with [`InvalidFieldError`].
    #[default]
    Strict,
    /// Setters trust the caller and never fail.
    Fast,
}

/// The initial value of a [`DateTime`](crate::DateTime) built from [`DateTimeFlags`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum InitialValue {
    #[default]
    Zero,
    Current,
}

/// The behavior of a [`DateTime`](crate::DateTime): its precision and the orthogonal flags.
///
/// ```
/// use oxdatetime::{DateTimeFlags, InitialValue, Precision, ValidationMode};
///
/// let (mode, initial) = (DateTimeFlags::MINUTE | DateTimeFlags::FAST | DateTimeFlags::ZONE_SIGNIFICANT).decode()?;
/// assert_eq!(mode.precision, Precision::Minute);
/// assert_eq!(mode.validation, ValidationMode::Fast);
/// assert!(mode.zone_significant);
/// assert!(!mode.time_only);
/// assert_eq!(initial, InitialValue::Zero);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub struct DateTimeMode {
    pub precision: Precision,
    pub validation: ValidationMode,
    /// The zone label is part of the value and is printed by the formatters.
    pub zone_significant: bool,
    /// Only the time of day is significant.
    pub time_only: bool,
}

impl DateTimeMode {
    #[inline]
    pub const fn new(precision: Precision) -> Self {
        Self {
            precision,
            validation: ValidationMode::Strict,
            zone_significant: false,
            time_only: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_zone_significant(mut self, zone_significant: bool) -> Self {
        self.zone_significant = zone_significant;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_time_only(mut self, time_only: bool) -> Self {
        self.time_only = time_only;
        self
    }

    /// The precision actually applied to values: time-only values are at most hour-precise.
    #[inline]
    pub fn effective_precision(&self) -> Precision {
        if self.time_only && self.precision > Precision::Hour {
            Precision::Hour
        } else {
            self.precision
        }
    }

    #[inline]
    pub fn is_fast(&self) -> bool {
        self.validation == ValidationMode::Fast
    }

    /// Encodes the mode back into the legacy combined descriptor.
    pub fn to_flags(self, initial: InitialValue) -> DateTimeFlags {
        let mut flags = DateTimeFlags(self.precision.code());
        if self.validation == ValidationMode::Fast {
            flags = flags | DateTimeFlags::FAST;
        }
        if initial == InitialValue::Current {
            flags = flags | DateTimeFlags::CURRENT;
        }
        if self.time_only {
            flags = flags | DateTimeFlags::TIME_ONLY;
        }
        if self.zone_significant {
            flags = flags | DateTimeFlags::ZONE_SIGNIFICANT;
        }
        flags
    }
}

impl From<Precision> for DateTimeMode {
    #[inline]
    fn from(precision: Precision) -> Self {
        Self::new(precision)
    }
}

/// The legacy combined bit descriptor of a [`DateTimeMode`] and of an [`InitialValue`].
///
/// The low four bits hold the precision code ([`Precision::Nanosecond`] is `0` and [`Precision::Year`] is `9`),
/// the other bits are the orthogonal flags.
/// It is decoded once with [`DateTimeFlags::decode`] and never re-derived afterward.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub struct DateTimeFlags(pub u32);

impl DateTimeFlags {
    pub const NANOSECOND: Self = Self(0);
    pub const MICROSECOND: Self = Self(1);
    pub const MILLISECOND: Self = Self(2);
    pub const HSECOND: Self = Self(3);
    pub const SECOND: Self = Self(4);
    pub const MINUTE: Self = Self(5);
    pub const HOUR: Self = Self(6);
    pub const DAY: Self = Self(7);
    pub const MONTH: Self = Self(8);
    pub const YEAR: Self = Self(9);
    pub const FAST: Self = Self(0x10);
    pub const CURRENT: Self = Self(0x20);
    pub const TIME_ONLY: Self = Self(0x40);
    pub const ZONE_SIGNIFICANT: Self = Self(0x80);

    const PRECISION_MASK: u32 = 0x0F;
    const KNOWN_BITS: u32 = 0xFF;

    #[inline]
    fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// Splits the descriptor into its parts.
    pub fn decode(self) -> Result<(DateTimeMode, InitialValue), InvalidFieldError> {
        if self.0 & !Self::KNOWN_BITS != 0 {
            return Err(InvalidFieldError::new(
                DateTimeField::Flags,
                self.0.into(),
                0,
                Self::KNOWN_BITS.into(),
            ));
        }
        let code = self.0 & Self::PRECISION_MASK;
        let precision = Precision::from_code(code).ok_or(InvalidFieldError::new(
            DateTimeField::Precision,
            code.into(),
            0,
            Precision::Year.code().into(),
        ))?;
        let mode = DateTimeMode {
            precision,
            validation: if self.contains(Self::FAST) {
                ValidationMode::Fast
            } else {
                ValidationMode::Strict
            },
            zone_significant: self.contains(Self::ZONE_SIGNIFICANT),
            time_only: self.contains(Self::TIME_ONLY),
        };
        let initial = if self.contains(Self::CURRENT) {
            InitialValue::Current
        } else {
            InitialValue::Zero
        };
        Ok((mode, initial))
    }
}

impl BitOr for DateTimeFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        assert!(Precision::Nanosecond < Precision::Microsecond);
        assert!(Precision::Millisecond < Precision::Hsecond);
        assert!(Precision::Hsecond < Precision::Second);
        assert!(Precision::Month < Precision::Year);
    }

    #[test]
    fn fraction_digits() {
        assert_eq!(Precision::from_fraction_digits(1), Precision::Hsecond);
        assert_eq!(Precision::from_fraction_digits(2), Precision::Hsecond);
        assert_eq!(Precision::from_fraction_digits(3), Precision::Millisecond);
        assert_eq!(Precision::from_fraction_digits(5), Precision::Microsecond);
        assert_eq!(Precision::from_fraction_digits(9), Precision::Nanosecond);
        assert_eq!(Precision::from_fraction_digits(12), Precision::Nanosecond);
        for precision in Precision::ALL {
            if precision < Precision::Second {
                assert_eq!(
                    Precision::from_fraction_digits(precision.fraction_digits()),
                    precision
                );
            }
        }
    }

    #[test]
    fn names() -> Result<(), ParsePrecisionError> {
        for precision in Precision::ALL {
            assert_eq!(precision.to_string().parse::<Precision>()?, precision);
        }
        assert_eq!("hour".parse::<Precision>()?, Precision::Hour);
        assert_eq!(
            "fortnight".parse::<Precision>().unwrap_err().to_string(),
            "unrecognized precision 'fortnight'"
        );
        Ok(())
    }

    #[test]
    fn flags_round_trip() -> Result<(), InvalidFieldError> {
        for precision in Precision::ALL {
            for initial in [InitialValue::Zero, InitialValue::Current] {
                let mode = DateTimeMode::new(precision)
                    .with_validation(ValidationMode::Fast)
                    .with_time_only(true);
                assert_eq!(mode.to_flags(initial).decode()?, (mode, initial));
            }
        }
        Ok(())
    }

    #[test]
    fn invalid_flags() {
        assert_eq!(
            DateTimeFlags(0x0A).decode().unwrap_err().field(),
            DateTimeField::Precision
        );
        assert_eq!(
            DateTimeFlags(0x100).decode().unwrap_err().field(),
            DateTimeField::Flags
        );
    }

    #[test]
    fn time_only_precision_is_clamped() {
        let mode = DateTimeMode::new(Precision::Day).with_time_only(true);
        assert_eq!(mode.effective_precision(), Precision::Hour);
        let mode = DateTimeMode::new(Precision::Minute).with_time_only(true);
        assert_eq!(mode.effective_precision(), Precision::Minute);
    }
}
