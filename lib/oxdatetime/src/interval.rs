use crate::precision::Precision;
use std::fmt;
use std::str::FromStr;

/// The base unit of an [`IntervalSpec`].
///
/// Regular bases are ordered from the finest to the coarsest.
/// [`IntervalBase::Irregular`] and [`IntervalBase::Unknown`] are sentinels: arithmetic and rounding against them are no-ops.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub enum IntervalBase {
    Nanosecond,
    Microsecond,
    Millisecond,
    /// Hundredth of a second.
    Hsecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
    Irregular,
    Unknown,
}

/// Keywords looked for in interval names, in matching order.
///
/// More specific keywords come first so that e.g. `MIN` is never found inside `MILLISECOND`.
const BASE_KEYWORDS: [(&str, IntervalBase); 15] = [
    ("NANO", IntervalBase::Nanosecond),
    ("MICRO", IntervalBase::Microsecond),
    ("MILLI", IntervalBase::Millisecond),
    ("HSEC", IntervalBase::Hsecond),
    ("HUNDREDTH", IntervalBase::Hsecond),
    ("SEC", IntervalBase::Second),
    ("MIN", IntervalBase::Minute),
    ("HOUR", IntervalBase::Hour),
    ("HR", IntervalBase::Hour),
    ("DAY", IntervalBase::Day),
    ("WEEK", IntervalBase::Week),
    ("WK", IntervalBase::Week),
    ("MON", IntervalBase::Month),
    ("YEAR", IntervalBase::Year),
    ("YR", IntervalBase::Year),
];

const IRREGULAR_PREFIXES: [&str; 2] = ["IRREGULAR", "IRREG"];

impl IntervalBase {
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
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Year => "Year",
            Self::Irregular => "Irregular",
            Self::Unknown => "Unknown",
        }
    }

    #[inline]
    pub const fn is_regular(self) -> bool {
        !matches!(self, Self::Irregular | Self::Unknown)
    }

    /// The [`Precision`] implied by a regular base.
    ///
    /// Weeks imply a day precision.
    #[inline]
    pub const fn precision(self) -> Option<Precision> {
        Some(match self {
            Self::Nanosecond => Precision::Nanosecond,
            Self::Microsecond => Precision::Microsecond,
            Self::Millisecond => Precision::Millisecond,
            Self::Hsecond => Precision::Hsecond,
            Self::Second => Precision::Second,
            Self::Minute => Precision::Minute,
            Self::Hour => Precision::Hour,
            Self::Day | Self::Week => Precision::Day,
            Self::Month => Precision::Month,
            Self::Year => Precision::Year,
            Self::Irregular | Self::Unknown => return None,
        })
    }

    /// Approximate duration of one unit in seconds.
    ///
    /// Exact for bases up to [`IntervalBase::Week`].
    /// Months count for 30 days and years for 360 days:
    /// this is only usable to compare relative magnitudes, never for calendar computations.
    #[inline]
    pub const fn approximate_seconds(self) -> Option<f64> {
        Some(match self {
            Self::Nanosecond => 1e-9,
            Self::Microsecond => 1e-6,
            Self::Millisecond => 1e-3,
            Self::Hsecond => 1e-2,
            Self::Second => 1.,
            Self::Minute => 60.,
            Self::Hour => 3_600.,
            Self::Day => 86_400.,
            Self::Week => 604_800.,
            Self::Month => 2_592_000.,
            Self::Year => 31_104_000.,
            Self::Irregular | Self::Unknown => return None,
        })
    }

    /// Finds the base named by a case-insensitive keyword like `min`, `Minutes` or `HOUR`.
    fn from_keyword(keyword: &str) -> Option<Self> {
        let keyword = keyword.to_ascii_uppercase();
        BASE_KEYWORDS
            .into_iter()
            .find(|(name, _)| keyword.contains(name))
            .map(|(_, base)| base)
    }
}

impl fmt::Display for IntervalBase {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An interval like `15Minute`, `1Day` or `IrregularSecond`.
///
/// ```
/// use oxdatetime::{IntervalBase, IntervalSpec};
///
/// let interval: IntervalSpec = "15Minute".parse()?;
/// assert_eq!(interval.base(), IntervalBase::Minute);
/// assert_eq!(interval.multiplier(), 15);
/// assert_eq!(interval.approximate_seconds(), Some(900.));
/// assert_eq!(interval.to_string(), "15Minute");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct IntervalSpec {
    base: IntervalBase,
    multiplier: u32,
    irregular_precision: Option<IntervalBase>,
}

impl IntervalSpec {
    /// A regular interval of `multiplier` times `base`.
    ///
    /// A multiplier of zero is bumped to one.
    #[inline]
    pub fn new(base: IntervalBase, multiplier: u32) -> Self {
        Self {
            base,
            multiplier: multiplier.max(1),
            irregular_precision: None,
        }
    }

    /// An irregular interval whose values are significant up to `precision`.
    #[inline]
    pub fn irregular(precision: IntervalBase) -> Self {
        Self {
            base: IntervalBase::Irregular,
            multiplier: 1,
            irregular_precision: Some(if precision.is_regular() {
                precision
            } else {
                IntervalBase::Second
            }),
        }
    }

    #[inline]
    pub fn base(&self) -> IntervalBase {
        self.base
    }

    #[inline]
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// The sub-precision of an irregular interval.
    #[inline]
    pub fn irregular_precision(&self) -> Option<IntervalBase> {
        self.irregular_precision
    }

    #[inline]
    pub fn is_irregular(&self) -> bool {
        self.base == IntervalBase::Irregular
    }

    /// The [`Precision`] values following this interval need.
    pub fn precision(&self) -> Option<Precision> {
        self.irregular_precision.unwrap_or(self.base).precision()
    }

    /// Approximate duration of the interval in seconds, see [`IntervalBase::approximate_seconds`].
    pub fn approximate_seconds(&self) -> Option<f64> {
        Some(self.base.approximate_seconds()? * f64::from(self.multiplier))
    }
}

impl FromStr for IntervalSpec {
    type Err = ParseIntervalError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let error = || ParseIntervalError {
            input: input.into(),
        };
        let trimmed = input.trim();
        let digits_end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, keyword) = trimmed.split_at(digits_end);
        let keyword = keyword.trim_start();
        if keyword.is_empty() {
            return Err(error());
        }
        let multiplier = if digits.is_empty() {
            1
        } else {
            match u32::from_str(digits) {
                Ok(0) | Err(_) => return Err(error()),
                Ok(multiplier) => multiplier,
            }
        };

        let upper = keyword.to_ascii_uppercase();
        if let Some(rest) = IRREGULAR_PREFIXES
            .into_iter()
            .find_map(|prefix| upper.strip_prefix(prefix))
        {
            // Irregular intervals have no multiplier
            if multiplier != 1 {
                return Err(error());
            }
            let precision = IntervalBase::from_keyword(rest).unwrap_or(IntervalBase::Second);
            return Ok(Self::irregular(precision));
        }
        if upper.starts_with("UNKNOWN") {
            return Ok(Self {
                base: IntervalBase::Unknown,
                multiplier,
                irregular_precision: None,
            });
        }
        let base = IntervalBase::from_keyword(&upper).ok_or_else(error)?;
        Ok(Self::new(base, multiplier))
    }
}

impl fmt::Display for IntervalSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.base, self.irregular_precision) {
            (IntervalBase::Irregular, Some(precision)) => write!(f, "Irregular{precision}"),
            (base, _) => write!(f, "{}{base}", self.multiplier),
        }
    }
}

/// The string is not a known interval.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unrecognized interval '{input}'")]
pub struct ParseIntervalError {
    input: String,
}
