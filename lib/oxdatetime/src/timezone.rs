//! Time zone abbreviations and their offsets with respect to UTC.
//!
//! The built-in registry is an immutable static table.
//! Additional zones are registered into an explicit [`TimeZoneTable`] value that is passed to the operations needing it.

use crate::date_time::DateTime;
use std::borrow::Cow;
use std::fmt;
use tracing::trace;

/// Maximal absolute offset accepted for literal offsets like `+05:30`, in minutes.
const MAX_LITERAL_OFFSET: i32 = 14 * 60;

/// How daylight saving time applies to a [`TimeZoneEntry`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum DstMode {
    /// Always the standard offset.
    #[default]
    None,
    /// Always the standard offset plus the DST delta (e.g. `PDT`).
    AlwaysOn,
    /// Standard or daylight offset depending on the date, following [the transition table](dst_transition_days) (e.g. `PT`).
    LocalAuto,
}

/// A time zone abbreviation of the registry.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct TimeZoneEntry {
    abbreviation: Cow<'static, str>,
    description: Cow<'static, str>,
    offset_minutes: i32,
    dst: DstMode,
    dst_minutes: i32,
}

impl TimeZoneEntry {
    #[inline]
    pub fn new(
        abbreviation: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
        offset_minutes: i32,
        dst: DstMode,
        dst_minutes: i32,
    ) -> Self {
        Self {
            abbreviation: abbreviation.into(),
            description: description.into(),
            offset_minutes,
            dst,
            dst_minutes,
        }
    }

    const fn builtin(
        abbreviation: &'static str,
        description: &'static str,
        offset_minutes: i32,
        dst: DstMode,
    ) -> Self {
        Self {
            abbreviation: Cow::Borrowed(abbreviation),
            description: Cow::Borrowed(description),
            offset_minutes,
            dst,
            dst_minutes: if matches!(dst, DstMode::None) { 0 } else { 60 },
        }
    }

    #[inline]
    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The standard offset with respect to UTC in minutes.
    #[inline]
    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    #[inline]
    pub fn dst(&self) -> DstMode {
        self.dst
    }

    /// The offset added during daylight saving time in minutes.
    #[inline]
    pub fn dst_minutes(&self) -> i32 {
        self.dst_minutes
    }

    /// The offset with respect to UTC in minutes of the zone at the given wall-clock date.
    ///
    /// Only [`DstMode::LocalAuto`] entries look at the date.
    pub fn offset_at(&self, date: &DateTime) -> Result<i32, TimeZoneError> {
        match self.dst {
            DstMode::None => Ok(self.offset_minutes),
            DstMode::AlwaysOn => Ok(self.offset_minutes + self.dst_minutes),
            DstMode::LocalAuto => {
                let daylight =
                    is_daylight_saving_time(date.year(), date.month(), date.day(), date.hour())?;
                trace!(
                    abbreviation = %self.abbreviation,
                    year = date.year(),
                    daylight,
                    "resolved daylight saving time"
                );
                Ok(if daylight {
                    self.offset_minutes + self.dst_minutes
                } else {
                    self.offset_minutes
                })
            }
        }
    }
}

impl fmt::Display for TimeZoneEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.abbreviation,
            self.description,
            format_offset(self.offset_minutes)
        )
    }
}

static BUILTIN_ZONES: [TimeZoneEntry; 50] = [
    TimeZoneEntry::builtin("UTC", "Coordinated Universal Time", 0, DstMode::None),
    TimeZoneEntry::builtin("GMT", "Greenwich Mean Time", 0, DstMode::None),
    TimeZoneEntry::builtin("Z", "Zulu Time", 0, DstMode::None),
    TimeZoneEntry::builtin("WET", "Western European Time", 0, DstMode::None),
    TimeZoneEntry::builtin("WEST", "Western European Summer Time", 0, DstMode::AlwaysOn),
    TimeZoneEntry::builtin("BST", "British Summer Time", 0, DstMode::AlwaysOn),
    TimeZoneEntry::builtin("CET", "Central European Time", 60, DstMode::None),
    TimeZoneEntry::builtin("CEST", "Central European Summer Time", 60, DstMode::AlwaysOn),
    TimeZoneEntry::builtin("EET", "Eastern European Time", 120, DstMode::None),
    TimeZoneEntry::builtin("EEST", "Eastern European Summer Time", 120, DstMode::AlwaysOn),
    TimeZoneEntry::builtin("MSK", "Moscow Standard Time", 180, DstMode::None),
    TimeZoneEntry::builtin("GST", "Gulf Standard Time", 240, DstMode::None),
    TimeZoneEntry::builtin("PKT", "Pakistan Standard Time", 300, DstMode::None),
    TimeZoneEntry::builtin("IST", "India Standard Time", 330, DstMode::None),
    TimeZoneEntry::builtin("ICT", "Indochina Time", 420, DstMode::None),
    TimeZoneEntry::builtin("HKT", "Hong Kong Time", 480, DstMode::None),
    TimeZoneEntry::builtin("AWST", "Australian Western Standard Time", 480, DstMode::None),
    TimeZoneEntry::builtin("JST", "Japan Standard Time", 540, DstMode::None),
    TimeZoneEntry::builtin("KST", "Korea Standard Time", 540, DstMode::None),
    TimeZoneEntry::builtin("ACST", "Australian Central Standard Time", 570, DstMode::None),
    TimeZoneEntry::builtin("AEST", "Australian Eastern Standard Time", 600, DstMode::None),
    TimeZoneEntry::builtin("AEDT", "Australian Eastern Daylight Time", 600, DstMode::AlwaysOn),
    TimeZoneEntry::builtin("NZST", "New Zealand Standard Time", 720, DstMode::None),
    TimeZoneEntry::builtin("NZDT", "New Zealand Daylight Time", 720, DstMode::AlwaysOn),
    TimeZoneEntry::builtin("NST", "Newfoundland Standard Time", -210, DstMode::None),
    TimeZoneEntry::builtin("NDT", "Newfoundland Daylight Time", -210, DstMode::AlwaysOn),
    TimeZoneEntry::builtin("AST", "Atlantic Standard Time", -240, DstMode::None),
    TimeZoneEntry::builtin("ADT", "Atlantic Daylight Time", -240, DstMode::AlwaysOn),
    TimeZoneEntry::builtin("AT", "Atlantic Time", -240, DstMode::LocalAuto),
    TimeZoneEntry::builtin("EST", "Eastern Standard Time", -300, DstMode::None),
    TimeZoneEntry::builtin("EDT", "Eastern Daylight Time", -300, DstMode::AlwaysOn),
    TimeZoneEntry::builtin("ET", "Eastern Time", -300, DstMode::LocalAuto),
    TimeZoneEntry::builtin("EST5EDT", "Eastern Time", -300, DstMode::LocalAuto),
    TimeZoneEntry::builtin("CST", "Central Standard Time", -360, DstMode::None),
    TimeZoneEntry::builtin("CDT", "Central Daylight Time", -360, DstMode::AlwaysOn),
    TimeZoneEntry::builtin("CT", "Central Time", -360, DstMode::LocalAuto),
    TimeZoneEntry::builtin("CST6CDT", "Central Time", -360, DstMode::LocalAuto),
    TimeZoneEntry::builtin("MST", "Mountain Standard Time", -420, DstMode::None),
    TimeZoneEntry::builtin("MDT", "Mountain Daylight Time", -420, DstMode::AlwaysOn),
    TimeZoneEntry::builtin("MT", "Mountain Time", -420, DstMode::LocalAuto),
    TimeZoneEntry::builtin("MST7MDT", "Mountain Time", -420, DstMode::LocalAuto),
    TimeZoneEntry::builtin("PST", "Pacific Standard Time", -480, DstMode::None),
    TimeZoneEntry::builtin("PDT", "Pacific Daylight Time", -480, DstMode::AlwaysOn),
    TimeZoneEntry::builtin("PT", "Pacific Time", -480, DstMode::LocalAuto),
    TimeZoneEntry::builtin("PST8PDT", "Pacific Time", -480, DstMode::LocalAuto),
    TimeZoneEntry::builtin("AKST", "Alaska Standard Time", -540, DstMode::None),
    TimeZoneEntry::builtin("AKDT", "Alaska Daylight Time", -540, DstMode::AlwaysOn),
    TimeZoneEntry::builtin("AKT", "Alaska Time", -540, DstMode::LocalAuto),
    TimeZoneEntry::builtin("HST", "Hawaii-Aleutian Standard Time", -600, DstMode::None),
    TimeZoneEntry::builtin("SST", "Samoa Standard Time", -660, DstMode::None),
];

/// First year of [`DST_TRANSITIONS`].
const DST_FIRST_YEAR: i64 = 1970;

/// Daylight saving time transitions from 1970 on: day of April of the switch to daylight time
/// (first Sunday) and day of October of the switch back (last Sunday), both at 02:00.
#[rustfmt::skip]
static DST_TRANSITIONS: [(u8, u8); 68] = [
    (5, 25), (4, 31), (2, 29), (1, 28), (7, 27), (6, 26), (4, 31), (3, 30),
    (2, 29), (1, 28), (6, 26), (5, 25), (4, 31), (3, 30), (1, 28), (7, 27),
    (6, 26), (5, 25), (3, 30), (2, 29), (1, 28), (7, 27), (5, 25), (4, 31),
    (3, 30), (2, 29), (7, 27), (6, 26), (5, 25), (4, 31), (2, 29), (1, 28),
    (7, 27), (6, 26), (4, 31), (3, 30), (2, 29), (1, 28), (6, 26), (5, 25),
    (4, 31), (3, 30), (1, 28), (7, 27), (6, 26), (5, 25), (3, 30), (2, 29),
    (1, 28), (7, 27), (5, 25), (4, 31), (3, 30), (2, 29), (7, 27), (6, 26),
    (5, 25), (4, 31), (2, 29), (1, 28), (7, 27), (6, 26), (4, 31), (3, 30),
    (2, 29), (1, 28), (6, 26), (5, 25),
];

/// The day of April daylight saving time starts and the day of October it ends for the given year.
///
/// ```
/// use oxdatetime::dst_transition_days;
///
/// assert_eq!(dst_transition_days(2000)?, (2, 29));
/// assert!(dst_transition_days(1900).is_err());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn dst_transition_days(year: i64) -> Result<(u8, u8), TimeZoneError> {
    year.checked_sub(DST_FIRST_YEAR)
        .and_then(|index| usize::try_from(index).ok())
        .and_then(|index| DST_TRANSITIONS.get(index))
        .copied()
        .ok_or(TimeZoneError::UnknownYear { year })
}

/// The range of years covered by [`dst_transition_days`].
#[inline]
pub fn dst_covered_years() -> (i64, i64) {
    (
        DST_FIRST_YEAR,
        DST_FIRST_YEAR + i64::try_from(DST_TRANSITIONS.len()).unwrap_or_default() - 1,
    )
}

/// Whether daylight saving time is in effect for the given wall-clock date and hour.
///
/// On the transition days the switch happens at 02:00.
pub fn is_daylight_saving_time(
    year: i64,
    month: u8,
    day: u8,
    hour: u8,
) -> Result<bool, TimeZoneError> {
    let (spring, fall) = dst_transition_days(year)?;
    Ok(match month {
        5..=9 => true,
        4 => day > spring || (day == spring && hour >= 2),
        10 => day < fall || (day == fall && hour < 2),
        _ => false,
    })
}

/// A set of time zone abbreviations: the built-in registry plus custom entries.
///
/// Custom entries are only appended and shadow the built-in ones with the same abbreviation.
///
/// ```
/// use oxdatetime::{DateTime, DstMode, TimeZoneEntry, TimeZoneTable};
///
/// let table = TimeZoneTable::builtin().with_entry(TimeZoneEntry::new(
///     "XST",
///     "Example Standard Time",
///     -90,
///     DstMode::None,
///     0,
/// ));
/// let date = DateTime::from_date(2020, 1, 1)?;
/// assert_eq!(table.resolve("xst", &date)?, -90);
/// assert_eq!(table.resolve("PST", &date)?, -480);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimeZoneTable {
    custom: Vec<TimeZoneEntry>,
}

static BUILTIN_TABLE: TimeZoneTable = TimeZoneTable::builtin();

impl TimeZoneTable {
    /// The table of the built-in abbreviations only.
    #[inline]
    pub const fn builtin() -> Self {
        Self { custom: Vec::new() }
    }

    #[inline]
    #[must_use]
    pub fn with_entry(mut self, entry: TimeZoneEntry) -> Self {
        self.push(entry);
        self
    }

    #[inline]
    pub fn push(&mut self, entry: TimeZoneEntry) {
        self.custom.push(entry);
    }

    /// Looks for an abbreviation, ignoring case.
    pub fn get(&self, abbreviation: &str) -> Option<&TimeZoneEntry> {
        let abbreviation = abbreviation.trim();
        self.custom
            .iter()
            .rev()
            .chain(&BUILTIN_ZONES)
            .find(|entry| entry.abbreviation.eq_ignore_ascii_case(abbreviation))
    }

    /// All the entries, built-in ones first.
    pub fn entries(&self) -> impl Iterator<Item = &TimeZoneEntry> {
        BUILTIN_ZONES.iter().chain(&self.custom)
    }

    /// The offset with respect to UTC in minutes of the abbreviation at the given wall-clock date.
    ///
    /// Literal offsets (`Z`, `+05:30`, `-0600`, `+02`, `UTC-3`) are accepted without lookup.
    pub fn resolve(&self, abbreviation: &str, date: &DateTime) -> Result<i32, TimeZoneError> {
        let trimmed = abbreviation.trim();
        if let Some(offset) = parse_offset_label(trimmed) {
            return Ok(offset);
        }
        self.get(trimmed)
            .ok_or_else(|| TimeZoneError::Unresolvable {
                abbreviation: abbreviation.into(),
            })?
            .offset_at(date)
    }

    /// The number of minutes to add to a wall-clock value of zone `from` to get the wall-clock value in zone `to`.
    pub fn offset_delta(
        &self,
        from: &str,
        to: &str,
        date: &DateTime,
    ) -> Result<i32, TimeZoneError> {
        Ok(self.resolve(to, date)? - self.resolve(from, date)?)
    }
}

/// [`TimeZoneTable::resolve`] against the built-in registry.
///
/// ```
/// use oxdatetime::{DateTime, resolve_offset};
///
/// assert_eq!(resolve_offset("PT", &DateTime::from_date(2000, 7, 1)?)?, -420);
/// assert_eq!(resolve_offset("PT", &DateTime::from_date(2000, 1, 1)?)?, -480);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[inline]
pub fn resolve_offset(abbreviation: &str, date: &DateTime) -> Result<i32, TimeZoneError> {
    BUILTIN_TABLE.resolve(abbreviation, date)
}

/// [`TimeZoneTable::offset_delta`] against the built-in registry.
#[inline]
pub fn offset_delta(from: &str, to: &str, date: &DateTime) -> Result<i32, TimeZoneError> {
    BUILTIN_TABLE.offset_delta(from, to, date)
}

/// Parses literal offsets: `Z`, `±HH:MM`, `±HHMM`, `±HH`, `±H` optionally prefixed by `UTC` or `GMT`.
pub(crate) fn parse_offset_label(label: &str) -> Option<i32> {
    if label.eq_ignore_ascii_case("Z") {
        return Some(0);
    }
    let rest = ["UTC", "GMT"]
        .into_iter()
        .find_map(|prefix| {
            label
                .get(..3)
                .filter(|start| start.eq_ignore_ascii_case(prefix))
                .map(|_| &label[3..])
        })
        .filter(|rest| !rest.is_empty())
        .unwrap_or(label);
    let (sign, rest) = if let Some(rest) = rest.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = rest.strip_prefix('-') {
        (-1, rest)
    } else {
        return None;
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((hours, minutes)) if (1..=2).contains(&hours.len()) && minutes.len() == 2 => {
            (hours, minutes)
        }
        Some(_) => return None,
        None if (1..=2).contains(&rest.len()) => (rest, "0"),
        None if rest.len() == 4 => rest.split_at(2),
        None => return None,
    };
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours = hours.parse::<i32>().ok()?;
    let minutes = minutes.parse::<i32>().ok()?;
    if minutes >= 60 {
        return None;
    }
    let offset = hours * 60 + minutes;
    (offset <= MAX_LITERAL_OFFSET).then_some(sign * offset)
}

/// Formats an offset in minutes as `±HH:MM`.
pub fn format_offset(offset_minutes: i32) -> String {
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    let offset = offset_minutes.unsigned_abs();
    format!("{sign}{:02}:{:02}", offset / 60, offset % 60)
}

/// The label of the current local offset of the process, like `+02:00`.
///
/// Falls back to `UTC` when the platform does not allow to get the local offset.
pub fn local_offset_label() -> String {
    match time::UtcOffset::current_local_offset() {
        Ok(offset) => format_offset(offset.whole_minutes().into()),
        Err(error) => {
            trace!(%error, "local offset unavailable, using UTC");
            "UTC".into()
        }
    }
}

/// A time zone based operation failed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TimeZoneError {
    /// The zone label is empty or unknown.
    #[error("unresolvable time zone '{abbreviation}'")]
    Unresolvable { abbreviation: String },
    /// The daylight saving time transitions of the year are not known.
    #[error("no daylight saving time transition known for year {year}")]
    UnknownYear { year: i64 },
}
