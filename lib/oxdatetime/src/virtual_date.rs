//! Named date tokens like `CurrentToHour` or `InputStart.round(backward, Day)`.
//!
//! A token is a base followed by any number of modifiers:
//! * `.round(direction, interval)` or `.round(direction, base, multiplier)`, e.g. `.round(forward, 15Minute)`.
//! * `.roundToDayOfWeek(direction, weekday)`, e.g. `.roundToDayOfWeek(backward, Monday)`.
//! * `.timezone(label)` that shifts the value to another zone.
//!
//! The base is looked up in a [`VirtualDateSource`], then among the built-in tokens
//! (`Current`, `Now`, `CurrentToMinute`, `CurrentToHour`, `CurrentToDay`, `CurrentToMonth` and `CurrentToYear`).
//! Anything else is parsed with [`DateTime::parse_with_options`].

use crate::calendar::Weekday;
use crate::date_time::DateTime;
use crate::error::DateTimeError;
use crate::interval::IntervalSpec;
use crate::parser::ParseOptions;
use crate::precision::Precision;
use crate::round::RoundDirection;
use crate::timezone::TimeZoneTable;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use tracing::debug;

const MAX_INDIRECTIONS: usize = 16;

const BUILTIN_TOKENS: [(&str, Precision); 7] = [
    ("Current", Precision::Second),
    ("Now", Precision::Second),
    ("CurrentToMinute", Precision::Minute),
    ("CurrentToHour", Precision::Hour),
    ("CurrentToDay", Precision::Day),
    ("CurrentToMonth", Precision::Month),
    ("CurrentToYear", Precision::Year),
];

/// A provider of user-defined date tokens.
pub trait VirtualDateSource {
    /// The text the token stands for, if the token is known.
    fn lookup(&self, name: &str) -> Option<String>;
}

impl<S: BuildHasher> VirtualDateSource for HashMap<String, String, S> {
    #[inline]
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl VirtualDateSource for BTreeMap<String, String> {
    #[inline]
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: VirtualDateSource + ?Sized> VirtualDateSource for &T {
    #[inline]
    fn lookup(&self, name: &str) -> Option<String> {
        (*self).lookup(name)
    }
}

/// A [`VirtualDateSource`] without any token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVirtualDates;

impl VirtualDateSource for NoVirtualDates {
    #[inline]
    fn lookup(&self, _: &str) -> Option<String> {
        None
    }
}

/// Resolves date tokens to [`DateTime`] values.
///
/// ```
/// use oxdatetime::{DateTime, VirtualDateResolver};
/// use std::collections::HashMap;
///
/// let tokens = HashMap::from([("InputStart".to_owned(), "2020-01-15 10:20".to_owned())]);
/// let resolver = VirtualDateResolver::new()
///     .with_source(tokens)
///     .with_now(DateTime::new(2024, 1, 3, 12, 34, 56)?);
/// assert_eq!(resolver.resolve("CurrentToHour")?.to_string(), "2024-01-03 12");
/// assert_eq!(
///     resolver.resolve("InputStart.round(backward, Month)")?.to_string(),
///     "2020-01-01 00:00"
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct VirtualDateResolver<S = NoVirtualDates> {
    source: S,
    now: Option<DateTime>,
    options: ParseOptions,
    zones: TimeZoneTable,
}

impl VirtualDateResolver {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: VirtualDateSource> VirtualDateResolver<S> {
    #[inline]
    pub fn with_source<T: VirtualDateSource>(self, source: T) -> VirtualDateResolver<T> {
        VirtualDateResolver {
            source,
            now: self.now,
            options: self.options,
            zones: self.zones,
        }
    }

    /// Fixes the value the built-in tokens start from instead of the system clock.
    #[inline]
    #[must_use]
    pub fn with_now(mut self, now: DateTime) -> Self {
        self.now = Some(now);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// The zones used by the `.timezone(...)` modifier.
    #[inline]
    #[must_use]
    pub fn with_time_zones(mut self, zones: TimeZoneTable) -> Self {
        self.zones = zones;
        self
    }

    #[inline]
    pub fn resolve(&self, text: &str) -> Result<DateTime, DateTimeError> {
        self.resolve_with_depth(text, 0)
    }

    fn resolve_with_depth(&self, text: &str, depth: usize) -> Result<DateTime, DateTimeError> {
        let text = text.trim();
        let (base, modifiers) = split_modifiers(text);
        let mut value = self.resolve_base(base.trim_end(), depth)?;
        for modifier in parse_modifiers(modifiers)? {
            self.apply(&mut value, &modifier)?;
        }
        Ok(value)
    }

    fn resolve_base(&self, base: &str, depth: usize) -> Result<DateTime, DateTimeError> {
        if let Some(substitute) = self.source.lookup(base) {
            if depth >= MAX_INDIRECTIONS {
                return Err(VirtualDateError::Recursive(base.into()).into());
            }
            debug!(token = base, substitute, "substituting virtual date");
            return self.resolve_with_depth(&substitute, depth + 1);
        }
        if let Some((name, precision)) = BUILTIN_TOKENS
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(base))
        {
            let mut value = self.now.clone().unwrap_or_else(DateTime::now);
            value.set_precision(precision);
            debug!(token = name, %value, "resolved built-in virtual date");
            return Ok(value);
        }
        Ok(DateTime::parse_with_options(base, &self.options)?)
    }

    fn apply(&self, value: &mut DateTime, modifier: &Modifier<'_>) -> Result<(), DateTimeError> {
        debug!(
            modifier = modifier.name,
            arguments = ?modifier.arguments,
            "applying virtual date modifier"
        );
        match (
            modifier.name.to_ascii_lowercase().as_str(),
            modifier.arguments.as_slice(),
        ) {
            ("round", [direction, interval]) => {
                let direction = modifier.argument(direction, str::parse::<RoundDirection>)?;
                let interval = interval.parse::<IntervalSpec>()?;
                value.round_to_interval(direction, &interval)?;
            }
            ("round", [direction, base, multiplier]) => {
                let direction = modifier.argument(direction, str::parse::<RoundDirection>)?;
                let base = base.parse::<IntervalSpec>()?.base();
                let multiplier = modifier.argument(multiplier, str::parse::<u32>)?;
                value.round(direction, base, multiplier)?;
            }
            ("roundtodayofweek", [direction, weekday]) => {
                let direction = modifier.argument(direction, str::parse::<RoundDirection>)?;
                let weekday = modifier.argument(weekday, str::parse::<Weekday>)?;
                value.round_to_day_of_week(direction, weekday)?;
            }
            ("timezone", [zone]) => value.shift_to_zone_in(&self.zones, zone)?,
            ("round" | "roundtodayofweek" | "timezone", _) => {
                return Err(VirtualDateError::Arity(modifier.name.into()).into());
            }
            _ => return Err(VirtualDateError::UnknownModifier(modifier.name.into()).into()),
        }
        Ok(())
    }
}

/// Splits the base from the modifiers, which start at the first `.` followed by a name and a `(`.
fn split_modifiers(text: &str) -> (&str, &str) {
    let start = text.match_indices('.').map(|(i, _)| i).find(|&i| {
        let rest = &text[i + 1..];
        let name_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        name_len > 0 && rest[name_len..].starts_with('(')
    });
    match start {
        Some(i) => text.split_at(i),
        None => (text, ""),
    }
}

struct Modifier<'a> {
    name: &'a str,
    arguments: Vec<&'a str>,
}

impl Modifier<'_> {
    fn argument<T, E: ToString>(
        &self,
        argument: &str,
        parse: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<T, VirtualDateError> {
        parse(argument).map_err(|error| VirtualDateError::InvalidArgument {
            modifier: self.name.into(),
            argument: argument.into(),
            message: error.to_string(),
        })
    }
}

fn parse_modifiers(mut input: &str) -> Result<Vec<Modifier<'_>>, VirtualDateError> {
    let mut modifiers = Vec::new();
    while !input.is_empty() {
        let malformed = || VirtualDateError::Malformed(input.into());
        let rest = input.strip_prefix('.').ok_or_else(malformed)?;
        let (name, rest) = rest.split_once('(').ok_or_else(malformed)?;
        let (arguments, rest) = rest.split_once(')').ok_or_else(malformed)?;
        let arguments = if arguments.trim().is_empty() {
            Vec::new()
        } else {
            arguments.split(',').map(str::trim).collect()
        };
        modifiers.push(Modifier {
            name: name.trim(),
            arguments,
        });
        input = rest.trim_start();
    }
    Ok(modifiers)
}

/// A virtual date token that can't be resolved.
#[derive(Debug, Clone, thiserror::Error)]
pub enum VirtualDateError {
    #[error("unknown virtual date modifier '{0}'")]
    UnknownModifier(String),
    #[error("wrong number of arguments for the virtual date modifier '{0}'")]
    Arity(String),
    #[error("invalid argument '{argument}' of the virtual date modifier '{modifier}': {message}")]
    InvalidArgument {
        modifier: String,
        argument: String,
        message: String,
    },
    #[error("malformed virtual date modifiers '{0}'")]
    Malformed(String),
    #[error("the virtual date '{0}' refers to itself")]
    Recursive(String),
}
