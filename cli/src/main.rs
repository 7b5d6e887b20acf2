use crate::cli::{Args, Command};
use crate::config::Config;
use anyhow::{Context, bail};
use clap::Parser;
use oxdatetime::{
    DateTime, DateTimeFormat, IntervalSpec, RoundDirection, TimeZoneTable, Weekday,
    detect_format, dst_transition_days, format_offset,
};
use serde::Serialize;
use std::io::{Write, stdout};
use tracing::{debug, info};

mod cli;
mod config;
mod logging;

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, args.log_format);
    let config = if let Some(path) = &args.config {
        let config = Config::load(path)?;
        info!(path = %path.display(), "loaded configuration");
        debug!(?config);
        config
    } else {
        Config::default()
    };
    let options = config.parse_options();
    let zones = config.time_zones();
    let mut resolver = config.resolver();
    if let Some(now) = &args.now {
        resolver = resolver.with_now(
            DateTime::parse_with_options(now, &options)
                .with_context(|| format!("Invalid --now value '{now}'"))?,
        );
    }
    let resolve = |text: &str| {
        resolver
            .resolve(text)
            .with_context(|| format!("Invalid date '{text}'"))
    };

    let mut stdout = stdout().lock();
    match args.command {
        Command::Parse {
            date,
            format,
            output,
            json,
        } => {
            let value = if let Some(format) = format {
                DateTime::parse_with_format_and_options(&date, format_from_name(&format)?, &options)
                    .with_context(|| format!("Invalid date '{date}'"))?
            } else {
                resolve(&date)?
            };
            if json {
                serde_json::to_writer(&mut stdout, &Summary::new(&value, &date, &zones))?;
                writeln!(stdout)?;
            } else {
                write_value(&mut stdout, &value, output.as_deref(), &zones)?;
            }
        }
        Command::Formats => {
            for format in DateTimeFormat::ALL {
                writeln!(
                    stdout,
                    "{}\t{}\t{}",
                    format.name(),
                    format.pattern(),
                    format.precision()
                )?;
            }
        }
        Command::Add {
            date,
            interval,
            count,
            output,
        } => {
            let mut value = resolve(&date)?;
            value
                .add_intervals(&interval_from_name(&interval)?, count)
                .with_context(|| format!("Not able to add {count} times {interval} to '{date}'"))?;
            write_value(&mut stdout, &value, output.as_deref(), &zones)?;
        }
        Command::Round {
            date,
            interval,
            direction,
            weekday,
            output,
        } => {
            let mut value = resolve(&date)?;
            let direction = direction.parse::<RoundDirection>()?;
            match (interval, weekday) {
                (_, Some(weekday)) => {
                    let weekday = weekday
                        .parse::<Weekday>()
                        .with_context(|| format!("Invalid day of the week '{weekday}'"))?;
                    value.round_to_day_of_week(direction, weekday)?;
                }
                (Some(interval), None) => {
                    value.round_to_interval(direction, &interval_from_name(&interval)?)?;
                }
                (None, None) => bail!("An interval or the --weekday option must be given"),
            }
            write_value(&mut stdout, &value, output.as_deref(), &zones)?;
        }
        Command::Shift { date, zone, output } => {
            let mut value = resolve(&date)?;
            value
                .shift_to_zone_in(&zones, &zone)
                .with_context(|| format!("Not able to shift '{date}' to {zone}"))?;
            write_value(&mut stdout, &value, output.as_deref(), &zones)?;
        }
        Command::Between { from, to, interval } => {
            let count = resolve(&from)?
                .intervals_until(&resolve(&to)?, &interval_from_name(&interval)?)
                .with_context(|| format!("Not able to count {interval} intervals"))?;
            writeln!(stdout, "{count}")?;
        }
        Command::Zones { at } => {
            let at = match at {
                Some(at) => resolve(&at)?,
                None => DateTime::now(),
            };
            for zone in zones.entries() {
                writeln!(
                    stdout,
                    "{}\t{}\t{}",
                    zone.abbreviation(),
                    format_offset(zone.offset_at(&at)?),
                    zone.description()
                )?;
            }
        }
        Command::Dst { year } => {
            let (start, end) = dst_transition_days(year)?;
            writeln!(
                stdout,
                "{}\t{}",
                DateTime::from_date(year, 4, start)?.format(DateTimeFormat::Date)?,
                DateTime::from_date(year, 10, end)?.format(DateTimeFormat::Date)?
            )?;
        }
    }
    Ok(())
}

fn format_from_name(name: &str) -> anyhow::Result<DateTimeFormat> {
    Ok(name.parse()?)
}

fn interval_from_name(name: &str) -> anyhow::Result<IntervalSpec> {
    Ok(name.parse()?)
}

fn write_value(
    mut output: impl Write,
    value: &DateTime,
    format: Option<&str>,
    zones: &TimeZoneTable,
) -> anyhow::Result<()> {
    let text = if let Some(format) = format {
        value.format_in(format_from_name(format)?, zones)?
    } else {
        value.to_string()
    };
    writeln!(output, "{text}")?;
    Ok(())
}

/// The JSON description written by `parse --json`.
#[derive(Serialize)]
struct Summary<'a> {
    value: String,
    layout: Option<&'static str>,
    year: i64,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
    zone: &'a str,
    zone_significant: bool,
    utc_offset_minutes: Option<i32>,
    time_only: bool,
    precision: &'static str,
    weekday: Option<&'static str>,
    day_of_year: Option<u16>,
}

impl<'a> Summary<'a> {
    fn new(value: &'a DateTime, input: &str, zones: &TimeZoneTable) -> Self {
        Self {
            value: value.to_string(),
            layout: detect_format(input).map(DateTimeFormat::name),
            year: value.year(),
            month: value.month(),
            day: value.day(),
            hour: value.hour(),
            minute: value.minute(),
            second: value.second(),
            nanosecond: value.nanosecond(),
            zone: value.zone(),
            zone_significant: value.is_zone_significant(),
            utc_offset_minutes: zones.resolve(value.zone(), value).ok(),
            time_only: value.is_time_only(),
            precision: value.precision().name(),
            weekday: (!value.is_time_only()).then(|| value.weekday().name()),
            day_of_year: (!value.is_time_only()).then(|| value.day_of_year()),
        }
    }
}
