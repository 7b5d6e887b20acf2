use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "oxdatetime")]
/// OxDateTime command line toolkit to parse, format, shift and round dates
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
    /// JSON configuration file with virtual dates, custom time zones and the two digit year pivot
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Increase the log verbosity (-v info, -vv debug, -vvv trace)
    ///
    /// The RUST_LOG environment variable overrides this option.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// Format of the logs written to stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
    /// Value of the current time used by the Current* virtual dates instead of the system clock
    #[arg(long, global = true)]
    pub now: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a date and write it back
    ///
    /// The input may be any supported layout, an ISO 8601 date or a virtual date like "CurrentToHour.round(backward, Day)".
    Parse {
        /// The date to parse
        #[arg(allow_hyphen_values = true)]
        date: String,
        /// Name or pattern of the input layout like "UsDate" or "MM/DD/YYYY"
        ///
        /// By default, the layout is guessed from the input.
        #[arg(short, long)]
        format: Option<String>,
        /// Name or pattern of the output layout
        ///
        /// By default, the layout matching the value precision is used.
        #[arg(short, long)]
        output: Option<String>,
        /// Write all the fields of the value as a JSON object
        #[arg(long, conflicts_with = "output")]
        json: bool,
    },
    /// List the supported layouts
    Formats,
    /// Add a number of intervals to a date
    Add {
        /// The date to start from
        #[arg(allow_hyphen_values = true)]
        date: String,
        /// The interval like "15Minute", "1Day" or "Month"
        interval: String,
        /// How many times the interval is added, may be negative
        #[arg(short = 'n', long, default_value_t = 1, allow_negative_numbers = true)]
        count: i64,
        /// Name or pattern of the output layout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Round a date to an interval boundary or to a day of the week
    Round {
        /// The date to round
        #[arg(allow_hyphen_values = true)]
        date: String,
        /// The interval like "15Minute" or "Day"
        #[arg(required_unless_present = "weekday")]
        interval: Option<String>,
        /// The direction: forward, backward or nearest
        #[arg(short, long, default_value = "backward")]
        direction: String,
        /// Round to the start of the given day of the week instead of an interval boundary
        #[arg(short, long, conflicts_with = "interval")]
        weekday: Option<String>,
        /// Name or pattern of the output layout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Move a date to another time zone
    ///
    /// The date must carry a known time zone label like "2020-01-01 10:00 PST".
    Shift {
        /// The date to shift
        #[arg(allow_hyphen_values = true)]
        date: String,
        /// The target time zone abbreviation or offset like "EST" or "+05:30"
        zone: String,
        /// Name or pattern of the output layout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Compute how many intervals separate two dates
    Between {
        /// The start date
        #[arg(allow_hyphen_values = true)]
        from: String,
        /// The end date
        #[arg(allow_hyphen_values = true)]
        to: String,
        /// The interval to count
        #[arg(short, long, default_value = "1Day")]
        interval: String,
    },
    /// List the known time zone abbreviations with their offsets
    Zones {
        /// The date at which the daylight saving time is evaluated
        ///
        /// By default, the current date is used.
        #[arg(long)]
        at: Option<String>,
    },
    /// Write the daylight saving time start and end dates of a year
    Dst {
        /// The year between 1970 and 2037
        #[arg(allow_negative_numbers = true)]
        year: i64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human readable lines
    Text,
    /// One JSON object per line
    Json,
}
