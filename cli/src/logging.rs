use crate::cli::LogFormat;
use tracing_subscriber::EnvFilter;

/// Crates whose events are written.
const CRATE_TARGETS: [&str; 2] = ["oxdatetime", "oxdatetime_cli"];

/// Installs the stderr subscriber.
///
/// The verbosity maps 0 to warn, 1 to info, 2 to debug and more to trace.
/// The `RUST_LOG` environment variable overrides it.
pub fn init(verbosity: u8, format: LogFormat) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            CRATE_TARGETS
                .iter()
                .map(|target| format!("{target}={level}"))
                .collect::<Vec<_>>()
                .join(","),
        )
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
