//! Structured logging setup

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count: 0 = warn, 1 = info, 2 = debug, 3+ = trace
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber, writing to stderr so stdout stays readable.
///
/// `RUST_LOG` takes precedence over the verbosity flag. Calling this twice is
/// harmless; the second call leaves the first subscriber in place.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},rosterfit={}",
            level_for_verbosity(0),
            level_for_verbosity(verbosity)
        ))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}
