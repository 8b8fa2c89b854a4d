//! Shared utilities for argument processing.

/// Log level used when neither the command line nor `settings.conf` sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// What: Determine the log level based on command-line arguments and settings.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
/// - `configured`: `log_level` from `settings.conf`, if any.
///
/// Output:
/// - Log level string (trace, debug, info, warn, error).
///
/// Details:
/// - `--debug` and `--verbose` override `--log-level`, which overrides the
///   settings file. `RUST_LOG` is honoured later by the subscriber.
#[must_use]
pub fn determine_log_level(args: &crate::args::Args, configured: Option<&str>) -> String {
    if args.debug || args.verbose {
        "debug".to_string()
    } else if let Some(level) = &args.log_level {
        level.clone()
    } else {
        configured.unwrap_or(DEFAULT_LOG_LEVEL).to_string()
    }
}
