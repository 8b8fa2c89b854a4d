//! e-file binary entrypoint kept minimal. The query runtime lives in `efile::app`.

use std::fmt;
use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use efile::args::{Args, determine_log_level};
use efile::config::{Settings, load_settings, paths};
use efile::error::EfileError;
use tracing_appender::non_blocking::WorkerGuard;

struct EfileTimer;

impl tracing_subscriber::fmt::time::FormatTime for EfileTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"))
    }
}

/// What: Install the stderr tracing subscriber.
///
/// Inputs:
/// - `level`: Default filter when `RUST_LOG` is unset.
///
/// Output:
/// - Worker guard; dropping it flushes pending log lines.
fn init_logging(level: &str) -> WorkerGuard {
    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(non_blocking)
        .with_timer(EfileTimer)
        .init();
    guard
}

fn fail(err: &EfileError) -> ExitCode {
    tracing::error!(error = ?err, "e-file failed");
    eprintln!("e-file: {err}");
    ExitCode::from(err.exit_code())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let settings: Result<Settings, EfileError> =
        load_settings(paths::resolve_settings_path().as_deref());
    let configured = settings.as_ref().ok().and_then(|s| s.log_level.clone());
    let _guard = init_logging(&determine_log_level(&args, configured.as_deref()));
    tracing::debug!(query = ?args.query, mode = %args.mode(), "e-file starting");

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => return fail(&err),
    };
    match efile::app::run(&args, &settings).await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "e-file finished");
            ExitCode::from(outcome.exit_code())
        }
        Err(err) => fail(&err),
    }
}

#[cfg(test)]
mod tests {
    /// What: FormatTime impl writes a non-empty timestamp without panicking
    ///
    /// - Input: Tracing writer buffer
    /// - Output: Buffer receives an ISO-like timestamp
    #[test]
    fn efile_timer_formats_time_without_panic() {
        use tracing_subscriber::fmt::time::FormatTime;
        let mut buf = String::new();
        let mut writer = tracing_subscriber::fmt::format::Writer::new(&mut buf);
        let t = super::EfileTimer;
        let _ = t.format_time(&mut writer);
        assert_eq!(buf.len(), "2024-01-01T00:00:00".len());
        assert!(buf.contains('T'));
    }
}
