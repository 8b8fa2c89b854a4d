//! Error types shared across the query pipeline.
//!
//! Every fatal condition funnels into [`EfileError`], which `main` maps to the
//! process exit code. Recoverable problems never reach this type; they are
//! reported through `tracing::warn!` where they are detected.

use std::fmt;

use crate::render::TemplateError;
use crate::sources::FetchError;

/// Exit code used for every fatal error.
pub const EXIT_FATAL: u8 = 5;
/// Exit code used when the query succeeded but matched nothing.
pub const EXIT_NO_RESULTS: u8 = 1;

/// What: Fatal error terminating a run before any report is printed.
///
/// Inputs: Produced by argument resolution, configuration loading, transport,
/// response parsing and rendering.
///
/// Output: Implements `Display`/`Error`; `exit_code` gives the process status.
///
/// Details:
/// - Wraps the lower-level [`FetchError`] and [`TemplateError`] so callers can
///   propagate with `?`.
#[derive(Debug)]
pub enum EfileError {
    /// HTTP transport failed or returned nothing.
    Fetch(FetchError),
    /// Response body could not be parsed.
    Parse {
        /// Short name of the response format (`html`, `json`).
        format: &'static str,
        /// Parser diagnostic.
        message: String,
    },
    /// The PFL JSON endpoint reported an error object.
    Server {
        /// Error code as sent by the server.
        code: String,
        /// Error message as sent by the server.
        message: String,
    },
    /// A template could not be parsed or referenced an unknown field.
    Template(TemplateError),
    /// Invalid configuration (unknown format set, malformed override, bad settings file).
    Config(String),
    /// The positional query could not be resolved into a package or version.
    Query(String),
    /// Local I/O failure (config files, debug dumps).
    Io(std::io::Error),
}

impl EfileError {
    /// What: Process exit status for this error.
    ///
    /// Output:
    /// - [`EXIT_FATAL`] for every variant.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        EXIT_FATAL
    }
}

impl fmt::Display for EfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(err) => write!(f, "request failed: {err}"),
            Self::Parse { format, message } => {
                write!(f, "could not parse {format} response: {message}")
            }
            Self::Server { code, message } => write!(f, "server failure: {code}: {message}"),
            Self::Template(err) => write!(f, "format string error: {err}"),
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Query(msg) => write!(f, "{msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for EfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(err) => Some(err),
            Self::Template(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Parse { .. } | Self::Server { .. } | Self::Config(_) | Self::Query(_) => None,
        }
    }
}

impl From<FetchError> for EfileError {
    fn from(value: FetchError) -> Self {
        Self::Fetch(value)
    }
}

impl From<TemplateError> for EfileError {
    fn from(value: TemplateError) -> Self {
        Self::Template(value)
    }
}

impl From<std::io::Error> for EfileError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
