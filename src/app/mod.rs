//! Query execution: one run from resolved configuration to printed report.

/// Parse, build, enrich and render steps that need no network.
pub mod pipeline;
/// Async entrypoint performing the request.
mod runtime;

// Re-export the public entrypoint so callers keep using `app::run(...)`.
pub use runtime::run;
