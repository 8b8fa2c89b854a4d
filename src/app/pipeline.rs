//! Synchronous half of a run: records in, report text out.

use tracing::{debug, info};

use crate::config::Config;
use crate::error::EfileError;
use crate::portage::{PackageDatabase, VersionComparator};
use crate::render::{Context, Rendered, render};
use crate::results::{
    PathProbe, ResultSet, apply_filters, build_hierarchy, enrich, preprocess, sort_results,
};
use crate::sources::{Mode, Query, Record, Source, html, json};

/// What: Extract records from a response body in the configured source format.
///
/// Inputs:
/// - `source`: Format the body was requested in.
/// - `body`: Raw response.
/// - `mode`, `query`: Query the response answers.
/// - `request_url`, `base_url`: Used by the HTML parser to complete links.
///
/// # Errors
/// - Propagates parser and server errors.
pub fn parse_records(
    source: Source,
    body: &str,
    mode: Mode,
    query: &Query,
    request_url: &str,
    base_url: &str,
) -> Result<Vec<Record>, EfileError> {
    let records = match source {
        Source::PflHtml => html::parse_html(body, mode, query, request_url, base_url)?,
        Source::PflJson => json::parse_json(body, mode, query)?,
    };
    info!(records = records.len(), ?source, "response parsed");
    Ok(records)
}

/// What: Build, enrich, filter and sort the hierarchy for `records`.
///
/// Inputs:
/// - `records`: Parsed records in server order.
/// - `config`: Run configuration (minimal flag, filters, format set).
/// - `db`: Local package database, if one was detected.
/// - `probe`: Path existence check.
///
/// Output:
/// - The result set, ready for rendering.
///
/// Details:
/// - Minimal runs skip enrichment, filtering and display preprocessing;
///   sorting always happens.
pub fn prepare(
    records: Vec<Record>,
    config: &Config,
    db: Option<&dyn PackageDatabase>,
    probe: &dyn PathProbe,
) -> ResultSet {
    let comparator = VersionComparator::for_database(db);
    let mut results = build_hierarchy(records, comparator);
    if config.minimal {
        sort_results(&mut results, comparator);
        return results;
    }
    enrich(&mut results, db, probe);
    let dropped = apply_filters(&mut results, &config.filters, db.is_some());
    if dropped > 0 {
        debug!(dropped, "packages removed by filters");
    }
    sort_results(&mut results, comparator);
    preprocess(&mut results, &config.format, comparator);
    results
}

/// What: Render a prepared result set and apply output post-processing.
///
/// # Errors
/// - `EfileError::Template` when a template references an undefined field.
pub fn report(
    results: &ResultSet,
    config: &Config,
    query_ctx: &Context,
) -> Result<Rendered, EfileError> {
    let mut rendered = render(results, &config.format, query_ctx, config.minimal)?;
    if config.no_color {
        rendered.text = strip_ansi_escapes::strip_str(&rendered.text);
    }
    Ok(rendered)
}
