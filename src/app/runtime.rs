//! Asynchronous entrypoint tying configuration, transport and rendering together.

use tracing::{debug, info, warn};

use super::pipeline::{parse_records, prepare, report};
use crate::args::{Args, resolve_query};
use crate::config::{Config, Settings, load_user_formats, paths};
use crate::error::EfileError;
use crate::portage::{PackageDatabase, PortageTree};
use crate::render::{Outcome, query_context};
use crate::results::LocalFilesystem;
use crate::sources::{PflRequest, dump_response, fetch, http_client};

/// What: Run one query and print its report to stdout.
///
/// Inputs:
/// - `args`: Parsed command line.
/// - `settings`: Parsed `settings.conf` (defaults when the file is absent).
///
/// Output:
/// - `Ok(Outcome)` once the report has been printed.
///
/// # Errors
/// - Any fatal [`EfileError`]: bad configuration, unresolvable query,
///   transport or parse failure, or a template error. Nothing is printed
///   to stdout in that case.
///
/// Details:
/// - The local Portage tree is optional. Without it bare package names
///   cannot be expanded, metadata filters are skipped and versions compare
///   lexically.
/// - With `--debug` the raw response is saved under the cache directory;
///   failing to save it only logs a warning.
pub async fn run(args: &Args, settings: &Settings) -> Result<Outcome, EfileError> {
    let user_formats = load_user_formats(paths::resolve_formats_path().as_deref())?;
    let config = Config::resolve(args, settings, &user_formats)?;

    let tree = PortageTree::detect(&config.portage_repo, &config.vdb_path);
    if tree.is_none() {
        info!(
            repo = %config.portage_repo.display(),
            "no local Portage tree; running without local metadata"
        );
    }
    let db = tree.as_ref().map(|t| t as &dyn PackageDatabase);

    let query = resolve_query(config.mode, &args.query, tree.as_ref())?;
    let request = PflRequest::build(&config.base_url, config.source, config.mode, &query)?;
    let client = http_client()?;
    let body = fetch(&client, &request).await?;
    if config.debug {
        save_dump(&config, &body);
    }

    let records = parse_records(
        config.source,
        &body,
        config.mode,
        &query,
        &request.url,
        &config.base_url,
    )?;
    let results = prepare(records, &config, db, &LocalFilesystem);
    let query_ctx = query_context(&query, &request.url);
    let rendered = report(&results, &config, &query_ctx)?;
    debug!(outcome = ?rendered.outcome, bytes = rendered.text.len(), "report rendered");
    print!("{}", rendered.text);
    Ok(rendered.outcome)
}

fn save_dump(config: &Config, body: &str) {
    let dir = &config.dump_dir;
    match dump_response(dir, config.source, body) {
        Ok(path) => info!(path = %path.display(), "raw response dumped"),
        Err(err) => warn!(dir = %dir.display(), error = %err, "could not dump raw response"),
    }
}
