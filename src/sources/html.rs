//! Record extraction from PFL HTML result pages using `scraper`.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};

use super::{Mode, PLACEHOLDER_PATH, Query, Record, comma_split};
use crate::error::EfileError;

/// What: Collapse the text content of a cell.
fn cell_text(td: &ElementRef<'_>) -> String {
    td.text().collect::<String>().trim().to_string()
}

/// What: Absolute URL of the first link inside a cell.
///
/// Inputs:
/// - `td`: Table cell.
/// - `base_url`: Server root for relative links.
///
/// Output:
/// - Absolute link, or an empty string when the cell has no link.
fn cell_link(td: &ElementRef<'_>, base_url: &str, anchor: &Selector) -> String {
    td.select(anchor)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| {
            if href.starts_with("http://") || href.starts_with("https://") {
                href.to_string()
            } else {
                format!(
                    "{}/{}",
                    base_url.trim_end_matches('/'),
                    href.trim_start_matches('/')
                )
            }
        })
        .unwrap_or_default()
}

/// What: Find the result table: the first `<table>` sibling after `<a id="result">`.
fn result_table<'a>(document: &'a Html, marker: &Selector) -> Option<ElementRef<'a>> {
    let anchor = document.select(marker).next()?;
    let node: NodeRef<'a, Node> = *anchor;
    node.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name().eq_ignore_ascii_case("table"))
}

/// What: Compile a static selector.
///
/// # Errors
/// - `EfileError::Parse` if the selector text is invalid.
fn selector(css: &str) -> Result<Selector, EfileError> {
    Selector::parse(css).map_err(|e| EfileError::Parse {
        format: "html",
        message: format!("selector {css}: {e}"),
    })
}

/// What: Extract flat records from a PFL HTML result page.
///
/// Inputs:
/// - `body`: Raw HTML.
/// - `mode`: Query mode, which decides the column layout.
/// - `query`: Resolved query; package modes take CP/version from it.
/// - `request_url`: URL of the request, used as the listing link where the page has none.
/// - `base_url`: Server root for relative links.
///
/// Output:
/// - Records in page order; empty when the page reports no results.
///
/// # Errors
/// - `EfileError::Parse` only for internal selector failures; layout surprises
///   are logged and yield fewer records.
///
/// Details:
/// - A row whose first cell has `colspan` is the "no results" row and ends parsing.
/// - Rows with too few cells are skipped with a warning.
pub fn parse_html(
    body: &str,
    mode: Mode,
    query: &Query,
    request_url: &str,
    base_url: &str,
) -> Result<Vec<Record>, EfileError> {
    let document = Html::parse_document(body);
    let marker = selector("a#result")?;
    let rows = selector("tr")?;
    let cells = selector("td")?;
    let anchor = selector("a")?;

    let Some(table) = result_table(&document, &marker) else {
        tracing::warn!("result table not found in the server response");
        return Ok(Vec::new());
    };

    let (query_cp, query_version) = query_parts(query);
    let needed = match mode {
        Mode::Uniq => 5,
        Mode::AllVer => 6,
        Mode::CpvToF => 4,
        Mode::CpToV => 1,
    };

    let mut records = Vec::new();
    for tr in table.select(&rows) {
        let tds: Vec<ElementRef<'_>> = tr.select(&cells).collect();
        let Some(first) = tds.first() else {
            continue;
        };
        if first.value().attr("colspan").is_some() {
            tracing::debug!("server reported no results");
            break;
        }
        if tds.len() < needed {
            tracing::warn!(cells = tds.len(), needed, "skipping malformed result row");
            continue;
        }
        let record = match mode {
            Mode::Uniq | Mode::AllVer => {
                let cp = cell_text(&tds[0]);
                let Some((category, package)) = cp.split_once('/') else {
                    tracing::warn!(cp = %cp, "skipping row without category/package");
                    continue;
                };
                let (version, version_link, use_col) = if mode == Mode::AllVer {
                    (cell_text(&tds[4]), cell_link(&tds[4], base_url, &anchor), 5)
                } else {
                    (String::new(), String::new(), 4)
                };
                Record {
                    category: category.to_string(),
                    package: package.to_string(),
                    version,
                    path: cell_text(&tds[1]),
                    file_types: comma_split(&cell_text(&tds[2])),
                    architectures: comma_split(&cell_text(&tds[3])),
                    use_flags: comma_split(&cell_text(&tds[use_col])),
                    cp_link: cell_link(&tds[0], base_url, &anchor),
                    version_link,
                }
            }
            Mode::CpvToF => Record {
                category: query_cp.0.clone(),
                package: query_cp.1.clone(),
                version: query_version.clone(),
                path: cell_text(&tds[0]),
                file_types: comma_split(&cell_text(&tds[1])),
                architectures: comma_split(&cell_text(&tds[2])),
                use_flags: comma_split(&cell_text(&tds[3])),
                cp_link: String::new(),
                version_link: request_url.to_string(),
            },
            Mode::CpToV => Record {
                category: query_cp.0.clone(),
                package: query_cp.1.clone(),
                version: cell_text(&tds[0]),
                path: PLACEHOLDER_PATH.to_string(),
                cp_link: request_url.to_string(),
                version_link: cell_link(&tds[0], base_url, &anchor),
                ..Record::default()
            },
        };
        records.push(record);
    }
    tracing::debug!(count = records.len(), "parsed html records");
    Ok(records)
}

/// What: Category, package and version carried by a package query.
///
/// Output:
/// - Empty strings for filename queries.
pub(super) fn query_parts(query: &Query) -> ((String, String), String) {
    match query {
        Query::File { .. } => ((String::new(), String::new()), String::new()),
        Query::Package { category, package } => {
            ((category.clone(), package.clone()), String::new())
        }
        Query::PackageVersion {
            category,
            package,
            version,
        } => ((category.clone(), package.clone()), version.clone()),
    }
}
