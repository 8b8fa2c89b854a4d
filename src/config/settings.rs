//! `settings.conf` parsing.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::EfileError;
use crate::results::Filter;
use crate::sources::Source;

/// What: User settings read from `settings.conf`.
///
/// Details:
/// - Every field is optional; `None`/empty means "use the built-in default
///   or the command line".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    /// Default data source.
    pub source: Option<Source>,
    /// PFL base URL.
    pub base_url: Option<String>,
    /// Format family (`e_file`, `full`, `raw`, or a user family) combined with the mode.
    pub format_family: Option<String>,
    /// Exact format set name, overriding the family.
    pub format_set: Option<String>,
    /// Skip enrichment, filtering and preprocessing.
    pub minimal: bool,
    /// Filters applied to every query.
    pub filters: Vec<Filter>,
    /// Portage ebuild repository.
    pub portage_repo: Option<PathBuf>,
    /// Installed package database.
    pub vdb_path: Option<PathBuf>,
    /// Default log level.
    pub log_level: Option<String>,
    /// Strip ANSI escapes from the output.
    pub no_color: bool,
    /// `format.KEY = VALUE` overrides, in file order.
    pub formats: Vec<(String, String)>,
}

/// What: Strip a trailing `#` comment from a value.
///
/// Details:
/// - A value starting with `#` keeps that first character.
fn strip_inline_comment(s: &str) -> &str {
    let cut = if let Some(stripped) = s.strip_prefix('#') {
        stripped.find('#').map(|j| j + 1)
    } else {
        s.find('#')
    };
    cut.map_or(s, |i| &s[..i]).trim()
}

fn parse_bool(val: &str) -> bool {
    let lv = val.to_ascii_lowercase();
    lv == "true" || lv == "1" || lv == "yes" || lv == "on"
}

/// What: Decode backslash escapes in a format value.
///
/// Inputs:
/// - `raw`: Value as written, optionally wrapped in double quotes.
///
/// Output:
/// - Value with `\n`, `\t`, `\e`, `\033`, `\x1b` and `\\` decoded.
///
/// Details:
/// - Surrounding double quotes are removed so values may keep leading or
///   trailing spaces. Unknown escapes are kept verbatim.
#[must_use]
pub fn decode_escapes(raw: &str) -> String {
    let raw = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let (decoded, used) = if tail.starts_with("033") {
            ("\x1b", 3)
        } else if tail.starts_with("x1b") || tail.starts_with("x1B") {
            ("\x1b", 3)
        } else {
            match tail.chars().next() {
                Some('n') => ("\n", 1),
                Some('t') => ("\t", 1),
                Some('e') => ("\x1b", 1),
                Some('\\') => ("\\", 1),
                _ => ("\\", 0),
            }
        };
        out.push_str(decoded);
        rest = &tail[used..];
    }
    out.push_str(rest);
    out
}

/// What: Parse `settings.conf` content.
///
/// Inputs:
/// - `content`: File content.
///
/// Output:
/// - Parsed settings; unknown keys and invalid values are warned about and skipped.
///
/// Details:
/// - Lines are `key = value`; `#` and `//` lines are comments.
/// - Keys are case-insensitive and `-`/`.`/space are treated as `_`, except
///   for `format.KEY` whose `KEY` is kept verbatim.
/// - `format.KEY` values keep `#` and decode escapes.
#[must_use]
pub fn parse_settings(content: &str) -> Settings {
    let mut settings = Settings::default();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }
        let Some((raw_key, raw_val)) = trimmed.split_once('=') else {
            warn!(line = %trimmed, "settings line without '='; ignored");
            continue;
        };
        let raw_key = raw_key.trim();
        if let Some(fmt_key) = raw_key.strip_prefix("format.") {
            settings
                .formats
                .push((fmt_key.trim().to_string(), decode_escapes(raw_val.trim())));
            continue;
        }
        let key = raw_key.to_lowercase().replace(['.', '-', ' '], "_");
        let val = strip_inline_comment(raw_val.trim());
        match key.as_str() {
            "source" => match Source::from_config_key(val) {
                Some(s) => settings.source = Some(s),
                None => warn!(value = %val, "unknown source in settings; ignored"),
            },
            "base_url" => settings.base_url = Some(val.trim_end_matches('/').to_string()),
            "format_family" | "fmtstr_family" => settings.format_family = Some(val.to_string()),
            "format_set" | "fmtstrset" => settings.format_set = Some(val.to_string()),
            "minimal" => settings.minimal = parse_bool(val),
            "filters" | "filter" => {
                for name in val.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    match Filter::from_config_key(name) {
                        Some(f) if !settings.filters.contains(&f) => settings.filters.push(f),
                        Some(_) => {}
                        None => warn!(filter = %name, "unknown filter in settings; ignored"),
                    }
                }
            }
            "portage_repo" | "repo" => settings.portage_repo = Some(PathBuf::from(val)),
            "vdb_path" | "vdb" => settings.vdb_path = Some(PathBuf::from(val)),
            "log_level" | "loglevel" => settings.log_level = Some(val.to_string()),
            "no_color" | "nocolor" => settings.no_color = parse_bool(val),
            _ => warn!(key = %raw_key, "unknown settings key; ignored"),
        }
    }
    settings
}

/// What: Load settings from `path`, or defaults when no file exists.
///
/// Output:
/// - Parsed settings.
///
/// # Errors
/// - `EfileError::Io` when the file exists but cannot be read.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, EfileError> {
    let Some(path) = path else {
        debug!("no settings.conf found; using defaults");
        return Ok(Settings::default());
    };
    let content = std::fs::read_to_string(path)?;
    let settings = parse_settings(&content);
    debug!(path = %path.display(), overrides = settings.formats.len(), "settings loaded");
    Ok(settings)
}
