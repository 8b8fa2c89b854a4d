//! Run configuration: command line, `settings.conf` and format sets merged
//! into one immutable [`Config`].

pub mod formats;
pub mod paths;
pub mod presets;
pub mod settings;
pub mod user_formats;

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, warn};

pub use formats::{EmptyRepr, FormatSet, Fragment, Guard, Highlight, Layer};
pub use settings::{Settings, decode_escapes, load_settings};
pub use user_formats::{UserFormats, load_user_formats};

use crate::args::Args;
use crate::error::EfileError;
use crate::portage::repo::{DEFAULT_REPO, DEFAULT_VDB};
use crate::results::Filter;
use crate::sources::{DEFAULT_BASE_URL, Mode, Source};

/// Family of the default format sets.
pub const DEFAULT_FAMILY: &str = "e_file";

/// What: Everything a run needs, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Query mode.
    pub mode: Mode,
    /// Data source.
    pub source: Source,
    /// PFL base URL without trailing slash.
    pub base_url: String,
    /// Skip enrichment, filtering and preprocessing.
    pub minimal: bool,
    /// Active filters, deduplicated.
    pub filters: Vec<Filter>,
    /// Active format set.
    pub format: FormatSet,
    /// Strip ANSI escapes from the output.
    pub no_color: bool,
    /// Dump the raw response for inspection.
    pub debug: bool,
    /// Ebuild repository used for local metadata.
    pub portage_repo: PathBuf,
    /// Installed package database.
    pub vdb_path: PathBuf,
    /// Directory receiving debug dumps.
    pub dump_dir: PathBuf,
}

/// What: Split a `KEY:VALUE` format override.
///
/// # Errors
/// - `EfileError::Config` when the colon is missing or the key is empty.
pub fn parse_format_override(item: &str) -> Result<(String, String), EfileError> {
    match item.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), decode_escapes(value)))
        }
        _ => Err(EfileError::Config(format!(
            "malformed --format '{item}', expected KEY:VALUE"
        ))),
    }
}

/// What: Name of the format set to use.
///
/// Details:
/// - `--fmtstrset`, then `format_set` from settings, then
///   `<format_family>_<mode>` with the family defaulting to `e_file`.
#[must_use]
pub fn format_set_name(args: &Args, settings: &Settings, mode: Mode) -> String {
    args.fmtstrset
        .clone()
        .or_else(|| settings.format_set.clone())
        .unwrap_or_else(|| {
            let family = settings.format_family.as_deref().unwrap_or(DEFAULT_FAMILY);
            format!("{family}_{mode}")
        })
}

fn extend_preset(values: &mut BTreeMap<String, String>, name: &str) -> bool {
    let Some(preset) = presets::preset(name) else {
        return false;
    };
    for (k, v) in preset {
        values.insert((*k).to_string(), (*v).to_string());
    }
    true
}

/// What: Merge base, preset and overrides into validated format values.
///
/// Inputs:
/// - `name`: Set name, looked up in `user` first, then among built-ins.
/// - `user`: Sets from `formats.toml`.
/// - `overrides`: `(key, value)` pairs applied last, in order.
///
/// Output:
/// - The built [`FormatSet`].
///
/// # Errors
/// - `EfileError::Config` for unknown set names or inherit targets.
/// - `EfileError::Template` when a resulting template is malformed.
pub fn resolve_format_set(
    name: &str,
    user: &UserFormats,
    overrides: &[(String, String)],
) -> Result<FormatSet, EfileError> {
    let mut values: BTreeMap<String, String> = presets::BASE
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    if let Some(set) = user.get(name) {
        if let Some(parent) = set.get(user_formats::INHERIT_KEY)
            && !extend_preset(&mut values, parent)
        {
            return Err(EfileError::Config(format!(
                "format set '{name}' inherits unknown set '{parent}'"
            )));
        }
        for (k, v) in set {
            if k != user_formats::INHERIT_KEY {
                values.insert(k.clone(), v.clone());
            }
        }
        debug!(set = %name, "using user format set");
    } else if !extend_preset(&mut values, name) {
        let mut known: Vec<&str> = presets::preset_names().collect();
        known.extend(user.keys().map(String::as_str));
        return Err(EfileError::Config(format!(
            "unknown format set '{name}' (known: {})",
            known.join(", ")
        )));
    }

    for (key, value) in overrides {
        if !formats::is_known_key(key) {
            warn!(key = %key, "unknown format key; applied anyway");
        }
        values.insert(key.clone(), value.clone());
    }
    Ok(FormatSet::new(name, values)?)
}

impl Config {
    /// What: Resolve the run configuration.
    ///
    /// Inputs:
    /// - `args`: Parsed command line.
    /// - `settings`: Parsed `settings.conf` (defaults when absent).
    /// - `user`: Sets from `formats.toml`.
    ///
    /// Output:
    /// - The immutable configuration, with templates already validated.
    ///
    /// # Errors
    /// - `EfileError::Config` for unknown format sets or malformed overrides.
    /// - `EfileError::Template` when a resulting template is malformed.
    ///
    /// Details:
    /// - Command-line values win over settings, settings over built-in
    ///   defaults. Flags (`minimal`, `no_color`) and filters are combined.
    pub fn resolve(args: &Args, settings: &Settings, user: &UserFormats) -> Result<Self, EfileError> {
        let mode = args.mode();
        let mut overrides = settings.formats.clone();
        for item in &args.format {
            overrides.push(parse_format_override(item)?);
        }
        let name = format_set_name(args, settings, mode);
        let format = resolve_format_set(&name, user, &overrides)?;

        let mut filters = settings.filters.clone();
        for f in args.filters() {
            if !filters.contains(&f) {
                filters.push(f);
            }
        }

        let config = Self {
            mode,
            source: args.source.or(settings.source).unwrap_or_default(),
            base_url: settings
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            minimal: args.minimal || settings.minimal,
            filters,
            format,
            no_color: args.no_color || settings.no_color,
            debug: args.debug,
            portage_repo: settings
                .portage_repo
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPO)),
            vdb_path: settings
                .vdb_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_VDB)),
            dump_dir: paths::cache_dir(),
        };
        debug!(
            mode = %config.mode,
            source = ?config.source,
            set = %config.format.name(),
            minimal = config.minimal,
            filters = config.filters.len(),
            "configuration resolved"
        );
        Ok(config)
    }
}

#[cfg(test)]
static TEST_MUTEX: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();

#[cfg(test)]
/// What: Serialise tests that touch process environment variables.
pub(crate) fn test_mutex() -> &'static std::sync::Mutex<()> {
    TEST_MUTEX.get_or_init(|| std::sync::Mutex::new(()))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).expect("parse")
    }

    #[test]
    /// What: Default set follows the mode; family and explicit name override it.
    fn picks_format_set_name() {
        let s = Settings::default();
        assert_eq!(format_set_name(&args(&["e-file", "-L", "x/y"]), &s, Mode::CpToV), "e_file_cptov");
        let s = Settings {
            format_family: Some("raw".into()),
            ..Settings::default()
        };
        assert_eq!(format_set_name(&args(&["e-file", "x"]), &s, Mode::Uniq), "raw_uniq");
        assert_eq!(
            format_set_name(&args(&["e-file", "--fmtstrset", "full_allver", "x"]), &s, Mode::Uniq),
            "full_allver"
        );
    }

    #[test]
    /// What: Overrides apply last, settings before command line.
    ///
    /// - Input: `format.sep` in settings and `--format sep:|` on the command line
    /// - Output: Command-line value wins; escapes are decoded
    fn override_precedence() {
        let s = Settings {
            formats: vec![("sep".into(), "; ".into()), ("sym_none".into(), "-".into())],
            ..Settings::default()
        };
        let a = args(&["e-file", "--format", "sep:|", "--format", "noresult:none\\n", "x"]);
        let cfg = Config::resolve(&a, &s, &UserFormats::new()).expect("config");
        assert_eq!(cfg.format.list_sep(), "|");
        assert_eq!(cfg.format.value("sym_none"), "-");
        assert_eq!(cfg.format.noresult(), "none\n");
        assert_eq!(cfg.format.name(), "e_file_uniq");
    }

    #[test]
    /// What: User sets win over built-ins and may inherit one.
    fn user_sets_inherit() {
        let mut user = UserFormats::new();
        user.insert(
            "mine".into(),
            BTreeMap::from([
                ("inherit".to_string(), "raw_allver".to_string()),
                ("lvver".to_string(), "{ver}\n".to_string()),
            ]),
        );
        let set = resolve_format_set("mine", &user, &[]).expect("set");
        assert_eq!(set.value("lvcp"), "{lvver}");
        assert_eq!(set.value("lvver"), "{ver}\n");
        assert_eq!(set.value("sep_lvcp"), "");

        user.get_mut("mine").expect("mine").insert("inherit".into(), "nope".into());
        assert!(matches!(
            resolve_format_set("mine", &user, &[]),
            Err(EfileError::Config(_))
        ));
    }

    #[test]
    /// What: Bad names and overrides are configuration errors.
    fn rejects_bad_configuration() {
        let s = Settings::default();
        let bad_set = args(&["e-file", "--fmtstrset", "nope", "x"]);
        assert!(matches!(
            Config::resolve(&bad_set, &s, &UserFormats::new()),
            Err(EfileError::Config(_))
        ));
        let bad_override = args(&["e-file", "--format", "novalue", "x"]);
        assert!(matches!(
            Config::resolve(&bad_override, &s, &UserFormats::new()),
            Err(EfileError::Config(_))
        ));
        let bad_template = args(&["e-file", "--format", "lvcp:{cp", "x"]);
        assert!(matches!(
            Config::resolve(&bad_template, &s, &UserFormats::new()),
            Err(EfileError::Template(_))
        ));
    }

    #[test]
    /// What: An unknown set name lists built-in and user sets.
    ///
    /// - Input: `nope` with one user set `mine` defined
    /// - Output: Config error naming both `raw_uniq` and `mine`
    fn unknown_set_lists_known_names() {
        let mut user = UserFormats::new();
        user.insert("mine".into(), BTreeMap::new());
        let Err(EfileError::Config(msg)) = resolve_format_set("nope", &user, &[]) else {
            panic!("expected config error");
        };
        assert!(msg.contains("'nope'"), "{msg}");
        assert!(msg.contains("raw_uniq"), "{msg}");
        assert!(msg.contains("mine"), "{msg}");
    }

    #[test]
    /// What: Flags and filters from settings and command line combine.
    fn combines_flags_and_filters() {
        let s = Settings {
            filters: vec![Filter::Installed],
            minimal: true,
            source: Some(Source::PflJson),
            ..Settings::default()
        };
        let a = args(&["e-file", "--installed", "--available", "--source", "pfl_html", "x"]);
        let cfg = Config::resolve(&a, &s, &UserFormats::new()).expect("config");
        assert_eq!(cfg.filters, [Filter::Installed, Filter::Available]);
        assert!(cfg.minimal);
        assert_eq!(cfg.source, Source::PflHtml);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }
}
