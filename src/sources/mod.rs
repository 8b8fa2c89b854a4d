//! PFL data sources: request construction, transport and record extraction.
//!
//! The server is queried either through its HTML site (`pfl_html`) or its
//! robot JSON API (`pfl_json`). Both paths end in the same flat [`Record`]
//! sequence consumed by the hierarchy builder.

mod fetch;
pub mod html;
pub mod json;

use std::fmt;

pub use fetch::{FetchError, PflRequest, dump_response, fetch, http_client};

/// Default PFL server.
pub const DEFAULT_BASE_URL: &str = "http://www.portagefilelist.de";

/// Path reported for records that carry no file (version listings).
pub const PLACEHOLDER_PATH: &str = "/dev/null";

/// Response format requested from the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum Source {
    /// Scrape the HTML query pages.
    #[default]
    PflHtml,
    /// Use the robot JSON endpoints.
    PflJson,
}

impl Source {
    /// What: Parse a source name as written in `settings.conf`.
    ///
    /// Output:
    /// - `None` for unknown names.
    #[must_use]
    pub fn from_config_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pfl_html" | "html" => Some(Self::PflHtml),
            "pfl_json" | "json" => Some(Self::PflJson),
            _ => None,
        }
    }

    /// File extension of the raw response, used for debug dumps.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::PflHtml => "html",
            Self::PflJson => "json",
        }
    }
}

/// What the query asks the server for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Filename to packages, one entry per package.
    Uniq,
    /// Filename to every matching package version.
    AllVer,
    /// Package version to its file list.
    CpvToF,
    /// Package to its known versions.
    CpToV,
}

impl Mode {
    /// Suffix used by the built-in format set names (`e_file_<suffix>`).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Uniq => "uniq",
            Self::AllVer => "allver",
            Self::CpvToF => "cpvtof",
            Self::CpToV => "cptov",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// What: Resolved query subject.
///
/// Details:
/// - `File` serves both filename modes; the package variants carry a
///   category that has already been expanded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
    /// Search by file name (`uniq`, `allver`).
    File {
        /// Name or path fragment to look up.
        filename: String,
    },
    /// List versions of a package (`cptov`).
    Package {
        /// Category, e.g. `dev-lang`.
        category: String,
        /// Package name, e.g. `python`.
        package: String,
    },
    /// List files of a package version (`cpvtof`).
    PackageVersion {
        /// Category.
        category: String,
        /// Package name.
        package: String,
        /// Version string.
        version: String,
    },
}

impl Query {
    /// What: Template fields describing the query itself.
    ///
    /// Output:
    /// - `(name, value)` pairs: `filename`, or `c`, `p`, `cp` and for versions `v`, `cpv`.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::File { filename } => vec![("filename", filename.clone())],
            Self::Package { category, package } => vec![
                ("c", category.clone()),
                ("p", package.clone()),
                ("cp", format!("{category}/{package}")),
            ],
            Self::PackageVersion {
                category,
                package,
                version,
            } => vec![
                ("c", category.clone()),
                ("p", package.clone()),
                ("cp", format!("{category}/{package}")),
                ("v", version.clone()),
                ("cpv", format!("{category}/{package}-{version}")),
            ],
        }
    }
}

/// What: One flat row of a PFL answer.
///
/// Details:
/// - `version` is raw server data; the hierarchy builder repairs and validates it.
/// - Link fields are absolute URLs or empty when the source provides none.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    /// Package category.
    pub category: String,
    /// Package name.
    pub package: String,
    /// Version (`""` for unique-package results).
    pub version: String,
    /// Absolute file path.
    pub path: String,
    /// File type tags (`obj`, `sym`, `dir`).
    pub file_types: Vec<String>,
    /// Architectures the file was reported on.
    pub architectures: Vec<String>,
    /// USE flags active when the file was reported.
    pub use_flags: Vec<String>,
    /// Link to the package's PFL listing.
    pub cp_link: String,
    /// Link to the version's PFL file listing.
    pub version_link: String,
}

impl Record {
    /// Convenience constructor used by the extractors and tests.
    #[must_use]
    pub fn new(category: &str, package: &str, version: &str, path: &str) -> Self {
        Self {
            category: category.to_string(),
            package: package.to_string(),
            version: version.to_string(),
            path: path.to_string(),
            ..Self::default()
        }
    }
}

/// What: Split a comma-separated tag cell into trimmed, non-empty tags.
#[must_use]
pub fn comma_split(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Tag cells drop blanks and surrounding whitespace.
    fn comma_split_trims() {
        assert_eq!(comma_split(" x86, amd64 ,,"), ["x86", "amd64"]);
        assert!(comma_split("  ").is_empty());
    }

    #[test]
    /// What: Query fields expose CP and CPV for package-version queries.
    fn query_fields_for_package_version() {
        let q = Query::PackageVersion {
            category: "dev-lang".into(),
            package: "foo".into(),
            version: "1.0".into(),
        };
        let fields = q.fields();
        assert!(fields.contains(&("cpv", "dev-lang/foo-1.0".to_string())));
        assert!(fields.contains(&("cp", "dev-lang/foo".to_string())));
        assert!(fields.contains(&("v", "1.0".to_string())));
    }
}
