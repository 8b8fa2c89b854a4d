//! Local Portage metadata: version grammar and the optional package database.
//!
//! The database is an optional capability. Consumers receive it as
//! `Option<&dyn PackageDatabase>` and branch explicitly on its presence.

pub mod repo;
pub mod version;

use std::cmp::Ordering;

pub use repo::PortageTree;

/// Homepage and description of one package version.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackageMetadata {
    /// Upstream homepage (space-separated URLs as written in the ebuild).
    pub homepage: String,
    /// One-line package description.
    pub description: String,
}

/// What: Read-only view of locally installed and available packages.
///
/// Inputs: `cp` arguments are `category/package` strings.
///
/// Output: Version lists in the order the backend found them; callers sort.
///
/// Details:
/// - Lookups never fail hard: an unknown package yields empty lists and
///   default metadata.
pub trait PackageDatabase {
    /// Versions of `cp` currently installed.
    fn installed_versions(&self, cp: &str) -> Vec<String>;
    /// Versions of `cp` available from the configured repository.
    fn available_versions(&self, cp: &str) -> Vec<String>;
    /// Metadata of `cp` at `version`.
    fn metadata(&self, cp: &str, version: &str) -> PackageMetadata;
    /// Three-way version comparison honoring the ecosystem's version syntax.
    fn compare_versions(&self, a: &str, b: &str) -> Ordering {
        version::compare(a, b)
    }
}

/// What: Version ordering strategy selected once at startup.
///
/// Details:
/// - `Ebuild` understands PMS syntax and also enables version validation in
///   the hierarchy builder.
/// - `Lexical` is used when no local package database exists. It is a plain
///   total string order and will misplace e.g. `1.10` before `1.9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VersionComparator {
    /// PMS-aware comparison.
    Ebuild,
    /// Byte-wise string comparison.
    Lexical,
}

impl VersionComparator {
    /// What: Pick the comparator matching the available capability.
    ///
    /// Inputs:
    /// - `db`: Detected package database, if any.
    #[must_use]
    pub fn for_database(db: Option<&dyn PackageDatabase>) -> Self {
        if db.is_some() {
            Self::Ebuild
        } else {
            Self::Lexical
        }
    }

    /// Compare two version strings with this strategy.
    #[must_use]
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Self::Ebuild => version::compare(a, b),
            Self::Lexical => a.cmp(b),
        }
    }

    /// Whether version strings can be validated under this strategy.
    #[must_use]
    pub const fn validates(self) -> bool {
        matches!(self, Self::Ebuild)
    }

    /// Sort a list of versions in place (stable).
    pub fn sort(self, versions: &mut [String]) {
        versions.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Both strategies agree on simple cases and diverge on multi-digit parts.
    ///
    /// - Input: `["2.0", "1.10", "1.9"]`
    /// - Output: Ebuild sorts numerically; Lexical sorts bytewise
    fn strategies_order_versions() {
        let mut ebuild = vec!["2.0".to_string(), "1.10".to_string(), "1.9".to_string()];
        VersionComparator::Ebuild.sort(&mut ebuild);
        assert_eq!(ebuild, ["1.9", "1.10", "2.0"]);

        let mut lexical = vec!["2.0".to_string(), "1.10".to_string(), "1.9".to_string()];
        VersionComparator::Lexical.sort(&mut lexical);
        assert_eq!(lexical, ["1.10", "1.9", "2.0"]);
    }

    #[test]
    /// What: The lexical fallback is a proper total order (reports `Less`).
    fn lexical_reports_less() {
        assert_eq!(VersionComparator::Lexical.compare("1.0", "2.0"), Ordering::Less);
        assert_eq!(VersionComparator::Lexical.compare("2.0", "1.0"), Ordering::Greater);
        assert_eq!(VersionComparator::Lexical.compare("1.0", "1.0"), Ordering::Equal);
    }
}
