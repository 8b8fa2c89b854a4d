//! Package-level result filters.

use std::fmt;

use super::model::{InstallFlag, PackageGroup, ResultSet};

/// Named predicate removing package groups from the result set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Keep only packages with at least one locally available version.
    Available,
    /// Keep only packages with some installed version.
    Installed,
}

impl Filter {
    /// What: Parse a filter name as used in `settings.conf`.
    #[must_use]
    pub fn from_config_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "available" => Some(Self::Available),
            "installed" => Some(Self::Installed),
            _ => None,
        }
    }

    /// Whether the filter needs the local package database.
    #[must_use]
    pub const fn needs_metadata(self) -> bool {
        matches!(self, Self::Available | Self::Installed)
    }

    /// Whether `group` passes this filter.
    #[must_use]
    pub fn keeps(self, group: &PackageGroup) -> bool {
        match self {
            Self::Available => !group.available_versions.is_empty(),
            Self::Installed => group.installed_flag != InstallFlag::None,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Available => "available",
            Self::Installed => "installed",
        })
    }
}

/// What: Remove packages failing any active filter.
///
/// Inputs:
/// - `results`: Enriched result set.
/// - `filters`: Requested filters (duplicates are harmless).
/// - `has_metadata`: Whether a local package database is available.
///
/// Output:
/// - Number of removed packages.
///
/// Details:
/// - A filter needing metadata is skipped with a warning when none is
///   available, leaving the result set untouched.
pub fn apply_filters(results: &mut ResultSet, filters: &[Filter], has_metadata: bool) -> usize {
    let active: Vec<Filter> = filters
        .iter()
        .copied()
        .filter(|f| {
            if f.needs_metadata() && !has_metadata {
                tracing::warn!(filter = %f, "filter needs a local Portage tree; filter ignored");
                false
            } else {
                true
            }
        })
        .collect();
    if active.is_empty() {
        return 0;
    }
    let before = results.len();
    results.retain(|cp, group| {
        let keep = active.iter().all(|f| f.keeps(group));
        if !keep {
            tracing::debug!(cp = %cp, "package removed by filter");
        }
        keep
    });
    before - results.len()
}
