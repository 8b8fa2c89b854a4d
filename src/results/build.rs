//! Hierarchy builder: folds flat records into package → version → path groups.

use super::model::{PackageGroup, PathGroup, ResultSet, VersionGroup};
use crate::portage::VersionComparator;
use crate::portage::version;
use crate::sources::Record;

/// Version substituted for strings that fail validation.
pub const PLACEHOLDER_VERSION: &str = "0";

/// What: Repair a raw version string before it is used as a key.
///
/// Inputs:
/// - `raw`: Version as reported by the server.
/// - `comparator`: Active comparator; only `Ebuild` validates.
///
/// Output:
/// - The repaired version.
///
/// Details:
/// - PFL reports some versions with a trailing `.`; it is stripped so those
///   records merge with the clean spelling.
/// - Under `Ebuild`, a non-empty version failing PMS validation is replaced by
///   [`PLACEHOLDER_VERSION`] and a warning is logged.
#[must_use]
pub fn repair_version(raw: &str, comparator: VersionComparator) -> String {
    let ver = raw.strip_suffix('.').unwrap_or(raw);
    if !ver.is_empty() && comparator.validates() && !version::is_valid(ver) {
        tracing::warn!(version = %ver, "invalid version number");
        return PLACEHOLDER_VERSION.to_string();
    }
    ver.to_string()
}

/// What: Build the result hierarchy from flat records.
///
/// Inputs:
/// - `records`: Records in server order.
/// - `comparator`: Decides whether versions are validated.
///
/// Output:
/// - Packages keyed by `category/package`, each level in first-seen order.
///
/// Details:
/// - A group is created on the first record naming its key; later records
///   reuse it, so links and tags come from the first record.
/// - Empty input yields an empty set, the normal "no matches" outcome.
pub fn build_hierarchy(
    records: impl IntoIterator<Item = Record>,
    comparator: VersionComparator,
) -> ResultSet {
    let mut result = ResultSet::default();
    for record in records {
        let cp = format!("{}/{}", record.category, record.package);
        let (package, created) = result.entry_or_insert_with(&cp, || PackageGroup {
            category: record.category.clone(),
            package: record.package.clone(),
            link: record.cp_link.clone(),
            ..PackageGroup::default()
        });
        if created {
            tracing::debug!(cp = %cp, "new package group");
        }

        let ver = repair_version(&record.version, comparator);
        let (version_group, _) = package.versions.entry_or_insert_with(&ver, || VersionGroup {
            cpv: format!("{cp}-{ver}"),
            link: record.version_link.clone(),
            ..VersionGroup::default()
        });

        version_group
            .paths
            .entry_or_insert_with(&record.path, || PathGroup {
                file_types: record.file_types,
                architectures: record.architectures,
                use_flags: record.use_flags,
                ..PathGroup::default()
            });
    }
    tracing::debug!(packages = result.len(), "hierarchy built");
    result
}
