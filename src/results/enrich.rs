//! Metadata enricher: local install state, availability and on-disk existence.

use std::collections::HashSet;
use std::path::Path;

use super::model::{InstallFlag, PackageGroup, ResultSet};
use crate::portage::PackageDatabase;

/// What: Capability answering whether a path exists on this machine.
pub trait PathProbe {
    /// Whether `path` exists.
    fn exists(&self, path: &str) -> bool;
}

/// Probe backed by the real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFilesystem;

impl PathProbe for LocalFilesystem {
    fn exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }
}

/// Probe answering from a fixed set of paths.
#[derive(Clone, Debug, Default)]
pub struct KnownPaths(pub HashSet<String>);

impl PathProbe for KnownPaths {
    fn exists(&self, path: &str) -> bool {
        self.0.contains(path)
    }
}

/// What: Install state of one version relative to the installed list.
///
/// Inputs:
/// - `version`: Version key (`""` for unique results).
/// - `installed`: Installed versions sorted ascending.
/// - `db`: Database providing the comparator.
///
/// Output:
/// - `Installed`, `Upgrade`, `Downgrade`, or `None` when nothing is installed.
#[must_use]
pub fn version_install_flag(
    version: &str,
    installed: &[String],
    db: &dyn PackageDatabase,
) -> InstallFlag {
    let Some(newest) = installed.last() else {
        return InstallFlag::None;
    };
    if version.is_empty() || installed.iter().any(|v| v == version) {
        InstallFlag::Installed
    } else if db.compare_versions(version, newest).is_gt() {
        InstallFlag::Upgrade
    } else {
        InstallFlag::Downgrade
    }
}

/// What: Annotate one package group.
///
/// Inputs:
/// - `cp`: Package key.
/// - `group`: Package to annotate in place.
/// - `db`: Optional local package database.
/// - `probe`: Filesystem probe.
///
/// Details:
/// - Each version is visited once; the package flag only ever moves up the
///   precedence order `none < downgrade < upgrade < installed`.
/// - Homepage/description come from the newest available version.
pub fn enrich_package(
    cp: &str,
    group: &mut PackageGroup,
    db: Option<&dyn PackageDatabase>,
    probe: &dyn PathProbe,
) {
    group.exists = false;
    group.installed_flag = InstallFlag::None;
    if let Some(db) = db {
        group.installed_versions = db.installed_versions(cp);
        group
            .installed_versions
            .sort_by(|a, b| db.compare_versions(a, b));
        group.available_versions = db.available_versions(cp);
        group
            .available_versions
            .sort_by(|a, b| db.compare_versions(a, b));
        if let Some(newest) = group.available_versions.last() {
            let meta = db.metadata(cp, newest);
            group.homepage = meta.homepage;
            group.description = meta.description;
        }
    }

    for (ver, version_group) in group.versions.iter_mut() {
        version_group.exists = false;
        for (path, path_group) in version_group.paths.iter_mut() {
            path_group.exists = probe.exists(path);
            version_group.exists |= path_group.exists;
        }
        group.exists |= version_group.exists;

        version_group.installed_flag = match db {
            Some(db) => version_install_flag(ver, &group.installed_versions, db),
            None => InstallFlag::None,
        };
        if version_group.installed_flag > group.installed_flag {
            group.installed_flag = version_group.installed_flag;
        }
    }
    group.enriched = true;
    tracing::debug!(
        cp = %cp,
        flag = group.installed_flag.key(),
        exists = group.exists,
        installed = group.installed_versions.len(),
        available = group.available_versions.len(),
        "package enriched"
    );
}

/// What: Annotate every package in the result set.
pub fn enrich(results: &mut ResultSet, db: Option<&dyn PackageDatabase>, probe: &dyn PathProbe) {
    for (cp, group) in results.iter_mut() {
        enrich_package(cp, group, db, probe);
    }
}
