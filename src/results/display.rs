//! Display preprocessor: derives the presentation fields templates consume.

use std::collections::BTreeSet;

use super::model::{
    InstallFlag, PackageDisplay, PackageGroup, PathDisplay, ResultSet, VersionDisplay,
    VersionGroup,
};
use crate::config::{EmptyRepr, FormatSet, Highlight};
use crate::portage::VersionComparator;

/// What: Join `items`, wrapping members of the first matching set.
///
/// Inputs:
/// - `items`: Values to join.
/// - `rules`: `(match set, highlight)` pairs checked in order.
fn join_highlighted(
    fmt: &FormatSet,
    items: &[String],
    rules: &[(&[String], Highlight)],
) -> String {
    items
        .iter()
        .map(|item| {
            rules
                .iter()
                .find(|(set, _)| set.contains(item))
                .map_or_else(|| item.clone(), |(_, style)| fmt.highlight(*style, item))
        })
        .collect::<Vec<_>>()
        .join(fmt.list_sep())
}

/// What: Highlight a version-derived string by the version's install state.
///
/// Details:
/// - Installed versions use the `installed` style, otherwise locally
///   available versions use `available`. The unversioned key renders as
///   `repr_empty_ver` when `text` is empty.
fn version_hl(
    fmt: &FormatSet,
    text: &str,
    ver: &str,
    pkg: &PackageGroup,
    vg: &VersionGroup,
) -> String {
    if ver.is_empty() {
        return fmt.or_empty(EmptyRepr::Ver, text.to_string());
    }
    if vg.installed_flag == InstallFlag::Installed {
        fmt.highlight(Highlight::Installed, text)
    } else if pkg.available_versions.iter().any(|v| v == ver) {
        fmt.highlight(Highlight::Available, text)
    } else {
        text.to_string()
    }
}

/// What: Fill the display fields of one version and its paths.
///
/// Output:
/// - The version's paths and existing paths, for the package-level union.
fn preprocess_version(
    fmt: &FormatSet,
    ver: &str,
    vg: &mut VersionGroup,
    pkg: &PackageGroup,
) -> (BTreeSet<String>, BTreeSet<String>) {
    let sep = fmt.list_sep();
    let mut all = BTreeSet::new();
    let mut existing = BTreeSet::new();
    for (path, pg) in vg.paths.iter_mut() {
        all.insert(path.to_string());
        if pg.exists {
            existing.insert(path.to_string());
        }
        pg.display = Some(PathDisplay {
            type_str: pg.file_types.join(sep),
            arch_str: pg.architectures.join(sep),
            use_str: pg.use_flags.join(sep),
            exists_str: fmt.exists_repr(pg.exists).to_string(),
            path_hl: if pg.exists {
                fmt.highlight(Highlight::Exists, path)
            } else {
                path.to_string()
            },
        });
    }

    let path_all: Vec<String> = all.iter().cloned().collect();
    let path_all_exists: Vec<String> = existing.iter().cloned().collect();
    vg.display = Some(VersionDisplay {
        path_all_str: path_all.join(sep),
        path_all_str_hl: join_highlighted(
            fmt,
            &path_all,
            &[(path_all_exists.as_slice(), Highlight::Exists)],
        ),
        ver_hl: version_hl(fmt, ver, ver, pkg, vg),
        cpv_hl: version_hl(fmt, &vg.cpv, ver, pkg, vg),
        exists_str: fmt.exists_repr(vg.exists).to_string(),
        symbol: fmt.symbol(vg.installed_flag).to_string(),
        path_all,
        path_all_exists,
    });
    (all, existing)
}

/// What: Fill the display fields of one package and everything below it.
///
/// Inputs:
/// - `fmt`: Active format set (separators, highlights, placeholders).
/// - `pkg`: Enriched package group.
/// - `comparator`: Orders the matched-version list.
///
/// Details:
/// - Path sets are unioned per version, then again across versions; all
///   aggregates are deduplicated and stored sorted.
/// - Only display fields are written; earlier stage fields stay untouched.
pub fn preprocess_package(
    fmt: &FormatSet,
    pkg: &mut PackageGroup,
    comparator: VersionComparator,
) {
    let sep = fmt.list_sep();
    let mut versions = std::mem::take(&mut pkg.versions);
    let mut all = BTreeSet::new();
    let mut existing = BTreeSet::new();
    let mut ver_all: Vec<String> = Vec::new();
    for (ver, vg) in versions.iter_mut() {
        let (paths, found) = preprocess_version(fmt, ver, vg, pkg);
        all.extend(paths);
        existing.extend(found);
        if !ver_all.iter().any(|v| v == ver) {
            ver_all.push(ver.to_string());
        }
    }
    pkg.versions = versions;
    comparator.sort(&mut ver_all);

    let path_all: Vec<String> = all.into_iter().collect();
    let path_all_exists: Vec<String> = existing.into_iter().collect();
    let installed = pkg.installed_versions.as_slice();
    let available = pkg.available_versions.as_slice();
    pkg.display = Some(PackageDisplay {
        path_all_str: path_all.join(sep),
        path_all_str_hl: join_highlighted(
            fmt,
            &path_all,
            &[(path_all_exists.as_slice(), Highlight::Exists)],
        ),
        ver_all_str: fmt.or_empty(EmptyRepr::VerAll, ver_all.join(sep)),
        ver_all_str_hl: fmt.or_empty(
            EmptyRepr::VerAll,
            join_highlighted(
                fmt,
                &ver_all,
                &[(installed, Highlight::Installed), (available, Highlight::Available)],
            ),
        ),
        ver_available_str: available.join(sep),
        ver_available_str_hl: fmt.or_empty(
            EmptyRepr::VerAvailable,
            join_highlighted(
                fmt,
                available,
                &[(installed, Highlight::Installed), (ver_all.as_slice(), Highlight::Matched)],
            ),
        ),
        ver_installed_str: installed.join(sep),
        ver_installed_str_hl: fmt.or_empty(
            EmptyRepr::VerInstalled,
            join_highlighted(fmt, installed, &[(installed, Highlight::Installed)]),
        ),
        exists_str: fmt.exists_repr(pkg.exists).to_string(),
        symbol: fmt.symbol(pkg.installed_flag).to_string(),
        path_all,
        path_all_exists,
        ver_all,
    });
}

/// What: Run the preprocessor over every package.
pub fn preprocess(results: &mut ResultSet, fmt: &FormatSet, comparator: VersionComparator) {
    for (_, pkg) in results.iter_mut() {
        preprocess_package(fmt, pkg, comparator);
    }
}
