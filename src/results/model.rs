//! Three-level result hierarchy: package → version → path.

use std::collections::HashMap;
use std::fmt;

/// What: Insertion-ordered collection of keyed groups.
///
/// Inputs:
/// - Filled by the hierarchy builder, one entry per distinct key.
///
/// Output:
/// - Iterates in insertion order until [`Groups::sort_by_key_with`] reorders it,
///   after which iteration follows the sorted order.
///
/// Details:
/// - Entries live in a `Vec<(key, group)>`; `index` maps keys to positions
///   and is rebuilt whenever the vector is reordered or pruned.
#[derive(Clone, Debug)]
pub struct Groups<G> {
    /// Ordered `(key, group)` pairs.
    entries: Vec<(String, G)>,
    /// Key to position in `entries`.
    index: HashMap<String, usize>,
}

impl<G> Default for Groups<G> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<G> Groups<G> {
    /// What: Return the group for `key`, creating it with `make` on first sight.
    ///
    /// Output:
    /// - Mutable reference to the group and whether it was just created.
    pub fn entry_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> G) -> (&mut G, bool) {
        let (pos, created) = match self.index.get(key) {
            Some(&pos) => (pos, false),
            None => {
                self.entries.push((key.to_string(), make()));
                let pos = self.entries.len() - 1;
                self.index.insert(key.to_string(), pos);
                (pos, true)
            }
        };
        (&mut self.entries[pos].1, created)
    }

    /// Group stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&G> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in current order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(key, group)` pairs in current order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &G)> {
        self.entries.iter().map(|(k, g)| (k.as_str(), g))
    }

    /// Mutable `(key, group)` pairs in current order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut G)> {
        self.entries.iter_mut().map(|(k, g)| (k.as_str(), g))
    }

    /// Groups in current order.
    pub fn values(&self) -> impl Iterator<Item = &G> {
        self.entries.iter().map(|(_, g)| g)
    }

    /// What: Drop every group for which `keep` returns `false`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &G) -> bool) {
        self.entries.retain(|(k, g)| keep(k, g));
        self.reindex();
    }

    /// What: Stable sort of the entries by key.
    ///
    /// Inputs:
    /// - `cmp`: Three-way comparison of two keys.
    ///
    /// Details:
    /// - Equal keys keep their previous relative order.
    pub fn sort_by_key_with(&mut self, mut cmp: impl FnMut(&str, &str) -> std::cmp::Ordering) {
        self.entries.sort_by(|(a, _), (b, _)| cmp(a, b));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (k, _))| (k.clone(), i))
            .collect();
    }
}

/// Install state of a version relative to the installed versions of its package.
///
/// Variants are declared in precedence order so `Ord` matches the
/// package-level aggregation rule `installed > upgrade > downgrade > none`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InstallFlag {
    /// Nothing of this package is installed (or no local metadata).
    #[default]
    None,
    /// Older than the newest installed version.
    Downgrade,
    /// Newer than the newest installed version.
    Upgrade,
    /// Exactly this version is installed.
    Installed,
}

impl InstallFlag {
    /// Name used in templates and for `sym_<name>` lookups.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Downgrade => "downgrade",
            Self::Upgrade => "upgrade",
            Self::Installed => "installed",
        }
    }
}

impl fmt::Display for InstallFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            other => f.write_str(other.key()),
        }
    }
}

/// Presentation fields of a path, filled by the display preprocessor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathDisplay {
    /// File types joined with the list separator.
    pub type_str: String,
    /// Architectures joined with the list separator.
    pub arch_str: String,
    /// USE flags joined with the list separator.
    pub use_str: String,
    /// `repr_true_exists` / `repr_false_exists`.
    pub exists_str: String,
    /// Path, highlighted when it exists locally.
    pub path_hl: String,
}

/// Presentation fields of a version, filled by the display preprocessor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VersionDisplay {
    /// Sorted union of the version's paths.
    pub path_all: Vec<String>,
    /// Sorted subset of `path_all` that exists locally.
    pub path_all_exists: Vec<String>,
    /// `path_all` joined.
    pub path_all_str: String,
    /// `path_all` joined, existing paths highlighted.
    pub path_all_str_hl: String,
    /// Version string highlighted by install state.
    pub ver_hl: String,
    /// CPV highlighted by install state.
    pub cpv_hl: String,
    /// `repr_true_exists` / `repr_false_exists`.
    pub exists_str: String,
    /// `sym_<installed_flag>`.
    pub symbol: String,
}

/// Presentation fields of a package, filled by the display preprocessor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackageDisplay {
    /// Sorted union of all paths across versions.
    pub path_all: Vec<String>,
    /// Sorted union of all existing paths across versions.
    pub path_all_exists: Vec<String>,
    /// `path_all` joined.
    pub path_all_str: String,
    /// `path_all` joined, existing paths highlighted.
    pub path_all_str_hl: String,
    /// All matched versions, sorted with the version comparator.
    pub ver_all: Vec<String>,
    /// `ver_all` joined or `repr_empty_ver_all`.
    pub ver_all_str: String,
    /// `ver_all` joined with installed/available highlights.
    pub ver_all_str_hl: String,
    /// Available versions joined.
    pub ver_available_str: String,
    /// Available versions with installed/matched highlights.
    pub ver_available_str_hl: String,
    /// Installed versions joined.
    pub ver_installed_str: String,
    /// Installed versions, all highlighted.
    pub ver_installed_str_hl: String,
    /// `repr_true_exists` / `repr_false_exists`.
    pub exists_str: String,
    /// `sym_<installed_flag>`.
    pub symbol: String,
}

/// A file path reported for one version.
#[derive(Clone, Debug, Default)]
pub struct PathGroup {
    /// File type tags.
    pub file_types: Vec<String>,
    /// Architecture tags.
    pub architectures: Vec<String>,
    /// USE flag tags.
    pub use_flags: Vec<String>,
    /// Whether the path exists on this machine (set by the enricher).
    pub exists: bool,
    /// Presentation fields (set by the display preprocessor).
    pub display: Option<PathDisplay>,
}

/// One version of a package, keyed by version string (`""` for unique results).
#[derive(Clone, Debug, Default)]
pub struct VersionGroup {
    /// `category/package-version`.
    pub cpv: String,
    /// Link to the version's PFL file listing.
    pub link: String,
    /// Paths reported for this version.
    pub paths: Groups<PathGroup>,
    /// Whether any path exists locally.
    pub exists: bool,
    /// Install state relative to the package's installed versions.
    pub installed_flag: InstallFlag,
    /// Presentation fields.
    pub display: Option<VersionDisplay>,
}

/// A package, keyed by `category/package`.
#[derive(Clone, Debug, Default)]
pub struct PackageGroup {
    /// Category.
    pub category: String,
    /// Package name.
    pub package: String,
    /// Link to the package's PFL listing.
    pub link: String,
    /// Versions in first-seen (later: sorted) order.
    pub versions: Groups<VersionGroup>,
    /// Whether the enricher has run for this package.
    pub enriched: bool,
    /// Whether any version has an existing path.
    pub exists: bool,
    /// Aggregated install state.
    pub installed_flag: InstallFlag,
    /// Installed versions, sorted.
    pub installed_versions: Vec<String>,
    /// Available versions, sorted.
    pub available_versions: Vec<String>,
    /// Homepage of the newest available version.
    pub homepage: String,
    /// Description of the newest available version.
    pub description: String,
    /// Presentation fields.
    pub display: Option<PackageDisplay>,
}

/// The whole result: packages keyed by `category/package`.
pub type ResultSet = Groups<PackageGroup>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Entries are created once and keep insertion order.
    fn groups_dedupe_and_keep_order() {
        let mut g: Groups<u32> = Groups::default();
        assert!(g.entry_or_insert_with("b", || 1).1);
        assert!(g.entry_or_insert_with("a", || 2).1);
        let (v, created) = g.entry_or_insert_with("b", || 99);
        assert!(!created);
        *v += 10;
        assert_eq!(g.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(g.get("b"), Some(&11));
    }

    #[test]
    /// What: Sorting and retaining keep lookups consistent.
    fn groups_reindex_after_sort_and_retain() {
        let mut g: Groups<u32> = Groups::default();
        for (k, v) in [("c", 3), ("a", 1), ("b", 2)] {
            g.entry_or_insert_with(k, || v);
        }
        g.sort_by_key_with(|a, b| a.cmp(b));
        assert_eq!(g.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
        g.retain(|k, _| k != "b");
        assert_eq!(g.get("c"), Some(&3));
        assert_eq!(g.len(), 2);
    }

    #[test]
    /// What: Flag ordering encodes aggregation precedence.
    fn install_flag_precedence() {
        assert!(InstallFlag::Installed > InstallFlag::Upgrade);
        assert!(InstallFlag::Upgrade > InstallFlag::Downgrade);
        assert!(InstallFlag::Downgrade > InstallFlag::None);
        assert_eq!(InstallFlag::None.to_string(), "");
    }
}
