//! Filesystem-backed package database reading the ebuild repository and the VDB.

use std::fs;
use std::path::{Path, PathBuf};

use super::version::split_cpv;
use super::{PackageDatabase, PackageMetadata};
use crate::error::EfileError;

/// Default location of the main ebuild repository.
pub const DEFAULT_REPO: &str = "/var/db/repos/gentoo";
/// Default location of the installed package database.
pub const DEFAULT_VDB: &str = "/var/db/pkg";

/// What: Package database backed by an ebuild repository and the installed-package database.
///
/// Inputs:
/// - `repo`: Repository root (`<repo>/<cat>/<pkg>/<pkg>-<ver>.ebuild`,
///   `<repo>/metadata/md5-cache/<cat>/<pkg>-<ver>`).
/// - `vdb`: Installed package database (`<vdb>/<cat>/<pkg>-<ver>/`).
///
/// Details:
/// - Every lookup is a directory listing; nothing is cached because each
///   package is looked up once per run.
#[derive(Clone, Debug)]
pub struct PortageTree {
    /// Ebuild repository root.
    repo: PathBuf,
    /// Installed package database root.
    vdb: PathBuf,
}

impl PortageTree {
    /// Create a tree over explicit paths without checking that they exist.
    #[must_use]
    pub fn new(repo: impl Into<PathBuf>, vdb: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            vdb: vdb.into(),
        }
    }

    /// What: Detect a usable Portage installation.
    ///
    /// Inputs:
    /// - `repo`, `vdb`: Candidate paths.
    ///
    /// Output:
    /// - `Some(PortageTree)` when the repository directory exists, `None` otherwise.
    #[must_use]
    pub fn detect(repo: &Path, vdb: &Path) -> Option<Self> {
        if repo.is_dir() {
            tracing::debug!(repo = %repo.display(), vdb = %vdb.display(), "portage tree detected");
            Some(Self::new(repo, vdb))
        } else {
            tracing::info!(repo = %repo.display(), "no portage tree found; local metadata disabled");
            None
        }
    }

    /// What: Expand a bare package name into `category/package`.
    ///
    /// Inputs:
    /// - `name`: Package name without category.
    ///
    /// Output:
    /// - `Ok(cp)` when exactly one category (repository or installed) contains `name`.
    ///
    /// # Errors
    /// - `EfileError::Query` when no category or several categories match.
    pub fn expand_package(&self, name: &str) -> Result<String, EfileError> {
        let mut matches: Vec<String> = Vec::new();
        for category in list_dir_names(&self.repo) {
            if self.repo.join(&category).join(name).is_dir() {
                matches.push(category);
            }
        }
        for category in list_dir_names(&self.vdb) {
            if matches.contains(&category) {
                continue;
            }
            let cp = format!("{category}/{name}");
            if !versions_in(&self.vdb.join(&category), &category, &cp, "").is_empty() {
                matches.push(category);
            }
        }
        matches.sort();
        match matches.as_slice() {
            [category] => Ok(format!("{category}/{name}")),
            [] => Err(EfileError::Query(format!(
                "failed to expand package name '{name}' to category/package"
            ))),
            several => Err(EfileError::Query(format!(
                "package name '{name}' is ambiguous, candidates: {}",
                several
                    .iter()
                    .map(|c| format!("{c}/{name}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

/// What: List the names of subdirectories of `dir`, skipping hidden entries.
///
/// Output:
/// - Sorted names; empty when `dir` cannot be read.
fn list_dir_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .flatten()
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|n| !n.starts_with('.'))
        .collect();
    names.sort();
    names
}

/// What: Collect versions of `cp` from entries named `<pkg>-<ver><ext>` inside `dir`.
///
/// Inputs:
/// - `dir`: Directory to list.
/// - `category`: Category prepended to each entry before CPV splitting.
/// - `cp`: Package the versions must belong to.
/// - `ext`: Required file extension (`""` for VDB directories).
///
/// Details:
/// - Splitting the full CPV and comparing the CP rejects look-alike names
///   (`foo-bar-1.0` is not a version of `foo`).
fn versions_in(dir: &Path, category: &str, cp: &str, ext: &str) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for entry in entries.flatten() {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let Some(stem) = name.strip_suffix(ext) else {
            continue;
        };
        let cpv = format!("{category}/{stem}");
        if let Some((found_cp, ver)) = split_cpv(&cpv)
            && found_cp == cp
        {
            out.push(ver.to_string());
        }
    }
    out
}

impl PackageDatabase for PortageTree {
    fn installed_versions(&self, cp: &str) -> Vec<String> {
        let Some((category, _)) = cp.split_once('/') else {
            return Vec::new();
        };
        versions_in(&self.vdb.join(category), category, cp, "")
    }

    fn available_versions(&self, cp: &str) -> Vec<String> {
        let Some((category, _)) = cp.split_once('/') else {
            return Vec::new();
        };
        versions_in(&self.repo.join(cp), category, cp, ".ebuild")
    }

    fn metadata(&self, cp: &str, version: &str) -> PackageMetadata {
        let path = self
            .repo
            .join("metadata")
            .join("md5-cache")
            .join(format!("{cp}-{version}"));
        let Ok(content) = fs::read_to_string(&path) else {
            tracing::debug!(path = %path.display(), "no metadata cache entry");
            return PackageMetadata::default();
        };
        let mut meta = PackageMetadata::default();
        for line in content.lines() {
            if let Some(v) = line.strip_prefix("HOMEPAGE=") {
                meta.homepage = v.trim().to_string();
            } else if let Some(v) = line.strip_prefix("DESCRIPTION=") {
                meta.description = v.trim().to_string();
            }
        }
        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// What: Build a miniature repository and VDB inside a temp dir.
    ///
    /// Output:
    /// - Temp dir guard plus a `PortageTree` pointing into it.
    fn fixture() -> (tempfile::TempDir, PortageTree) {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = dir.path().join("repo");
        let vdb = dir.path().join("vdb");
        for ebuild in [
            "dev-lang/foo/foo-1.0.ebuild",
            "dev-lang/foo/foo-2.0-r1.ebuild",
            "dev-lang/foo/metadata.xml",
            "dev-lang/foo-bar/foo-bar-3.0.ebuild",
            "app-misc/dup/dup-1.ebuild",
            "dev-util/dup/dup-1.ebuild",
        ] {
            let path = repo.join(ebuild);
            fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            fs::write(path, "").expect("write");
        }
        fs::create_dir_all(repo.join("metadata/md5-cache/dev-lang")).expect("mkdir");
        fs::write(
            repo.join("metadata/md5-cache/dev-lang/foo-2.0-r1"),
            "DEFINED_PHASES=install\nDESCRIPTION=A foo\nHOMEPAGE=https://foo.example\n",
        )
        .expect("write");
        fs::create_dir_all(vdb.join("dev-lang/foo-1.0")).expect("mkdir");
        fs::create_dir_all(vdb.join("dev-lang/foo-bar-3.0")).expect("mkdir");
        fs::create_dir_all(vdb.join("sys-apps/only-installed-5")).expect("mkdir");
        (dir, PortageTree::new(repo, vdb))
    }

    #[test]
    /// What: Installed and available lookups ignore look-alike package names.
    ///
    /// - Input: `dev-lang/foo` next to `dev-lang/foo-bar`
    /// - Output: Only versions of `foo` are returned
    fn lists_versions_for_exact_package() {
        let (_dir, tree) = fixture();
        assert_eq!(tree.installed_versions("dev-lang/foo"), ["1.0"]);
        let mut avail = tree.available_versions("dev-lang/foo");
        avail.sort();
        assert_eq!(avail, ["1.0", "2.0-r1"]);
        assert!(tree.available_versions("dev-lang/missing").is_empty());
    }

    #[test]
    /// What: Metadata comes from the md5-cache entry; missing entries are empty.
    fn reads_metadata_cache() {
        let (_dir, tree) = fixture();
        let meta = tree.metadata("dev-lang/foo", "2.0-r1");
        assert_eq!(meta.homepage, "https://foo.example");
        assert_eq!(meta.description, "A foo");
        assert_eq!(tree.metadata("dev-lang/foo", "1.0"), PackageMetadata::default());
    }

    #[test]
    /// What: Bare names expand when unique and fail when missing or ambiguous.
    fn expands_package_names() {
        let (_dir, tree) = fixture();
        assert_eq!(tree.expand_package("foo").expect("expand"), "dev-lang/foo");
        assert_eq!(
            tree.expand_package("only-installed").expect("expand"),
            "sys-apps/only-installed"
        );
        assert!(tree.expand_package("nothing").is_err());
        let err = tree.expand_package("dup").expect_err("ambiguous");
        assert!(err.to_string().contains("app-misc/dup"));
    }

    #[test]
    /// What: Detection requires an existing repository directory.
    fn detect_requires_repo() {
        let (dir, _) = fixture();
        assert!(PortageTree::detect(&dir.path().join("repo"), &dir.path().join("vdb")).is_some());
        assert!(PortageTree::detect(&dir.path().join("nope"), &dir.path().join("vdb")).is_none());
    }
}
