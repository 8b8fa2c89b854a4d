//! Positional query resolution.

use tracing::warn;

use crate::error::EfileError;
use crate::portage::PortageTree;
use crate::portage::version::split_cpv;
use crate::sources::{Mode, Query};

/// What: Split `cat/pkg`, expanding a bare `pkg` through the local tree.
///
/// # Errors
/// - `EfileError::Query` when a bare name cannot be expanded (no tree, no
///   match, or several matches).
fn process_cp(arg: &str, tree: Option<&PortageTree>) -> Result<(String, String), EfileError> {
    let cp = if arg.contains('/') {
        arg.to_string()
    } else {
        let tree = tree.ok_or_else(|| {
            EfileError::Query(format!(
                "cannot expand package name '{arg}' without a local Portage tree; use category/package"
            ))
        })?;
        tree.expand_package(arg)?
    };
    match cp.split_once('/') {
        Some((c, p)) if !c.is_empty() && !p.is_empty() => Ok((c.to_string(), p.to_string())),
        _ => Err(EfileError::Query(format!("'{cp}' is not a category/package name"))),
    }
}

/// What: Split `[cat/]pkg-ver` into category, package and version.
fn process_cpv(
    arg: &str,
    tree: Option<&PortageTree>,
) -> Result<(String, String, String), EfileError> {
    let (cp, ver) = split_cpv(arg).ok_or_else(|| {
        EfileError::Query(format!("cannot split '{arg}' into package and version"))
    })?;
    let (c, p) = process_cp(cp, tree)?;
    Ok((c, p, ver.to_string()))
}

fn too_many(mode: Mode, given: usize, used: usize) {
    warn!(mode = %mode, given, used, "too many query arguments; extras ignored");
}

/// What: Turn positional arguments into a query for `mode`.
///
/// Inputs:
/// - `mode`: Selected query mode.
/// - `args`: Positional arguments (at least one).
/// - `tree`: Local Portage tree, used to expand bare package names.
///
/// Output:
/// - The resolved query.
///
/// # Errors
/// - `EfileError::Query` for empty input, unsplittable CPVs or package
///   names that cannot be expanded.
///
/// Details:
/// - `uniq`/`allver` use the first argument as the filename.
/// - `cptov` accepts `cat/pkg`, `pkg` or `cat pkg`.
/// - `cpvtof` accepts `[cat/]pkg-ver`, `[cat/]pkg ver` or `cat pkg ver`.
pub fn resolve_query(
    mode: Mode,
    args: &[String],
    tree: Option<&PortageTree>,
) -> Result<Query, EfileError> {
    let Some(first) = args.first() else {
        return Err(EfileError::Query("no query given".to_string()));
    };
    let query = match mode {
        Mode::Uniq | Mode::AllVer => {
            if args.len() > 1 {
                too_many(mode, args.len(), 1);
            }
            Query::File {
                filename: first.clone(),
            }
        }
        Mode::CpToV => {
            if args.len() > 2 {
                too_many(mode, args.len(), 2);
            }
            let (category, package) = match args {
                [c, p, ..] => (c.clone(), p.clone()),
                _ => process_cp(first, tree)?,
            };
            Query::Package { category, package }
        }
        Mode::CpvToF => {
            if args.len() > 3 {
                too_many(mode, args.len(), 3);
            }
            let (category, package, version) = match args {
                [c, p, v, ..] => (c.clone(), p.clone(), v.clone()),
                [cp, v] => {
                    let (c, p) = process_cp(cp, tree)?;
                    (c, p, v.clone())
                }
                _ => process_cpv(first, tree)?,
            };
            Query::PackageVersion {
                category,
                package,
                version,
            }
        }
    };
    tracing::debug!(?query, "query resolved");
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    fn tree() -> (tempfile::TempDir, PortageTree) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let repo = tmp.path().join("repo");
        std::fs::create_dir_all(repo.join("dev-lang").join("python")).expect("mkdir");
        std::fs::create_dir_all(repo.join("dev-python").join("six")).expect("mkdir");
        std::fs::create_dir_all(repo.join("sys-apps").join("six")).expect("mkdir");
        let vdb = tmp.path().join("vdb");
        let t = PortageTree::new(repo, vdb);
        (tmp, t)
    }

    #[test]
    /// What: Every accepted `cpvtof` form resolves to the same triple.
    fn cpvtof_forms() {
        let (_tmp, t) = tree();
        let expected = Query::PackageVersion {
            category: "dev-lang".into(),
            package: "python".into(),
            version: "3.12.1-r1".into(),
        };
        for form in [
            vec!["dev-lang/python-3.12.1-r1"],
            vec!["python-3.12.1-r1"],
            vec!["dev-lang/python", "3.12.1-r1"],
            vec!["python", "3.12.1-r1"],
            vec!["dev-lang", "python", "3.12.1-r1"],
            vec!["dev-lang", "python", "3.12.1-r1", "extra"],
        ] {
            let q = resolve_query(Mode::CpvToF, &strings(&form), Some(&t)).expect("resolve");
            assert_eq!(q, expected, "{form:?}");
        }
    }

    #[test]
    /// What: `cptov` forms, including expansion through the tree.
    fn cptov_forms() {
        let (_tmp, t) = tree();
        let expected = Query::Package {
            category: "dev-lang".into(),
            package: "python".into(),
        };
        for form in [vec!["dev-lang/python"], vec!["python"], vec!["dev-lang", "python"]] {
            let q = resolve_query(Mode::CpToV, &strings(&form), Some(&t)).expect("resolve");
            assert_eq!(q, expected, "{form:?}");
        }
    }

    #[test]
    /// What: Expansion failures are fatal query errors.
    ///
    /// - Input: Ambiguous name, unknown name, bare name without a tree, unsplittable CPV
    /// - Output: `EfileError::Query` each time
    fn expansion_failures() {
        let (_tmp, t) = tree();
        for (mode, args, tree) in [
            (Mode::CpToV, vec!["six"], Some(&t)),
            (Mode::CpToV, vec!["nonexistent"], Some(&t)),
            (Mode::CpToV, vec!["python"], None),
            (Mode::CpvToF, vec!["dev-lang/python"], Some(&t)),
        ] {
            let err = resolve_query(mode, &strings(&args), tree).expect_err("fails");
            assert!(matches!(err, EfileError::Query(_)), "{args:?}");
        }
    }

    #[test]
    /// What: Filename modes take the first argument and ignore the rest.
    fn filename_modes() {
        let q = resolve_query(Mode::AllVer, &strings(&["libz.so", "extra"]), None).expect("resolve");
        assert_eq!(
            q,
            Query::File {
                filename: "libz.so".into()
            }
        );
        assert!(resolve_query(Mode::Uniq, &[], None).is_err());
    }
}
