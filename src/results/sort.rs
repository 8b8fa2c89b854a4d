//! Deterministic ordering of every hierarchy level.

use super::model::ResultSet;
use crate::portage::VersionComparator;

/// What: Sort packages, versions and paths in place.
///
/// Inputs:
/// - `results`: Result set in insertion order.
/// - `comparator`: Strategy for version keys.
///
/// Details:
/// - Package and path keys use plain string order; version keys use the
///   comparator. All sorts are stable, so ties keep first-seen order.
pub fn sort_results(results: &mut ResultSet, comparator: VersionComparator) {
    for (_, package) in results.iter_mut() {
        for (_, version) in package.versions.iter_mut() {
            version.paths.sort_by_key_with(|a, b| a.cmp(b));
        }
        package
            .versions
            .sort_by_key_with(|a, b| comparator.compare(a, b));
    }
    results.sort_by_key_with(|a, b| a.cmp(b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::build::build_hierarchy;
    use crate::sources::Record;

    #[test]
    /// What: All three levels end up ordered.
    ///
    /// - Input: Versions `2.0`, `1.0`, `1.5`; packages and paths out of order
    /// - Output: Versions `1.0, 1.5, 2.0`; packages and paths lexical
    fn sorts_every_level() {
        let records = vec![
            Record::new("z", "pkg", "2.0", "/b"),
            Record::new("z", "pkg", "1.0", "/c"),
            Record::new("z", "pkg", "1.0", "/a"),
            Record::new("z", "pkg", "1.5", "/a"),
            Record::new("a", "pkg", "1", "/x"),
        ];
        let mut set = build_hierarchy(records, VersionComparator::Ebuild);
        sort_results(&mut set, VersionComparator::Ebuild);
        assert_eq!(set.keys().collect::<Vec<_>>(), ["a/pkg", "z/pkg"]);
        let pkg = set.get("z/pkg").expect("pkg");
        assert_eq!(pkg.versions.keys().collect::<Vec<_>>(), ["1.0", "1.5", "2.0"]);
        let v1 = pkg.versions.get("1.0").expect("1.0");
        assert_eq!(v1.paths.keys().collect::<Vec<_>>(), ["/a", "/c"]);
    }

    #[test]
    /// What: Versions equal under the comparator keep first-seen order.
    ///
    /// - Input: `1.00` seen before `1.0` (equal under PMS rules)
    /// - Output: Order unchanged after sorting
    fn equal_versions_are_stable() {
        let records = vec![
            Record::new("a", "b", "1.00", "/x"),
            Record::new("a", "b", "1.0", "/y"),
            Record::new("a", "b", "0.9", "/z"),
        ];
        let mut set = build_hierarchy(records, VersionComparator::Ebuild);
        sort_results(&mut set, VersionComparator::Ebuild);
        let pkg = set.get("a/b").expect("pkg");
        assert_eq!(pkg.versions.keys().collect::<Vec<_>>(), ["0.9", "1.00", "1.0"]);
    }

    #[test]
    /// What: The lexical fallback orders by bytes.
    fn lexical_fallback_orders_bytes() {
        let records = ["1.9", "1.10"].map(|v| Record::new("a", "b", v, "/x"));
        let mut set = build_hierarchy(records, VersionComparator::Lexical);
        sort_results(&mut set, VersionComparator::Lexical);
        let keys: Vec<_> = set.get("a/b").expect("pkg").versions.keys().map(String::from).collect();
        assert_eq!(keys, ["1.10", "1.9"]);
    }
}
