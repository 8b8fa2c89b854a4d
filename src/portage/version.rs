//! Gentoo package version grammar: validation, ordering and CPV splitting.
//!
//! Versions follow the PMS syntax
//! `\d+(\.\d+)*[a-z]?((_alpha|_beta|_pre|_rc|_p)\d*)*(-r\d+)?`.

use std::cmp::Ordering;

/// Version suffix kinds in ascending order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Suffix {
    Alpha,
    Beta,
    Pre,
    Rc,
    P,
}

impl Suffix {
    /// What: Strip a known suffix keyword from the front of `s`.
    ///
    /// Output:
    /// - The suffix kind and the remaining text, or `None` when no keyword matches.
    ///
    /// Details:
    /// - `pre` and `p` share a prefix, so longer keywords are tried first.
    fn strip(s: &str) -> Option<(Self, &str)> {
        const KEYWORDS: [(&str, Suffix); 5] = [
            ("alpha", Suffix::Alpha),
            ("beta", Suffix::Beta),
            ("pre", Suffix::Pre),
            ("rc", Suffix::Rc),
            ("p", Suffix::P),
        ];
        KEYWORDS
            .iter()
            .find_map(|(kw, kind)| s.strip_prefix(kw).map(|rest| (*kind, rest)))
    }
}

/// Parsed components of a valid version string.
#[derive(Debug)]
struct Parsed<'a> {
    numbers: Vec<&'a str>,
    letter: Option<char>,
    suffixes: Vec<(Suffix, &'a str)>,
    revision: &'a str,
}

/// What: Split `s` at the end of its leading ASCII digit run.
fn take_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// What: Parse a version string into comparable components.
///
/// Inputs:
/// - `ver`: Candidate version string.
///
/// Output:
/// - `Some(Parsed)` when `ver` is a complete, valid PMS version; `None` otherwise.
fn parse(ver: &str) -> Option<Parsed<'_>> {
    let (first, mut rest) = take_digits(ver);
    if first.is_empty() {
        return None;
    }
    let mut numbers = vec![first];
    while let Some(after_dot) = rest.strip_prefix('.') {
        let (num, tail) = take_digits(after_dot);
        if num.is_empty() {
            return None;
        }
        numbers.push(num);
        rest = tail;
    }

    let mut letter = None;
    if let Some(c) = rest.chars().next()
        && c.is_ascii_lowercase()
    {
        letter = Some(c);
        rest = &rest[1..];
    }

    let mut suffixes = Vec::new();
    while let Some(after_us) = rest.strip_prefix('_') {
        let (kind, tail) = Suffix::strip(after_us)?;
        let (num, tail) = take_digits(tail);
        suffixes.push((kind, num));
        rest = tail;
    }

    let mut revision = "";
    if let Some(after_r) = rest.strip_prefix("-r") {
        let (num, tail) = take_digits(after_r);
        if num.is_empty() {
            return None;
        }
        revision = num;
        rest = tail;
    }

    rest.is_empty().then_some(Parsed {
        numbers,
        letter,
        suffixes,
        revision,
    })
}

/// What: Compare two digit strings as unbounded non-negative integers.
///
/// Details:
/// - Empty strings count as zero; leading zeros are ignored.
fn cmp_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// What: Check whether a string is a valid Gentoo version.
///
/// Inputs:
/// - `ver`: Version string (no category/package prefix).
///
/// Output:
/// - `true` when the string matches the PMS version grammar.
#[must_use]
pub fn is_valid(ver: &str) -> bool {
    parse(ver).is_some()
}

/// What: Three-way comparison of two Gentoo version strings.
///
/// Inputs:
/// - `a`, `b`: Version strings.
///
/// Output:
/// - `Ordering` of `a` relative to `b`.
///
/// Details:
/// - Implements the PMS algorithm: numeric components (leading-zero aware),
///   letter, suffix chain, then revision.
/// - If either side is not a valid version both are compared as plain strings,
///   which keeps the ordering total for broken upstream data.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    let (Some(pa), Some(pb)) = (parse(a), parse(b)) else {
        return a.cmp(b);
    };

    let mut ord = cmp_numeric(pa.numbers[0], pb.numbers[0]);
    if ord != Ordering::Equal {
        return ord;
    }
    for (na, nb) in pa.numbers.iter().zip(&pb.numbers).skip(1) {
        ord = if na.starts_with('0') || nb.starts_with('0') {
            na.trim_end_matches('0').cmp(nb.trim_end_matches('0'))
        } else {
            cmp_numeric(na, nb)
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    ord = pa.numbers.len().cmp(&pb.numbers.len());
    if ord != Ordering::Equal {
        return ord;
    }

    ord = pa.letter.cmp(&pb.letter);
    if ord != Ordering::Equal {
        return ord;
    }

    for ((ka, na), (kb, nb)) in pa.suffixes.iter().zip(&pb.suffixes) {
        ord = ka.cmp(kb).then_with(|| cmp_numeric(na, nb));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    let common = pa.suffixes.len().min(pb.suffixes.len());
    if let Some((kind, _)) = pa.suffixes.get(common) {
        return if *kind == Suffix::P {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if let Some((kind, _)) = pb.suffixes.get(common) {
        return if *kind == Suffix::P {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    cmp_numeric(pa.revision, pb.revision)
}

/// What: Split a `category/package-version` string into its CP and version.
///
/// Inputs:
/// - `cpv`: Full CPV, e.g. `dev-lang/python-3.12.1-r1`. The category part is optional.
///
/// Output:
/// - `Some((cp, version))` at the first hyphen whose remainder is a valid version.
///
/// Details:
/// - Package names may themselves contain hyphens (`foo-bar-1.0`), so every
///   hyphen after the category separator is tried left to right.
#[must_use]
pub fn split_cpv(cpv: &str) -> Option<(&str, &str)> {
    let name_start = cpv.find('/').map_or(0, |i| i + 1);
    cpv[name_start..]
        .match_indices('-')
        .map(|(i, _)| name_start + i)
        .filter(|&i| i > name_start)
        .find(|&i| is_valid(&cpv[i + 1..]))
        .map(|i| (&cpv[..i], &cpv[i + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Accept well-formed versions and reject broken ones.
    ///
    /// - Input: Mix of PMS-valid and invalid strings
    /// - Output: `is_valid` agrees with the grammar
    fn validates_pms_versions() {
        for ok in ["1", "1.0", "2.0.1b", "1.0_rc2", "1.0_pre_p3", "4.3-r12", "2024.01.02"] {
            assert!(is_valid(ok), "{ok} should be valid");
        }
        for bad in ["", "1.", ".1", "1.0-", "1.0-r", "1.0_foo", "v1.0", "1.0AB", "1..2"] {
            assert!(!is_valid(bad), "{bad} should be invalid");
        }
    }

    #[test]
    /// What: Numeric components compare as integers, not strings.
    ///
    /// - Input: `["2.0", "1.0", "1.5", "1.10"]`
    /// - Output: Sorted `["1.0", "1.5", "1.10", "2.0"]`
    fn numeric_components_order() {
        let mut v = vec!["2.0", "1.0", "1.5", "1.10"];
        v.sort_by(|a, b| compare(a, b));
        assert_eq!(v, ["1.0", "1.5", "1.10", "2.0"]);
    }

    #[test]
    /// What: Suffix, letter and revision rules follow PMS.
    ///
    /// - Input: Pairs of versions
    /// - Output: Expected orderings
    fn suffix_letter_revision_rules() {
        assert_eq!(compare("1.0_alpha", "1.0_beta"), Ordering::Less);
        assert_eq!(compare("1.0_rc1", "1.0"), Ordering::Less);
        assert_eq!(compare("1.0_p1", "1.0"), Ordering::Greater);
        assert_eq!(compare("1.0a", "1.0"), Ordering::Greater);
        assert_eq!(compare("1.0-r1", "1.0"), Ordering::Greater);
        assert_eq!(compare("1.0-r2", "1.0-r10"), Ordering::Less);
        assert_eq!(compare("1.01", "1.1"), Ordering::Less);
        assert_eq!(compare("1.0", "1.0.0"), Ordering::Less);
        assert_eq!(compare("1.0", "1.00"), Ordering::Equal);
    }

    #[test]
    /// What: Invalid strings fall back to lexical ordering.
    fn invalid_versions_compare_lexically() {
        assert_eq!(compare("abc", "abd"), Ordering::Less);
        assert_eq!(compare("zzz", "1.0"), "zzz".cmp("1.0"));
    }

    #[test]
    /// What: CPV splitting handles hyphenated names and revisions.
    fn split_cpv_handles_hyphens() {
        assert_eq!(
            split_cpv("dev-lang/python-3.12.1-r1"),
            Some(("dev-lang/python", "3.12.1-r1"))
        );
        assert_eq!(
            split_cpv("x11-libs/gtk-doc-am-1.33"),
            Some(("x11-libs/gtk-doc-am", "1.33"))
        );
        assert_eq!(split_cpv("foo-2"), Some(("foo", "2")));
        assert_eq!(split_cpv("dev-lang/python"), None);
    }
}
