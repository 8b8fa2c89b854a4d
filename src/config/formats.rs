//! Resolved, validated format set.

use std::collections::BTreeMap;

use super::presets::{self, BASE};
use crate::render::{Template, TemplateError};
use crate::results::InstallFlag;

/// One of the three template layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Package level (`lvcp`).
    Package,
    /// Version level (`lvver`).
    Version,
    /// Path level (`lvpath`).
    Path,
}

impl Layer {
    /// All layers, outermost first.
    pub const ALL: [Self; 3] = [Self::Package, Self::Version, Self::Path];

    /// Format-set key of the layer template.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Package => "lvcp",
            Self::Version => "lvver",
            Self::Path => "lvpath",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Package => 0,
            Self::Version => 1,
            Self::Path => 2,
        }
    }

    fn sub_prefix(self) -> String {
        format!("{}_sub_", self.key())
    }
}

/// Condition attached to a sub-fragment through its name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Guard {
    /// `_if_<field>`: render only when the field is truthy.
    If(String),
    /// `_if_not_<field>`: render only when the field is falsy.
    IfNot(String),
}

impl Guard {
    /// What: Extract the guard from a fragment key.
    ///
    /// Details:
    /// - `_if_not_` is looked for first, so `x_if_not_y` guards on `y`
    ///   negated rather than on `not_y`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        if let Some(pos) = key.find("_if_not_") {
            return Some(Self::IfNot(key[pos + "_if_not_".len()..].to_string()));
        }
        key.find("_if_")
            .map(|pos| Self::If(key[pos + "_if_".len()..].to_string()))
    }

    /// Field the guard inspects.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::If(f) | Self::IfNot(f) => f,
        }
    }
}

/// A named sub-fragment of a layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    /// Full key, e.g. `lvcp_sub_aux_if_ver_available`; also its context field name.
    pub key: String,
    /// Optional render condition.
    pub guard: Option<Guard>,
    /// Parsed fragment template.
    pub template: Template,
}

/// Highlight styles, each a `prefix_<name>` / `suffix_<name>` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Highlight {
    /// Installed versions.
    Installed,
    /// Locally available versions.
    Available,
    /// Versions matched by the query.
    Matched,
    /// Paths present on disk.
    Exists,
}

impl Highlight {
    const fn key(self) -> &'static str {
        match self {
            Self::Installed => "installed",
            Self::Available => "available",
            Self::Matched => "matched",
            Self::Exists => "exists",
        }
    }
}

/// Placeholders substituted for empty values (`repr_empty_<name>`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyRepr {
    /// Empty installed-version list.
    VerInstalled,
    /// Empty available-version list.
    VerAvailable,
    /// Empty matched-version list.
    VerAll,
    /// The unversioned (`""`) version key.
    Ver,
}

impl EmptyRepr {
    const fn key(self) -> &'static str {
        match self {
            Self::VerInstalled => "repr_empty_ver_installed",
            Self::VerAvailable => "repr_empty_ver_available",
            Self::VerAll => "repr_empty_ver_all",
            Self::Ver => "repr_empty_ver",
        }
    }
}

/// What: Whether `key` is a format-set key this program understands.
///
/// Details:
/// - Known keys are the base keys, `sep_<anything>` and layer sub-fragments.
#[must_use]
pub fn is_known_key(key: &str) -> bool {
    BASE.iter().any(|(k, _)| *k == key)
        || key.starts_with("sep_")
        || Layer::ALL
            .iter()
            .any(|l| key.starts_with(&l.sub_prefix()) && key.len() > l.sub_prefix().len())
}

/// What: Immutable set of templates and presentation strings.
///
/// Details:
/// - Built once from merged key/value pairs; every template is parsed at
///   construction so syntax errors surface before any request is sent.
/// - Lookups of keys absent from the set yield `""`.
#[derive(Clone, Debug)]
pub struct FormatSet {
    name: String,
    values: BTreeMap<String, String>,
    layers: [Template; 3],
    fragments: [Vec<Fragment>; 3],
}

impl FormatSet {
    /// What: Build a format set from raw key/value pairs.
    ///
    /// Inputs:
    /// - `name`: Set name for diagnostics.
    /// - `values`: Fully merged pairs (base already applied).
    ///
    /// Output:
    /// - The validated set.
    ///
    /// # Errors
    /// - The first template syntax error, as `TemplateError::Malformed`.
    pub fn new(name: &str, values: BTreeMap<String, String>) -> Result<Self, TemplateError> {
        let layer = |l: Layer| {
            Template::parse(l.key(), values.get(l.key()).map_or("", String::as_str))
        };
        let layers = [layer(Layer::Package)?, layer(Layer::Version)?, layer(Layer::Path)?];

        let mut fragments: [Vec<Fragment>; 3] = Default::default();
        for l in Layer::ALL {
            let prefix = l.sub_prefix();
            for (key, source) in values.range(prefix.clone()..) {
                if !key.starts_with(&prefix) {
                    break;
                }
                fragments[l.index()].push(Fragment {
                    key: key.clone(),
                    guard: Guard::from_key(key),
                    template: Template::parse(key, source)?,
                });
            }
        }
        tracing::debug!(
            set = %name,
            keys = values.len(),
            fragments = fragments.iter().map(Vec::len).sum::<usize>(),
            "format set built"
        );
        Ok(Self {
            name: name.to_string(),
            values,
            layers,
            fragments,
        })
    }

    /// What: Build a set from the base plus one built-in preset.
    pub fn builtin(name: &str) -> Option<Result<Self, TemplateError>> {
        let preset = presets::preset(name)?;
        let values = BASE
            .iter()
            .chain(preset.iter())
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Some(Self::new(name, values))
    }

    /// Set name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw value of `key`, `""` when absent.
    #[must_use]
    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }

    /// Layer template.
    #[must_use]
    pub fn layer(&self, layer: Layer) -> &Template {
        &self.layers[layer.index()]
    }

    /// Sub-fragments of a layer in key order, which is also evaluation order:
    /// a fragment sees only the fragments sorting before it.
    #[must_use]
    pub fn fragments(&self, layer: Layer) -> &[Fragment] {
        &self.fragments[layer.index()]
    }

    /// `sep_<key>`: separator placed between accumulated renderings of `key`.
    #[must_use]
    pub fn separator(&self, key: &str) -> &str {
        self.values
            .get(&format!("sep_{key}"))
            .map_or("", String::as_str)
    }

    /// Separator joining list items.
    #[must_use]
    pub fn list_sep(&self) -> &str {
        self.value("sep")
    }

    /// What: Wrap `text` in a highlight's prefix and suffix.
    #[must_use]
    pub fn highlight(&self, style: Highlight, text: &str) -> String {
        format!(
            "{}{text}{}",
            self.value(&format!("prefix_{}", style.key())),
            self.value(&format!("suffix_{}", style.key()))
        )
    }

    /// `repr_true_exists` / `repr_false_exists`.
    #[must_use]
    pub fn exists_repr(&self, exists: bool) -> &str {
        self.value(if exists {
            "repr_true_exists"
        } else {
            "repr_false_exists"
        })
    }

    /// What: `text` itself, or the placeholder when it is empty.
    #[must_use]
    pub fn or_empty(&self, kind: EmptyRepr, text: String) -> String {
        if text.is_empty() {
            self.value(kind.key()).to_string()
        } else {
            text
        }
    }

    /// `sym_<flag>`.
    #[must_use]
    pub fn symbol(&self, flag: InstallFlag) -> &str {
        self.value(&format!("sym_{}", flag.key()))
    }

    /// Text printed when nothing matched.
    #[must_use]
    pub fn noresult(&self) -> &str {
        self.value("noresult")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Every built-in set parses.
    fn builtin_sets_parse() {
        for name in presets::preset_names() {
            let set = FormatSet::builtin(name).expect("known").expect("valid");
            assert_eq!(set.name(), name);
        }
        assert!(FormatSet::builtin("nope").is_none());
    }

    #[test]
    /// What: Sub-fragments are collected per layer with their guards.
    fn collects_fragments_and_guards() {
        let set = FormatSet::builtin("e_file_uniq").expect("known").expect("valid");
        let keys: Vec<_> = set.fragments(Layer::Package).iter().map(|f| f.key.as_str()).collect();
        assert_eq!(
            keys,
            ["lvcp_sub_aux_if_ver_available", "lvcp_sub_inst_if_ver_installed"]
        );
        assert_eq!(
            set.fragments(Layer::Package)[0].guard,
            Some(Guard::If("ver_available".into()))
        );
        assert!(set.fragments(Layer::Version).is_empty());
    }

    #[test]
    /// What: `_if_not_` wins over `_if_`.
    fn negated_guard_checked_first() {
        assert_eq!(Guard::from_key("x_if_not_exists"), Some(Guard::IfNot("exists".into())));
        assert_eq!(Guard::from_key("x_if_exists"), Some(Guard::If("exists".into())));
        assert_eq!(Guard::from_key("plain"), None);
    }

    #[test]
    /// What: Presentation helpers read the base strings.
    fn presentation_helpers() {
        let set = FormatSet::builtin("raw_uniq").expect("known").expect("valid");
        assert_eq!(set.symbol(InstallFlag::Installed), "[I]");
        assert_eq!(set.symbol(InstallFlag::None), " * ");
        assert_eq!(set.exists_repr(false), "Does not exist");
        assert_eq!(set.or_empty(EmptyRepr::VerInstalled, String::new()), "[ Not Installed ]");
        assert_eq!(set.highlight(Highlight::Available, "1.0"), "\x1b[0;44m1.0\x1b[0m");
        assert_eq!(set.separator("lvcp"), "");
        assert_eq!(set.separator("lvpath"), "");
        assert_eq!(set.list_sep(), ", ");
    }

    #[test]
    /// What: A malformed template fails the whole set.
    fn malformed_value_rejected() {
        let values = BTreeMap::from([("lvcp".to_string(), "{oops".to_string())]);
        assert!(matches!(
            FormatSet::new("custom", values),
            Err(TemplateError::Malformed { .. })
        ));
    }

    #[test]
    /// What: Key classification for override warnings.
    fn known_keys() {
        assert!(is_known_key("prefix_exists"));
        assert!(is_known_key("sep_lvcp_sub_x"));
        assert!(is_known_key("lvver_sub_note_if_exists"));
        assert!(!is_known_key("lvver_sub_"));
        assert!(!is_known_key("colour"));
    }
}
