//! Typed template context.

use std::borrow::Cow;
use std::collections::BTreeMap;

/// A value a template field can resolve to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// Plain text, inserted as-is.
    Text(String),
    /// Boolean, rendered as `true`/`false`.
    Flag(bool),
    /// List of strings, rendered joined with the context's list separator.
    List(Vec<String>),
}

impl Value {
    /// What: Truthiness used by `_if_<field>` / `_if_not_<field>` guards.
    ///
    /// Details:
    /// - Empty text, `false` and empty lists are falsy; everything else is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Flag(b) => *b,
            Self::List(items) => !items.is_empty(),
        }
    }

    /// What: Text inserted when the value is substituted into a template.
    #[must_use]
    pub fn render<'a>(&'a self, sep: &str) -> Cow<'a, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Flag(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Self::List(items) => Cow::Owned(items.join(sep)),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<&[String]> for Value {
    fn from(items: &[String]) -> Self {
        Self::List(items.to_vec())
    }
}

/// What: Ordered map from field name to value, built per template layer.
///
/// Details:
/// - Later inserts overwrite earlier ones, so the layering order of the
///   renderer decides which field wins on a name clash.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Context {
    fields: BTreeMap<String, Value>,
    list_sep: String,
}

impl Context {
    /// Empty context rendering lists with `list_sep`.
    #[must_use]
    pub fn new(list_sep: &str) -> Self {
        Self {
            fields: BTreeMap::new(),
            list_sep: list_sep.to_string(),
        }
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// What: Copy every field of `other` under `prefix`.
    pub fn insert_prefixed(&mut self, prefix: &str, other: &Self) {
        for (key, value) in &other.fields {
            self.fields.insert(format!("{prefix}{key}"), value.clone());
        }
    }

    /// What: Copy every field of `other`, overwriting clashes.
    pub fn extend_from(&mut self, other: &Self) {
        for (key, value) in &other.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Value of `key`, if defined.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Separator used when rendering list values.
    #[must_use]
    pub fn list_sep(&self) -> &str {
        &self.list_sep
    }

    /// Defined field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}
