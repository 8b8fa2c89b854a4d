//! User-defined format sets from `formats.toml`.
//!
//! ```toml
//! [compact]
//! inherit = "e_file_uniq"
//! lvcp = "{symbol} {cp}\n"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::EfileError;

/// Key naming the built-in set a user set is layered over.
pub const INHERIT_KEY: &str = "inherit";

/// Format sets by name, each a table of string values.
pub type UserFormats = BTreeMap<String, BTreeMap<String, String>>;

/// What: Parse `formats.toml` content.
///
/// Output:
/// - Every table as a set.
///
/// # Errors
/// - `EfileError::Config` for invalid TOML or non-string values.
pub fn parse_user_formats(content: &str) -> Result<UserFormats, EfileError> {
    toml::from_str(content).map_err(|e| EfileError::Config(format!("formats.toml: {e}")))
}

/// What: Load user format sets, empty when no file exists.
///
/// # Errors
/// - `EfileError::Io` when the file cannot be read, `EfileError::Config`
///   when it does not parse.
pub fn load_user_formats(path: Option<&Path>) -> Result<UserFormats, EfileError> {
    let Some(path) = path else {
        return Ok(UserFormats::new());
    };
    let content = std::fs::read_to_string(path)?;
    let sets = parse_user_formats(&content)?;
    debug!(path = %path.display(), sets = sets.len(), "user format sets loaded");
    Ok(sets)
}
