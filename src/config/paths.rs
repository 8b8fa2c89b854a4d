use std::env;
use std::path::{Path, PathBuf};

/// Resolve an XDG base directory from environment or default to `$HOME` + segments.
///
/// Inputs:
/// - `var`: Environment variable to check (e.g., `XDG_CONFIG_HOME`).
/// - `home_default`: Fallback path segments relative to `$HOME` if `var` is unset/empty.
///
/// Output: Resolved base directory path.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(p) = env::var(var)
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let mut base = PathBuf::from(home);
    for seg in home_default {
        base = base.join(seg);
    }
    base
}

/// First existing `efile/<file>` under `$HOME/.config` or `$XDG_CONFIG_HOME`.
fn resolve_config_file(file: &str) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(h) = env::var("HOME") {
        candidates.push(Path::new(&h).join(".config").join("efile").join(file));
    }
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME")
        && !xdg.trim().is_empty()
    {
        candidates.push(Path::new(&xdg).join("efile").join(file));
    }
    candidates.into_iter().find(|p| p.is_file())
}

/// Location of `settings.conf`, if one exists.
pub fn resolve_settings_path() -> Option<PathBuf> {
    resolve_config_file("settings.conf")
}

/// Location of the user format sets (`formats.toml`), if one exists.
pub fn resolve_formats_path() -> Option<PathBuf> {
    resolve_config_file("formats.toml")
}

/// What: Directory for debug dumps, `$XDG_CACHE_HOME/efile` or `~/.cache/efile`.
///
/// Details:
/// - Not created here; the writer creates it on demand.
#[must_use]
pub fn cache_dir() -> PathBuf {
    xdg_base_dir("XDG_CACHE_HOME", &[".cache"]).join("efile")
}
