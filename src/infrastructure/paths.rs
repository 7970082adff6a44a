//! Path handling for the Zellij plugin sandbox.
//!
//! Inside the sandbox the host filesystem is mounted under `/host`, so every
//! user-facing path has to be translated before it is opened.

use std::path::PathBuf;

/// Returns the data directory holding `wishlist.json` and the trace export.
///
/// In Zellij's plugin environment `/host` points to the cwd of the last focused
/// terminal (usually the home directory), so this typically resolves to
/// `~/.local/share/zellij/kirjastokaveri`.
///
/// ```
/// use kirjastokaveri::infrastructure::get_data_dir;
///
/// assert!(get_data_dir().ends_with("kirjastokaveri"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("kirjastokaveri")
}

/// Expands a leading tilde to the sandbox `/host` mount.
///
/// Used for the `theme_file` option.
///
/// ```
/// use kirjastokaveri::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/kirjasto.toml"), "/host/themes/kirjasto.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/etc/theme.toml"), "/etc/theme.toml");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}
