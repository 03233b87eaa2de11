//! Platform settings directories.
//!
//! - Windows:  `%APPDATA%`
//! - macOS:    `~/Library/Preferences`
//! - elsewhere: `$XDG_CONFIG_HOME`, or `~/.config`
//!
//! Only environment variables are consulted; nothing is created here.

use std::path::PathBuf;

/// Resolves the platform base directory for per-user settings.
///
/// Returns `None` when the relevant environment variables are unset.
pub fn system_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(PathBuf::from)
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| PathBuf::from(h).join("Library").join("Preferences"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        std::env::var_os("XDG_CONFIG_HOME")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
    }
}

/// Directory for `app`'s settings files under the platform base directory.
pub fn settings_dir(app: &str) -> Option<PathBuf> {
    system_config_dir().map(|base| base.join(app))
}
