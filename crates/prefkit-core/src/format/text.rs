//! Delimited-text settings format.
//!
//! ```text
//! project = "/mnt/shows/abc"
//! autosave = True
//! volume = 0.75
//! last_camera = None
//! ```
//!
//! Lines are split on the first `=`.  Lines with no `=`, an empty name or an
//! empty value are skipped; values that are not valid literals are kept as
//! raw strings.

use crate::domain::value::SettingsMap;
use crate::error::SettingsError;
use crate::format::literal::{parse_literal_lossy, to_literal};

/// Renders one line per entry, in map order.
///
/// # Errors
///
/// Returns [`SettingsError::Parse`] for a name that could not be read back
/// (empty, or containing `=` or a line break).
pub fn encode(settings: &SettingsMap) -> Result<String, SettingsError> {
    let mut out = String::new();
    for (name, value) in settings {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed != name || name.contains(['=', '\n', '\r']) {
            return Err(SettingsError::Parse(format!(
                "setting name `{name}` cannot be stored in the text format"
            )));
        }
        out.push_str(name);
        out.push_str(" = ");
        out.push_str(&to_literal(value));
        out.push('\n');
    }
    Ok(out)
}

/// Parses every well-formed line.  Never fails.
pub fn decode(text: &str) -> SettingsMap {
    let mut settings = SettingsMap::new();
    for line in text.lines() {
        let Some((name, value)) = line.split_once('=') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();
        if name.is_empty() || value.is_empty() {
            continue;
        }
        settings.insert(name.to_string(), parse_literal_lossy(value));
    }
    settings
}
