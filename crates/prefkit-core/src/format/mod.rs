//! On-disk formats.
//!
//! Every format here is a pure transformation between file text and a
//! [`SettingsMap`]; reading and writing files is left to the stores.
//!
//! # Sub-modules
//!
//! - **`literal`** – The restricted value grammar (`0.75`, `"text"`, `None`).
//! - **`text`** – One `name = literal` assignment per line.
//! - **`json`** – A JSON object with one key per setting.
//! - **`ini`** – An INI document with sections, used by the INI store and by
//!   the native registry.

pub mod ini;
pub mod json;
pub mod literal;
pub mod text;

use std::path::Path;

use crate::domain::value::SettingsMap;
use crate::error::SettingsError;

/// A whole-file format for a flat, ordered settings map.
///
/// Implemented by marker types so a store can be generic over its format:
/// `FileSettings<TextFormat>` and `FileSettings<JsonFormat>`.
pub trait SettingsFormat {
    /// Human-readable format name, used in log output.
    const NAME: &'static str;

    /// File name used when the caller does not pick one.
    const DEFAULT_FILENAME: &'static str;

    /// Maps the file name a caller asked for to the file actually used.
    fn backing_file_name(requested: &str) -> String {
        requested.to_string()
    }

    /// Serialises the whole map.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] if an entry cannot be represented.
    fn encode(settings: &SettingsMap) -> Result<String, SettingsError>;

    /// Parses a whole file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] if the text is malformed.
    fn decode(text: &str) -> Result<SettingsMap, SettingsError>;
}

/// Plain `name = value` text, one setting per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormat;

impl SettingsFormat for TextFormat {
    const NAME: &'static str = "text";
    const DEFAULT_FILENAME: &'static str = "settings.cfg";

    fn encode(settings: &SettingsMap) -> Result<String, SettingsError> {
        text::encode(settings)
    }

    fn decode(text: &str) -> Result<SettingsMap, SettingsError> {
        Ok(text::decode(text))
    }
}

/// A JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl SettingsFormat for JsonFormat {
    const NAME: &'static str = "json";
    const DEFAULT_FILENAME: &'static str = "settings.json";

    /// A name without the `.json` extension is redirected to the JSON file
    /// with the same base name: `prefs.cfg` is stored as `prefs.json`.
    fn backing_file_name(requested: &str) -> String {
        if requested.ends_with(".json") {
            return requested.to_string();
        }
        let stem = Path::new(requested)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| requested.to_string());
        format!("{stem}.json")
    }

    fn encode(settings: &SettingsMap) -> Result<String, SettingsError> {
        json::encode(settings)
    }

    fn decode(text: &str) -> Result<SettingsMap, SettingsError> {
        json::decode(text)
    }
}
