//! Error taxonomy shared by every settings store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading, coercing or writing settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A required setting, layout or backing file does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A file-backed store was used before being bound to a directory.
    #[error("settings store is not bound to a file; call set_directory first")]
    NotBound,

    /// Stored text could not be parsed (literal grammar, JSON or INI).
    #[error("parse error: {0}")]
    Parse(String),

    /// Writing the backing file failed on every allowed attempt.
    #[error("failed to write {path} after {attempts} attempt(s): {source}")]
    WriteFailure {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    /// A stored value could not be coerced to the type of the caller's default.
    #[error("option '{option}' holds '{found}', which is not a valid {expected}")]
    TypeMismatch {
        option: String,
        expected: &'static str,
        found: String,
    },

    /// Reading the backing file failed for a reason other than absence.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SettingsError {
    /// `true` for errors that mean "the text on disk is malformed".
    pub fn is_parse(&self) -> bool {
        matches!(self, SettingsError::Parse(_))
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(format!("invalid JSON: {err}"))
    }
}
