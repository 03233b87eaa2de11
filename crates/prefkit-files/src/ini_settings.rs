//! Sectioned INI settings store.
//!
//! Unlike the flat stores, [`IniSettings`] batches writes: changes accumulate
//! in memory and reach the disk on [`save`](IniSettings::save),
//! [`close`](IniSettings::close) or drop.
//!
//! # Section scopes (for beginners)
//!
//! Tool windows usually keep all of their options in one section.  Instead
//! of repeating the section name on every call, push it once:
//!
//! ```rust,no_run
//! use prefkit_files::IniSettings;
//!
//! let mut prefs = IniSettings::open("prefs/tool.ini")?;
//! {
//!     let mut audio = prefs.push_section("Audio");
//!     audio.export_option("volume", 0.75);
//!     audio.export_option("muted", false);
//! } // scope dropped: "Audio" popped off the stack
//! prefs.save()?;
//! # Ok::<(), prefkit_core::SettingsError>(())
//! ```
//!
//! The scope borrows the store mutably, so the stack can never be left
//! unbalanced: the section is popped when the scope goes out of scope.
//!
//! Option names are case-insensitive (stored lower-case); section names are
//! case-sensitive.

use std::path::{Path, PathBuf};

use prefkit_core::{
    parse_literal, IniDocument, LoadReport, RetryPolicy, SettingValue, SettingsError, WidgetState,
};
use tracing::{debug, error, warn};

use crate::fs;

/// An INI file loaded into memory, with a section stack.
#[derive(Debug)]
pub struct IniSettings {
    path: PathBuf,
    document: IniDocument,
    dirty: bool,
    stack: Vec<String>,
    retry: RetryPolicy,
    last_load: LoadReport,
}

impl IniSettings {
    /// Opens the INI file at `path`.
    ///
    /// A missing file gives an empty store; it is created on the first save.
    /// A malformed file also gives an empty store, reported through
    /// [`load_report`](Self::load_report).
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file exists but cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();

        let parsed = match fs::read_optional(&path) {
            Ok(Some(text)) => IniDocument::parse(&text).map(fold_option_names),
            Ok(None) => Ok(IniDocument::new()),
            Err(e) if e.is_parse() => Err(e),
            Err(e) => return Err(e),
        };

        let (document, last_load) = match parsed {
            Ok(document) => {
                let report = LoadReport::from_entries(document.entries().count());
                debug!(path = %path.display(), entries = report.entries(), "loaded INI settings");
                (document, report)
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "INI file is malformed, starting empty");
                (IniDocument::new(), LoadReport::Recovered { error })
            }
        };

        Ok(Self {
            path,
            document,
            dirty: false,
            stack: Vec::new(),
            retry: RetryPolicy::default(),
            last_load,
        })
    }

    /// Replaces the write-retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Outcome of reading the file in [`open`](Self::open).
    pub fn load_report(&self) -> &LoadReport {
        &self.last_load
    }

    /// `true` when there are changes not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Innermost pushed section, if any.
    pub fn current_section(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.document.has_section(section)
    }

    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.document.has_option(section, &option.to_lowercase())
    }

    /// Section names in file order.
    pub fn sections(&self) -> Vec<&str> {
        self.document.sections().collect()
    }

    /// Option names visible from `section`, including inherited defaults.
    pub fn options(&self, section: &str) -> Vec<&str> {
        self.document.options(section)
    }

    // ── Reading ───────────────────────────────────────────────────────────────

    /// Reads an option, coerced to the type of `default`.
    ///
    /// Returns `default` when the section or option is absent.  Otherwise the
    /// stored text is coerced by the variant of `default`:
    ///
    /// | default        | stored text accepted                                 |
    /// |----------------|------------------------------------------------------|
    /// | `Bool`         | `1 yes true on` / `0 no false off` (any case)        |
    /// | `Float`        | any decimal or integer                               |
    /// | `Int`          | an integer                                           |
    /// | other + `eval` | a literal (`[1, 2]`, `(3, 4)`, `None`, `"text"`)     |
    /// | other          | anything, returned as a raw string                   |
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::TypeMismatch`] if the text does not fit the
    /// default's type, or [`SettingsError::Parse`] if `eval` fails.
    pub fn get(
        &self,
        section: &str,
        option: &str,
        default: impl Into<SettingValue>,
        eval: bool,
    ) -> Result<SettingValue, SettingsError> {
        let default = default.into();
        match self.document.get(section, &option.to_lowercase()) {
            Some(raw) => coerce(option, raw, &default, eval),
            None => Ok(default),
        }
    }

    pub fn get_bool(&self, section: &str, option: &str, default: bool) -> Result<bool, SettingsError> {
        let value = self.get(section, option, default, false)?;
        Ok(value.as_bool().unwrap_or(default))
    }

    pub fn get_i64(&self, section: &str, option: &str, default: i64) -> Result<i64, SettingsError> {
        let value = self.get(section, option, default, false)?;
        Ok(value.as_i64().unwrap_or(default))
    }

    pub fn get_f64(&self, section: &str, option: &str, default: f64) -> Result<f64, SettingsError> {
        let value = self.get(section, option, default, false)?;
        Ok(value.as_f64().unwrap_or(default))
    }

    pub fn get_string(&self, section: &str, option: &str, default: &str) -> String {
        match self.document.get(section, &option.to_lowercase()) {
            Some(raw) => raw.to_string(),
            None => default.to_string(),
        }
    }

    // ── Writing ───────────────────────────────────────────────────────────────

    /// Stores an option, creating the section if needed.
    ///
    /// An empty section or option name is ignored.  Any other name is kept
    /// as given, including `=`, `:` and other INI punctuation.
    pub fn set(&mut self, section: &str, option: &str, value: impl Into<SettingValue>) {
        if section.is_empty() {
            return;
        }
        let text = value.into().to_ini_string();
        if self.document.set(section, &option.to_lowercase(), text) {
            self.dirty = true;
        }
    }

    /// Removes an option.  Returns `true` if it existed in the section.
    pub fn remove(&mut self, section: &str, option: &str) -> bool {
        let removed = self.document.remove(section, &option.to_lowercase());
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Pushes `section` and returns a scope acting on it.  The section is
    /// popped when the scope is dropped.
    pub fn push_section(&mut self, section: &str) -> SectionScope<'_> {
        self.stack.push(section.to_string());
        SectionScope { settings: self }
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// Writes the file if there are unsaved changes.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::WriteFailure`] once the retry policy gives
    /// up; the store stays dirty.
    pub fn save(&mut self) -> Result<(), SettingsError> {
        if !self.dirty {
            return Ok(());
        }
        fs::write_with_retry(&self.path, &self.document.render(), &self.retry)?;
        self.dirty = false;
        debug!(path = %self.path.display(), "saved INI settings");
        Ok(())
    }

    /// Saves and releases the store.
    ///
    /// # Errors
    ///
    /// As for [`save`](Self::save).  Unsaved changes are discarded on error.
    pub fn close(mut self) -> Result<(), SettingsError> {
        let result = self.save();
        self.dirty = false;
        result
    }
}

impl Drop for IniSettings {
    fn drop(&mut self) {
        if let Err(e) = self.save() {
            error!(path = %self.path.display(), error = %e, "dropping INI settings with unsaved changes");
        }
    }
}

// ── Section scope ─────────────────────────────────────────────────────────────

/// A pushed section.  Option operations act on the innermost section.
#[derive(Debug)]
pub struct SectionScope<'a> {
    settings: &'a mut IniSettings,
}

impl<'a> SectionScope<'a> {
    /// Name of the section this scope acts on.
    pub fn section(&self) -> &str {
        self.settings.current_section().unwrap_or_default()
    }

    /// The underlying store.
    pub fn settings(&self) -> &IniSettings {
        self.settings
    }

    /// Reads an option from the current section.  See [`IniSettings::get`].
    pub fn import_option(
        &self,
        option: &str,
        default: impl Into<SettingValue>,
        eval: bool,
    ) -> Result<SettingValue, SettingsError> {
        self.settings.get(self.section(), option, default, eval)
    }

    /// Stores an option in the current section.
    pub fn export_option(&mut self, option: &str, value: impl Into<SettingValue>) {
        let section = self.section().to_string();
        self.settings.set(&section, option, value);
    }

    /// Removes an option from the current section.
    pub fn delete_option(&mut self, option: &str) -> bool {
        let section = self.section().to_string();
        self.settings.remove(&section, option)
    }

    /// Persists a control's state under `option`.
    ///
    /// A non-checkable toggle has no state and writes nothing.
    pub fn export_widget(&mut self, option: &str, state: &WidgetState) {
        if let Some(value) = state.to_value() {
            self.export_option(option, value);
        }
    }

    /// Reads a control's state back, using `state` as both the kind of
    /// control and its default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::TypeMismatch`] if the stored value does not
    /// fit the control, or [`SettingsError::Parse`] for a malformed pair.
    pub fn import_widget(&self, option: &str, state: &WidgetState) -> Result<WidgetState, SettingsError> {
        let Some(default) = state.default_value() else {
            return Ok(state.clone());
        };
        let value = self.import_option(option, default, state.needs_eval())?;
        state
            .with_value(&value)
            .ok_or_else(|| SettingsError::TypeMismatch {
                option: option.to_string(),
                expected: widget_kind(state),
                found: value.to_string(),
            })
    }

    /// Pushes a nested section.
    pub fn push_section(&mut self, section: &str) -> SectionScope<'_> {
        self.settings.push_section(section)
    }

    /// Pops this section.  Equivalent to dropping the scope.
    pub fn pop(self) {}
}

impl Drop for SectionScope<'_> {
    fn drop(&mut self) {
        self.settings.stack.pop();
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

/// Rebuilds a parsed document with lower-case option names.
fn fold_option_names(parsed: IniDocument) -> IniDocument {
    let mut folded = IniDocument::new();
    for section in parsed.sections() {
        folded.add_section(section);
    }
    for (section, key, value) in parsed.entries() {
        folded.set(section, &key.to_lowercase(), value);
    }
    folded
}

fn coerce(
    option: &str,
    raw: &str,
    default: &SettingValue,
    eval: bool,
) -> Result<SettingValue, SettingsError> {
    let mismatch = |expected: &'static str| SettingsError::TypeMismatch {
        option: option.to_string(),
        expected,
        found: raw.to_string(),
    };
    match default {
        SettingValue::Bool(_) => parse_bool(raw)
            .map(SettingValue::Bool)
            .ok_or_else(|| mismatch("boolean")),
        SettingValue::Float(_) => raw
            .trim()
            .parse::<f64>()
            .map(SettingValue::Float)
            .map_err(|_| mismatch("float")),
        SettingValue::Int(_) => raw
            .trim()
            .parse::<i64>()
            .map(SettingValue::Int)
            .map_err(|_| mismatch("integer")),
        _ if eval => parse_literal(raw),
        _ => Ok(SettingValue::Str(raw.to_string())),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

fn widget_kind(state: &WidgetState) -> &'static str {
    match state {
        WidgetState::ComboIndex(_) => "combo box index",
        WidgetState::Checked(_) | WidgetState::Toggle { .. } => "boolean",
        WidgetState::Int(_) => "integer",
        WidgetState::Float(_) => "float",
        WidgetState::Text(_) => "string",
        WidgetState::Size { .. } => "size pair",
        WidgetState::Point { .. } => "point pair",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
