//! Flat, file-backed settings stores.
//!
//! [`FileSettings`] holds an ordered name → value map bound to one file.
//! Every mutation rewrites the whole file in the store's format, so the file
//! is always current and a crash loses at most the change being written.
//!
//! ```rust,no_run
//! use prefkit_files::JsonSettings;
//!
//! let mut prefs = JsonSettings::new();
//! prefs.set_directory("prefs", None)?;
//! prefs.set("volume", 0.75)?;
//! assert_eq!(prefs.get("volume").and_then(|v| v.as_f64()), Some(0.75));
//! # Ok::<(), prefkit_core::SettingsError>(())
//! ```

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use prefkit_core::{
    JsonFormat, LoadReport, RetryPolicy, SettingValue, SettingsError, SettingsFormat, SettingsMap,
    SettingsStore, TextFormat,
};
use tracing::{debug, warn};

use crate::fs;

/// `name = value` text store (`settings.cfg` by default).
pub type TextSettings = FileSettings<TextFormat>;

/// JSON object store (`settings.json` by default).
pub type JsonSettings = FileSettings<JsonFormat>;

/// A settings map bound to a file in format `F`.
#[derive(Debug)]
pub struct FileSettings<F: SettingsFormat> {
    directory: Option<PathBuf>,
    file_path: Option<PathBuf>,
    settings: SettingsMap,
    retry: RetryPolicy,
    last_load: LoadReport,
    /// Set when the last write failed and memory is ahead of the file.
    pending: bool,
    _format: PhantomData<F>,
}

impl<F: SettingsFormat> FileSettings<F> {
    /// Creates an empty, unbound store.
    pub fn new() -> Self {
        Self {
            directory: None,
            file_path: None,
            settings: SettingsMap::new(),
            retry: RetryPolicy::default(),
            last_load: LoadReport::Empty,
            pending: false,
            _format: PhantomData,
        }
    }

    /// Replaces the write-retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Binds the store to `directory/filename` and reads it.
    ///
    /// `filename` defaults to the format's default name.  The directory and
    /// file are created if absent.  For the JSON store, a name without the
    /// `.json` extension is redirected to the `.json` file with the same base
    /// name.  A malformed file leaves the store empty; see
    /// [`load_report`](Self::load_report).
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file cannot be created or read.
    pub fn set_directory(
        &mut self,
        directory: impl AsRef<Path>,
        filename: Option<&str>,
    ) -> Result<PathBuf, SettingsError> {
        let directory = directory.as_ref();
        let name = F::backing_file_name(filename.unwrap_or(F::DEFAULT_FILENAME));
        let path = directory.join(name);

        fs::ensure_file(&path)?;
        self.directory = Some(directory.to_path_buf());
        self.file_path = Some(path.clone());
        self.read()?;
        Ok(path)
    }

    /// Returns a stored value.
    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.settings.get(name)
    }

    /// Returns a stored value, or [`SettingsError::NotFound`].
    pub fn require(&self, name: &str) -> Result<&SettingValue, SettingsError> {
        self.get(name)
            .ok_or_else(|| SettingsError::NotFound(format!("setting '{name}'")))
    }

    /// Stores a value and rewrites the file.
    ///
    /// The in-memory value is updated even if the write fails, so a later
    /// [`flush`](Self::flush) can persist it.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotBound`] before `set_directory`, or
    /// [`SettingsError::WriteFailure`] once the retry policy gives up.
    /// A name the format cannot store is rejected with
    /// [`SettingsError::Parse`] and leaves the store unchanged.
    pub fn set(&mut self, name: &str, value: impl Into<SettingValue>) -> Result<(), SettingsError> {
        let previous = self.settings.insert(name.to_string(), value.into());
        match F::encode(&self.settings) {
            Ok(text) => self.persist(&text),
            Err(e) => {
                match previous {
                    Some(old) => {
                        self.settings.insert(name.to_string(), old);
                    }
                    None => {
                        self.settings.shift_remove(name);
                    }
                }
                Err(e)
            }
        }
    }

    /// Removes a setting and rewrites the file.  Returns the old value.
    ///
    /// # Errors
    ///
    /// As for [`set`](Self::set).  Removing an unknown name writes nothing.
    pub fn remove(&mut self, name: &str) -> Result<Option<SettingValue>, SettingsError> {
        let removed = self.settings.shift_remove(name);
        if removed.is_some() {
            self.write()?;
        }
        Ok(removed)
    }

    /// All settings in insertion order.
    pub fn settings(&self) -> &SettingsMap {
        &self.settings
    }

    pub fn has_setting(&self, name: &str) -> bool {
        self.settings.contains_key(name)
    }

    pub fn has_settings(&self) -> bool {
        !self.settings.is_empty()
    }

    /// Path of the backing file, once bound.
    pub fn file(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Outcome of the most recent read.
    pub fn load_report(&self) -> &LoadReport {
        &self.last_load
    }

    /// `true` if the last write failed and the file is behind memory.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Re-reads the backing file, discarding in-memory changes.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotBound`] or [`SettingsError::Io`].
    pub fn reload(&mut self) -> Result<&LoadReport, SettingsError> {
        self.read()?;
        Ok(&self.last_load)
    }

    /// Removes every setting and rewrites the file.
    ///
    /// # Errors
    ///
    /// As for [`set`](Self::set).
    pub fn clear(&mut self) -> Result<(), SettingsError> {
        self.settings.clear();
        self.write()
    }

    /// Writes the file if a previous write failed.
    ///
    /// # Errors
    ///
    /// As for [`set`](Self::set).
    pub fn flush(&mut self) -> Result<(), SettingsError> {
        if self.pending {
            self.write()?;
        }
        Ok(())
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn read(&mut self) -> Result<(), SettingsError> {
        let path = self.file_path.clone().ok_or(SettingsError::NotBound)?;

        let decoded = match fs::read_optional(&path) {
            Ok(Some(text)) => F::decode(&text),
            Ok(None) => Ok(SettingsMap::new()),
            Err(e) if e.is_parse() => Err(e),
            Err(e) => return Err(e),
        };

        self.last_load = match decoded {
            Ok(settings) => {
                let report = LoadReport::from_entries(settings.len());
                self.settings = settings;
                debug!(path = %path.display(), format = F::NAME, entries = report.entries(), "loaded settings");
                report
            }
            Err(error) => {
                warn!(path = %path.display(), format = F::NAME, %error, "settings file is malformed, starting empty");
                self.settings = SettingsMap::new();
                LoadReport::Recovered { error }
            }
        };
        self.pending = false;
        Ok(())
    }

    fn write(&mut self) -> Result<(), SettingsError> {
        let text = F::encode(&self.settings)?;
        self.persist(&text)
    }

    fn persist(&mut self, text: &str) -> Result<(), SettingsError> {
        let path = self.file_path.as_deref().ok_or(SettingsError::NotBound)?;
        match fs::write_with_retry(path, text, &self.retry) {
            Ok(()) => {
                self.pending = false;
                Ok(())
            }
            Err(e) => {
                self.pending = true;
                Err(e)
            }
        }
    }
}

impl<F: SettingsFormat> Default for FileSettings<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: SettingsFormat> SettingsStore for FileSettings<F> {
    fn value(&self, name: &str) -> Option<SettingValue> {
        self.get(name).cloned()
    }

    fn set_value(&mut self, name: &str, value: SettingValue) -> Result<(), SettingsError> {
        self.set(name, value)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("prefkit_store_test_{}", Uuid::new_v4()))
    }

    #[test]
    fn test_get_on_fresh_store_is_none() {
        let store = TextSettings::new();
        assert!(store.get("anything").is_none());
        assert!(!store.has_settings());
    }

    #[test]
    fn test_set_before_binding_is_not_bound_but_kept_in_memory() {
        // Arrange
        let mut store = JsonSettings::new();

        // Act
        let result = store.set("volume", 0.5);

        // Assert
        assert!(matches!(result, Err(SettingsError::NotBound)));
        assert_eq!(store.get("volume"), Some(&SettingValue::Float(0.5)));
    }

    #[test]
    fn test_set_directory_creates_default_file() {
        // Arrange
        let dir = scratch_dir();
        let mut store = TextSettings::new();

        // Act
        let path = store.set_directory(&dir, None).expect("bind");

        // Assert
        assert_eq!(path, dir.join("settings.cfg"));
        assert!(path.is_file());
        assert!(matches!(store.load_report(), LoadReport::Empty));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_text_set_rewrites_file_in_insertion_order() {
        // Arrange
        let dir = scratch_dir();
        let mut store = TextSettings::new();
        let path = store.set_directory(&dir, Some("tool.cfg")).unwrap();

        // Act
        store.set("project", "/mnt/shows/abc").unwrap();
        store.set("autosave", true).unwrap();
        store.set("last_camera", SettingValue::Null).unwrap();
        store.set("project", "/mnt/shows/xyz").unwrap();

        // Assert
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "project = \"/mnt/shows/xyz\"\nautosave = True\nlast_camera = None\n"
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_json_set_directory_redirects_to_json_extension() {
        let dir = scratch_dir();
        let mut store = JsonSettings::new();

        let path = store.set_directory(&dir, Some("prefs.cfg")).unwrap();

        assert_eq!(path, dir.join("prefs.json"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_json_corrupt_file_recovers_empty() {
        // Arrange
        let dir = scratch_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("settings.json"), "{ \"volume\": 0.7").unwrap();
        let mut store = JsonSettings::new();

        // Act
        store.set_directory(&dir, None).expect("corrupt file is not an I/O error");

        // Assert
        assert!(store.load_report().is_recovered());
        assert!(!store.has_settings());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_remove_and_clear_persist() {
        // Arrange
        let dir = scratch_dir();
        let mut store = JsonSettings::new();
        store.set_directory(&dir, None).unwrap();
        store.set("a", 1).unwrap();
        store.set("b", 2).unwrap();

        // Act
        let removed = store.remove("a").unwrap();
        store.reload().unwrap();

        // Assert
        assert_eq!(removed, Some(SettingValue::Int(1)));
        assert!(!store.has_setting("a"));
        assert!(store.has_setting("b"));

        store.clear().unwrap();
        assert_eq!(store.reload().unwrap().entries(), 0);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_set_rejects_name_the_text_format_cannot_store() {
        let dir = scratch_dir();
        let mut store = TextSettings::new();
        store.set_directory(&dir, None).unwrap();

        let result = store.set("a=b", 1);

        assert!(matches!(result, Err(SettingsError::Parse(_))));
        assert!(!store.has_setting("a=b"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_require_reports_not_found() {
        let store = TextSettings::new();
        assert!(matches!(store.require("missing"), Err(SettingsError::NotFound(_))));
    }

    #[test]
    fn test_write_failure_is_surfaced_and_flushable() {
        // Arrange: a directory sits where the backing file should be.
        let dir = scratch_dir();
        let mut store = TextSettings::new().with_retry(RetryPolicy::once());
        let path = store.set_directory(&dir, None).unwrap();
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        // Act
        let result = store.set("volume", 0.75);

        // Assert
        assert!(matches!(result, Err(SettingsError::WriteFailure { attempts: 1, .. })));
        assert!(store.is_pending());
        assert_eq!(store.get("volume"), Some(&SettingValue::Float(0.75)));

        // Once the obstruction is gone, flush persists the pending value.
        std::fs::remove_dir(&path).unwrap();
        store.flush().expect("flush");
        assert!(!store.is_pending());
        assert!(std::fs::read_to_string(&path).unwrap().contains("volume = 0.75"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
