//! INI-file registry.
//!
//! Keys map onto INI sections by their first segment, the way desktop
//! toolkits lay out their INI-format settings:
//!
//! ```ini
//! [General]
//! theme = "dark"
//!
//! [MainWindow]
//! geometry/default = "AdnQywADAAAAAA..."
//!
//! [RecentFiles]
//! size = 2
//! 1/file = "/shows/abc/shot010.ma"
//! 2/file = "/shows/abc/shot020.ma"
//! ```
//!
//! Ungrouped keys live in `[General]`.  Values are written as literals, so
//! `2` reads back as an integer and `"2"` as a string.
//!
//! Writes are deferred: changes stay in memory until
//! [`sync`](NativeRegistry::sync) or drop.

use std::path::{Path, PathBuf};

use prefkit_core::{
    parse_literal_lossy, to_literal, IniDocument, LoadReport, RetryPolicy, SettingValue, SettingsError,
};
use prefkit_files::fs;
use tracing::{debug, error, info, warn};

use super::{is_under, NativeRegistry};

/// Section holding keys that have no group.
pub const GENERAL_SECTION: &str = "General";

/// A registry stored in an INI file.
#[derive(Debug)]
pub struct IniRegistry {
    path: PathBuf,
    document: IniDocument,
    dirty: bool,
    retry: RetryPolicy,
    last_load: LoadReport,
}

impl IniRegistry {
    /// Opens the registry file at `path`.  A missing file gives an empty
    /// registry; a malformed one gives an empty registry and a
    /// [`LoadReport::Recovered`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file exists but cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();

        let parsed = match fs::read_optional(&path) {
            Ok(Some(text)) => IniDocument::parse(&text),
            Ok(None) => Ok(IniDocument::new()),
            Err(e) if e.is_parse() => Err(e),
            Err(e) => return Err(e),
        };

        let (document, last_load) = match parsed {
            Ok(document) => {
                let report = LoadReport::from_entries(document.entries().count());
                debug!(path = %path.display(), entries = report.entries(), "loaded registry");
                (document, report)
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "registry file is malformed, starting empty");
                (IniDocument::new(), LoadReport::Recovered { error })
            }
        };

        Ok(Self {
            path,
            document,
            dirty: false,
            retry: RetryPolicy::default(),
            last_load,
        })
    }

    /// Replaces the write-retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.last_load
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl NativeRegistry for IniRegistry {
    fn value(&self, key: &str) -> Option<SettingValue> {
        let (section, option) = split_key(key);
        self.document.get(section, option).map(parse_literal_lossy)
    }

    fn set_value(&mut self, key: &str, value: SettingValue) {
        let (section, option) = split_key(key);
        if self.document.set(section, option, to_literal(&value)) {
            self.dirty = true;
        } else {
            warn!(key, "ignoring key with an empty option name");
        }
    }

    fn remove(&mut self, key: &str) {
        let doomed: Vec<String> = self
            .all_keys()
            .into_iter()
            .filter(|k| is_under(k, key))
            .collect();
        for k in &doomed {
            let (section, option) = split_key(k);
            self.document.remove(section, option);
        }

        // Drop sections left empty so the group disappears from the file.
        let empty: Vec<String> = self
            .document
            .sections()
            .filter(|s| self.document.options(s).is_empty())
            .map(str::to_string)
            .collect();
        for section in &empty {
            self.document.remove_section(section);
        }

        if !doomed.is_empty() || !empty.is_empty() {
            self.dirty = true;
        }
    }

    fn all_keys(&self) -> Vec<String> {
        self.document
            .entries()
            .map(|(section, option, _)| join_key(section, option))
            .collect()
    }

    fn sync(&mut self) -> Result<(), SettingsError> {
        if !self.dirty {
            return Ok(());
        }
        fs::write_with_retry(&self.path, &self.document.render(), &self.retry)?;
        self.dirty = false;
        debug!(path = %self.path.display(), "synced registry");
        Ok(())
    }

    fn file_path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn delete_backing_store(&mut self) -> Result<(), SettingsError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "deleted settings file");
                self.document = IniDocument::new();
                self.dirty = false;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SettingsError::NotFound(
                format!("settings file {}", self.path.display()),
            )),
            Err(source) => Err(SettingsError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl Drop for IniRegistry {
    fn drop(&mut self) {
        if let Err(e) = self.sync() {
            error!(path = %self.path.display(), error = %e, "dropping registry with unsynced changes");
        }
    }
}

fn split_key(key: &str) -> (&str, &str) {
    key.split_once('/').unwrap_or((GENERAL_SECTION, key))
}

fn join_key(section: &str, option: &str) -> String {
    if section == GENERAL_SECTION {
        option.to_string()
    } else {
        format!("{section}/{option}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_file() -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("prefkit_registry_test_{}", Uuid::new_v4()));
        let file = dir.join("tool.ini");
        (dir, file)
    }

    #[test]
    fn test_keys_map_to_sections() {
        // Arrange
        let (dir, path) = scratch_file();
        let mut registry = IniRegistry::open(&path).unwrap();

        // Act
        registry.set_value("theme", "dark".into());
        registry.set_value("RecentFiles/size", 1.into());
        registry.set_value("RecentFiles/1/file", "/shows/a.ma".into());
        registry.sync().unwrap();

        // Assert
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[General]\ntheme = \"dark\"\n"));
        assert!(text.contains("[RecentFiles]\nsize = 1\n1/file = \"/shows/a.ma\"\n"));
        assert_eq!(
            registry.all_keys(),
            vec!["theme", "RecentFiles/size", "RecentFiles/1/file"]
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_values_keep_their_type_across_reopen() {
        let (dir, path) = scratch_file();
        {
            let mut registry = IniRegistry::open(&path).unwrap();
            registry.set_value("View/zoom", 1.5.into());
            registry.set_value("View/label", "2".into());
            registry.set_value("View/visible", false.into());
        }

        let registry = IniRegistry::open(&path).unwrap();

        assert_eq!(registry.value("View/zoom"), Some(SettingValue::Float(1.5)));
        assert_eq!(registry.value("View/label"), Some(SettingValue::Str("2".into())));
        assert_eq!(registry.value("View/visible"), Some(SettingValue::Bool(false)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_keys_with_ini_punctuation_survive_reopen() {
        // Arrange
        let (dir, path) = scratch_file();
        {
            let mut registry = IniRegistry::open(&path).unwrap();
            registry.set_value("MainWindow/geometry/Anim: wide", "AAAA".into());
            registry.set_value("MainWindow/state/a=b", 1.into());
            registry.set_value("Recent: 2024/#1", true.into());
            registry.set_value("Empty/", 1.into());
        }

        // Act
        let registry = IniRegistry::open(&path).unwrap();

        // Assert
        assert!(!registry.load_report().is_recovered());
        assert_eq!(
            registry.all_keys(),
            vec![
                "MainWindow/geometry/Anim: wide",
                "MainWindow/state/a=b",
                "Recent: 2024/#1"
            ]
        );
        assert_eq!(
            registry.value("MainWindow/geometry/Anim: wide"),
            Some(SettingValue::Str("AAAA".into()))
        );
        assert_eq!(registry.value("Recent: 2024/#1"), Some(SettingValue::Bool(true)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_remove_group_drops_empty_section() {
        let (dir, path) = scratch_file();
        let mut registry = IniRegistry::open(&path).unwrap();
        registry.set_value("RecentFiles/size", 0.into());
        registry.set_value("MainWindow/geometry/default", "AAAA".into());

        registry.remove("RecentFiles");

        assert!(!registry.child_groups().contains(&"RecentFiles".to_string()));
        assert!(registry.contains("MainWindow/geometry/default"));
        registry.sync().unwrap();
        assert!(!std::fs::read_to_string(&path).unwrap().contains("[RecentFiles]"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_clean_registry_does_not_create_file() {
        let (dir, path) = scratch_file();
        drop(IniRegistry::open(&path).unwrap());
        assert!(!path.exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_delete_backing_store() {
        // Arrange
        let (dir, path) = scratch_file();
        let mut registry = IniRegistry::open(&path).unwrap();
        registry.set_value("a", 1.into());
        registry.sync().unwrap();

        // Act
        registry.delete_backing_store().expect("delete");

        // Assert
        assert!(!path.exists());
        assert!(registry.all_keys().is_empty());
        assert!(matches!(
            registry.delete_backing_store(),
            Err(SettingsError::NotFound(_))
        ));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_file_recovers_empty() {
        let (dir, path) = scratch_file();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "loose = 1\n").unwrap();

        let registry = IniRegistry::open(&path).unwrap();

        assert!(registry.load_report().is_recovered());
        assert!(registry.all_keys().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }
}
