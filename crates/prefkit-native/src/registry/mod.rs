//! Slash-keyed settings registries.
//!
//! A registry is a flat map from keys such as `MainWindow/geometry/default`
//! to [`SettingValue`]s.  The part of a key before the first `/` is its
//! *group*; keys without a `/` are ungrouped.
//!
//! Implementations only need to store and enumerate keys; group queries
//! have default implementations built on [`NativeRegistry::all_keys`].

pub mod ini_file;
pub mod memory;

use std::path::Path;

use prefkit_core::{SettingValue, SettingsError};

/// Persistent key/value registry in the style of a desktop toolkit.
pub trait NativeRegistry {
    fn value(&self, key: &str) -> Option<SettingValue>;

    /// Stores a value.  Persisting may be deferred until [`sync`](Self::sync).
    fn set_value(&mut self, key: &str, value: SettingValue);

    /// Removes `key` and every key below it (`key/...`).  An empty key
    /// removes everything.
    fn remove(&mut self, key: &str);

    /// Every stored key, in storage order.
    fn all_keys(&self) -> Vec<String>;

    /// Writes pending changes to the backing store.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::WriteFailure`] if the backing store cannot
    /// be written.
    fn sync(&mut self) -> Result<(), SettingsError>;

    /// Path of the backing file, if the registry has one.
    fn file_path(&self) -> Option<&Path>;

    /// Deletes the backing store.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotFound`] if there is no backing file, or
    /// [`SettingsError::Io`] if it cannot be removed.
    fn delete_backing_store(&mut self) -> Result<(), SettingsError>;

    fn contains(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    /// Distinct top-level groups, in first-seen order.
    fn child_groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = Vec::new();
        for key in self.all_keys() {
            if let Some((group, _)) = key.split_once('/') {
                if !groups.iter().any(|g| g == group) {
                    groups.push(group.to_string());
                }
            }
        }
        groups
    }

    /// Keys directly inside `group` (no further `/`), without the prefix.
    fn child_keys(&self, group: &str) -> Vec<String> {
        let prefix = format!("{group}/");
        self.all_keys()
            .into_iter()
            .filter_map(|key| {
                let rest = key.strip_prefix(&prefix)?;
                (!rest.contains('/')).then(|| rest.to_string())
            })
            .collect()
    }
}

/// `true` if `key` is `target` or lies below it.
pub(crate) fn is_under(key: &str, target: &str) -> bool {
    target.is_empty()
        || key == target
        || key
            .strip_prefix(target)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryRegistry;
    use super::*;

    fn sample() -> MemoryRegistry {
        let mut registry = MemoryRegistry::new();
        registry.set_value("theme", "dark".into());
        registry.set_value("Preferences/units", "cm".into());
        registry.set_value("Preferences/autosave", true.into());
        registry.set_value("Preferences/grid/size", 8.into());
        registry.set_value("RecentFiles/size", 0.into());
        registry
    }

    #[test]
    fn test_child_groups_are_distinct_in_order() {
        assert_eq!(sample().child_groups(), vec!["Preferences", "RecentFiles"]);
    }

    #[test]
    fn test_child_keys_excludes_nested_groups() {
        assert_eq!(sample().child_keys("Preferences"), vec!["units", "autosave"]);
        assert!(sample().child_keys("Missing").is_empty());
    }

    #[test]
    fn test_is_under_matches_whole_segments_only() {
        assert!(is_under("Preferences/units", "Preferences"));
        assert!(is_under("Preferences", "Preferences"));
        assert!(!is_under("PreferencesOld/units", "Preferences"));
        assert!(is_under("anything", ""));
    }
}
