//! In-memory registry for tests and headless hosts.

use std::path::Path;

use indexmap::IndexMap;
use prefkit_core::{SettingValue, SettingsError};

use super::{is_under, NativeRegistry};

/// A registry with no backing file.  [`sync`](NativeRegistry::sync) is a
/// no-op and counted so tests can observe it.
#[derive(Debug, Default, Clone)]
pub struct MemoryRegistry {
    entries: IndexMap<String, SettingValue>,
    /// Number of times `sync` was called.
    pub syncs: usize,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NativeRegistry for MemoryRegistry {
    fn value(&self, key: &str) -> Option<SettingValue> {
        self.entries.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: SettingValue) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.retain(|k, _| !is_under(k, key));
    }

    fn all_keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn sync(&mut self) -> Result<(), SettingsError> {
        self.syncs += 1;
        Ok(())
    }

    fn file_path(&self) -> Option<&Path> {
        None
    }

    fn delete_backing_store(&mut self) -> Result<(), SettingsError> {
        Err(SettingsError::NotFound("in-memory registry has no backing file".into()))
    }
}
