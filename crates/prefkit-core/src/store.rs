//! The get/set contract shared by flat settings stores.

use crate::domain::value::SettingValue;
use crate::error::SettingsError;

/// A store that binds names to values and persists them.
///
/// Implemented by the text and JSON stores and by the native registry store,
/// so tool code can be written once against any of them.  The INI store is
/// addressed by `(section, option)` pairs and does not implement it.
pub trait SettingsStore {
    /// Returns the stored value, or `None` if the name is unknown.
    fn value(&self, name: &str) -> Option<SettingValue>;

    /// Stores a value.  After `Ok(())`, [`value`](Self::value) returns it.
    ///
    /// # Errors
    ///
    /// Returns the backend's persistence error.
    fn set_value(&mut self, name: &str, value: SettingValue) -> Result<(), SettingsError>;

    fn contains(&self, name: &str) -> bool {
        self.value(name).is_some()
    }
}
