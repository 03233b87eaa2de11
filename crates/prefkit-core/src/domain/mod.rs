//! Domain entities for prefkit.
//!
//! Pure data types with no file-system or toolkit dependencies.  Every store
//! backend serialises the same [`value::SettingValue`] union, so each format
//! has an explicit, exhaustive conversion table instead of inspecting types
//! at runtime.

/// Outcome of reading a backing file.
pub mod load;

/// The setting value union and the ordered settings map.
pub mod value;

/// Toolkit-neutral widget state persisted by the INI store.
pub mod widget;
