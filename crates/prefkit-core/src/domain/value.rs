//! Setting value union.
//!
//! A setting value is dynamically typed from the caller's point of view: the
//! same store may hold a volume (`0.75`), a flag (`true`), a path (`"/tmp"`)
//! and an unset entry (`None`).  [`SettingValue`] makes the set of possible
//! types explicit so that every backend handles all of them.

use std::fmt;

use indexmap::IndexMap;

/// Ordered mapping from setting name to value.
///
/// Insertion order is not semantically significant, but it keeps the on-disk
/// layout stable between writes.
pub type SettingsMap = IndexMap<String, SettingValue>;

/// A single setting value.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// No value (`None` in the text format, `null` in JSON).
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Ordered sequence, used for tuple-shaped values such as sizes and points.
    List(Vec<SettingValue>),
}

impl SettingValue {
    /// Short lower-case name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Null => "null",
            SettingValue::Bool(_) => "bool",
            SettingValue::Int(_) => "int",
            SettingValue::Float(_) => "float",
            SettingValue::Str(_) => "string",
            SettingValue::List(_) => "list",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SettingValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SettingValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as `f64`, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Float(f) => Some(*f),
            SettingValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SettingValue]> {
        match self {
            SettingValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Renders the value the way the INI store writes it.
    ///
    /// Strings are written raw (no quotes); every other variant uses its
    /// literal form, so `True`, `None`, `0.75` and `[1, 2]` read back through
    /// the typed getters or through `eval` retrieval.
    pub fn to_ini_string(&self) -> String {
        match self {
            SettingValue::Str(s) => s.clone(),
            other => crate::format::literal::to_literal(other),
        }
    }
}

impl fmt::Display for SettingValue {
    /// Displays the literal form (strings quoted).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::literal::to_literal(self))
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        SettingValue::Int(i64::from(value))
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Int(value)
    }
}

impl From<u32> for SettingValue {
    fn from(value: u32) -> Self {
        SettingValue::Int(i64::from(value))
    }
}

impl From<f32> for SettingValue {
    fn from(value: f32) -> Self {
        SettingValue::Float(f64::from(value))
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        SettingValue::Float(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Str(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Str(value)
    }
}

impl<T: Into<SettingValue>> From<Option<T>> for SettingValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SettingValue::Null, Into::into)
    }
}

impl<T: Into<SettingValue>> From<Vec<T>> for SettingValue {
    fn from(values: Vec<T>) -> Self {
        SettingValue::List(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_option_none_is_null() {
        let value: SettingValue = Option::<i64>::None.into();
        assert!(value.is_null());
    }

    #[test]
    fn test_as_f64_widens_integers() {
        assert_eq!(SettingValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(SettingValue::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(SettingValue::Str("3".into()).as_f64(), None);
    }

    #[test]
    fn test_to_ini_string_writes_strings_raw() {
        // Arrange
        let s = SettingValue::from("C:/projects/shot_010");

        // Act / Assert
        assert_eq!(s.to_ini_string(), "C:/projects/shot_010");
        assert_eq!(SettingValue::Bool(true).to_ini_string(), "True");
        assert_eq!(SettingValue::Null.to_ini_string(), "None");
        assert_eq!(SettingValue::Float(0.75).to_ini_string(), "0.75");
    }

    #[test]
    fn test_display_quotes_strings() {
        assert_eq!(SettingValue::from("a").to_string(), "\"a\"");
        assert_eq!(SettingValue::from(vec![1, 2]).to_string(), "[1, 2]");
    }

    #[test]
    fn test_type_name_covers_every_variant() {
        let names: Vec<_> = [
            SettingValue::Null,
            SettingValue::Bool(false),
            SettingValue::Int(0),
            SettingValue::Float(0.0),
            SettingValue::Str(String::new()),
            SettingValue::List(Vec::new()),
        ]
        .iter()
        .map(SettingValue::type_name)
        .collect();

        assert_eq!(names, ["null", "bool", "int", "float", "string", "list"]);
    }
}
