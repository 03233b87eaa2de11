//! Toolkit-neutral widget state.
//!
//! Tool windows persist the state of their controls (the selected entry of a
//! combo box, whether a check box is ticked, the text in a line edit) so the
//! window reopens the way the user left it.  Rather than depending on a GUI
//! toolkit, the INI store works with this enum: the caller reads the control
//! into a [`WidgetState`], and writes the returned state back into it.

use crate::domain::value::SettingValue;

/// Persistable state of a single control.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState {
    /// Current index of a combo box.  Negative means "no selection".
    ComboIndex(i64),
    /// Check box state.
    Checked(bool),
    /// Tool button; only checkable buttons carry state worth persisting.
    Toggle { checkable: bool, checked: bool },
    /// Integer spin box.
    Int(i64),
    /// Floating-point spin box.
    Float(f64),
    /// Line edit contents.
    Text(String),
    /// A width/height pair.
    Size { width: i64, height: i64 },
    /// An x/y pair.
    Point { x: i64, y: i64 },
}

impl WidgetState {
    /// Returns the value to persist, or `None` when the control has nothing
    /// to save (a non-checkable toggle).
    pub fn to_value(&self) -> Option<SettingValue> {
        let value = match self {
            WidgetState::ComboIndex(index) => SettingValue::Int(*index),
            WidgetState::Checked(checked) => SettingValue::Bool(*checked),
            WidgetState::Toggle { checkable, checked } => {
                if !checkable {
                    return None;
                }
                SettingValue::Bool(*checked)
            }
            WidgetState::Int(v) => SettingValue::Int(*v),
            WidgetState::Float(v) => SettingValue::Float(*v),
            WidgetState::Text(text) => SettingValue::Str(text.clone()),
            WidgetState::Size { width, height } => {
                SettingValue::List(vec![SettingValue::Int(*width), SettingValue::Int(*height)])
            }
            WidgetState::Point { x, y } => {
                SettingValue::List(vec![SettingValue::Int(*x), SettingValue::Int(*y)])
            }
        };
        Some(value)
    }

    /// Returns the default used when reading this control back.
    ///
    /// A combo box with no selection falls back to the first entry.
    pub fn default_value(&self) -> Option<SettingValue> {
        match self {
            WidgetState::ComboIndex(index) => Some(SettingValue::Int((*index).max(0))),
            other => other.to_value(),
        }
    }

    /// `true` for pair-shaped states that are stored as tuple literals and
    /// must be read back with literal evaluation.
    pub fn needs_eval(&self) -> bool {
        matches!(self, WidgetState::Size { .. } | WidgetState::Point { .. })
    }

    /// Rebuilds a state of the same kind from a stored value.
    ///
    /// Returns `None` when the value does not fit this kind of control.
    pub fn with_value(&self, value: &SettingValue) -> Option<WidgetState> {
        match self {
            WidgetState::ComboIndex(_) => value.as_i64().map(WidgetState::ComboIndex),
            WidgetState::Checked(_) => value.as_bool().map(WidgetState::Checked),
            WidgetState::Toggle { checkable, .. } => value.as_bool().map(|checked| {
                WidgetState::Toggle {
                    checkable: *checkable,
                    checked,
                }
            }),
            WidgetState::Int(_) => value.as_i64().map(WidgetState::Int),
            WidgetState::Float(_) => value.as_f64().map(WidgetState::Float),
            WidgetState::Text(_) => value.as_str().map(|s| WidgetState::Text(s.to_string())),
            WidgetState::Size { .. } => {
                pair(value).map(|(width, height)| WidgetState::Size { width, height })
            }
            WidgetState::Point { .. } => pair(value).map(|(x, y)| WidgetState::Point { x, y }),
        }
    }
}

fn pair(value: &SettingValue) -> Option<(i64, i64)> {
    match value.as_list()? {
        [a, b] => Some((a.as_i64()?, b.as_i64()?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_checkable_toggle_has_no_value() {
        let state = WidgetState::Toggle {
            checkable: false,
            checked: true,
        };
        assert_eq!(state.to_value(), None);
    }

    #[test]
    fn test_negative_combo_index_defaults_to_zero() {
        assert_eq!(
            WidgetState::ComboIndex(-1).default_value(),
            Some(SettingValue::Int(0))
        );
    }

    #[test]
    fn test_size_round_trips_through_list_value() {
        // Arrange
        let state = WidgetState::Size {
            width: 640,
            height: 480,
        };

        // Act
        let value = state.to_value().expect("size has a value");
        let restored = state.with_value(&value);

        // Assert
        assert_eq!(restored, Some(state));
        assert!(WidgetState::Point { x: 0, y: 0 }.needs_eval());
    }

    #[test]
    fn test_with_value_rejects_wrong_shape() {
        let state = WidgetState::Point { x: 0, y: 0 };
        assert_eq!(state.with_value(&SettingValue::from(vec![1, 2, 3])), None);
        assert_eq!(WidgetState::Checked(false).with_value(&SettingValue::Int(1)), None);
    }
}
