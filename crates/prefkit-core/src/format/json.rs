//! JSON settings format.
//!
//! Settings are written as one pretty-printed JSON object whose keys keep the
//! store's insertion order.  For reading, an array of `[name, value]` pairs is
//! also accepted; older files were written that way.

use serde_json::{Map, Number, Value};
use tracing::warn;

use crate::domain::value::{SettingValue, SettingsMap};
use crate::error::SettingsError;

/// Serialises the map as a JSON object.
///
/// Non-finite floats have no JSON representation and are written as `null`.
///
/// # Errors
///
/// Returns [`SettingsError::Parse`] if serialisation fails.
pub fn encode(settings: &SettingsMap) -> Result<String, SettingsError> {
    let object: Map<String, Value> = settings
        .iter()
        .map(|(name, value)| (name.clone(), to_json(value)))
        .collect();
    let mut text = serde_json::to_string_pretty(&Value::Object(object))?;
    text.push('\n');
    Ok(text)
}

/// Parses a JSON settings file.  Empty text is an empty map.
///
/// Entries whose value is a JSON object cannot be represented and are
/// skipped with a warning.
///
/// # Errors
///
/// Returns [`SettingsError::Parse`] for invalid JSON or a top-level value
/// that is neither an object nor a list of pairs.
pub fn decode(text: &str) -> Result<SettingsMap, SettingsError> {
    if text.trim().is_empty() {
        return Ok(SettingsMap::new());
    }

    let mut settings = SettingsMap::new();
    match serde_json::from_str::<Value>(text)? {
        Value::Object(object) => {
            for (name, value) in object {
                insert(&mut settings, name, &value);
            }
        }
        Value::Array(pairs) => {
            for pair in pairs {
                match pair {
                    Value::Array(mut kv) if kv.len() == 2 => {
                        let value = kv.pop().unwrap_or(Value::Null);
                        let Some(Value::String(name)) = kv.pop() else {
                            return Err(SettingsError::Parse(
                                "setting pair must start with a string name".into(),
                            ));
                        };
                        insert(&mut settings, name, &value);
                    }
                    _ => {
                        return Err(SettingsError::Parse(
                            "top-level JSON list must contain [name, value] pairs".into(),
                        ))
                    }
                }
            }
        }
        other => {
            return Err(SettingsError::Parse(format!(
                "top-level JSON value must be an object, found {}",
                json_type(&other)
            )))
        }
    }
    Ok(settings)
}

fn insert(settings: &mut SettingsMap, name: String, value: &Value) {
    match from_json(value) {
        Some(v) => {
            settings.insert(name, v);
        }
        None => warn!(setting = %name, "skipping JSON setting with nested object value"),
    }
}

/// Converts a setting value to JSON.
pub fn to_json(value: &SettingValue) -> Value {
    match value {
        SettingValue::Null => Value::Null,
        SettingValue::Bool(b) => Value::Bool(*b),
        SettingValue::Int(i) => Value::Number(Number::from(*i)),
        SettingValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        SettingValue::Str(s) => Value::String(s.clone()),
        SettingValue::List(items) => Value::Array(items.iter().map(to_json).collect()),
    }
}

/// Converts JSON to a setting value.  Returns `None` for objects, at any depth.
pub fn from_json(value: &Value) -> Option<SettingValue> {
    let converted = match value {
        Value::Null => SettingValue::Null,
        Value::Bool(b) => SettingValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SettingValue::Int(i),
            None => SettingValue::Float(n.as_f64()?),
        },
        Value::String(s) => SettingValue::Str(s.clone()),
        Value::Array(items) => {
            SettingValue::List(items.iter().map(from_json).collect::<Option<Vec<_>>>()?)
        }
        Value::Object(_) => return None,
    };
    Some(converted)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_then_decode_preserves_order_and_types() {
        // Arrange
        let mut settings = SettingsMap::new();
        settings.insert("volume".into(), SettingValue::Float(0.75));
        settings.insert("autosave".into(), SettingValue::Bool(true));
        settings.insert("recent".into(), SettingValue::from(vec!["a.ma", "b.ma"]));
        settings.insert("frames".into(), SettingValue::Int(240));

        // Act
        let text = encode(&settings).unwrap();
        let decoded = decode(&text).unwrap();

        // Assert
        assert_eq!(decoded, settings);
        let keys: Vec<_> = decoded.keys().cloned().collect();
        assert_eq!(keys, ["volume", "autosave", "recent", "frames"]);
    }

    #[test]
    fn test_decode_accepts_pair_list_layout() {
        let decoded = decode(r#"[["a", 1], ["b", "two"]]"#).unwrap();
        assert_eq!(decoded["a"], SettingValue::Int(1));
        assert_eq!(decoded["b"], SettingValue::from("two"));
    }

    #[test]
    fn test_decode_rejects_invalid_json_and_scalars() {
        assert!(decode("{ not json").unwrap_err().is_parse());
        assert!(decode("42").unwrap_err().is_parse());
    }

    #[test]
    fn test_decode_empty_text_is_empty_map() {
        assert!(decode("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_decode_skips_nested_objects() {
        let decoded = decode(r#"{"keep": 1, "nested": {"x": 1}}"#).unwrap();
        assert_eq!(decoded.len(), 1);
        assert!(decoded.contains_key("keep"));
    }

    #[test]
    fn test_non_finite_float_is_written_as_null() {
        assert_eq!(to_json(&SettingValue::Float(f64::NAN)), Value::Null);
    }
}
