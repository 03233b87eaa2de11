//! Restricted literal grammar for stored setting values.
//!
//! The text store writes each value in a literal form (`"hello"`, `0.75`,
//! `True`, `None`, `[1, 2]`) and reads it back with this parser.  Only plain
//! literals are recognised; nothing is ever evaluated.
//!
//! ```text
//! value  := null | bool | number | string | list
//! null   := "None" | "null"
//! bool   := "True" | "true" | "False" | "false"
//! number := int | float | "inf" | "-inf" | "NaN"
//! string := '"' chars '"' | "'" chars "'"
//! list   := "[" [value ("," value)* [","]] "]"
//!         | "(" [value ("," value)* [","]] ")"
//! ```
//!
//! A parenthesised single value without a comma, `(5)`, is just that value.

use crate::domain::value::SettingValue;
use crate::error::SettingsError;

/// Parses a complete literal.
///
/// # Errors
///
/// Returns [`SettingsError::Parse`] if `input` is not a single well-formed
/// literal (surrounding whitespace is allowed).
///
/// # Examples
///
/// ```rust
/// use prefkit_core::{parse_literal, SettingValue};
///
/// assert_eq!(parse_literal("0.75").unwrap(), SettingValue::Float(0.75));
/// assert_eq!(parse_literal("'cam_main'").unwrap(), SettingValue::from("cam_main"));
/// assert!(parse_literal("__import__('os')").is_err());
/// ```
pub fn parse_literal(input: &str) -> Result<SettingValue, SettingsError> {
    let mut cursor = Cursor::new(input);
    let value = cursor.value()?;
    cursor.skip_ws();
    if !cursor.at_end() {
        return Err(cursor.error("unexpected trailing input"));
    }
    Ok(value)
}

/// Parses a literal, falling back to the trimmed raw text as a string.
pub fn parse_literal_lossy(input: &str) -> SettingValue {
    parse_literal(input).unwrap_or_else(|_| SettingValue::Str(input.trim().to_string()))
}

/// Renders a value in the form [`parse_literal`] reads back.
pub fn to_literal(value: &SettingValue) -> String {
    let mut out = String::new();
    write_literal(value, &mut out);
    out
}

fn write_literal(value: &SettingValue, out: &mut String) {
    match value {
        SettingValue::Null => out.push_str("None"),
        SettingValue::Bool(true) => out.push_str("True"),
        SettingValue::Bool(false) => out.push_str("False"),
        SettingValue::Int(i) => out.push_str(&i.to_string()),
        // Debug formatting always keeps a fractional part or an exponent
        // (`1.0`, `1e20`), so floats never read back as integers.
        SettingValue::Float(f) => out.push_str(&format!("{f:?}")),
        SettingValue::Str(s) => {
            out.push('"');
            for c in s.chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\t' => out.push_str("\\t"),
                    c => out.push(c),
                }
            }
            out.push('"');
        }
        SettingValue::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_literal(item, out);
            }
            out.push(']');
        }
    }
}

// ── Parser ────────────────────────────────────────────────────────────────────

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, reason: &str) -> SettingsError {
        SettingsError::Parse(format!(
            "invalid literal `{}`: {reason} at offset {}",
            self.input, self.pos
        ))
    }

    fn value(&mut self) -> Result<SettingValue, SettingsError> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("expected a value")),
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                self.string(quote)
            }
            Some('[') => {
                self.bump();
                self.sequence(']').map(|(items, _)| SettingValue::List(items))
            }
            Some('(') => {
                self.bump();
                let (mut items, saw_comma) = self.sequence(')')?;
                if items.len() == 1 && !saw_comma {
                    Ok(items.remove(0))
                } else {
                    Ok(SettingValue::List(items))
                }
            }
            Some(_) => self.atom(),
        }
    }

    fn string(&mut self, quote: char) -> Result<SettingValue, SettingsError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(SettingValue::Str(out)),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some(c @ ('\\' | '"' | '\'')) => out.push(c),
                    // Unknown escapes keep their backslash.
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    /// Parses comma-separated values up to `close`.  Also reports whether a
    /// comma was seen, which distinguishes `(5,)` from `(5)`.
    fn sequence(&mut self, close: char) -> Result<(Vec<SettingValue>, bool), SettingsError> {
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok((items, saw_comma));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => saw_comma = true,
                Some(c) if c == close => return Ok((items, saw_comma)),
                Some(_) => return Err(self.error("expected ',' or closing bracket")),
                None => return Err(self.error("unterminated sequence")),
            }
        }
    }

    fn atom(&mut self) -> Result<SettingValue, SettingsError> {
        let input = self.input;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, ',' | ']' | ')' | '[' | '(') {
                break;
            }
            self.bump();
        }
        let token = &input[start..self.pos];

        match token {
            "None" | "null" => return Ok(SettingValue::Null),
            "True" | "true" => return Ok(SettingValue::Bool(true)),
            "False" | "false" => return Ok(SettingValue::Bool(false)),
            "inf" | "+inf" => return Ok(SettingValue::Float(f64::INFINITY)),
            "-inf" => return Ok(SettingValue::Float(f64::NEG_INFINITY)),
            "NaN" | "nan" => return Ok(SettingValue::Float(f64::NAN)),
            _ => {}
        }

        let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
        if digits.is_empty() || !digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            self.pos = start;
            return Err(self.error("unrecognised token"));
        }

        if digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(i) = token.parse::<i64>() {
                return Ok(SettingValue::Int(i));
            }
        }
        // Exclude words such as "infinity" that f64::from_str would accept.
        if digits.bytes().any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E')) {
            self.pos = start;
            return Err(self.error("malformed number"));
        }
        match token.parse::<f64>() {
            Ok(f) => Ok(SettingValue::Float(f)),
            Err(_) => {
                self.pos = start;
                Err(self.error("malformed number"))
            }
        }
    }
}
