//! INI document model.
//!
//! # What does an INI file look like? (for beginners)
//!
//! ```ini
//! [DEFAULT]
//! units = cm
//!
//! [Audio]
//! volume = 0.75
//! muted: False
//! ; comment lines start with ';' or '#'
//! notes = first line
//!     second line
//! ```
//!
//! Options live inside `[sections]`.  Keys and values are separated by `=` or
//! `:`.  An indented line continues the previous value, and blank lines
//! inside a value are kept.  Options in the special `[DEFAULT]` section are
//! visible from every other section unless that section overrides them.
//!
//! [`IniDocument`] keeps every value as a string and keeps sections and keys
//! in file order.  Keys are stored exactly as given; stores that want
//! case-insensitive option names fold them before calling in.

use indexmap::IndexMap;

use crate::error::SettingsError;

/// Name of the section whose options act as fallbacks for every section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

type Options = IndexMap<String, String>;

/// An in-memory INI file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IniDocument {
    defaults: Options,
    sections: IndexMap<String, Options>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses INI text.
    ///
    /// A section header appearing twice merges into one section; a repeated
    /// option keeps the last value.  While an option is open, indented lines
    /// and blank lines belong to its value, even when they look like
    /// comments.  Blank lines at the end of a value are dropped.  Names are
    /// unescaped as described on [`render`](Self::render).
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] naming the 1-based line for an option
    /// before the first section header, a line without a `=`/`:` delimiter,
    /// or an empty key.
    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        let mut doc = IniDocument::new();
        let mut section: Option<String> = None;
        let mut last_key: Option<String> = None;
        let mut pending_blanks = 0usize;

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim();

            if let (Some(current), Some(key)) = (&section, &last_key) {
                if trimmed.is_empty() {
                    pending_blanks += 1;
                    continue;
                }
                if line.starts_with(char::is_whitespace) {
                    if let Some(value) = doc.options_mut(current).get_mut(key) {
                        for _ in 0..=pending_blanks {
                            value.push('\n');
                        }
                        value.push_str(trimmed);
                    }
                    pending_blanks = 0;
                    continue;
                }
            }
            last_key = None;
            pending_blanks = 0;

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if let Some(name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                let name = unescape_name(name.trim());
                if name != DEFAULT_SECTION {
                    doc.sections.entry(name.clone()).or_default();
                }
                section = Some(name);
                continue;
            }

            let Some(split) = trimmed.find(['=', ':']) else {
                return Err(parse_error(line_no, "expected `key = value`"));
            };
            let key = trimmed[..split].trim();
            let value = trimmed[split + 1..].trim();
            if key.is_empty() {
                return Err(parse_error(line_no, "empty option name"));
            }
            let Some(current) = &section else {
                return Err(parse_error(line_no, "option appears before any [section] header"));
            };
            let key = unescape_name(key);
            doc.options_mut(current).insert(key.clone(), value.to_string());
            last_key = Some(key);
        }

        Ok(doc)
    }

    /// Renders the document.  Multi-line values are written as indented
    /// continuation lines.
    ///
    /// Characters that would change how a name reads back are written as
    /// `%XX`: `%` itself, `=` and `:` in keys, line breaks, a leading `[`,
    /// `#` or `;`, and surrounding whitespace.  [`parse`](Self::parse)
    /// reverses this, so any key or section name survives a round trip.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.defaults.is_empty() {
            render_section(&mut out, DEFAULT_SECTION, &self.defaults);
        }
        for (name, options) in &self.sections {
            render_section(&mut out, name, options);
        }
        out
    }

    // ── Sections ──────────────────────────────────────────────────────────────

    /// Returns `true` if a regular section exists.  `DEFAULT` is never
    /// reported as a section.
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Section names in file order, excluding `DEFAULT`.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Adds an empty section.  Returns `false` if it already exists or the
    /// name is `DEFAULT`.
    pub fn add_section(&mut self, section: &str) -> bool {
        if section == DEFAULT_SECTION || self.sections.contains_key(section) {
            return false;
        }
        self.sections.insert(section.to_string(), Options::new());
        true
    }

    /// Removes a section and all of its options.
    pub fn remove_section(&mut self, section: &str) -> bool {
        self.sections.shift_remove(section).is_some()
    }

    // ── Options ───────────────────────────────────────────────────────────────

    /// Looks up an option, falling back to `DEFAULT`.
    ///
    /// Returns `None` when the section does not exist, even if `DEFAULT`
    /// holds the key.  Passing `DEFAULT` as the section reads the defaults.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        if section == DEFAULT_SECTION {
            return self.defaults.get(key).map(String::as_str);
        }
        let options = self.sections.get(section)?;
        options
            .get(key)
            .or_else(|| self.defaults.get(key))
            .map(String::as_str)
    }

    pub fn has_option(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    /// Sets an option, creating the section if needed.  An empty key cannot
    /// be written to a file and is ignored; returns `false` in that case.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) -> bool {
        if key.is_empty() {
            return false;
        }
        self.options_mut(section).insert(key.to_string(), value.into());
        true
    }

    /// Removes an option from the section itself (not from `DEFAULT`).
    pub fn remove(&mut self, section: &str, key: &str) -> bool {
        let options = if section == DEFAULT_SECTION {
            &mut self.defaults
        } else {
            match self.sections.get_mut(section) {
                Some(options) => options,
                None => return false,
            }
        };
        options.shift_remove(key).is_some()
    }

    /// Option names visible from `section`: its own keys, then defaults it
    /// does not override.
    pub fn options(&self, section: &str) -> Vec<&str> {
        let Some(own) = self.sections.get(section) else {
            return Vec::new();
        };
        own.keys()
            .chain(self.defaults.keys().filter(|k| !own.contains_key(*k)))
            .map(String::as_str)
            .collect()
    }

    /// Every `(section, key, value)` triple, in file order.
    ///
    /// `DEFAULT` entries come first and are reported once, under `DEFAULT`.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        let defaults = self
            .defaults
            .iter()
            .map(|(k, v)| (DEFAULT_SECTION, k.as_str(), v.as_str()));
        let sections = self.sections.iter().flat_map(|(name, options)| {
            options
                .iter()
                .map(move |(k, v)| (name.as_str(), k.as_str(), v.as_str()))
        });
        defaults.chain(sections)
    }

    /// `true` when there are no sections and no defaults.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.defaults.is_empty()
    }

    fn options_mut(&mut self, section: &str) -> &mut Options {
        if section == DEFAULT_SECTION {
            &mut self.defaults
        } else {
            self.sections.entry(section.to_string()).or_default()
        }
    }
}

fn render_section(out: &mut String, name: &str, options: &Options) {
    out.push('[');
    out.push_str(&escape_name(name, false));
    out.push_str("]\n");
    for (key, value) in options {
        out.push_str(&escape_name(key, true));
        out.push_str(" = ");
        out.push_str(&value.replace('\n', "\n\t"));
        out.push('\n');
    }
    out.push('\n');
}

// ── Name escaping ───────────────────────────────────────────────────────────

fn escape_name(name: &str, is_key: bool) -> String {
    let last = name.chars().count().saturating_sub(1);
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        let edge = i == 0 || i == last;
        let escaped = match c {
            '%' => Some("%25"),
            '\n' => Some("%0A"),
            '\r' => Some("%0D"),
            '=' if is_key => Some("%3D"),
            ':' if is_key => Some("%3A"),
            ' ' if edge => Some("%20"),
            '\t' if edge => Some("%09"),
            '[' if i == 0 && is_key => Some("%5B"),
            '#' if i == 0 && is_key => Some("%23"),
            ';' if i == 0 && is_key => Some("%3B"),
            _ => None,
        };
        match escaped {
            Some(code) => out.push_str(code),
            None => out.push(c),
        }
    }
    out
}

/// Decodes only the sequences [`escape_name`] produces; any other `%` is
/// kept as written.
fn unescape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(at) = rest.find('%') {
        out.push_str(&rest[..at]);
        let code = rest.get(at + 1..at + 3).unwrap_or("");
        let decoded = match code.to_ascii_uppercase().as_str() {
            "25" => Some('%'),
            "0A" => Some('\n'),
            "0D" => Some('\r'),
            "3D" => Some('='),
            "3A" => Some(':'),
            "20" => Some(' '),
            "09" => Some('\t'),
            "5B" => Some('['),
            "23" => Some('#'),
            "3B" => Some(';'),
            _ => None,
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[at + 3..];
            }
            None => {
                out.push('%');
                rest = &rest[at + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn parse_error(line: usize, message: &str) -> SettingsError {
    SettingsError::Parse(format!("INI line {line}: {message}"))
}
