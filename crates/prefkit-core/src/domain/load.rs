use crate::error::SettingsError;

/// What happened when a store read its backing file.
///
/// Reading never leaves a store half-populated: it either holds the file's
/// entries, or it is empty.  The variants let a caller tell a file that was
/// never written apart from one that was corrupt and got discarded.
#[derive(Debug, Default)]
pub enum LoadReport {
    /// The file was absent or contained no entries.
    #[default]
    Empty,
    /// The file was read successfully.
    Loaded { entries: usize },
    /// The file could not be parsed; the store was reset to empty.
    Recovered { error: SettingsError },
}

impl LoadReport {
    /// Builds `Empty` or `Loaded` from an entry count.
    pub fn from_entries(entries: usize) -> Self {
        if entries == 0 {
            LoadReport::Empty
        } else {
            LoadReport::Loaded { entries }
        }
    }

    /// `true` when the file was discarded because it was malformed.
    pub fn is_recovered(&self) -> bool {
        matches!(self, LoadReport::Recovered { .. })
    }

    pub fn entries(&self) -> usize {
        match self {
            LoadReport::Loaded { entries } => *entries,
            _ => 0,
        }
    }
}
