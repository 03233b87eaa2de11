//! Small file-system helpers shared by the stores.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use prefkit_core::{RetryPolicy, SettingsError};

/// Creates `path` (and its parent directories) if it does not exist.
/// An existing file is left untouched.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] if a directory or the file cannot be created.
pub fn ensure_file(path: &Path) -> Result<(), SettingsError> {
    ensure_parent(path)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(drop)
        .map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Reads a whole file, returning `None` if it does not exist.
///
/// # Errors
///
/// Returns [`SettingsError::Parse`] for a file that is not valid UTF-8 and
/// [`SettingsError::Io`] for any other read failure.
pub fn read_optional(path: &Path) -> Result<Option<String>, SettingsError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) if e.kind() == ErrorKind::InvalidData => Err(SettingsError::Parse(format!(
            "{} is not valid UTF-8 text",
            path.display()
        ))),
        Err(source) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `contents` to `path`, creating parent directories, retrying per
/// `policy`.
///
/// # Errors
///
/// Returns [`SettingsError::WriteFailure`] once the policy gives up.
pub fn write_with_retry(path: &Path, contents: &str, policy: &RetryPolicy) -> Result<(), SettingsError> {
    policy.run(path, || {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, contents)
    })
}

fn ensure_parent(path: &Path) -> Result<(), SettingsError> {
    match path.parent().filter(|d| !d.as_os_str().is_empty()) {
        Some(dir) => fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
            path: dir.to_path_buf(),
            source,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("prefkit_fs_test_{}", Uuid::new_v4()))
    }

    #[test]
    fn test_ensure_file_creates_directories_and_keeps_content() {
        // Arrange
        let dir = scratch_dir();
        let path = dir.join("nested").join("settings.cfg");

        // Act
        ensure_file(&path).expect("create");
        fs::write(&path, "a = 1\n").unwrap();
        ensure_file(&path).expect("second call");

        // Assert
        assert_eq!(fs::read_to_string(&path).unwrap(), "a = 1\n");

        // Cleanup
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_read_optional_missing_file_is_none() {
        let path = scratch_dir().join("absent.json");
        assert!(read_optional(&path).unwrap().is_none());
    }

    #[test]
    fn test_read_optional_rejects_binary_as_parse_error() {
        // Arrange
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("binary.cfg");
        fs::write(&path, [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        // Act
        let err = read_optional(&path).unwrap_err();

        // Assert
        assert!(err.is_parse());

        // Cleanup
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_with_retry_creates_parent_directory() {
        let dir = scratch_dir();
        let path = dir.join("deep").join("prefs.ini");

        write_with_retry(&path, "[A]\n", &RetryPolicy::once()).expect("write");

        assert_eq!(fs::read_to_string(&path).unwrap(), "[A]\n");
        fs::remove_dir_all(&dir).ok();
    }
}
