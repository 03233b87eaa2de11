//! Native store over an INI-file registry, re-opened from disk.

use std::path::PathBuf;

use prefkit_core::{SettingValue, SettingsError};
use prefkit_files::config::NativeConfig;
use prefkit_native::host::mock::MockWindow;
use prefkit_native::{IniRegistry, NativeRegistry, NativeSettings};
use uuid::Uuid;

fn scratch_file() -> (PathBuf, PathBuf) {
    let dir = std::env::temp_dir().join(format!("prefkit_native_test_{}", Uuid::new_v4()));
    let file = dir.join("MainWindow.ini");
    (dir, file)
}

fn main_window() -> MockWindow {
    MockWindow::main_window("MainWindow").with_dock("Outliner", b"outliner-geometry")
}

#[test]
fn test_layouts_and_recent_files_survive_reopen() {
    // Arrange
    let (dir, path) = scratch_file();
    let mut window = main_window();
    {
        let registry = IniRegistry::open(&path).unwrap();
        let mut settings = NativeSettings::new(registry, &mut window, 10);
        settings.save_layout("review");
        settings.add_recent_file("/shows/abc/shot010.ma");
        settings.add_recent_file("/shows/abc/shot020.ma");
        settings.set("Preferences/units", "cm");
        settings.sync().expect("sync");
    }

    // Act
    window.geometry = b"somewhere else".to_vec();
    let registry = IniRegistry::open(&path).unwrap();
    let mut settings = NativeSettings::new(registry, &mut window, 10);
    settings.restore_layout("review").expect("restore");

    // Assert
    assert_eq!(settings.layouts(), vec!["default", "review"]);
    assert_eq!(
        settings.recent_files(),
        vec!["/shows/abc/shot010.ma", "/shows/abc/shot020.ma"]
    );
    assert_eq!(settings.prefs_keys(), vec!["units"]);
    assert_eq!(settings.get("Preferences/units"), Some(SettingValue::Str("cm".into())));
    drop(settings);
    assert_eq!(window.geometry, b"MainWindow-geometry");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_layout_names_with_delimiters_survive_reopen() {
    // Arrange
    let (dir, path) = scratch_file();
    let mut window = main_window();
    {
        let registry = IniRegistry::open(&path).unwrap();
        let mut settings = NativeSettings::new(registry, &mut window, 10);
        settings.save_layout("Anim: wide");
        settings.save_layout("a=b");
        settings.sync().expect("sync");
    }

    // Act
    window.geometry = b"somewhere else".to_vec();
    let registry = IniRegistry::open(&path).unwrap();
    let mut settings = NativeSettings::new(registry, &mut window, 10);
    let restored = settings.restore_layout("Anim: wide");

    // Assert
    assert!(restored.is_ok(), "got: {restored:?}");
    assert_eq!(settings.layouts(), vec!["Anim: wide", "a=b", "default"]);
    drop(settings);
    assert_eq!(window.geometry, b"MainWindow-geometry");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_registry_flushes_on_drop() {
    let (dir, path) = scratch_file();
    {
        let registry = IniRegistry::open(&path).unwrap();
        let _settings = NativeSettings::new(registry, main_window(), 10);
    }

    let registry = IniRegistry::open(&path).unwrap();

    assert!(registry.contains("MainWindow/geometry/default"));
    assert_eq!(registry.value("RecentFiles/size"), Some(SettingValue::Int(0)));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_recent_file_limit_comes_from_config() {
    // Arrange
    let (dir, path) = scratch_file();
    let config = NativeConfig { max_recent_files: 2 };
    let registry = IniRegistry::open(&path).unwrap();
    let mut settings = NativeSettings::from_config(registry, main_window(), &config);

    // Act
    for name in ["a", "b", "c"] {
        settings.add_recent_file(&format!("/shows/{name}.ma"));
    }

    // Assert
    assert_eq!(settings.recent_files(), vec!["/shows/b.ma", "/shows/c.ma"]);
    drop(settings);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_delete_file_removes_backing_store() {
    // Arrange
    let (dir, path) = scratch_file();
    let registry = IniRegistry::open(&path).unwrap();
    let mut settings = NativeSettings::new(registry, main_window(), 10);
    settings.sync().unwrap();
    assert!(path.is_file());

    // Act
    settings.delete_file().expect("delete");

    // Assert
    assert!(!path.exists());
    assert!(matches!(settings.delete_file(), Err(SettingsError::NotFound(_))));

    drop(settings);
    std::fs::remove_dir_all(&dir).ok();
}
