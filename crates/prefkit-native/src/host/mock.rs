//! Mock window for unit testing.
//!
//! The real hosts are GUI windows, which need a display server and cannot be
//! inspected from test code.  [`MockWindow`] keeps its "geometry" and
//! "state" as plain byte vectors and records every restore call, so tests
//! can assert exactly what a layout operation handed back to the window.
//!
//! # Usage in tests
//!
//! ```ignore
//! let mut window = MockWindow::main_window("MainWindow").with_dock("Outliner", b"dock");
//! let mut settings = NativeSettings::new(MemoryRegistry::new(), &mut window, 10);
//! settings.save_layout("review");
//! ```

use super::LayoutHost;

/// A window that records layout calls instead of touching a toolkit.
#[derive(Debug, Clone, Default)]
pub struct MockWindow {
    pub name: String,
    pub geometry: Vec<u8>,
    /// `None` models a plain dialog with no dock/toolbar state.
    pub state: Option<Vec<u8>>,
    /// `(dock name, geometry)` pairs in creation order.
    pub docks: Vec<(String, Vec<u8>)>,
    /// Every snapshot passed to `restore_geometry`.
    pub restored_geometry: Vec<Vec<u8>>,
    /// Every snapshot passed to `restore_state`.
    pub restored_state: Vec<Vec<u8>>,
    /// Every `(dock, snapshot)` passed to `restore_dock_geometry`.
    pub restored_docks: Vec<(String, Vec<u8>)>,
}

impl MockWindow {
    /// A main window with geometry and state snapshots.
    pub fn main_window(name: &str) -> Self {
        Self {
            name: name.to_string(),
            geometry: format!("{name}-geometry").into_bytes(),
            state: Some(format!("{name}-state").into_bytes()),
            ..Self::default()
        }
    }

    /// A window without toolbar/dock state.
    pub fn dialog(name: &str) -> Self {
        Self {
            name: name.to_string(),
            geometry: format!("{name}-geometry").into_bytes(),
            ..Self::default()
        }
    }

    pub fn with_dock(mut self, name: &str, geometry: &[u8]) -> Self {
        self.docks.push((name.to_string(), geometry.to_vec()));
        self
    }
}

impl LayoutHost for MockWindow {
    fn object_name(&self) -> &str {
        &self.name
    }

    fn dock_names(&self) -> Vec<String> {
        self.docks.iter().map(|(name, _)| name.clone()).collect()
    }

    fn save_geometry(&self) -> Vec<u8> {
        self.geometry.clone()
    }

    fn save_state(&self) -> Option<Vec<u8>> {
        self.state.clone()
    }

    fn restore_geometry(&mut self, data: &[u8]) -> bool {
        self.geometry = data.to_vec();
        self.restored_geometry.push(data.to_vec());
        true
    }

    fn restore_state(&mut self, data: &[u8]) -> bool {
        if self.state.is_none() {
            return false;
        }
        self.state = Some(data.to_vec());
        self.restored_state.push(data.to_vec());
        true
    }

    fn dock_geometry(&self, dock: &str) -> Option<Vec<u8>> {
        self.docks
            .iter()
            .find(|(name, _)| name == dock)
            .map(|(_, geometry)| geometry.clone())
    }

    fn restore_dock_geometry(&mut self, dock: &str, data: &[u8]) -> bool {
        let Some(slot) = self.docks.iter_mut().find(|(name, _)| name == dock) else {
            return false;
        };
        slot.1 = data.to_vec();
        self.restored_docks.push((dock.to_string(), data.to_vec()));
        true
    }
}
