//! The window whose layout is saved and restored.
//!
//! [`LayoutHost`] is the only thing the native store needs from a GUI
//! toolkit: a name, the names of its dock panels, and opaque byte snapshots
//! of geometry and state.  The bytes are never interpreted; they are handed
//! back to the toolkit unchanged.

pub mod mock;

/// A top-level window that can snapshot and restore its layout.
pub trait LayoutHost {
    /// Object name, used as the window's registry group.
    fn object_name(&self) -> &str;

    /// Object names of the window's dock panels.
    fn dock_names(&self) -> Vec<String>;

    fn save_geometry(&self) -> Vec<u8>;

    /// Toolbar and dock arrangement.  `None` for windows without one.
    fn save_state(&self) -> Option<Vec<u8>>;

    /// Returns `false` if the toolkit rejected the snapshot.
    fn restore_geometry(&mut self, data: &[u8]) -> bool;

    /// Returns `false` if the toolkit rejected the snapshot.
    fn restore_state(&mut self, data: &[u8]) -> bool;

    /// Geometry of a dock panel, or `None` if no dock has that name.
    fn dock_geometry(&self, dock: &str) -> Option<Vec<u8>>;

    /// Returns `false` if there is no such dock or the snapshot was rejected.
    fn restore_dock_geometry(&mut self, dock: &str, data: &[u8]) -> bool;
}

impl<H: LayoutHost + ?Sized> LayoutHost for &mut H {
    fn object_name(&self) -> &str {
        (**self).object_name()
    }

    fn dock_names(&self) -> Vec<String> {
        (**self).dock_names()
    }

    fn save_geometry(&self) -> Vec<u8> {
        (**self).save_geometry()
    }

    fn save_state(&self) -> Option<Vec<u8>> {
        (**self).save_state()
    }

    fn restore_geometry(&mut self, data: &[u8]) -> bool {
        (**self).restore_geometry(data)
    }

    fn restore_state(&mut self, data: &[u8]) -> bool {
        (**self).restore_state(data)
    }

    fn dock_geometry(&self, dock: &str) -> Option<Vec<u8>> {
        (**self).dock_geometry(dock)
    }

    fn restore_dock_geometry(&mut self, dock: &str, data: &[u8]) -> bool {
        (**self).restore_dock_geometry(dock, data)
    }
}
