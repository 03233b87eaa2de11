//! prefkit-native library entry point.
//!
//! A settings store modelled on a desktop toolkit's own settings registry:
//! values live under slash-separated keys (`MainWindow/geometry/default`),
//! and the store adds window-layout snapshots and a recent-files list on top.
//!
//! # Layers (for beginners)
//!
//! - **`registry`** – The [`NativeRegistry`] trait: a flat map of
//!   slash-separated keys.  [`IniRegistry`] keeps it in an INI file,
//!   [`MemoryRegistry`] keeps it in memory.
//! - **`host`** – The [`LayoutHost`] trait: whatever window the layouts are
//!   taken from.  A GUI application implements it for its main window;
//!   [`host::mock::MockWindow`] implements it for tests.
//! - **`settings`** – [`NativeSettings`], which combines a registry and a
//!   host into the user-facing store.

pub mod host;
pub mod registry;
pub mod settings;

pub use host::LayoutHost;
pub use registry::ini_file::IniRegistry;
pub use registry::memory::MemoryRegistry;
pub use registry::NativeRegistry;
pub use settings::NativeSettings;
