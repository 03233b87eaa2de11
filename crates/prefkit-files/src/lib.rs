//! prefkit-files library entry point.
//!
//! File-backed settings stores and the ambient pieces around them.
//!
//! # Which store should I use? (for beginners)
//!
//! - [`TextSettings`] – one `name = value` line per setting.  Every `set`
//!   rewrites the file immediately.  Easy to read and hand-edit.
//! - [`JsonSettings`] – the same interface, stored as a JSON object.
//! - [`IniSettings`] – options grouped in `[sections]`.  Writes are batched:
//!   nothing reaches the disk until `save()`, `close()` or drop.
//!
//! The `config`, `paths` and `logging` modules are shared helpers: the store
//! configuration file, platform directories, and `tracing` setup.

pub mod config;
pub mod file_settings;
pub mod fs;
pub mod ini_settings;
pub mod logging;
pub mod paths;

pub use file_settings::{FileSettings, JsonSettings, TextSettings};
pub use ini_settings::{IniSettings, SectionScope};
