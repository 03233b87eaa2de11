//! # prefkit-core
//!
//! Shared library for the prefkit settings stores containing the setting
//! value model, the restricted literal grammar, the on-disk format codecs and
//! the error taxonomy.
//!
//! This crate does no file I/O.  It is used by `prefkit-files` (text, JSON and
//! INI stores) and `prefkit-native` (the toolkit-style registry store).
//!
//! # Architecture overview (for beginners)
//!
//! A *settings store* binds names to values and persists them to a backing
//! file.  Several on-disk formats are supported, and each store variant picks
//! one of them.  This crate is the part that does not care where the bytes
//! end up:
//!
//! - **`domain`** – The [`SettingValue`] tagged union (null, boolean, integer,
//!   float, string, list), the ordered [`SettingsMap`], the toolkit-neutral
//!   [`WidgetState`] and the [`LoadReport`] returned after reading a file.
//!
//! - **`format`** – Pure text transformations.  The literal grammar turns
//!   `0.75` or `"hello"` into typed values without evaluating arbitrary
//!   expressions; the text, JSON and INI codecs turn a whole file into a map
//!   and back.
//!
//! - **`retry`** – The bounded write-retry policy used by every file-backed
//!   store.
//!
//! - **`store`** – The [`SettingsStore`] trait implemented by the flat stores.

pub mod domain;
pub mod error;
pub mod format;
pub mod retry;
pub mod store;

pub use domain::load::LoadReport;
pub use domain::value::{SettingValue, SettingsMap};
pub use domain::widget::WidgetState;
pub use error::SettingsError;
pub use format::ini::IniDocument;
pub use format::literal::{parse_literal, parse_literal_lossy, to_literal};
pub use format::{JsonFormat, SettingsFormat, TextFormat};
pub use retry::RetryPolicy;
pub use store::SettingsStore;
