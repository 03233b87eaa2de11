//! The toolkit-style settings store.
//!
//! [`NativeSettings`] combines a [`NativeRegistry`] with the [`LayoutHost`]
//! window it belongs to, and adds:
//!
//! - **Window layouts.**  A named layout is a set of byte snapshots stored
//!   under `<window>/geometry/<layout>`, `<window>/windowState/<layout>` and
//!   `<dock>/geometry/<layout>`.  Snapshots are base64-encoded strings.
//! - **Recent files.**  A bounded, de-duplicated list stored as an array:
//!   `RecentFiles/size` plus `RecentFiles/<i>/file`, `i` counting from 1.
//! - **Preference groups.**  A caller-managed list of group names, and a
//!   `default` lookup that walks a group path.
//!
//! Changes are written when the registry syncs; call
//! [`sync`](NativeSettings::sync) or let the registry flush on drop.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use prefkit_core::{SettingValue, SettingsError, SettingsStore};
use prefkit_files::config::NativeConfig;
use tracing::{debug, info};

use crate::host::LayoutHost;
use crate::registry::NativeRegistry;

/// Group holding the recent-files array.
pub const RECENT_FILES_GROUP: &str = "RecentFiles";

/// Group whose direct keys are reported by [`NativeSettings::prefs_keys`].
pub const PREFERENCES_GROUP: &str = "Preferences";

/// Layout stored when a window is seen for the first time.
pub const DEFAULT_LAYOUT: &str = "default";

const GEOMETRY_MARKER: &str = "/geometry/";

/// Settings store backed by a registry and bound to a window.
#[derive(Debug)]
pub struct NativeSettings<R: NativeRegistry, H: LayoutHost> {
    registry: R,
    host: H,
    groups: Vec<String>,
    max_files: usize,
}

impl<R: NativeRegistry, H: LayoutHost> NativeSettings<R, H> {
    /// Creates the store and initialises a fresh registry.
    ///
    /// If the window has no group yet, its current layout is stored as
    /// `default`.  If there is no recent-files array, an empty one is
    /// written.  `max_files` bounds the recent-files list (at least 1).
    pub fn new(registry: R, host: H, max_files: usize) -> Self {
        let groups = vec![host.object_name().to_string(), RECENT_FILES_GROUP.to_string()];
        let mut settings = Self {
            registry,
            host,
            groups,
            max_files: max_files.max(1),
        };
        settings.initialize();
        settings
    }

    /// Creates the store with the `[native]` section of the store config.
    pub fn from_config(registry: R, host: H, config: &NativeConfig) -> Self {
        Self::new(registry, host, config.max_recent_files)
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Releases the registry and host.
    pub fn into_parts(self) -> (R, H) {
        (self.registry, self.host)
    }

    // ── Values ────────────────────────────────────────────────────────────────

    pub fn get(&self, key: &str) -> Option<SettingValue> {
        self.registry.value(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<SettingValue>) {
        self.registry.set_value(key, value.into());
    }

    pub fn has_setting(&self, key: &str) -> bool {
        self.registry.contains(key)
    }

    /// Writes pending changes to the registry's backing store.
    ///
    /// # Errors
    ///
    /// Returns the registry's write error.
    pub fn sync(&mut self) -> Result<(), SettingsError> {
        self.registry.sync()
    }

    // ── Groups ────────────────────────────────────────────────────────────────

    /// Preference groups, starting with the window name and `RecentFiles`.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Adds a group.  Returns `false` if it is already listed.
    pub fn add_group(&mut self, group: &str) -> bool {
        if self.groups.iter().any(|g| g == group) {
            return false;
        }
        self.groups.push(group.to_string());
        true
    }

    /// Removes a group from the list.  Stored keys are not touched.
    pub fn remove_group(&mut self, group: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g != group);
        self.groups.len() != before
    }

    /// Direct keys of the `Preferences` group.
    pub fn prefs_keys(&self) -> Vec<String> {
        self.registry.child_keys(PREFERENCES_GROUP)
    }

    /// Looks up `<g1>/<g2>/.../default/<key>`.
    pub fn default_value(&self, key: &str, groups: &[&str]) -> Option<SettingValue> {
        let mut path: Vec<&str> = groups.to_vec();
        path.push(DEFAULT_LAYOUT);
        path.push(key);
        self.registry.value(&path.join("/"))
    }

    // ── Layouts ───────────────────────────────────────────────────────────────

    /// The window name followed by its dock names.
    pub fn window_keys(&self) -> Vec<String> {
        let mut keys = vec![self.host.object_name().to_string()];
        keys.extend(self.host.dock_names());
        keys
    }

    /// Names of every stored layout, sorted and de-duplicated.
    pub fn layouts(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .registry
            .all_keys()
            .iter()
            .filter_map(|key| key.rsplit_once(GEOMETRY_MARKER).map(|(_, name)| name.to_string()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Snapshots the window and its docks under `layout`.
    pub fn save_layout(&mut self, layout: &str) {
        info!(layout, "saving layout");
        let window = self.host.object_name().to_string();

        let geometry = self.host.save_geometry();
        self.put_bytes(&geometry_key(&window, layout), &geometry);
        if let Some(state) = self.host.save_state() {
            self.put_bytes(&state_key(&window, layout), &state);
        }

        for dock in self.host.dock_names() {
            if let Some(geometry) = self.host.dock_geometry(&dock) {
                self.put_bytes(&geometry_key(&dock, layout), &geometry);
            }
        }
    }

    /// Restores the window and its docks from `layout`.
    ///
    /// Docks without a stored snapshot are left as they are.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotFound`] if the window has no geometry
    /// stored for `layout`, or [`SettingsError::Parse`] if a snapshot is not
    /// valid base64.
    pub fn restore_layout(&mut self, layout: &str) -> Result<(), SettingsError> {
        info!(layout, "restoring layout");
        let window = self.host.object_name().to_string();

        let geometry = self
            .get_bytes(&geometry_key(&window, layout))?
            .ok_or_else(|| SettingsError::NotFound(format!("layout '{layout}'")))?;
        if !self.host.restore_geometry(&geometry) {
            debug!(layout, "window rejected geometry snapshot");
        }

        if let Some(state) = self.get_bytes(&state_key(&window, layout))? {
            if !self.host.restore_state(&state) {
                debug!(layout, "window rejected state snapshot");
            }
        }

        for dock in self.host.dock_names() {
            if let Some(geometry) = self.get_bytes(&geometry_key(&dock, layout))? {
                if !self.host.restore_dock_geometry(&dock, &geometry) {
                    debug!(layout, dock = %dock, "dock rejected geometry snapshot");
                }
            }
        }
        Ok(())
    }

    /// Removes every snapshot of `layout` for the window and its docks.
    pub fn delete_layout(&mut self, layout: &str) {
        info!(layout, "deleting layout");
        let window = self.host.object_name().to_string();
        for name in self.window_keys() {
            self.registry.remove(&geometry_key(&name, layout));
        }
        self.registry.remove(&state_key(&window, layout));
    }

    // ── Recent files ──────────────────────────────────────────────────────────

    /// Recent files, oldest first.
    pub fn recent_files(&self) -> Vec<String> {
        let size = self
            .registry
            .value(&format!("{RECENT_FILES_GROUP}/size"))
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        // Bounded by the entries present, whatever the stored size says.
        let prefix = format!("{RECENT_FILES_GROUP}/");
        let stored = self
            .registry
            .all_keys()
            .iter()
            .filter(|k| k.starts_with(&prefix) && k.ends_with("/file"))
            .count();
        let size = size.clamp(0, i64::try_from(stored).unwrap_or(i64::MAX));
        (1..=size)
            .filter_map(|i| {
                self.registry
                    .value(&recent_file_key(i))
                    .and_then(|v| v.as_str().map(str::to_string))
            })
            .collect()
    }

    /// Adds `path` as the most recent file.
    ///
    /// An existing entry is moved to the end; the oldest entries are dropped
    /// beyond the length limit.
    pub fn add_recent_file(&mut self, path: &str) {
        let mut files = self.recent_files();
        files.retain(|f| f != path);
        files.push(path.to_string());
        if files.len() > self.max_files {
            let excess = files.len() - self.max_files;
            files.drain(..excess);
        }
        self.write_recent_files(&files);
    }

    /// Removes the recent-files array.
    pub fn clear_recent_files(&mut self) {
        self.registry.remove(RECENT_FILES_GROUP);
    }

    // ── Backing store ─────────────────────────────────────────────────────────

    /// Deletes the registry's backing file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotFound`] if the registry has no file.
    pub fn delete_file(&mut self) -> Result<(), SettingsError> {
        if let Some(path) = self.registry.file_path() {
            info!(path = %path.display(), "deleting settings");
        }
        self.registry.delete_backing_store()
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn initialize(&mut self) {
        let window = self.host.object_name().to_string();
        let existing = self.registry.child_groups();

        if !existing.iter().any(|g| *g == window) {
            let geometry = self.host.save_geometry();
            self.put_bytes(&geometry_key(&window, DEFAULT_LAYOUT), &geometry);
            if let Some(state) = self.host.save_state() {
                self.put_bytes(&state_key(&window, DEFAULT_LAYOUT), &state);
            }
        }

        if !existing.iter().any(|g| g == RECENT_FILES_GROUP) {
            self.write_recent_files(&[]);
        }
    }

    fn write_recent_files(&mut self, files: &[String]) {
        self.registry.remove(RECENT_FILES_GROUP);
        for (i, file) in (1..).zip(files) {
            self.registry
                .set_value(&recent_file_key(i), SettingValue::Str(file.clone()));
        }
        self.registry.set_value(
            &format!("{RECENT_FILES_GROUP}/size"),
            SettingValue::Int(files.len() as i64),
        );
    }

    fn put_bytes(&mut self, key: &str, bytes: &[u8]) {
        self.registry
            .set_value(key, SettingValue::Str(STANDARD.encode(bytes)));
    }

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        let Some(value) = self.registry.value(key) else {
            return Ok(None);
        };
        let encoded = value.as_str().ok_or_else(|| {
            SettingsError::Parse(format!("{key} holds a {}, not a snapshot", value.type_name()))
        })?;
        STANDARD
            .decode(encoded)
            .map(Some)
            .map_err(|e| SettingsError::Parse(format!("{key} is not valid base64: {e}")))
    }
}

impl<R: NativeRegistry, H: LayoutHost> SettingsStore for NativeSettings<R, H> {
    fn value(&self, name: &str) -> Option<SettingValue> {
        self.get(name)
    }

    fn set_value(&mut self, name: &str, value: SettingValue) -> Result<(), SettingsError> {
        self.set(name, value);
        Ok(())
    }
}

fn geometry_key(owner: &str, layout: &str) -> String {
    format!("{owner}/geometry/{layout}")
}

fn state_key(window: &str, layout: &str) -> String {
    format!("{window}/windowState/{layout}")
}

fn recent_file_key(index: i64) -> String {
    format!("{RECENT_FILES_GROUP}/{index}/file")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
