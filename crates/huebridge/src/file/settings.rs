//! Application settings store.
//!
//! A hierarchical key-value store with change notification and JSON/TOML
//! persistence. It plays the part of the external preference store: the
//! theme layer only reads from it, through
//! [`SettingsPreferences`](crate::SettingsPreferences).
//!
//! # Path-Based Access
//!
//! Keys are paths separated by `.` or `/`:
//!
//! ```
//! use huebridge::file::Settings;
//!
//! let settings = Settings::new();
//! settings.set("appearance.tint", "indigo");
//! settings.set("appearance/color_scheme", "dark");
//!
//! assert_eq!(settings.get_str("appearance/tint").as_deref(), Some("indigo"));
//! assert_eq!(settings.group_keys("appearance").len(), 2);
//! ```
//!
//! # Change Notifications
//!
//! `changed` is emitted with the key path whenever a write actually alters a
//! value. Writing the value that is already stored is silent. `clear` emits
//! an empty path.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use huebridge_core::logging::targets;
use huebridge_core::{Signal, Subscription};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A value that can be stored in settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingsValue {
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit floating point number.
    Float(f64),
    /// A string value.
    String(String),
    /// An array of values.
    Array(Vec<SettingsValue>),
    /// A nested table.
    Object(BTreeMap<String, SettingsValue>),
}

impl SettingsValue {
    /// Returns this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingsValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingsValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingsValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns this value as a table, if it is one.
    pub fn as_object(&self) -> Option<&BTreeMap<String, SettingsValue>> {
        match self {
            SettingsValue::Object(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for SettingsValue {
    fn from(v: bool) -> Self {
        SettingsValue::Bool(v)
    }
}

impl From<i64> for SettingsValue {
    fn from(v: i64) -> Self {
        SettingsValue::Integer(v)
    }
}

impl From<f64> for SettingsValue {
    fn from(v: f64) -> Self {
        SettingsValue::Float(v)
    }
}

impl From<String> for SettingsValue {
    fn from(v: String) -> Self {
        SettingsValue::String(v)
    }
}

impl From<&str> for SettingsValue {
    fn from(v: &str) -> Self {
        SettingsValue::String(v.to_string())
    }
}

/// The format for settings file persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    /// JSON format.
    Json,
    /// TOML format.
    Toml,
}

impl SettingsFormat {
    /// Guess the format from a file extension, defaulting to TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SettingsFormat::Json,
            _ => SettingsFormat::Toml,
        }
    }
}

#[derive(Debug, Clone)]
struct AutoSaveConfig {
    path: PathBuf,
    format: SettingsFormat,
}

type Table = BTreeMap<String, SettingsValue>;

/// A hierarchical key-value settings store.
pub struct Settings {
    data: RwLock<Table>,
    changed: Arc<Signal<String>>,
    auto_save: RwLock<Option<AutoSaveConfig>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Creates a new empty settings store.
    pub fn new() -> Self {
        Self::from_data(Table::new())
    }

    /// Creates settings from a nested table.
    pub fn from_data(data: BTreeMap<String, SettingsValue>) -> Self {
        Self {
            data: RwLock::new(data),
            changed: Arc::new(Signal::new()),
            auto_save: RwLock::new(None),
        }
    }

    /// Signal emitted with the key path whenever a value changes.
    pub fn changed(&self) -> &Signal<String> {
        &self.changed
    }

    /// Subscribe to changes.
    pub fn on_changed<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.changed.subscribe(move |key: &String| handler(key))
    }

    /// Persist every change to `path`.
    pub fn set_auto_save(&self, path: impl AsRef<Path>, format: SettingsFormat) {
        *self.auto_save.write() = Some(AutoSaveConfig {
            path: path.as_ref().to_path_buf(),
            format,
        });
    }

    /// Disables auto-save.
    pub fn disable_auto_save(&self) {
        *self.auto_save.write() = None;
    }

    /// Returns true if auto-save is enabled.
    pub fn is_auto_save_enabled(&self) -> bool {
        self.auto_save.read().is_some()
    }

    /// Sets a value at the specified path.
    ///
    /// Intermediate tables are created as needed. Returns `true` if the
    /// stored value changed.
    pub fn set<V: Into<SettingsValue>>(&self, path: &str, value: V) -> bool {
        let value = value.into();
        let parts = Self::parse_path(path);

        if parts.is_empty() {
            return false;
        }

        let changed = {
            let mut data = self.data.write();
            if Self::get_nested(&data, &parts) == Some(&value) {
                false
            } else {
                Self::set_nested(&mut data, &parts, value);
                true
            }
        };

        if changed {
            tracing::debug!(target: targets::SETTINGS, key = path, "setting changed");
            self.changed.emit(path.to_string());
            self.try_auto_save();
        }
        changed
    }

    /// Gets the raw value at the specified path.
    pub fn get_raw(&self, path: &str) -> Option<SettingsValue> {
        let data = self.data.read();
        Self::get_nested(&data, &Self::parse_path(path)).cloned()
    }

    /// Gets a string at the specified path.
    pub fn get_str(&self, path: &str) -> Option<String> {
        let data = self.data.read();
        Self::get_nested(&data, &Self::parse_path(path))
            .and_then(SettingsValue::as_str)
            .map(str::to_string)
    }

    /// Gets a boolean at the specified path.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        let data = self.data.read();
        Self::get_nested(&data, &Self::parse_path(path)).and_then(SettingsValue::as_bool)
    }

    /// Gets an integer at the specified path.
    pub fn get_integer(&self, path: &str) -> Option<i64> {
        let data = self.data.read();
        Self::get_nested(&data, &Self::parse_path(path)).and_then(SettingsValue::as_integer)
    }

    /// Returns true if a value exists at the specified path.
    pub fn contains(&self, path: &str) -> bool {
        let data = self.data.read();
        Self::get_nested(&data, &Self::parse_path(path)).is_some()
    }

    /// Removes a value at the specified path.
    pub fn remove(&self, path: &str) -> Option<SettingsValue> {
        let parts = Self::parse_path(path);
        if parts.is_empty() {
            return None;
        }

        let result = {
            let mut data = self.data.write();
            Self::remove_nested(&mut data, &parts)
        };

        if result.is_some() {
            self.changed.emit(path.to_string());
            self.try_auto_save();
        }
        result
    }

    /// Clears all settings.
    pub fn clear(&self) {
        self.data.write().clear();
        self.changed.emit(String::new());
        self.try_auto_save();
    }

    /// Returns all keys at the top level.
    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    /// Returns all keys under a specific path (group).
    pub fn group_keys(&self, path: &str) -> Vec<String> {
        let data = self.data.read();
        match Self::get_nested(&data, &Self::parse_path(path)) {
            Some(SettingsValue::Object(obj)) => obj.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the number of top-level keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if there are no settings.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Loads settings from a file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match SettingsFormat::from_path(path) {
            SettingsFormat::Json => Self::load_json(path),
            SettingsFormat::Toml => Self::load_toml(path),
        }
    }

    /// Loads settings from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let data: Table = serde_json::from_str(&content).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_data(data))
    }

    /// Loads settings from a TOML file.
    pub fn load_toml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let data: Table = toml::from_str(&content).map_err(|source| Error::TomlParse {
            path: Some(path.to_path_buf()),
            source,
        })?;
        Ok(Self::from_data(data))
    }

    /// Saves settings to a JSON file atomically.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&*self.data.read()).map_err(|source| {
            Error::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;
        atomic_write(path, json.as_bytes())
    }

    /// Saves settings to a TOML file atomically.
    pub fn save_toml(&self, path: impl AsRef<Path>) -> Result<()> {
        let toml_str = toml::to_string_pretty(&*self.data.read())?;
        atomic_write(path.as_ref(), toml_str.as_bytes())
    }

    /// Writes to the auto-save file, if one is configured.
    pub fn sync(&self) -> Result<()> {
        let config = self.auto_save.read().clone();
        match config {
            Some(config) => match config.format {
                SettingsFormat::Json => self.save_json(&config.path),
                SettingsFormat::Toml => self.save_toml(&config.path),
            },
            None => Ok(()),
        }
    }

    fn try_auto_save(&self) {
        if let Err(err) = self.sync() {
            tracing::warn!(target: targets::SETTINGS, error = %err, "settings auto-save failed");
        }
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn parse_path(path: &str) -> Vec<&str> {
        path.split(['.', '/']).filter(|s| !s.is_empty()).collect()
    }

    fn get_nested<'a>(data: &'a Table, parts: &[&str]) -> Option<&'a SettingsValue> {
        let (first, rest) = parts.split_first()?;
        let value = data.get(*first)?;

        if rest.is_empty() {
            Some(value)
        } else {
            match value {
                SettingsValue::Object(obj) => Self::get_nested(obj, rest),
                _ => None,
            }
        }
    }

    fn set_nested(data: &mut Table, parts: &[&str], value: SettingsValue) {
        let Some((first, rest)) = parts.split_first() else {
            return;
        };

        if rest.is_empty() {
            data.insert(first.to_string(), value);
            return;
        }

        let entry = data
            .entry(first.to_string())
            .or_insert_with(|| SettingsValue::Object(Table::new()));

        if !matches!(entry, SettingsValue::Object(_)) {
            *entry = SettingsValue::Object(Table::new());
        }
        if let SettingsValue::Object(obj) = entry {
            Self::set_nested(obj, rest, value);
        }
    }

    fn remove_nested(data: &mut Table, parts: &[&str]) -> Option<SettingsValue> {
        let (first, rest) = parts.split_first()?;

        if rest.is_empty() {
            data.remove(*first)
        } else {
            match data.get_mut(*first)? {
                SettingsValue::Object(obj) => Self::remove_nested(obj, rest),
                _ => None,
            }
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("keys", &self.keys())
            .field("auto_save", &self.is_auto_save_enabled())
            .finish()
    }
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    file.write_all(bytes).map_err(|e| Error::io(path, e))?;
    file.as_file().sync_all().map_err(|e| Error::io(path, e))?;
    file.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn set_and_get_paths() {
        let settings = Settings::new();
        assert!(settings.set("appearance.tint", "indigo"));
        assert!(settings.set("window/width", 1024_i64));
        assert!(settings.set("window.maximized", true));

        assert_eq!(settings.get_str("appearance.tint").as_deref(), Some("indigo"));
        assert_eq!(settings.get_integer("window.width"), Some(1024));
        assert_eq!(settings.get_bool("window/maximized"), Some(true));
        assert_eq!(settings.get_str("window.width"), None);
        assert!(settings.contains("appearance"));
        assert_eq!(settings.len(), 2);
    }

    #[test]
    fn identical_write_is_silent() {
        let settings = Settings::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        let _sub = settings.on_changed(move |key| seen_clone.lock().push(key.to_string()));

        settings.set("appearance.tint", "indigo");
        assert!(!settings.set("appearance.tint", "indigo"));
        settings.set("appearance.tint", "#FF0000");

        assert_eq!(*seen.lock(), vec!["appearance.tint", "appearance.tint"]);
    }

    #[test]
    fn remove_and_clear_notify() {
        let settings = Settings::new();
        settings.set("appearance.tint", "teal");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let _sub = settings.on_changed(move |key| seen_clone.lock().push(key.to_string()));

        assert_eq!(settings.remove("appearance.tint"), Some("teal".into()));
        assert_eq!(settings.remove("appearance.tint"), None);
        settings.clear();

        assert_eq!(*seen.lock(), vec!["appearance.tint".to_string(), String::new()]);
        assert!(settings.is_empty());
    }

    #[test]
    fn scalar_replaced_by_table() {
        let settings = Settings::new();
        settings.set("appearance", "legacy");
        settings.set("appearance.tint", "mint");
        assert_eq!(settings.get_str("appearance.tint").as_deref(), Some("mint"));
    }

    #[test]
    fn empty_path_is_ignored() {
        let settings = Settings::new();
        assert!(!settings.set("", "x"));
        assert!(!settings.set("./", "x"));
        assert!(settings.is_empty());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(SettingsFormat::from_path(Path::new("a.json")), SettingsFormat::Json);
        assert_eq!(SettingsFormat::from_path(Path::new("a.JSON")), SettingsFormat::Json);
        assert_eq!(SettingsFormat::from_path(Path::new("a.toml")), SettingsFormat::Toml);
        assert_eq!(SettingsFormat::from_path(Path::new("settings")), SettingsFormat::Toml);
    }
}
