//! Local key-value persistence for presets and custom icons.
//!
//! The engine never touches storage directly; everything goes through the
//! [`KeyValueStore`] seam. Collections are read once at session start and
//! written back in full on every mutation — last-writer-wins, no merging,
//! acceptable because there is exactly one writer at a time. Corrupt or
//! missing entries degrade to defaults with a warning rather than failing
//! startup.

use std::collections::HashMap;
use std::path::PathBuf;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::icon::CustomIconCollection;

/// Store key for the preset category list.
pub const PRESETS_KEY: &str = "preset-categories";

/// Store key for the custom icon collection.
pub const CUSTOM_ICONS_KEY: &str = "custom-icons";

/// The seeded preset category labels.
pub const DEFAULT_PRESETS: [&str; 8] = [
    "Gaming", "Music", "Food", "Tech", "Fitness", "Travel", "Art", "Fashion",
];

// ============================================================================
// Store seam
// ============================================================================

/// Minimal key-value persistence interface.
pub trait KeyValueStore {
    /// Reads the value stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store; the default for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store: one `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

// ============================================================================
// Preset categories
// ============================================================================

/// Insertion-ordered, case-insensitively deduplicated category labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetCategories {
    entries: Vec<String>,
}

impl PresetCategories {
    /// The fixed seeded list.
    pub fn defaults() -> Self {
        Self {
            entries: DEFAULT_PRESETS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Appends a category unless a case-insensitive duplicate exists.
    ///
    /// Blank input is ignored. Returns true if the list changed.
    pub fn add(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() || self.contains(label) {
            return false;
        }
        self.entries.push(label.to_string());
        true
    }

    /// Removes a category by case-insensitive match. Returns true if removed.
    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !entry.eq_ignore_ascii_case(label.trim()));
        self.entries.len() != before
    }

    /// Restores exactly the default list.
    pub fn clear(&mut self) {
        *self = Self::defaults();
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, label: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.eq_ignore_ascii_case(label.trim()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PresetCategories {
    fn default() -> Self {
        Self::defaults()
    }
}

// ============================================================================
// Typed load/save
// ============================================================================

/// Loads the preset list, degrading to defaults when absent or corrupt.
pub fn load_presets(store: &dyn KeyValueStore) -> PresetCategories {
    load_or_default(store, PRESETS_KEY)
}

/// Persists the full preset list.
pub fn save_presets(store: &mut dyn KeyValueStore, presets: &PresetCategories) -> Result<()> {
    store.save(PRESETS_KEY, &serde_json::to_string(presets)?)
}

/// Loads the custom icon collection, degrading to empty when absent or corrupt.
pub fn load_custom_icons(store: &dyn KeyValueStore) -> CustomIconCollection {
    load_or_default(store, CUSTOM_ICONS_KEY)
}

/// Persists the full custom icon collection.
pub fn save_custom_icons(
    store: &mut dyn KeyValueStore,
    icons: &CustomIconCollection,
) -> Result<()> {
    store.save(CUSTOM_ICONS_KEY, &serde_json::to_string(icons)?)
}

fn load_or_default<T: Default + for<'de> Deserialize<'de>>(
    store: &dyn KeyValueStore,
    key: &str,
) -> T {
    match store.load(key) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!("corrupt store entry {key}: {e}; using defaults");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            warn!("failed to read store entry {key}: {e}; using defaults");
            T::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
