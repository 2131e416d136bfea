//! Layout persistence against a scoped key-value store.
//!
//! The store holds the JSON-serialized [`BadgeLayoutConfig`] under
//! [`LAYOUT_STORAGE_KEY`]. Both load and save return `Result` so callers
//! choose how to degrade; [`load_layout_config_or_default`] is the
//! log-and-continue policy used by the server and CLI.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::BadgeLayoutConfig;
use crate::error::LanyardError;

/// Key the badge layout is stored under.
pub const LAYOUT_STORAGE_KEY: &str = "badge-layout-config";

/// Minimal string key-value store, scoped to one user or deployment.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, LanyardError>;
    fn set(&self, key: &str, value: &str) -> Result<(), LanyardError>;
}

/// Process-local store, used in tests and as a fallback.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, LanyardError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LanyardError::Persistence("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LanyardError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LanyardError::Persistence("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory: `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, LanyardError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LanyardError::Persistence(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LanyardError> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(&path, value))
            .map_err(|e| {
                LanyardError::Persistence(format!("Failed to write {}: {}", path.display(), e))
            })
    }
}

/// Read the stored layout.
///
/// Returns the default layout when nothing is stored, when the value is not
/// JSON, when it lacks either `textElements` or `barcode`, or when it does
/// not deserialize. Only a failing store read is an error.
pub fn load_layout_config(store: &dyn KeyValueStore) -> Result<BadgeLayoutConfig, LanyardError> {
    let Some(raw) = store.get(LAYOUT_STORAGE_KEY)? else {
        return Ok(BadgeLayoutConfig::default());
    };
    Ok(parse_stored(&raw).unwrap_or_default())
}

fn parse_stored(raw: &str) -> Option<BadgeLayoutConfig> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let obj = value.as_object()?;
    if !obj.contains_key("textElements") || !obj.contains_key("barcode") {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Like [`load_layout_config`], but a failing store is logged and the
/// default layout returned. Never fails.
pub fn load_layout_config_or_default(store: &dyn KeyValueStore) -> BadgeLayoutConfig {
    load_layout_config(store).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "badge layout unavailable, using default");
        BadgeLayoutConfig::default()
    })
}

/// Write the layout to the store.
pub fn save_layout_config(
    store: &dyn KeyValueStore,
    config: &BadgeLayoutConfig,
) -> Result<(), LanyardError> {
    let json = serde_json::to_string(config)?;
    store.set(LAYOUT_STORAGE_KEY, &json)
}
