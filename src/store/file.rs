//! JSON-file settings store — one object on disk, rewritten on every change.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use tracing::{debug, info};

use super::traits::SettingsStore;
use crate::error::StoreError;

/// Settings persisted as a single JSON object file.
///
/// Writes go to a sibling temp file and are renamed into place.
pub struct JsonFileSettingsStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileSettingsStore {
    /// Open (or lazily create) a settings file at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        };
        // Surface corruption at open time rather than on first transition.
        store.load()?;
        info!(path = %path.display(), "Settings store opened");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(StoreError::Corrupt {
                path: self.path.display().to_string(),
                reason: format!("expected a JSON object, found {}", type_name(&other)),
            }),
            Err(e) => Err(StoreError::Corrupt {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn save(&self, map: Map<String, Value>) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    fn update<T>(
        &self,
        f: impl FnOnce(&mut Map<String, Value>) -> T,
    ) -> Result<T, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut map = self.load()?;
        let out = f(&mut map);
        self.save(map)?;
        Ok(out)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.update(|map| {
            map.insert(key.to_string(), value);
        })
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.update(|map| map.remove(key).is_some())
    }
}
