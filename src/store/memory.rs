//! In-process settings store, for tests and hosts without a disk.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use super::traits::SettingsStore;
use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Value>>, StoreError> {
        self.values.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values()?.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.values()?.remove(key).is_some())
    }
}
