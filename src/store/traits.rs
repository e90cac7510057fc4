//! `SettingsStore` trait — the key-value persistence the flow depends on.

use serde_json::Value;

use crate::error::StoreError;

/// Backend-agnostic JSON-valued settings store.
///
/// Injected into the flow controller so the onboarding flag is never
/// ambient global state.
pub trait SettingsStore: Send + Sync {
    /// Read a setting. `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Insert or overwrite a setting.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove a setting. Returns whether it existed.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Read a boolean flag. Non-boolean values are treated as absent.
    fn get_flag(&self, key: &str) -> Result<Option<bool>, StoreError> {
        Ok(self.get(key)?.and_then(|v| v.as_bool()))
    }

    /// Write a boolean flag.
    fn set_flag(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.set(key, Value::Bool(value))
    }
}
