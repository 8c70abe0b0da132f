//! In-memory store

use std::{collections::HashMap, sync::Mutex};

use super::{KeyValueStore, StorageError};

/// Volatile store, used for tests and sessions that should not outlive the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|_err| StorageError::Poisoned)?;

        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_err| StorageError::Poisoned)?;

        values.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_err| StorageError::Poisoned)?;

        values.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn set_then_get_returns_value() -> TestResult {
        let store = MemoryStore::new();

        store.set("cart", "[]")?;

        assert_eq!(store.get("cart")?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn remove_missing_key_is_ok() -> TestResult {
        let store = MemoryStore::new();

        store.remove("cart")?;

        assert_eq!(store.get("cart")?, None);

        Ok(())
    }
}
