//! In-memory key/value store.

use campus_core::storage::KeyValueStore;
use campus_core::{PortalError, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// Volatile [`KeyValueStore`], used by tests and `--no-persist` runs.
#[derive(Default)]
pub struct MemoryLocalStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| PortalError::internal("local storage lock poisoned"))
    }
}

impl KeyValueStore for MemoryLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
