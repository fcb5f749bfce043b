use super::SessionStore;
use crate::error::{CoreError, Result};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-memory session store. Lives as long as the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| CoreError::storage("session store lock poisoned"))
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut map = self.lock()?;
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<()> {
        let mut map = self.lock()?;
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}
