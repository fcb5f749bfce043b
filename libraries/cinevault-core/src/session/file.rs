use super::SessionStore;
use crate::error::{CoreError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Session store persisted as a flat JSON object on disk.
///
/// Every mutation rewrites the whole file through a temporary sibling and a
/// rename, so readers see either the old or the new contents.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileSessionStore {
    /// Open the store at `path`, loading existing contents if present.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// logged and treated as empty; it is replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Session file is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(CoreError::Io(e)),
        };

        debug!(path = %path.display(), keys = entries.len(), "Opened session file");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| CoreError::storage("session store lock poisoned"))
    }

    /// Apply `mutate` to a copy, persist it, then commit it in memory.
    fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.lock()?;
        let mut next = entries.clone();
        mutate(&mut next);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        self.update(|map| {
            for (key, value) in entries {
                map.insert((*key).to_string(), (*value).to_string());
            }
        })
    }

    fn remove(&self, keys: &[&str]) -> Result<()> {
        self.update(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionState, KEY_AUTH_TOKEN, KEY_USERNAME};
    use crate::types::FavoriteRef;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::open(dir.path().join("session.json")).unwrap();
        assert!(store.get(KEY_AUTH_TOKEN).unwrap().is_none());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileSessionStore::open(&path).unwrap();
        store
            .set_many(&[(KEY_AUTH_TOKEN, "tok"), (KEY_USERNAME, "alice")])
            .unwrap();
        drop(store);

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.get(KEY_AUTH_TOKEN).unwrap().as_deref(), Some("tok"));
        assert_eq!(reopened.get(KEY_USERNAME).unwrap().as_deref(), Some("alice"));
    }

    #[test]
    fn test_file_uses_storage_key_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let state = SessionState::new(Arc::new(FileSessionStore::open(&path).unwrap()));

        state.set("tok", "alice").unwrap();
        state.mirror_favorites(&[FavoriteRef::new("42")]).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["authToken"], "tok");
        assert_eq!(raw["username"], "alice");
        let mirror: Vec<FavoriteRef> =
            serde_json::from_str(raw["favoriteMovies"].as_str().unwrap()).unwrap();
        assert_eq!(mirror, vec![FavoriteRef::new("42")]);
    }

    #[test]
    fn test_clear_leaves_no_session_keys_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let state = SessionState::new(Arc::new(FileSessionStore::open(&path).unwrap()));

        state.set("tok", "alice").unwrap();
        state.mirror_favorites(&[FavoriteRef::new("42")]).unwrap();
        state.clear().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({}));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "this is not json").unwrap();

        let store = FileSessionStore::open(&path).unwrap();
        assert!(store.get(KEY_AUTH_TOKEN).unwrap().is_none());

        store.set(KEY_USERNAME, "bob").unwrap();
        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.get(KEY_USERNAME).unwrap().as_deref(), Some("bob"));
    }
}
