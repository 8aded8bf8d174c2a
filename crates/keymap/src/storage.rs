//! Key/value persistence seam for the profile store.

use crate::error::KeymapError;
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Durable string storage addressed by key.
pub trait KeyValueStore {
    /// Read the blob stored under `key`, `None` when absent.
    fn load(&self, key: &str) -> Result<Option<String>, KeymapError>;

    /// Replace the blob stored under `key`.
    fn save(&mut self, key: &str, blob: &str) -> Result<(), KeymapError>;
}

/// In-process storage. Clones share the same backing map, which lets tests
/// inspect what a store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, e.g. a blob written by an older release.
    pub fn with_entry(self, key: impl Into<String>, blob: impl Into<String>) -> Self {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), blob.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl KeyValueStore for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, KeymapError> {
        Ok(self.get(key))
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), KeymapError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), blob.to_owned());
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
/// Writes go to a temporary sibling which is renamed into place while an
/// advisory lock is held on a `.lock` file, so concurrent writers from other
/// processes never interleave.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, KeymapError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, KeymapError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(KeymapError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn with_lock<R>(
        &self,
        key: &str,
        f: impl FnOnce() -> Result<R, KeymapError>,
    ) -> Result<R, KeymapError> {
        let lock_path = self.dir.join(format!("{key}.lock"));
        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        lock.lock_exclusive()?;
        let result = f();
        lock.unlock()?;
        result
    }
}

impl KeyValueStore for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, KeymapError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), KeymapError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("tmp");
        self.with_lock(key, || {
            let mut file = File::create(&tmp)?;
            file.write_all(blob.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, &path)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_storage_clones_share_state() {
        let storage = MemoryStorage::new();
        let mut writer = storage.clone();
        writer.save("k", "v").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("v"));
        assert_eq!(storage.load("missing").unwrap(), None);
    }

    #[test]
    fn file_storage_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp_dir.path().join("storage")).unwrap();

        assert_eq!(storage.load("controller_shortcuts").unwrap(), None);
        storage.save("controller_shortcuts", "{}").unwrap();
        storage.save("controller_shortcuts", r#"{"a":{}}"#).unwrap();

        assert_eq!(
            storage.load("controller_shortcuts").unwrap().as_deref(),
            Some(r#"{"a":{}}"#)
        );
        assert!(!temp_dir
            .path()
            .join("storage")
            .join("controller_shortcuts.tmp")
            .exists());
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        assert!(matches!(
            storage.path_for("../escape"),
            Err(KeymapError::InvalidKey(_))
        ));
        assert!(storage.path_for("").is_err());
    }
}
