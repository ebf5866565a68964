//! Key-value store backends

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

const STORE_FILENAME: &str = "storage.json";

/// String-keyed store with no expiry
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store, used by tests and as a fallback
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Store backed by one JSON object file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open (without reading) the store inside `data_dir`, creating the directory if missing
    pub fn open(data_dir: &Path) -> Result<Self> {
        if !data_dir.exists() {
            fs::create_dir_all(data_dir).with_context(|| {
                format!("Failed to create data directory: {}", data_dir.display())
            })?;
        }
        Ok(Self { path: data_dir.join(STORE_FILENAME) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole map. A corrupted file is logged and treated as empty.
    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store file: {}", self.path.display()))?;

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "store file is corrupted, starting empty"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    /// Write the whole map atomically (temp file + rename)
    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries).context("Failed to serialize store")?;
        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, json).context("Failed to write store temp file")?;
        fs::rename(&temp, &self.path).context("Failed to rename store temp file")?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        FileStore::open(dir.path()).unwrap().set("email", "a@b.co").unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("email").unwrap().as_deref(), Some("a@b.co"));
    }

    #[test]
    fn test_file_store_creates_missing_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        store.set("k", "v").unwrap();
        assert!(nested.join(STORE_FILENAME).exists());
        assert!(!nested.join("storage.json.tmp").exists());
    }

    #[test]
    fn test_file_store_corrupted_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(STORE_FILENAME), "{not json").unwrap();

        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("email").unwrap(), None);

        // Writing replaces the corrupted file
        store.set("email", "a@b.co").unwrap();
        assert_eq!(store.get("email").unwrap().as_deref(), Some("a@b.co"));
    }

    #[test]
    fn test_file_store_remove_missing_key_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.remove("nothing").unwrap();
        assert!(!store.path().exists());
    }
}
