//! Key-value backends underlying the local store.
//!
//! The local store keeps its three logical keys (records, index, metadata)
//! in a flat string-to-string namespace. `MemoryKv` backs tests and
//! ephemeral sessions; `FileKv` persists each key as one JSON file under a
//! root directory.
//!
//! `MemoryKv` uses `RwLock::unwrap()` intentionally. Lock poisoning only
//! occurs when another thread panicked while holding the lock, which is an
//! unrecoverable state.

use dcr_core::error::Result;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

/// Port for the flat namespace the local store persists into
pub trait KvBackend: Send + Sync {
    /// Raw value under the key, or `None` when absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Upsert the value under the key
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the key; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory backend for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvBackend for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.remove(key);
        Ok(())
    }
}

/// File-backed namespace: one `<key>.json` file per key under the root.
///
/// Keys are expected to be filename-safe (the store uses dotted lowercase
/// names like `dcr.reports`).
#[derive(Debug, Clone)]
pub struct FileKv {
    root: PathBuf,
}

impl FileKv {
    /// Open the namespace rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KvBackend for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
