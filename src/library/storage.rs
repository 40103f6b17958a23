//! Durable key-value storage used to mirror the track store.
//!
//! `FileStorage` keeps one `<key>.json` file per key under a directory;
//! `MemoryStorage` is a process-local map for tests and fallbacks.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub trait KeyValueStorage {
    /// Return the stored value, or `None` if the key was never written.
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    /// Replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `root`. The directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        // Write a sibling temp file, then rename it over the snapshot.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with `value` under `key`.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut s = Self::new();
        s.entries.insert(key.to_string(), value.to_string());
        s
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
