//! JSON file standing in for browser storage.
//!
//! The file holds one flat object of key to string value, the same shape as
//! `localStorage`. Every call re-reads the file so two invocations of the CLI
//! see each other's writes; a missing or empty file is an empty store.

#[cfg(test)]
#[path = "file_store_test.rs"]
mod file_store_test;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hubber_session::{KeyValueStore, StoreError};

#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self, key: &str) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(read_error(key, &self.path, &e)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| read_error(key, &self.path, &e))
    }

    fn save(&self, key: &str, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(entries).map_err(|e| write_error(key, &self.path, &e))?;
        fs::write(&self.path, raw).map_err(|e| write_error(key, &self.path, &e))
    }
}

fn read_error(key: &str, path: &Path, e: &impl std::fmt::Display) -> StoreError {
    StoreError::Read { key: key.to_owned(), message: format!("{}: {e}", path.display()) }
}

fn write_error(key: &str, path: &Path, e: &impl std::fmt::Display) -> StoreError {
    StoreError::Write { key: key.to_owned(), message: format!("{}: {e}", path.display()) }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load(key)?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load(key)?;
        entries.insert(key.to_owned(), value.to_owned());
        self.save(key, &entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.load(key)?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.save(key, &entries)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.load("*")?.into_keys().collect())
    }
}
