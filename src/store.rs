//! Synchronous key-value storage contract.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mirrors the browser `Storage` API: string keys to string values, with
//! synchronous access. The guard holds two stores, a persistent one for the
//! session, history and registry, and a transient per-tab one for the
//! post-login return URL.
//!
//! Methods take `&self`; backends use interior mutability. Everything runs on
//! one UI thread, so none of this is `Send`.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{GuardError, StoreError};

/// String-keyed storage backend.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend rejects the removal.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// List every key currently stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend cannot be enumerated.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }
}

/// Read and decode a JSON value stored under `key`.
///
/// A missing key yields `Ok(None)`; a value that fails to decode is returned
/// as `Err` so callers can decide whether corruption matters to them.
///
/// # Errors
///
/// Returns [`GuardError::Store`] when the backend cannot be read and
/// [`GuardError::Decode`] when the stored value is not the expected JSON.
pub fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Result<Option<T>, GuardError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| GuardError::Decode { key: key.to_owned(), source })
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns [`GuardError::Encode`] on serialization failure and
/// [`GuardError::Store`] when the backend rejects the write.
pub fn save_json<T: Serialize>(store: &impl KeyValueStore, key: &str, value: &T) -> Result<(), GuardError> {
    let raw = serde_json::to_string(value).map_err(|source| GuardError::Encode { key: key.to_owned(), source })?;
    store.set(key, &raw)?;
    Ok(())
}

/// In-memory store. Clones share the same entries, so a test (or the CLI)
/// can keep a handle while the guard owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
    reject_writes: Rc<Cell<bool>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        store
    }

    /// Make every subsequent `set`/`remove` fail, as a full or read-only
    /// browser store would.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Copy of all entries.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.borrow().clone()
    }

    fn check_writable(&self, key: &str) -> Result<(), StoreError> {
        if self.reject_writes.get() {
            return Err(StoreError::Write { key: key.to_owned(), message: "store is read-only".to_owned() });
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_writable(key)?;
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_writable(key)?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}
