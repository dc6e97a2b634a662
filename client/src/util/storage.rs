//! `localStorage` / `sessionStorage` backend for the session guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Hydrate-only. Without a browser every call reports
//! [`StoreError::Unavailable`], which the guard treats as "no session", so
//! SSR renders the signed-out view deterministically.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use hubber_session::{KeyValueStore, StoreError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageArea {
    /// `window.localStorage`: survives restarts.
    Local,
    /// `window.sessionStorage`: scoped to the tab.
    Session,
}

#[derive(Clone, Copy, Debug)]
pub struct BrowserStorage {
    area: StorageArea,
}

impl BrowserStorage {
    #[must_use]
    pub fn local() -> Self {
        Self { area: StorageArea::Local }
    }

    #[must_use]
    pub fn session() -> Self {
        Self { area: StorageArea::Session }
    }

    #[must_use]
    pub fn area(&self) -> StorageArea {
        self.area
    }

    #[cfg(feature = "hydrate")]
    fn storage(&self) -> Result<web_sys::Storage, StoreError> {
        let window = web_sys::window().ok_or(StoreError::Unavailable)?;
        let storage = match self.area {
            StorageArea::Local => window.local_storage(),
            StorageArea::Session => window.session_storage(),
        };
        storage.ok().flatten().ok_or(StoreError::Unavailable)
    }
}

#[cfg(feature = "hydrate")]
fn js_message(err: &wasm_bindgen::JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        #[cfg(feature = "hydrate")]
        {
            self.storage()?
                .get_item(key)
                .map_err(|e| StoreError::Read { key: key.to_owned(), message: js_message(&e) })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StoreError::Unavailable)
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        #[cfg(feature = "hydrate")]
        {
            self.storage()?
                .set_item(key, value)
                .map_err(|e| StoreError::Write { key: key.to_owned(), message: js_message(&e) })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Err(StoreError::Unavailable)
        }
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        #[cfg(feature = "hydrate")]
        {
            self.storage()?
                .remove_item(key)
                .map_err(|e| StoreError::Write { key: key.to_owned(), message: js_message(&e) })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StoreError::Unavailable)
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        #[cfg(feature = "hydrate")]
        {
            let storage = self.storage()?;
            let len = storage
                .length()
                .map_err(|e| StoreError::Read { key: "*".to_owned(), message: js_message(&e) })?;
            let mut keys = Vec::with_capacity(len as usize);
            for i in 0..len {
                if let Ok(Some(key)) = storage.key(i) {
                    keys.push(key);
                }
            }
            Ok(keys)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(StoreError::Unavailable)
        }
    }
}
