//! Browser `localStorage` backend

use super::KeyValueStore;
use crate::error::StorageError;

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Fails when the page has no storage (private mode, sandboxed iframe)
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("localStorage not available".into()))?;
        Ok(Self { storage })
    }
}

fn js_err(e: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Unavailable(format!("{e:?}"))
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(js_err)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(js_err)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(js_err)
    }
}
