//! localStorage persistence.
//!
//! Records are stored as raw strings; `ContentStore` owns the JSON. Reads
//! go through `gloo_storage`'s raw handle so a missing key and an
//! unavailable store both read as `None`.

use gloo_storage::{LocalStorage, Storage};
use trellis_core::{KeyValueStore, StoreError};

/// `KeyValueStore` over `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }

    /// Whether localStorage can be reached at all (private mode, sandboxed
    /// frames and so on may refuse it).
    pub fn is_available() -> bool {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .is_some()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        if !Self::is_available() {
            return None;
        }
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if !Self::is_available() {
            return Err(StoreError::Unavailable);
        }
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| StoreError::Write {
                key: key.to_string(),
                reason: crate::dom::js_error_message(&e),
            })
    }

    fn remove(&mut self, key: &str) {
        if Self::is_available() {
            LocalStorage::delete(key);
        }
    }
}
