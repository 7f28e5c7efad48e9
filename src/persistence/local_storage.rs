//! Browser LocalStorage store

use web_sys::Storage;

use super::{ScoreStore, StoreError};

/// Prefix keeping our keys apart from other apps on the same origin
const KEY_PREFIX: &str = "breath_pacer.";

pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorageStore {
    /// Attach to the window's LocalStorage. Missing storage (private mode,
    /// sandboxed frames) makes every operation fail with `Unavailable`.
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - scores will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage.as_ref().ok_or(StoreError::Unavailable)
    }
}

impl ScoreStore for LocalStorageStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(&format!("{KEY_PREFIX}{key}"))
            .map_err(|e| StoreError::Backend(format!("{e:?}")))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(&format!("{KEY_PREFIX}{key}"), value)
            .map_err(|e| StoreError::Backend(format!("{e:?}")))
    }
}
