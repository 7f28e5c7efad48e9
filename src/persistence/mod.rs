//! Best score and sound preference persistence
//!
//! Two independent keys in a key-value store:
//! - `bestBreathCount`: non-negative integer, default 0
//! - `soundEnabled`: boolean, default true
//!
//! Writes are best-effort. A failed read or write is logged and the session
//! carries on with in-memory values.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Storage key for the best breath count
pub const BEST_BREATH_COUNT_KEY: &str = "bestBreathCount";
/// Storage key for the sound flag
pub const SOUND_ENABLED_KEY: &str = "soundEnabled";

/// Persistence failures. Never fatal.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage unavailable")]
    Unavailable,

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed stored value: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Persisted score and preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub best_breath_count: u32,
    pub sound_enabled: bool,
}

impl Default for ScoreRecord {
    fn default() -> Self {
        Self {
            best_breath_count: 0,
            sound_enabled: true,
        }
    }
}

/// A partial record: one field to write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreUpdate {
    BestBreathCount(u32),
    SoundEnabled(bool),
}

impl ScoreUpdate {
    /// Storage key and JSON-encoded value
    fn entry(&self) -> Result<(&'static str, String), StoreError> {
        Ok(match self {
            ScoreUpdate::BestBreathCount(n) => (BEST_BREATH_COUNT_KEY, serde_json::to_string(n)?),
            ScoreUpdate::SoundEnabled(b) => (SOUND_ENABLED_KEY, serde_json::to_string(b)?),
        })
    }
}

/// Durable string key-value storage
pub trait ScoreStore {
    /// Read a raw value, `None` when the key is absent
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Write a raw value
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Best-effort adapter over a `ScoreStore`
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: ScoreStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the record; absent or unreadable fields fall back to defaults
    pub fn load(&self) -> ScoreRecord {
        let defaults = ScoreRecord::default();
        let record = ScoreRecord {
            best_breath_count: self
                .read_field(BEST_BREATH_COUNT_KEY)
                .unwrap_or(defaults.best_breath_count),
            sound_enabled: self
                .read_field(SOUND_ENABLED_KEY)
                .unwrap_or(defaults.sound_enabled),
        };
        log::info!(
            "Loaded score: best {}, sound {}",
            record.best_breath_count,
            if record.sound_enabled { "on" } else { "off" }
        );
        record
    }

    /// Write one field. Failures are logged and dropped (no retry).
    pub fn save(&self, update: ScoreUpdate) {
        if let Err(e) = self.try_save(update) {
            log::warn!("Failed to save {:?}: {}", update, e);
        }
    }

    fn try_save(&self, update: ScoreUpdate) -> Result<(), StoreError> {
        let (key, value) = update.entry()?;
        self.store.write(key, &value)
    }

    fn read_field<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read {}: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring malformed {} value {:?}: {}", key, raw, e);
                None
            }
        }
    }
}

/// In-memory store with optional failure injection
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails
    pub fn unavailable() -> Self {
        Self {
            fail_reads: true,
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Seed a raw value
    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Raw stored value
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl ScoreStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable);
        }
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable);
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
