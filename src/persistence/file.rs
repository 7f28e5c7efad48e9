//! JSON file store for native hosts
//!
//! One JSON object per file, keys map to JSON values. Each write is a
//! read-modify-write of the whole object, written via a temp file.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::{Map, Value};

use super::{ScoreStore, StoreError};

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_object(&self) -> Result<Map<String, Value>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Backend(format!(
                "expected a JSON object in {}, found {}",
                self.path.display(),
                other
            ))),
        }
    }
}

impl ScoreStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_object()?.get(key).map(Value::to_string))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking every later write
        let mut map = self.read_object().unwrap_or_else(|e| {
            log::warn!("Discarding unreadable store {}: {}", self.path.display(), e);
            Map::new()
        });
        map.insert(key.to_string(), serde_json::from_str(value)?);

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&Value::Object(map))?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{Persistence, ScoreRecord, ScoreUpdate};

    #[test]
    fn test_missing_file_reads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = Persistence::new(FileStore::new(dir.path().join("scores.json")));
        assert_eq!(p.load(), ScoreRecord::default());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.json");
        let p = Persistence::new(FileStore::new(&path));
        p.save(ScoreUpdate::BestBreathCount(12));
        p.save(ScoreUpdate::SoundEnabled(false));

        let reopened = Persistence::new(FileStore::new(&path));
        assert_eq!(
            reopened.load(),
            ScoreRecord {
                best_breath_count: 12,
                sound_enabled: false
            }
        );
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"bestBreathCount\": 12"));
    }

    #[test]
    fn test_corrupt_file_recovers_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "not json").unwrap();

        let p = Persistence::new(FileStore::new(&path));
        assert_eq!(p.load(), ScoreRecord::default());
        p.save(ScoreUpdate::BestBreathCount(4));
        assert_eq!(p.load().best_breath_count, 4);
    }
}
