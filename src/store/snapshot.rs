//! Local persistence slot for the task collection.
//!
//! A snapshot holds the whole collection serialized as JSON. The store reads
//! it opportunistically before fetching and rewrites it after every
//! successful action.

use super::error::StoreError;
use crate::repository::Task;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Key-value slot holding a serialized task collection.
///
pub trait Snapshot: Send + Sync {
    /// Return the stored collection, or `None` when the slot is empty.
    fn load(&self) -> Result<Option<Vec<Task>>, StoreError>;

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

/// Snapshot stored in a JSON file.
///
pub struct FileSnapshot {
    path: PathBuf,
}

impl FileSnapshot {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileSnapshot {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Snapshot for FileSnapshot {
    fn load(&self) -> Result<Option<Vec<Task>>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::SnapshotRead {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let content = serde_json::to_string(tasks)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StoreError::SnapshotWrite {
                    path: self.path.clone(),
                    source: e,
                })?;
            }
        }
        fs::write(&self.path, content).map_err(|e| StoreError::SnapshotWrite {
            path: self.path.clone(),
            source: e,
        })
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(StoreError::SnapshotWrite {
                path: self.path.clone(),
                source: e,
            }),
            _ => Ok(()),
        }
    }
}

/// Snapshot kept in process memory as serialized text.
///
#[derive(Default)]
pub struct MemorySnapshot {
    slot: Mutex<Option<String>>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        MemorySnapshot::default()
    }

    /// Returns a slot pre-filled with raw text, valid or not.
    ///
    pub fn with_raw(raw: &str) -> Self {
        MemorySnapshot {
            slot: Mutex::new(Some(raw.to_owned())),
        }
    }
}

impl Snapshot for MemorySnapshot {
    fn load(&self) -> Result<Option<Vec<Task>>, StoreError> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(tasks)?;
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};

    #[test]
    fn file_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = FileSnapshot::new(dir.path().join("nested").join("tasks.json"));
        assert_eq!(snapshot.load().unwrap(), None);

        let tasks: Vec<Task> = vec![Faker.fake(), Faker.fake()];
        snapshot.save(&tasks).unwrap();
        assert_eq!(snapshot.load().unwrap(), Some(tasks));

        snapshot.clear().unwrap();
        assert_eq!(snapshot.load().unwrap(), None);
        snapshot.clear().unwrap();
    }

    #[test]
    fn file_snapshot_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "not json").unwrap();
        let result = FileSnapshot::new(&path).load();
        assert!(matches!(result, Err(StoreError::SnapshotFormat(_))));
    }

    #[test]
    fn memory_snapshot_keeps_empty_collection() {
        let snapshot = MemorySnapshot::new();
        assert_eq!(snapshot.load().unwrap(), None);
        snapshot.save(&[]).unwrap();
        assert_eq!(snapshot.load().unwrap(), Some(vec![]));
        snapshot.clear().unwrap();
        assert_eq!(snapshot.load().unwrap(), None);
    }
}
