//! Store-specific error types.

use std::path::PathBuf;

/// Errors that can occur while reading or writing the local task snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to read the snapshot slot
    #[error("Failed to read task snapshot {path}: {source}")]
    SnapshotRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the snapshot slot
    #[error("Failed to write task snapshot {path}: {source}")]
    SnapshotWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Snapshot content is not a task sequence
    #[error("Task snapshot is malformed: {0}")]
    SnapshotFormat(#[from] serde_json::Error),
}
