//! Storage traits and error types
//!
//! Neither error type is fatal to a harvest: cache failures degrade to a miss or a
//! skipped write, checkpoint failures cost resumability but not the crawl.

use crate::state::Checkpoint;
use thiserror::Error;

/// Errors that can occur while reading or writing the page cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while loading or saving a checkpoint
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Checkpoint schema version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Inconsistent checkpoint: {0}")]
    Inconsistent(String),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Result type for checkpoint operations
pub type CheckpointResult<T> = Result<T, CheckpointError>;

/// Durable home of the harvest checkpoint
///
/// There is a single writer per checkpoint; implementations need not guard against
/// concurrent saves.
pub trait CheckpointStore: Send {
    /// Loads the stored checkpoint; `Ok(None)` means there is none
    fn load(&self) -> CheckpointResult<Option<Checkpoint>>;

    /// Replaces the stored checkpoint
    ///
    /// Either the previous or the new checkpoint must survive a crash mid-save.
    fn save(&mut self, checkpoint: &Checkpoint) -> CheckpointResult<()>;

    /// Removes the stored checkpoint, if any
    fn clear(&mut self) -> CheckpointResult<()>;
}
