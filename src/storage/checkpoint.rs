//! JSON checkpoint file

use crate::state::Checkpoint;
use crate::storage::traits::{CheckpointResult, CheckpointStore};
use crate::storage::write_atomic;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Checkpoint kept as a single pretty-printed JSON document
#[derive(Debug, Clone)]
pub struct JsonCheckpointStore {
    path: PathBuf,
}

impl JsonCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CheckpointStore for JsonCheckpointStore {
    fn load(&self) -> CheckpointResult<Option<Checkpoint>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let checkpoint = serde_json::from_str(&contents)?;
        tracing::debug!(path = %self.path.display(), "Checkpoint loaded");
        Ok(Some(checkpoint))
    }

    fn save(&mut self, checkpoint: &Checkpoint) -> CheckpointResult<()> {
        let json = serde_json::to_vec_pretty(checkpoint)?;
        write_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "Checkpoint saved");
        Ok(())
    }

    fn clear(&mut self) -> CheckpointResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Checkpoint deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
