//! JSON-array history file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::entry::HistoryEntry;

use super::{HistoryStorage, PersistResult};

/// File name used when storing history in the working directory.
pub const HISTORY_FILE_NAME: &str = "talos_history.json";

/// History stored as one pretty-printed JSON array, rewritten on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage at `path`; the file is created on first save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// [`HISTORY_FILE_NAME`] relative to the process working directory.
    pub fn in_working_dir() -> Self {
        Self::new(HISTORY_FILE_NAME)
    }

    /// Location of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStorage for JsonFileStorage {
    fn load(&self) -> PersistResult<Vec<HistoryEntry>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save(&mut self, entries: &[HistoryEntry]) -> PersistResult<()> {
        let payload = serde_json::to_vec_pretty(entries)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}
