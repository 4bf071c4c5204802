//! Volatile history storage for tests and embedding.

use crate::entry::HistoryEntry;

use super::{HistoryStorage, PersistResult};

/// Volatile storage; nothing survives the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Vec<HistoryEntry>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with `entries`.
    pub fn with_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    /// Current contents.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

impl HistoryStorage for MemoryStorage {
    fn load(&self) -> PersistResult<Vec<HistoryEntry>> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[HistoryEntry]) -> PersistResult<()> {
        self.entries = entries.to_vec();
        Ok(())
    }
}
