//! Bounded, append-only decode history with best-effort persistence.

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::{
    entry::{HistoryEntry, MAX_HISTORY_ENTRIES},
    persist::{HistoryStorage, PersistError},
    replacement::DecodeResult,
};

/// Retention settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Entries kept; older ones are dropped on append.
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: MAX_HISTORY_ENTRIES,
        }
    }
}

/// Storage call that failed and was swallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    /// Reading the collection.
    Load,
    /// Writing the collection.
    Save,
}

/// A swallowed storage failure, handed to the fault hook.
#[derive(Debug)]
pub struct StorageFault<'a> {
    /// Call that failed.
    pub op: StorageOp,
    /// Error returned by the storage.
    pub error: &'a PersistError,
}

/// Observer for swallowed storage failures.
pub type FaultHook = Box<dyn FnMut(&StorageFault<'_>) + Send>;

/// What an append did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Entry as recorded.
    pub entry: HistoryEntry,
    /// Oldest entries dropped to stay within the retention bound.
    pub evicted: usize,
    /// False when the write was attempted and failed.
    pub saved: bool,
}

/// Bounded, append-only decode history over an injected storage handle.
///
/// Every operation reloads the full collection and writes it back whole.
/// Load and save failures never reach the caller: a failed load reads as an
/// empty history and a failed save is dropped. Both are logged and passed to
/// the fault hook when one is installed.
pub struct HistoryStore<S: HistoryStorage> {
    storage: S,
    config: HistoryConfig,
    on_fault: Option<FaultHook>,
}

impl<S: HistoryStorage> HistoryStore<S> {
    /// Store over `storage` with the default retention bound.
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, HistoryConfig::default())
    }

    /// Store over `storage` with explicit settings.
    pub fn with_config(storage: S, config: HistoryConfig) -> Self {
        Self {
            storage,
            config,
            on_fault: None,
        }
    }

    /// Installs a hook that observes every swallowed storage failure.
    pub fn set_fault_hook(&mut self, hook: FaultHook) {
        self.on_fault = Some(hook);
    }

    /// Active settings.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Borrow of the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Gives the storage back.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Whole collection in append order; empty when storage is missing or
    /// unreadable.
    pub fn load_all(&mut self) -> Vec<HistoryEntry> {
        match self.storage.load() {
            Ok(entries) => entries,
            Err(err) => {
                self.report(StorageOp::Load, &err);
                Vec::new()
            }
        }
    }

    /// Replaces the stored collection. Returns whether the write succeeded.
    pub fn save_all(&mut self, entries: &[HistoryEntry]) -> bool {
        match self.storage.save(entries) {
            Ok(()) => true,
            Err(err) => {
                self.report(StorageOp::Save, &err);
                false
            }
        }
    }

    /// Records `result` stamped with the current local time.
    pub fn append(&mut self, result: &DecodeResult) -> AppendOutcome {
        self.push(HistoryEntry::now(result))
    }

    /// Records `result` under an explicit timestamp.
    pub fn append_at(&mut self, result: &DecodeResult, recorded_at: NaiveDateTime) -> AppendOutcome {
        self.push(HistoryEntry::from_result(result, recorded_at))
    }

    /// Removes the first entry with the same identity as `entry`.
    ///
    /// Returns false, and writes nothing, when no entry matches.
    pub fn delete(&mut self, entry: &HistoryEntry) -> bool {
        let mut history = self.load_all();
        let Some(idx) = history.iter().position(|e| e.same_identity(entry)) else {
            return false;
        };
        history.remove(idx);
        self.save_all(&history);
        debug!(timestamp = %entry.timestamp, "deleted history entry");
        true
    }

    /// Number of persisted entries.
    pub fn count(&mut self) -> usize {
        self.load_all().len()
    }

    /// Up to `n` entries, newest timestamp first. Entries sharing a
    /// timestamp stay in append order.
    pub fn recent(&mut self, n: usize) -> Vec<HistoryEntry> {
        let mut history = self.load_all();
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        history.truncate(n);
        history
    }

    fn push(&mut self, entry: HistoryEntry) -> AppendOutcome {
        let mut history = self.load_all();
        history.push(entry.clone());

        let evicted = history.len().saturating_sub(self.config.max_entries);
        if evicted > 0 {
            history.drain(..evicted);
        }

        let saved = self.save_all(&history);
        debug!(
            timestamp = %entry.timestamp,
            replacements = entry.num_replacements,
            evicted,
            saved,
            "appended history entry"
        );
        AppendOutcome {
            entry,
            evicted,
            saved,
        }
    }

    fn report(&mut self, op: StorageOp, error: &PersistError) {
        warn!(?op, %error, "history storage failure ignored");
        if let Some(hook) = self.on_fault.as_mut() {
            hook(&StorageFault { op, error });
        }
    }
}
