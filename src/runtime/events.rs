//! Runtime event stream payloads.

use crate::core::history::StorageOp;

/// Events emitted from the single-writer history loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    /// An entry was recorded.
    Appended {
        /// Timestamp of the new entry.
        timestamp: String,
        /// Runs substituted in the recorded decode.
        num_replacements: usize,
    },
    /// Oldest entries were dropped to respect the retention bound.
    Evicted {
        /// Number of entries dropped.
        count: usize,
    },
    /// An entry was removed by identity.
    Deleted {
        /// Timestamp of the removed entry.
        timestamp: String,
    },
    /// A storage failure was swallowed.
    StorageFault {
        /// Failed storage call.
        op: StorageOp,
        /// Rendered error.
        message: String,
    },
}
