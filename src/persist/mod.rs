/// JSON-array file backend.
pub mod json;
/// In-memory backend.
pub mod memory;
/// SQLite backend.
pub mod sqlite;

use crate::entry::HistoryEntry;

/// Storage failure.
#[derive(Debug)]
pub enum PersistError {
    /// Filesystem error.
    Io(std::io::Error),
    /// SQLite error.
    Sqlite(rusqlite::Error),
    /// Encoding or decoding error.
    Serde(serde_json::Error),
    /// Any other failure.
    Message(String),
}

impl From<std::io::Error> for PersistError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::Serde(err) => write!(f, "serde: {err}"),
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for PersistError {}

/// Result alias for storage calls.
pub type PersistResult<T> = Result<T, PersistError>;

/// Whole-collection storage for history entries.
///
/// `load` on storage that has never been written returns an empty list.
pub trait HistoryStorage: Send {
    /// Reads the whole collection in append order.
    fn load(&self) -> PersistResult<Vec<HistoryEntry>>;
    /// Replaces the whole collection.
    fn save(&mut self, entries: &[HistoryEntry]) -> PersistResult<()>;
}

impl<S: HistoryStorage + ?Sized> HistoryStorage for Box<S> {
    fn load(&self) -> PersistResult<Vec<HistoryEntry>> {
        (**self).load()
    }

    fn save(&mut self, entries: &[HistoryEntry]) -> PersistResult<()> {
        (**self).save(entries)
    }
}
