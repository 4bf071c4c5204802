//! SQLite-backed history storage.

use std::path::Path;

use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::entry::HistoryEntry;

use super::{HistoryStorage, PersistError, PersistResult};

/// Version number for serialized [`EntryEnvelope`] payloads.
pub const ENTRY_FORMAT_VERSION: u16 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryEnvelope {
    format_version: u16,
    entry: HistoryEntry,
}

/// One row per entry; `save` swaps the whole collection in a single
/// transaction, so readers never see a half-written history.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates a SQLite-backed store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Number of stored rows.
    pub fn len(&self) -> PersistResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// True when no rows are stored.
    pub fn is_empty(&self) -> PersistResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl HistoryStorage for SqliteStorage {
    fn load(&self) -> PersistResult<Vec<HistoryEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM history ORDER BY pos ASC")?;

        let rows = stmt.query_map([], |row| {
            let payload: Vec<u8> = row.get(0)?;
            decode_entry_payload(&payload).map_err(|err| {
                rusqlite::Error::FromSqlConversionFailure(
                    payload.len(),
                    rusqlite::types::Type::Blob,
                    Box::new(std::io::Error::other(err)),
                )
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn save(&mut self, entries: &[HistoryEntry]) -> PersistResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM history", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO history(pos, ts, payload) VALUES (?1, ?2, ?3)")?;
            for (pos, entry) in entries.iter().enumerate() {
                let env = EntryEnvelope {
                    format_version: ENTRY_FORMAT_VERSION,
                    entry: entry.clone(),
                };
                let payload = serde_json::to_vec(&env)?;
                stmt.execute(params![pos as i64, entry.timestamp, payload])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn decode_entry_payload(payload: &[u8]) -> Result<HistoryEntry, PersistError> {
    let value: serde_json::Value = serde_json::from_slice(payload)?;
    let is_envelope = value
        .as_object()
        .is_some_and(|obj| obj.contains_key("format_version") || obj.contains_key("entry"));

    if is_envelope {
        let envelope: EntryEnvelope = serde_json::from_value(value)?;
        if envelope.format_version != ENTRY_FORMAT_VERSION {
            return Err(PersistError::Message(format!(
                "unsupported entry format version: {}",
                envelope.format_version
            )));
        }
        return Ok(envelope.entry);
    }

    // Rows written without an envelope hold the bare entry object.
    Ok(serde_json::from_value::<HistoryEntry>(value)?)
}
