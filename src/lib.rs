//! Decoding of whitespace-separated hex byte runs embedded in text, with a
//! bounded history of past decodes.
//!
//! # Examples
//!
//! Decoding a buffer:
//! ```
//! use talos::core::decoder::decode_text;
//!
//! let result = decode_text("msg: 48 65 6C 6C 6F end");
//! assert_eq!(result.decoded, "msg: Hello end");
//! assert_eq!(result.num_replacements, 1);
//! assert_eq!(result.replacements[0].hex_run, "48 65 6C 6C 6F ");
//! ```
//!
//! Recording it in a history file:
//! ```no_run
//! use talos::{
//!     core::{decoder::decode_text, history::HistoryStore},
//!     persist::json::JsonFileStorage,
//! };
//!
//! let mut history = HistoryStore::new(JsonFileStorage::in_working_dir());
//! let outcome = history.append(&decode_text("48 69 21"));
//! assert!(outcome.saved);
//! assert_eq!(history.count(), 1);
//! ```
//!
//! Sharing one history between tasks:
//! ```no_run
//! use talos::{
//!     core::history::HistoryStore,
//!     persist::sqlite::SqliteStorage,
//!     runtime::handle::{spawn_history, RuntimeConfig},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let storage = SqliteStorage::open("talos_history.db").expect("open sqlite");
//! let handle = spawn_history(HistoryStore::new(storage), RuntimeConfig::default());
//! let (result, _) = handle.decode_and_record("4F 4B 21").await.expect("record");
//! assert_eq!(result.decoded, "OK!");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```

#![deny(missing_docs)]

/// Decode engine and history store.
pub mod core;
/// Persisted history records.
pub mod entry;
/// Highlighting and timestamp display helpers.
pub mod format;
/// Storage abstraction with JSON file, SQLite and in-memory backends.
pub mod persist;
/// Detected runs and decode results.
pub mod replacement;
/// Single-writer history runtime and events.
pub mod runtime;
