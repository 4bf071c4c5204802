//! Single-writer history task and its handle.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast, mpsc, oneshot};
use tracing::debug;

use crate::{
    core::{
        decoder::HexDecoder,
        history::{AppendOutcome, HistoryStore, StorageFault},
    },
    entry::HistoryEntry,
    persist::HistoryStorage,
    replacement::DecodeResult,
};

use super::events::HistoryEvent;

/// Failure talking to the history task.
#[derive(Debug)]
pub enum RuntimeError {
    /// The task has stopped.
    ChannelClosed,
    /// A storage call panicked or was cancelled.
    Worker(String),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChannelClosed => f.write_str("history runtime is not running"),
            Self::Worker(msg) => write!(f, "history worker failed: {msg}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Channel sizing for [`spawn_history`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pending commands before senders wait.
    pub command_queue_bound: usize,
    /// Events buffered per subscriber before lagging.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Cloneable front for a history store owned by one background task.
///
/// Every command runs its load-modify-save cycle to completion before the
/// next one starts, so handles shared between tasks never lose updates.
pub struct HistoryHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<HistoryEvent>,
}

impl Clone for HistoryHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    Append {
        result: DecodeResult,
        resp: oneshot::Sender<Result<AppendOutcome, RuntimeError>>,
    },
    Delete {
        entry: HistoryEntry,
        resp: oneshot::Sender<Result<bool, RuntimeError>>,
    },
    List {
        resp: oneshot::Sender<Result<Vec<HistoryEntry>, RuntimeError>>,
    },
    Recent {
        n: usize,
        resp: oneshot::Sender<Result<Vec<HistoryEntry>, RuntimeError>>,
    },
    Count {
        resp: oneshot::Sender<Result<usize, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

type SharedStore<S> = Arc<Mutex<HistoryStore<S>>>;

/// Moves `store` into a background task and returns a handle to it.
///
/// Must be called inside a tokio runtime.
pub fn spawn_history<S>(mut store: HistoryStore<S>, config: RuntimeConfig) -> HistoryHandle
where
    S: HistoryStorage + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<HistoryEvent>(config.event_capacity);

    let fault_tx = events_tx.clone();
    store.set_fault_hook(Box::new(move |fault: &StorageFault<'_>| {
        let _ = fault_tx.send(HistoryEvent::StorageFault {
            op: fault.op,
            message: fault.error.to_string(),
        });
    }));

    let store: SharedStore<S> = Arc::new(Mutex::new(store));
    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &store, &events_tx_loop).await {
                break;
            }
        }
        debug!("history runtime stopped");
    });

    HistoryHandle { cmd_tx, events_tx }
}

impl HistoryHandle {
    /// Receiver for events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> {
        self.events_tx.subscribe()
    }

    /// Records `result` stamped with the current local time.
    pub async fn append(&self, result: DecodeResult) -> Result<AppendOutcome, RuntimeError> {
        self.request(|resp| Command::Append { result, resp }).await
    }

    /// Decodes `text` with the default decoder and records the result.
    pub async fn decode_and_record(
        &self,
        text: &str,
    ) -> Result<(DecodeResult, AppendOutcome), RuntimeError> {
        let result = HexDecoder::shared().decode(text);
        let outcome = self.append(result.clone()).await?;
        Ok((result, outcome))
    }

    /// Removes the first entry with the identity of `entry`.
    pub async fn delete(&self, entry: HistoryEntry) -> Result<bool, RuntimeError> {
        self.request(|resp| Command::Delete { entry, resp }).await
    }

    /// Whole collection in append order.
    pub async fn list(&self) -> Result<Vec<HistoryEntry>, RuntimeError> {
        self.request(|resp| Command::List { resp }).await
    }

    /// Up to `n` entries, newest first.
    pub async fn recent(&self, n: usize) -> Result<Vec<HistoryEntry>, RuntimeError> {
        self.request(|resp| Command::Recent { n, resp }).await
    }

    /// Number of persisted entries.
    pub async fn count(&self) -> Result<usize, RuntimeError> {
        self.request(|resp| Command::Count { resp }).await
    }

    /// Stops the task; later calls fail with [`RuntimeError::ChannelClosed`].
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Shutdown { resp }).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T, RuntimeError>>) -> Command,
    ) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }
}

async fn handle_command<S>(
    cmd: Command,
    store: &SharedStore<S>,
    events_tx: &broadcast::Sender<HistoryEvent>,
) -> bool
where
    S: HistoryStorage + 'static,
{
    match cmd {
        Command::Append { result, resp } => {
            let res = with_store(store, move |s| s.append(&result)).await;
            if let Ok(outcome) = &res {
                let _ = events_tx.send(HistoryEvent::Appended {
                    timestamp: outcome.entry.timestamp.clone(),
                    num_replacements: outcome.entry.num_replacements,
                });
                if outcome.evicted > 0 {
                    let _ = events_tx.send(HistoryEvent::Evicted {
                        count: outcome.evicted,
                    });
                }
            }
            let _ = resp.send(res);
        }
        Command::Delete { entry, resp } => {
            let timestamp = entry.timestamp.clone();
            let res = with_store(store, move |s| s.delete(&entry)).await;
            if matches!(res, Ok(true)) {
                let _ = events_tx.send(HistoryEvent::Deleted { timestamp });
            }
            let _ = resp.send(res);
        }
        Command::List { resp } => {
            let _ = resp.send(with_store(store, |s| s.load_all()).await);
        }
        Command::Recent { n, resp } => {
            let _ = resp.send(with_store(store, move |s| s.recent(n)).await);
        }
        Command::Count { resp } => {
            let _ = resp.send(with_store(store, |s| s.count()).await);
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(Ok(()));
            return true;
        }
    }
    false
}

async fn with_store<S, T, F>(store: &SharedStore<S>, f: F) -> Result<T, RuntimeError>
where
    S: HistoryStorage + 'static,
    T: Send + 'static,
    F: FnOnce(&mut HistoryStore<S>) -> T + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || {
        let mut guard = store.blocking_lock();
        f(&mut guard)
    })
    .await
    .map_err(|e| RuntimeError::Worker(format!("join error: {e}")))
}
