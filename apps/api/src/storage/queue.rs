//! Per-key serialized write queue.
//!
//! Every storage key gets its own worker task fed by an unbounded channel, so
//! writes for a key apply strictly in enqueue order (last-write-wins matches
//! call order) while distinct keys proceed independently. Callers never await
//! the disk write itself; they observe it through [`SyncStatus`].
//!
//! No automatic retries: a failed write leaves the key in `Failed` until the
//! caller re-saves, which enqueues a fresh write for the same key.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::{mpsc, Notify};
use tracing::{debug, error};

use crate::storage::store::{KeyValueStore, StoreError};

/// Persistence state of a single storage key, surfaced to the UI so unsaved
/// changes are never silently invisible.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncStatus {
    /// All enqueued writes for the key have been flushed to the store.
    Synced,
    /// Writes are pending; the in-memory value is ahead of the store.
    Dirty { pending: usize },
    /// The most recent write failed. The in-memory value is intact; a re-save
    /// retries the key.
    Failed { error: String },
}

struct KeyWorker {
    tx: mpsc::UnboundedSender<String>,
    pending: Arc<AtomicUsize>,
    last_error: Arc<Mutex<Option<String>>>,
}

pub struct WriteQueue {
    store: Arc<dyn KeyValueStore>,
    workers: Mutex<HashMap<String, KeyWorker>>,
    settled: Arc<Notify>,
}

impl WriteQueue {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        WriteQueue {
            store,
            workers: Mutex::new(HashMap::new()),
            settled: Arc::new(Notify::new()),
        }
    }

    /// Serializes `value` and queues it for the key's worker. Returns an error
    /// only if serialization fails; the write itself completes asynchronously.
    pub fn enqueue<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;

        let mut workers = self.workers.lock().expect("write queue lock poisoned");
        let worker = workers
            .entry(key.to_string())
            .or_insert_with(|| self.spawn_worker(key));
        worker.pending.fetch_add(1, Ordering::SeqCst);
        // The receiver lives as long as the queue; a send failure would mean
        // the worker task panicked, which we treat as a failed write.
        if worker.tx.send(raw).is_err() {
            worker.pending.fetch_sub(1, Ordering::SeqCst);
            *worker.last_error.lock().expect("worker lock poisoned") =
                Some("write worker is gone".to_string());
        }
        Ok(())
    }

    /// Current persistence status for one key. Keys that were never written
    /// are `Synced` (nothing to flush).
    pub fn status(&self, key: &str) -> SyncStatus {
        let workers = self.workers.lock().expect("write queue lock poisoned");
        let Some(worker) = workers.get(key) else {
            return SyncStatus::Synced;
        };
        let pending = worker.pending.load(Ordering::SeqCst);
        if pending > 0 {
            return SyncStatus::Dirty { pending };
        }
        let last_error = worker
            .last_error
            .lock()
            .expect("worker lock poisoned")
            .clone();
        match last_error {
            Some(error) => SyncStatus::Failed { error },
            None => SyncStatus::Synced,
        }
    }

    /// Waits until every key's queue has drained. Used by graceful shutdown
    /// and tests; a failed write still counts as drained.
    pub async fn flush(&self) {
        loop {
            let notified = self.settled.notified();
            tokio::pin!(notified);
            // Register for the wakeup before checking, so a worker finishing
            // between the check and the await is not missed.
            notified.as_mut().enable();
            if self.total_pending() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn total_pending(&self) -> usize {
        let workers = self.workers.lock().expect("write queue lock poisoned");
        workers
            .values()
            .map(|w| w.pending.load(Ordering::SeqCst))
            .sum()
    }

    fn spawn_worker(&self, key: &str) -> KeyWorker {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let pending = Arc::new(AtomicUsize::new(0));
        let last_error = Arc::new(Mutex::new(None::<String>));

        let store = Arc::clone(&self.store);
        let settled = Arc::clone(&self.settled);
        let worker_pending = Arc::clone(&pending);
        let worker_error = Arc::clone(&last_error);
        let worker_key = key.to_string();

        tokio::spawn(async move {
            while let Some(raw) = rx.recv().await {
                match store.set_raw(&worker_key, &raw).await {
                    Ok(()) => {
                        debug!(key = %worker_key, "flushed write");
                        *worker_error.lock().expect("worker lock poisoned") = None;
                    }
                    Err(e) => {
                        error!(key = %worker_key, error = %e, "write failed; value kept in memory");
                        *worker_error.lock().expect("worker lock poisoned") = Some(e.to_string());
                    }
                }
                worker_pending.fetch_sub(1, Ordering::SeqCst);
                settled.notify_waiters();
            }
        });

        KeyWorker {
            tx,
            pending,
            last_error,
        }
    }
}
