//! Fire-and-forget remote synchronization.
//!
//! Mutations enqueue onto a bounded channel drained by a single worker
//! task. Enqueueing never blocks the caller; remote failures are logged and
//! never retried. Every push is an independent idempotent upsert, so
//! out-of-order completion is harmless — the merge resolver settles
//! conflicts on the next startup pull.

pub mod remote;

pub use remote::{HttpRemoteStore, MemoryRemoteStore, RemoteStore};

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Sync transport errors.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Outbound work items for the sync worker.
#[derive(Debug)]
enum SyncTask {
    Upsert {
        collection: &'static str,
        id: String,
        data: Value,
    },
    Delete {
        collection: &'static str,
        id: String,
    },
    Wipe {
        collection: &'static str,
    },
}

const QUEUE_CAPACITY: usize = 256;

/// Handle onto the background sync queue.
///
/// The disabled variant (no remote configured) turns every enqueue into a
/// logged no-op, so callers never branch on connectivity.
pub struct SyncHandle {
    tx: Option<mpsc::Sender<SyncTask>>,
    worker: Option<JoinHandle<()>>,
}

impl SyncHandle {
    /// Spawn the worker task. Must be called from within a tokio runtime.
    pub fn spawn(remote: Arc<dyn RemoteStore>) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let worker = tokio::spawn(run_worker(remote, rx));
        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Handle with no remote behind it.
    pub fn disabled() -> Self {
        Self {
            tx: None,
            worker: None,
        }
    }

    /// Schedule a merge-upsert of one whole record.
    pub fn push_item(&self, collection: &'static str, id: &str, data: Value) {
        self.send(SyncTask::Upsert {
            collection,
            id: id.to_string(),
            data,
        });
    }

    /// Schedule a best-effort remote delete.
    pub fn delete_item(&self, collection: &'static str, id: &str) {
        self.send(SyncTask::Delete {
            collection,
            id: id.to_string(),
        });
    }

    /// Schedule dropping a whole remote collection.
    pub fn wipe(&self, collection: &'static str) {
        self.send(SyncTask::Wipe { collection });
    }

    fn send(&self, task: SyncTask) {
        let Some(tx) = &self.tx else {
            tracing::debug!(?task, "remote sync disabled, dropping task");
            return;
        };
        if let Err(error) = tx.try_send(task) {
            tracing::warn!(%error, "sync queue unavailable, dropping task");
        }
    }

    /// Drain the queue and stop the worker. Outstanding tasks complete;
    /// nothing new can be scheduled afterwards.
    pub async fn close(mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.await;
        }
    }
}

async fn run_worker(remote: Arc<dyn RemoteStore>, mut rx: mpsc::Receiver<SyncTask>) {
    while let Some(task) = rx.recv().await {
        let outcome = match &task {
            SyncTask::Upsert {
                collection,
                id,
                data,
            } => remote.upsert(collection, id, data.clone()).await,
            SyncTask::Delete { collection, id } => remote.delete(collection, id).await,
            SyncTask::Wipe { collection } => remote.wipe(collection).await,
        };
        match outcome {
            Ok(()) => tracing::debug!(?task, "synced"),
            // Not retried: local state stays authoritative and the next
            // push or startup pull converges the replicas.
            Err(error) => tracing::warn!(?task, %error, "remote sync failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn pushes_reach_the_remote() {
        let remote = Arc::new(MemoryRemoteStore::new());
        let handle = SyncHandle::spawn(remote.clone());

        handle.push_item("questions", "q1", json!({"name": "two sum"}));
        handle.push_item("questions", "q2", json!({"name": "dfs"}));
        handle.close().await;

        assert_eq!(remote.len("questions").await, 2);
    }

    #[tokio::test]
    async fn delete_and_wipe_reach_the_remote() {
        let remote = Arc::new(MemoryRemoteStore::new());
        remote.seed("questions", "q1", json!({"a": 1})).await;
        remote.seed("questions", "q2", json!({"a": 2})).await;
        remote.seed("daily_log", "2026-03-01", json!({"solved": 1})).await;

        let handle = SyncHandle::spawn(remote.clone());
        handle.delete_item("questions", "q1");
        handle.wipe("daily_log");
        handle.close().await;

        assert_eq!(remote.len("questions").await, 1);
        assert_eq!(remote.len("daily_log").await, 0);
    }

    #[tokio::test]
    async fn disabled_handle_is_a_no_op() {
        let handle = SyncHandle::disabled();
        handle.push_item("questions", "q1", json!({}));
        handle.delete_item("questions", "q1");
        handle.close().await;
    }

    #[tokio::test]
    async fn later_push_wins_remotely() {
        let remote = Arc::new(MemoryRemoteStore::new());
        let handle = SyncHandle::spawn(remote.clone());

        handle.push_item("questions", "q1", json!({"streak": 1}));
        handle.push_item("questions", "q1", json!({"streak": 2}));
        handle.close().await;

        let doc = remote.get("questions", "q1").await.unwrap();
        assert_eq!(doc["streak"], 2);
    }
}
