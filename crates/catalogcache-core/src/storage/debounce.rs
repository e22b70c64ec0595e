use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{save_collection, KeyValueStore};

/// Default quiet period before a scheduled snapshot is written.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Coalesces bursts of collection snapshots into a single write.
///
/// Each scheduled snapshot replaces the pending one and restarts the quiet
/// period; the latest snapshot is written once no new one has arrived for
/// `delay`. The writer runs as a tokio task. Dropping it flushes the pending snapshot.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<Vec<T>>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Serialize + Send + 'static,
{
    /// Start the writer task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn(storage: Arc<dyn KeyValueStore>, key: impl Into<String>, delay: Duration) -> Self {
        let key = key.into();
        let (tx, mut rx) = mpsc::unbounded_channel::<Vec<T>>();

        let task = tokio::spawn(async move {
            while let Some(mut pending) = rx.recv().await {
                loop {
                    tokio::select! {
                        next = rx.recv() => match next {
                            Some(items) => pending = items,
                            None => break,
                        },
                        _ = tokio::time::sleep(delay) => break,
                    }
                }
                debug!(key = %key, count = pending.len(), "Writing debounced snapshot");
                save_collection(storage.as_ref(), &key, &pending);
            }
        });

        Self { tx, task }
    }

    /// Queue a snapshot for writing after the quiet period.
    pub fn schedule(&self, items: Vec<T>) {
        if self.tx.send(items).is_err() {
            warn!("Persistence task has stopped; snapshot dropped");
        }
    }

    /// Write any pending snapshot now and wait for the writer to finish.
    pub async fn close(self) {
        let Self { tx, task } = self;
        drop(tx);
        if let Err(e) = task.await {
            warn!(error = %e, "Persistence task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test(start_paused = true)]
    async fn test_burst_produces_single_write() {
        let store = Arc::new(MemoryStore::new());
        let debouncer = Debouncer::spawn(store.clone(), "numbers", DEFAULT_DEBOUNCE);

        debouncer.schedule(vec![1]);
        debouncer.schedule(vec![1, 2]);
        debouncer.schedule(vec![1, 2, 3]);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.write_count("numbers"), 0);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(store.write_count("numbers"), 1);
        assert_eq!(store.get_item("numbers").unwrap().as_deref(), Some("[1,2,3]"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_snapshot_restarts_quiet_period() {
        let store = Arc::new(MemoryStore::new());
        let debouncer = Debouncer::spawn(store.clone(), "numbers", DEFAULT_DEBOUNCE);

        debouncer.schedule(vec![1]);
        tokio::time::sleep(Duration::from_millis(300)).await;
        debouncer.schedule(vec![2]);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(store.write_count("numbers"), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(store.write_count("numbers"), 1);
        assert_eq!(store.get_item("numbers").unwrap().as_deref(), Some("[2]"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_write_separately() {
        let store = Arc::new(MemoryStore::new());
        let debouncer = Debouncer::spawn(store.clone(), "numbers", DEFAULT_DEBOUNCE);

        debouncer.schedule(vec![1]);
        tokio::time::sleep(Duration::from_millis(500)).await;
        debouncer.schedule(vec![2]);
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(store.write_count("numbers"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_flushes_pending() {
        let store = Arc::new(MemoryStore::new());
        let debouncer = Debouncer::spawn(store.clone(), "numbers", DEFAULT_DEBOUNCE);

        debouncer.schedule(vec![9]);
        drop(debouncer);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(store.write_count("numbers"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_writes_without_waiting() {
        let store = Arc::new(MemoryStore::new());
        let debouncer = Debouncer::spawn(store.clone(), "numbers", DEFAULT_DEBOUNCE);

        debouncer.schedule(vec![4, 5]);
        debouncer.close().await;

        assert_eq!(store.get_item("numbers").unwrap().as_deref(), Some("[4,5]"));
    }
}
