//! Periodic background flush of the cart store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::CartStore;

/// Handle to a running flush task.
///
/// Dropping the handle without calling [`FlushHandle::shutdown`] leaves the
/// task running until the runtime stops.
#[derive(Debug)]
pub struct FlushHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl FlushHandle {
    /// Stop the task after a final flush and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cart flush task failed");
        }
    }
}

/// Spawn a task that flushes `store` every `interval`.
pub fn spawn_flush_task(store: Arc<Mutex<CartStore>>, interval: Duration) -> FlushHandle {
    let (shutdown, mut shutdown_rx) = oneshot::channel();

    tracing::info!(interval_secs = interval.as_secs(), "Spawning cart flush task");
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    flush_once(&store).await;
                }
                _ = &mut shutdown_rx => {
                    flush_once(&store).await;
                    tracing::debug!("Cart flush task stopped");
                    break;
                }
            }
        }
    });

    FlushHandle { shutdown, task }
}

async fn flush_once(store: &Mutex<CartStore>) {
    let notices = store.lock().await.flush();
    for notice in notices {
        tracing::warn!(?notice, "Cart flush reported a problem");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cantera_core::ProductId;
    use cantera_core::cart::{CartSettings, NewCartItem};
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::{CART_KEY, ManualClock};
    use crate::storage::{MemoryStorage, StorageBackend, StorageError};

    /// Durable tier that rejects the first write, so the cart stays dirty.
    struct FlakyStorage {
        inner: MemoryStorage,
        failed: std::sync::atomic::AtomicBool,
    }

    impl StorageBackend for FlakyStorage {
        fn tier(&self) -> cantera_core::StorageTier {
            cantera_core::StorageTier::Durable
        }
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == CART_KEY && !self.failed.swap(true, std::sync::atomic::Ordering::SeqCst) {
                return Err(StorageError::Unavailable("busy".to_string()));
            }
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_task_retries_dirty_cart() {
        let durable = MemoryStorage::new().as_durable();
        let mut store = CartStore::new(
            FlakyStorage {
                inner: durable.clone(),
                failed: std::sync::atomic::AtomicBool::new(false),
            },
            MemoryStorage::new(),
            ManualClock::new(Utc::now()),
            CartSettings::default(),
        );
        store.init();
        store.add(NewCartItem::new(ProductId::new(3), "Lime mortar", Decimal::new(1100, 2)));
        assert!(store.is_dirty());

        let store = Arc::new(Mutex::new(store));
        let handle = spawn_flush_task(Arc::clone(&store), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(!store.lock().await.is_dirty());
        assert!(durable.get(CART_KEY).unwrap().is_some());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_flushes() {
        let durable = MemoryStorage::new().as_durable();
        let mut store = CartStore::new(
            durable.clone(),
            MemoryStorage::new(),
            ManualClock::new(Utc::now()),
            CartSettings::default(),
        );
        store.init();
        let store = Arc::new(Mutex::new(store));
        let handle = spawn_flush_task(Arc::clone(&store), Duration::from_secs(3600));

        handle.shutdown().await;
        assert!(!store.lock().await.is_dirty());
    }
}
