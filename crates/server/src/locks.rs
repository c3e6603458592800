use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use jimbo_core::domain::event::EventId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per event message.
///
/// Holders keep the guard across the whole read, reconcile, write and render
/// cycle. Entries nobody holds or waits on are dropped on the next acquisition.
#[derive(Clone, Default)]
pub struct EventLocks {
    inner: Arc<Mutex<HashMap<EventId, Arc<AsyncMutex<()>>>>>,
}

impl EventLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, id: &EventId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(id.clone()).or_default())
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
