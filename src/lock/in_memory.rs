use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::warn;

use super::LockError;
use crate::book::BookId;

type LockTable = Arc<Mutex<HashMap<BookId, Arc<AsyncMutex<()>>>>>;

/// Held while a mutation of one book is in flight. Dropping it lets the
/// next queued call for the same id proceed, and forgets the id's lock
/// once nobody else is waiting on it.
pub struct RecordGuard {
    id: BookId,
    held: Option<OwnedMutexGuard<()>>,
    table: LockTable,
}

impl RecordGuard {
    pub fn id(&self) -> BookId {
        self.id
    }
}

impl Drop for RecordGuard {
    fn drop(&mut self) {
        // unlock first so our own reference no longer counts
        drop(self.held.take());
        if let Err(e) = release_entry(&self.table, self.id) {
            warn!(id = self.id, error = %e, "record lock not released");
        }
    }
}

impl std::fmt::Debug for RecordGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordGuard").field("id", &self.id).finish()
    }
}

fn poisoned() -> LockError {
    LockError::Poisoned("lock manager map poisoned".into())
}

/// Remove the entry for `id` if the table holds the only reference.
fn release_entry(table: &LockTable, id: BookId) -> Result<(), LockError> {
    let mut locks = table.lock().map_err(|_| poisoned())?;
    if let Some(lock) = locks.get(&id) {
        if Arc::strong_count(lock) == 1 {
            locks.remove(&id);
        }
    }
    Ok(())
}

/// In-memory lock manager backed by a `HashMap<BookId, Arc<AsyncMutex<()>>>`.
///
/// Lazily creates one lock per id and returns the same `Arc` for repeated
/// lookups. Waiters are woken in FIFO order (tokio's mutex is fair), which
/// is what gives issuance-order completion. An id's entry lives only while
/// a [`RecordGuard`] or a waiter references it.
#[derive(Default)]
pub struct InMemoryLockManager {
    locks: LockTable,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the lock for `id`.
    pub fn get_lock(&self, id: BookId) -> Result<Arc<AsyncMutex<()>>, LockError> {
        let mut locks = self.locks.lock().map_err(|_| poisoned())?;
        Ok(locks
            .entry(id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone())
    }

    /// Wait for, then hold, the lock for `id`.
    pub async fn acquire(&self, id: BookId) -> Result<RecordGuard, LockError> {
        let lock = self.get_lock(id)?;
        let held = lock.lock_owned().await;
        Ok(RecordGuard {
            id,
            held: Some(held),
            table: Arc::clone(&self.locks),
        })
    }

    /// Drop the lock for `id` once nothing else references it. Guards do
    /// this on drop; this is for entries created through [`get_lock`](Self::get_lock).
    pub fn release(&self, id: BookId) -> Result<(), LockError> {
        release_entry(&self.locks, id)
    }

    /// Number of ids with a live lock entry.
    pub fn tracked(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }
}
