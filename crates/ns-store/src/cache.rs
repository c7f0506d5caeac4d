use tracing::debug;

use crate::batch::WriteBatch;
use crate::error::StoreResult;
use crate::traits::{KvRead, KvStore};

/// A revertible write batch layered over another store.
///
/// Writes are buffered in memory and shadow the parent for reads through this
/// handle. The parent only has to be readable: several caches can sit over
/// one shared borrow and their batches be merged and applied together later.
/// Nothing reaches the parent until [`CacheStore::commit`], which hands the
/// whole batch to [`KvStore::apply_batch`] in one call. Dropping the cache (or
/// calling [`CacheStore::discard`]) throws every buffered write away.
pub struct CacheStore<S> {
    parent: S,
    pending: WriteBatch,
}

impl<S> CacheStore<S> {
    pub fn new(parent: S) -> Self {
        Self {
            parent,
            pending: WriteBatch::new(),
        }
    }

    /// Number of keys written since the cache was opened.
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Give up the parent and return the buffered writes.
    pub fn into_batch(self) -> WriteBatch {
        self.pending
    }

    /// Drop every buffered write and return the untouched parent.
    pub fn discard(self) -> S {
        if !self.pending.is_empty() {
            debug!(writes = self.pending.len(), "write batch discarded");
        }
        self.parent
    }
}

impl<S: KvStore> CacheStore<S> {
    /// Apply every buffered write to the parent atomically and return it.
    ///
    /// If the parent rejects the batch, it is left exactly as it was.
    pub fn commit(mut self) -> StoreResult<S> {
        let count = self.pending.len();
        self.parent.apply_batch(self.pending)?;
        debug!(writes = count, "write batch committed");
        Ok(self.parent)
    }
}

impl<S: KvRead> KvRead for CacheStore<S> {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        match self.pending.get(key) {
            Some(value) => Ok(Some(value.to_vec())),
            None => self.parent.get(key),
        }
    }
}

impl<S: KvRead> KvStore for CacheStore<S> {
    fn set(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.pending.put(key, value);
        Ok(())
    }

    fn apply_batch(&mut self, batch: WriteBatch) -> StoreResult<()> {
        self.pending.merge(batch);
        Ok(())
    }
}

impl<S> std::fmt::Debug for CacheStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("pending_writes", &self.pending.len())
            .finish()
    }
}
