use std::collections::BTreeMap;

use crate::batch::WriteBatch;
use crate::error::StoreResult;
use crate::traits::{KvRead, KvStore};

/// In-memory, `BTreeMap`-based key-value store.
///
/// Intended for tests and embedding. Keys iterate in byte order, which keeps
/// prefix scans and debug dumps deterministic.
#[derive(Clone, Default)]
pub struct InMemoryKvStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryKvStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries whose key starts with `prefix`, in key order.
    pub fn scan_prefix<'a>(
        &'a self,
        prefix: &'a [u8],
    ) -> impl Iterator<Item = (&'a [u8], &'a [u8])> + 'a {
        self.entries
            .range(prefix.to_vec()..)
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

impl KvRead for InMemoryKvStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn has(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.entries.contains_key(key))
    }
}

impl KvStore for InMemoryKvStore {
    fn set(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn apply_batch(&mut self, batch: WriteBatch) -> StoreResult<()> {
        self.entries.extend(batch);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKvStore")
            .field("key_count", &self.len())
            .finish()
    }
}
