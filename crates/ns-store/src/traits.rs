use crate::batch::WriteBatch;
use crate::error::StoreResult;

/// Read half of a byte-oriented key-value store.
///
/// Split from [`KvStore`] so read-only callers (point queries) can work over
/// a shared borrow.
pub trait KvRead {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing was ever written there.
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Check whether anything is stored under `key`.
    fn has(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Byte-oriented key-value store.
///
/// All implementations must satisfy these invariants:
/// - A `set` is visible to every subsequent `get` on the same handle.
/// - Keys are never deleted.
/// - `apply_batch` is all-or-nothing.
/// - The store never interprets values -- it is a pure key-value store.
/// - Backend failures are propagated, never silently ignored.
pub trait KvStore: KvRead {
    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Apply every write in `batch`, or none of them if an error is returned.
    fn apply_batch(&mut self, batch: WriteBatch) -> StoreResult<()>;
}

impl<T: KvRead + ?Sized> KvRead for &T {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn has(&self, key: &[u8]) -> StoreResult<bool> {
        (**self).has(key)
    }
}

impl<T: KvRead + ?Sized> KvRead for &mut T {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn has(&self, key: &[u8]) -> StoreResult<bool> {
        (**self).has(key)
    }
}

impl<T: KvStore + ?Sized> KvStore for &mut T {
    fn set(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn apply_batch(&mut self, batch: WriteBatch) -> StoreResult<()> {
        (**self).apply_batch(batch)
    }
}
