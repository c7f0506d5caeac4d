//! Typed access to the three name-registry namespaces.

use ns_types::{Address, Amount};

use crate::error::{StoreError, StoreResult};
use crate::traits::{KvRead, KvStore};

/// One of the registry's logically separate key spaces.
///
/// Each namespace owns a distinct fixed prefix and no prefix is a prefix of
/// another, so a key in one namespace can never alias a key in another no
/// matter what bytes the name contains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Name -> resolved value (UTF-8).
    Values,
    /// Name -> owner address (20 raw bytes).
    Owners,
    /// Name -> price paid in the latest acquisition (16-byte big-endian).
    Prices,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [Self::Values, Self::Owners, Self::Prices];

    pub fn prefix(&self) -> &'static [u8] {
        match self {
            Self::Values => b"values/",
            Self::Owners => b"owners/",
            Self::Prices => b"prices/",
        }
    }

    /// Full store key for `name` in this namespace.
    pub fn key(&self, name: &str) -> Vec<u8> {
        let prefix = self.prefix();
        let mut key = Vec::with_capacity(prefix.len() + name.len());
        key.extend_from_slice(prefix);
        key.extend_from_slice(name.as_bytes());
        key
    }
}

/// Typed read/write view of the values, owners and prices namespaces.
///
/// `NameStore` does not enforce any registry rule; it only encodes and
/// decodes. Ownership and price are written by the buy transition, values by
/// the rename transition.
#[derive(Debug)]
pub struct NameStore<S> {
    store: S,
}

impl<S> NameStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the accessor and return the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KvRead> NameStore<S> {
    // ---- values ----

    /// The value `name` resolves to, if one was ever set.
    pub fn value(&self, name: &str) -> StoreResult<Option<String>> {
        let key = Namespace::Values.key(name);
        self.store
            .get(&key)?
            .map(|raw| {
                String::from_utf8(raw).map_err(|e| StoreError::corrupt(&key, e.to_string()))
            })
            .transpose()
    }

    // ---- owners ----

    /// The current owner of `name`, or `None` if it was never bought.
    pub fn owner(&self, name: &str) -> StoreResult<Option<Address>> {
        let key = Namespace::Owners.key(name);
        self.store
            .get(&key)?
            .map(|raw| Address::from_slice(&raw).map_err(|e| StoreError::corrupt(&key, e.to_string())))
            .transpose()
    }

    pub fn has_owner(&self, name: &str) -> StoreResult<bool> {
        self.store.has(&Namespace::Owners.key(name))
    }

    // ---- prices ----

    /// The price recorded at the last acquisition, if any.
    ///
    /// This is the raw record. The floor price for unowned names is a registry
    /// rule and is applied by the caller.
    pub fn recorded_price(&self, name: &str) -> StoreResult<Option<Amount>> {
        let key = Namespace::Prices.key(name);
        self.store
            .get(&key)?
            .map(|raw| Amount::from_be_slice(&raw).map_err(|e| StoreError::corrupt(&key, e.to_string())))
            .transpose()
    }
}

impl<S: KvStore> NameStore<S> {
    pub fn set_value(&mut self, name: &str, value: &str) -> StoreResult<()> {
        self.store.set(&Namespace::Values.key(name), value.as_bytes())
    }

    pub fn set_owner(&mut self, name: &str, owner: &Address) -> StoreResult<()> {
        self.store.set(&Namespace::Owners.key(name), owner.as_bytes())
    }

    pub fn set_price(&mut self, name: &str, price: Amount) -> StoreResult<()> {
        self.store.set(&Namespace::Prices.key(name), &price.to_be_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryKvStore;

    fn names() -> NameStore<InMemoryKvStore> {
        NameStore::new(InMemoryKvStore::new())
    }

    // -----------------------------------------------------------------------
    // Namespaces
    // -----------------------------------------------------------------------

    #[test]
    fn prefixes_are_disjoint() {
        for a in Namespace::ALL {
            for b in Namespace::ALL {
                if a != b {
                    assert!(!a.prefix().starts_with(b.prefix()), "{a:?} vs {b:?}");
                }
            }
        }
    }

    #[test]
    fn same_name_maps_to_distinct_keys() {
        let keys: Vec<Vec<u8>> = Namespace::ALL.iter().map(|ns| ns.key("alice.id")).collect();
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[1], keys[2]);
        assert_ne!(keys[0], keys[2]);
    }

    #[test]
    fn names_that_look_like_prefixes_do_not_collide() {
        // "prices/x" stored as a value must not shadow the price of "x".
        let mut store = names();
        store.set_value("prices/x", "v").unwrap();
        assert_eq!(store.recorded_price("x").unwrap(), None);
    }

    // -----------------------------------------------------------------------
    // Typed round-trips
    // -----------------------------------------------------------------------

    #[test]
    fn unset_name_reads_as_absent() {
        let store = names();
        assert_eq!(store.value("a.id").unwrap(), None);
        assert_eq!(store.owner("a.id").unwrap(), None);
        assert_eq!(store.recorded_price("a.id").unwrap(), None);
        assert!(!store.has_owner("a.id").unwrap());
    }

    #[test]
    fn value_is_readable_after_write() {
        let mut store = names();
        store.set_value("a.id", "1.2.3.4").unwrap();
        assert_eq!(store.value("a.id").unwrap().as_deref(), Some("1.2.3.4"));
    }

    #[test]
    fn owner_and_price_are_readable_after_write() {
        let mut store = names();
        let owner = Address::derive(b"owner");
        store.set_owner("a.id", &owner).unwrap();
        store.set_price("a.id", Amount::new(42)).unwrap();
        assert_eq!(store.owner("a.id").unwrap(), Some(owner));
        assert!(store.has_owner("a.id").unwrap());
        assert_eq!(store.recorded_price("a.id").unwrap(), Some(Amount::new(42)));
    }

    // -----------------------------------------------------------------------
    // Corruption
    // -----------------------------------------------------------------------

    #[test]
    fn corrupt_owner_is_reported() {
        let mut raw = InMemoryKvStore::new();
        raw.set(&Namespace::Owners.key("a.id"), b"short").unwrap();
        let store = NameStore::new(raw);
        assert!(matches!(
            store.owner("a.id"),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn corrupt_price_is_reported() {
        let mut raw = InMemoryKvStore::new();
        raw.set(&Namespace::Prices.key("a.id"), &[1, 2, 3]).unwrap();
        let store = NameStore::new(raw);
        let err = store.recorded_price("a.id").unwrap_err();
        assert!(err.to_string().contains("prices/a.id"));
    }

    #[test]
    fn non_utf8_value_is_reported() {
        let mut raw = InMemoryKvStore::new();
        raw.set(&Namespace::Values.key("a.id"), &[0xff, 0xfe]).unwrap();
        let store = NameStore::new(raw);
        assert!(store.value("a.id").is_err());
    }

    #[test]
    fn into_inner_returns_backing_store() {
        let mut store = names();
        store.set_value("a.id", "v").unwrap();
        let raw = store.into_inner();
        assert_eq!(raw.len(), 1);
    }
}
