//! State storage for the name registry.
//!
//! The registry keeps three logically separate namespaces (values, owners,
//! prices) inside one key-value snapshot. This crate provides the raw store
//! interface, an in-memory backend, a revertible write batch, and the typed
//! accessor the transition engine works against.
//!
//! # Storage Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryKvStore`] -- ordered `BTreeMap` store for tests and embedding
//! - [`CacheStore`] -- buffered writes over any other store, committed or
//!   discarded as a unit
//!
//! # Design Rules
//!
//! 1. No deletion: names persist for the lifetime of the store.
//! 2. Writes are visible to later reads through the same handle.
//! 3. Namespaces never share a key: each has a distinct fixed prefix.
//! 4. Corrupt records are reported as errors, never silently defaulted.
//! 5. A [`WriteBatch`] lands in a store completely or not at all.

pub mod batch;
pub mod cache;
pub mod error;
pub mod memory;
pub mod names;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use batch::WriteBatch;
pub use cache::CacheStore;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryKvStore;
pub use names::{NameStore, Namespace};
pub use traits::{KvRead, KvStore};
