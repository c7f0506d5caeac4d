//! Balance ledger for the name registry.
//!
//! The registry never owns balances. This crate provides:
//! - [`Bank`], the full ledger over any [`KvStore`](ns_store::KvStore):
//!   balances, genesis minting, and the reserve of debited funds
//! - [`LedgerTransfer`], the two-method capability (transfer, debit) the
//!   transition engine is allowed to use
//! - [`TransferAdapter`], which narrows a `Bank` down to that capability

pub mod adapter;
pub mod bank;
pub mod error;
pub mod traits;

pub use adapter::TransferAdapter;
pub use bank::{Bank, GenesisBalance};
pub use error::{BankError, BankResult};
pub use traits::LedgerTransfer;
