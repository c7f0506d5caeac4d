//! Foundation types for the name registry.
//!
//! This crate provides the identity, currency, and operation types shared by
//! every other registry crate. Every other `ns-*` crate depends on `ns-types`.
//!
//! # Key Types
//!
//! - [`Address`] -- Fixed-format 20-byte account identifier
//! - [`Amount`] -- Quantity of the single base currency
//! - [`Operation`] -- Closed set of registry operations ([`Rename`], [`Buy`])

pub mod address;
pub mod amount;
pub mod error;
pub mod msg;

pub use address::Address;
pub use amount::Amount;
pub use error::TypeError;
pub use msg::{Buy, Operation, OperationKind, Rename, ROUTE};
