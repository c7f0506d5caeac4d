//! Name registry state machine.
//!
//! Maps human-readable names to a value, an owner, and the price last paid
//! for them. Ownership changes only through a strictly higher bid, values
//! change only at the owner's request, and every bid's payment is committed
//! together with the ownership change it buys.
//!
//! # Architecture
//!
//! ```text
//! Envelope -> CodecRegistry -> Validator -> Router -> NameServiceModule
//!                                                         |
//!                                                  TransitionEngine
//!                                                   /            \
//!                                              NameStore    LedgerTransfer
//! ```
//!
//! [`NameServiceApp`] drives the pipeline for one operation at a time over a
//! single store holding both the registry and the ledger. Each operation's
//! writes land in one atomic batch, so a rejected operation leaves no trace
//! in either.
//!
//! # Quick Start
//!
//! ```rust
//! use ns_registry::{CodecRegistry, NameServiceApp, RegistryConfig};
//! use ns_store::InMemoryKvStore;
//! use ns_types::{Address, Amount, Buy};
//!
//! let codec = CodecRegistry::with_nameservice();
//! let mut app = NameServiceApp::new(
//!     &codec,
//!     RegistryConfig::default(),
//!     InMemoryKvStore::new(),
//! )
//! .unwrap();
//!
//! // An unfunded buyer cannot acquire anything, and nothing changes.
//! let buyer = Address::derive(b"alice");
//! let receipt = app.apply_operation(&Buy::new("alice.id", Amount::new(5), buyer).into());
//! assert_eq!(receipt.error_code(), Some("insufficient_funds"));
//! assert_eq!(app.query().current_owner("alice.id").unwrap(), None);
//! ```

pub mod app;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod module;
pub mod query;
pub mod router;
pub mod validation;

pub use app::{NameServiceApp, Receipt, ReceiptResult};
pub use codec::{CodecRegistry, Envelope, BUY_NAME_TAG, SET_NAME_TAG};
pub use config::{GenesisConfig, RegistryConfig};
pub use engine::{Event, Outcome, TransitionEngine};
pub use error::{RegistryError, RegistryResult};
pub use module::NameServiceModule;
pub use query::{Querier, Whois};
pub use router::{Context, Handler, Router};
pub use validation::{ValidateBasic, Validator};
