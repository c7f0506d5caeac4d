//! The ordered-delivery driver.
//!
//! [`NameServiceApp`] receives operations one at a time, in delivery order,
//! and applies each one against a single backing store that holds both the
//! registry and the ledger. The operation runs over two write batches (one
//! seen by the name view, one by the ledger) that are merged and handed to
//! [`KvStore::apply_batch`] in one call on success. A failed operation, or a
//! rejected commit, leaves the store exactly as it was.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use ns_bank::{Bank, TransferAdapter};
use ns_store::{CacheStore, KvRead, KvStore, NameStore};
use ns_types::{Address, Amount, Operation, OperationKind};

use crate::codec::{CodecRegistry, Envelope};
use crate::config::{GenesisConfig, RegistryConfig};
use crate::engine::{Event, Outcome, TransitionEngine};
use crate::error::RegistryResult;
use crate::module::NameServiceModule;
use crate::query::Querier;
use crate::router::{Context, Router};
use crate::validation::Validator;

// ---------------------------------------------------------------------------
// Receipt
// ---------------------------------------------------------------------------

/// Result of one delivered operation, in a form fit for a block receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Position in delivery order.
    pub seq: u64,
    /// `None` when the envelope could not be decoded.
    pub kind: Option<OperationKind>,
    pub name: Option<String>,
    pub result: ReceiptResult,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReceiptResult {
    Ok { events: Vec<Event> },
    Err { code: String, message: String },
}

impl Receipt {
    fn new(
        seq: u64,
        kind: Option<OperationKind>,
        name: Option<String>,
        result: RegistryResult<Outcome>,
    ) -> Self {
        let result = match result {
            Ok(outcome) => ReceiptResult::Ok {
                events: outcome.events,
            },
            Err(err) => {
                warn!(seq, code = err.code(), error = %err, "operation rejected");
                ReceiptResult::Err {
                    code: err.code().to_string(),
                    message: err.to_string(),
                }
            }
        };
        Self {
            seq,
            kind,
            name,
            result,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.result, ReceiptResult::Ok { .. })
    }

    pub fn error_code(&self) -> Option<&str> {
        match &self.result {
            ReceiptResult::Ok { .. } => None,
            ReceiptResult::Err { code, .. } => Some(code),
        }
    }

    pub fn events(&self) -> &[Event] {
        match &self.result {
            ReceiptResult::Ok { events } => events,
            ReceiptResult::Err { .. } => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// NameServiceApp
// ---------------------------------------------------------------------------

/// Applies delivered operations to one store shared by names and balances.
pub struct NameServiceApp<'c, S> {
    codec: &'c CodecRegistry,
    router: Router,
    validator: Validator,
    config: RegistryConfig,
    store: S,
    next_seq: u64,
}

impl<'c, S: KvStore> NameServiceApp<'c, S> {
    /// Build an app with the name-service module mounted on its route.
    pub fn new(
        codec: &'c CodecRegistry,
        config: RegistryConfig,
        store: S,
    ) -> RegistryResult<Self> {
        config.validate()?;
        let module = NameServiceModule::new(TransitionEngine::new(config.floor_price));
        let router = Router::new().with(Box::new(module))?;
        Ok(Self {
            codec,
            router,
            validator: Validator::new(&config),
            config,
            store,
            next_seq: 0,
        })
    }

    /// Like [`Self::new`], then credit the genesis balances.
    pub fn with_genesis(
        codec: &'c CodecRegistry,
        config: RegistryConfig,
        genesis: &GenesisConfig,
        store: S,
    ) -> RegistryResult<Self> {
        let mut app = Self::new(codec, config, store)?;
        let mut batch = CacheStore::new(&app.store);
        Bank::new(&mut batch).load_genesis(&genesis.balances)?;
        let batch = batch.into_batch();
        app.store.apply_batch(batch)?;
        info!(accounts = genesis.balances.len(), "genesis balances loaded");
        Ok(app)
    }

    /// Decode and apply one envelope.
    pub fn deliver(&mut self, envelope: &Envelope) -> Receipt {
        let seq = self.take_seq();
        match self.codec.decode(envelope) {
            Ok(op) => self.receipt(seq, &op),
            Err(err) => Receipt::new(seq, None, None, Err(err)),
        }
    }

    /// Apply envelopes strictly in order. Each one is resolved before the
    /// next is looked at; a rejection does not stop the block.
    pub fn deliver_block(&mut self, envelopes: &[Envelope]) -> Vec<Receipt> {
        let receipts: Vec<Receipt> = envelopes.iter().map(|env| self.deliver(env)).collect();
        let accepted = receipts.iter().filter(|r| r.is_ok()).count();
        info!(
            operations = receipts.len(),
            accepted,
            rejected = receipts.len() - accepted,
            "block applied"
        );
        receipts
    }

    /// Apply an already-decoded operation and wrap the result in a receipt.
    pub fn apply_operation(&mut self, op: &Operation) -> Receipt {
        let seq = self.take_seq();
        self.receipt(seq, op)
    }

    /// Apply an already-decoded operation, returning the typed result.
    pub fn apply(&mut self, op: &Operation) -> RegistryResult<Outcome> {
        let seq = self.take_seq();
        self.execute(seq, op)
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn receipt(&mut self, seq: u64, op: &Operation) -> Receipt {
        let result = self.execute(seq, op);
        Receipt::new(seq, Some(op.kind()), Some(op.name().to_string()), result)
    }

    fn execute(&mut self, seq: u64, op: &Operation) -> RegistryResult<Outcome> {
        self.validator.validate(op)?;

        let mut names_batch = CacheStore::new(&self.store);
        let mut balances_batch = CacheStore::new(&self.store);

        let result = {
            let mut bank = Bank::new(&mut balances_batch);
            let mut ledger = TransferAdapter::new(&mut bank);
            let mut ctx = Context {
                seq,
                names: NameStore::new(&mut names_batch as &mut dyn KvStore),
                ledger: &mut ledger,
            };
            self.router.route(&mut ctx, op)
        };

        let outcome = result?;

        // Name keys and ledger keys live under disjoint prefixes.
        let mut batch = names_batch.into_batch();
        batch.merge(balances_batch.into_batch());
        self.store.apply_batch(batch)?;
        Ok(outcome)
    }
}

impl<'c, S: KvRead> NameServiceApp<'c, S> {
    /// Point queries against committed state.
    pub fn query(&self) -> Querier<&S> {
        Querier::new(&self.store, self.config.floor_price)
    }

    pub fn balance(&self, account: &Address) -> RegistryResult<Amount> {
        Ok(Bank::new(&self.store).balance(account)?)
    }

    /// Total debited from buyers of previously unowned names.
    pub fn reserve(&self) -> RegistryResult<Amount> {
        Ok(Bank::new(&self.store).reserve()?)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn codec(&self) -> &'c CodecRegistry {
        self.codec
    }

    /// Sequence number the next delivered operation will get.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Tear the app down and return the backing store.
    pub fn into_store(self) -> S {
        self.store
    }
}
