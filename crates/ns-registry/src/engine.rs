//! The two registry transitions.
//!
//! Both transitions are single-step and terminal: they either write their
//! effects into the store they were handed or return an error having written
//! nothing to the registry. A buy moves funds through the ledger *before*
//! touching ownership, so a rejected payment never leaves a dangling owner.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ns_bank::LedgerTransfer;
use ns_store::{KvRead, KvStore, NameStore, Namespace, StoreError};
use ns_types::{Amount, Buy, OperationKind, Rename};

use crate::error::{RegistryError, RegistryResult};

// ---------------------------------------------------------------------------
// Outcome / Event
// ---------------------------------------------------------------------------

/// Structured record of something a successful transition did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: String,
    pub attributes: BTreeMap<String, String>,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn attr(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.insert(key.into(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// What a successful transition reports back to the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub events: Vec<Event>,
}

impl Outcome {
    pub fn with_event(event: Event) -> Self {
        Self {
            events: vec![event],
        }
    }
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Effective price of `name`: the recorded price when owned, otherwise
/// `floor_price`.
///
/// An owner without a recorded price violates the owner/price pairing and is
/// reported as corruption rather than silently priced at the floor.
pub fn effective_price<S: KvRead>(
    names: &NameStore<S>,
    name: &str,
    floor_price: Amount,
) -> RegistryResult<Amount> {
    if !names.has_owner(name)? {
        return Ok(floor_price);
    }
    names.recorded_price(name)?.ok_or_else(|| {
        StoreError::corrupt(
            &Namespace::Prices.key(name),
            "owned name has no recorded price",
        )
        .into()
    })
}

// ---------------------------------------------------------------------------
// TransitionEngine
// ---------------------------------------------------------------------------

/// Applies rename and buy transitions to a name store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionEngine {
    floor_price: Amount,
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self::new(Amount::FLOOR_PRICE)
    }
}

impl TransitionEngine {
    pub fn new(floor_price: Amount) -> Self {
        Self { floor_price }
    }

    pub fn floor_price(&self) -> Amount {
        self.floor_price
    }

    /// Effective price of `name` under this engine's floor price.
    pub fn current_price<S: KvRead>(&self, names: &NameStore<S>, name: &str) -> RegistryResult<Amount> {
        effective_price(names, name, self.floor_price)
    }

    /// Set the value of a name. Only its current owner may do so.
    pub fn rename<S: KvStore>(
        &self,
        names: &mut NameStore<S>,
        op: &Rename,
    ) -> RegistryResult<Outcome> {
        // An unowned name has no owner to match, so every sender is rejected.
        if names.owner(&op.name)? != Some(op.sender) {
            debug!(name = %op.name, sender = %op.sender, "rename rejected: not owner");
            return Err(RegistryError::Unauthorized {
                name: op.name.clone(),
                sender: op.sender,
            });
        }

        names.set_value(&op.name, &op.value)?;
        debug!(name = %op.name, value = %op.value, "name value set");

        Ok(Outcome::with_event(
            Event::new(OperationKind::Rename.as_str())
                .attr("name", &op.name)
                .attr("value", &op.value)
                .attr("owner", op.sender),
        ))
    }

    /// Acquire a name by paying strictly more than its current price.
    ///
    /// Owned names are paid for by transferring the bid to the previous owner;
    /// unowned names are paid for by debiting the bid into the ledger reserve.
    /// Owner and price are written only after the ledger call succeeds.
    pub fn buy<S: KvStore>(
        &self,
        names: &mut NameStore<S>,
        ledger: &mut dyn LedgerTransfer,
        op: &Buy,
    ) -> RegistryResult<Outcome> {
        let previous_owner = names.owner(&op.name)?;
        let price = self.current_price(names, &op.name)?;

        if op.bid <= price {
            debug!(name = %op.name, bid = %op.bid, price = %price, "bid rejected");
            return Err(RegistryError::BidTooLow { bid: op.bid, price });
        }

        match previous_owner {
            Some(owner) => ledger.transfer(&op.buyer, &owner, op.bid)?,
            None => ledger.debit(&op.buyer, op.bid)?,
        }

        names.set_owner(&op.name, &op.buyer)?;
        names.set_price(&op.name, op.bid)?;

        info!(
            name = %op.name,
            buyer = %op.buyer,
            bid = %op.bid,
            previous_price = %price,
            "name acquired"
        );

        let mut event = Event::new(OperationKind::Buy.as_str())
            .attr("name", &op.name)
            .attr("buyer", op.buyer)
            .attr("bid", op.bid);
        event = match previous_owner {
            Some(owner) => event.attr("previous_owner", owner).attr("payment", "transfer"),
            None => event.attr("payment", "debit"),
        };
        Ok(Outcome::with_event(event))
    }
}
