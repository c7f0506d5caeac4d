//! Read-only point queries over committed registry state.

use serde::{Deserialize, Serialize};

use ns_store::{KvRead, NameStore};
use ns_types::{Address, Amount};

use crate::engine::effective_price;
use crate::error::RegistryResult;

/// Everything known about one name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Whois {
    pub name: String,
    pub value: Option<String>,
    pub owner: Option<Address>,
    pub price: Amount,
}

/// Side-effect-free lookups against a name store.
#[derive(Debug)]
pub struct Querier<S> {
    names: NameStore<S>,
    floor_price: Amount,
}

impl<S: KvRead> Querier<S> {
    pub fn new(store: S, floor_price: Amount) -> Self {
        Self {
            names: NameStore::new(store),
            floor_price,
        }
    }

    /// The value `name` resolves to, if one was ever set.
    pub fn resolve(&self, name: &str) -> RegistryResult<Option<String>> {
        Ok(self.names.value(name)?)
    }

    pub fn current_owner(&self, name: &str) -> RegistryResult<Option<Address>> {
        Ok(self.names.owner(name)?)
    }

    /// Price a buyer must exceed; the floor price when nobody owns `name`.
    pub fn current_price(&self, name: &str) -> RegistryResult<Amount> {
        effective_price(&self.names, name, self.floor_price)
    }

    pub fn whois(&self, name: &str) -> RegistryResult<Whois> {
        Ok(Whois {
            name: name.to_string(),
            value: self.resolve(name)?,
            owner: self.current_owner(name)?,
            price: self.current_price(name)?,
        })
    }
}
