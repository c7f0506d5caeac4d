use serde::{Deserialize, Serialize};

use ns_bank::GenesisBalance;
use ns_types::Amount;

use crate::error::{RegistryError, RegistryResult};

/// Tunables for the registry state machine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Effective price of a name nobody owns.
    pub floor_price: Amount,
    /// Longest accepted name in bytes. Zero disables the check.
    pub max_name_length: usize,
    /// Longest accepted value in bytes. Zero disables the check.
    pub max_value_length: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            floor_price: Amount::FLOOR_PRICE,
            max_name_length: 0,
            max_value_length: 0,
        }
    }
}

impl RegistryConfig {
    /// Reject configurations the state machine cannot run with.
    pub fn validate(&self) -> RegistryResult<()> {
        if !self.floor_price.is_positive() {
            return Err(RegistryError::Config(
                "floor_price must be at least one unit".into(),
            ));
        }
        Ok(())
    }
}

/// Balances present before the first operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisConfig {
    pub balances: Vec<GenesisBalance>,
}
