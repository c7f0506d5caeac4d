//! Stateless checks applied to an operation before it is dispatched.
//!
//! Nothing here reads or writes the store, so a rejected operation has no
//! effect at all.

use ns_types::{Buy, Operation, Rename};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};

/// Structural validity of a single operation, independent of any state.
pub trait ValidateBasic {
    fn validate_basic(&self) -> RegistryResult<()>;
}

impl ValidateBasic for Rename {
    fn validate_basic(&self) -> RegistryResult<()> {
        if self.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.sender.is_empty() {
            return Err(RegistryError::InvalidAddress);
        }
        Ok(())
    }
}

impl ValidateBasic for Buy {
    fn validate_basic(&self) -> RegistryResult<()> {
        if self.buyer.is_empty() {
            return Err(RegistryError::InvalidAddress);
        }
        if self.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if !self.bid.is_positive() {
            return Err(RegistryError::NonPositiveBid);
        }
        Ok(())
    }
}

impl ValidateBasic for Operation {
    fn validate_basic(&self) -> RegistryResult<()> {
        match self {
            Operation::Rename(op) => op.validate_basic(),
            Operation::Buy(op) => op.validate_basic(),
        }
    }
}

/// Structural checks plus the configured size limits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Validator {
    max_name_length: usize,
    max_value_length: usize,
}

impl Validator {
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            max_name_length: config.max_name_length,
            max_value_length: config.max_value_length,
        }
    }

    /// Validate `op`: structural checks first, then length limits.
    pub fn validate(&self, op: &Operation) -> RegistryResult<()> {
        op.validate_basic()?;

        check_limit(op.name().len(), self.max_name_length)
            .map_err(|(len, max)| RegistryError::NameTooLong { len, max })?;

        if let Operation::Rename(rename) = op {
            check_limit(rename.value.len(), self.max_value_length)
                .map_err(|(len, max)| RegistryError::ValueTooLong { len, max })?;
        }
        Ok(())
    }
}

/// A limit of zero means unlimited.
fn check_limit(len: usize, max: usize) -> Result<(), (usize, usize)> {
    if max > 0 && len > max {
        Err((len, max))
    } else {
        Ok(())
    }
}
