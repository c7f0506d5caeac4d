use ns_store::StoreError;
use ns_types::{Address, Amount};

/// Errors produced by balance ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BankError {
    #[error("insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: Address,
        required: Amount,
        available: Amount,
    },

    #[error("balance overflow crediting {account}")]
    Overflow { account: Address },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for ledger operations.
pub type BankResult<T> = Result<T, BankError>;
