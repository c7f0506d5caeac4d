use ns_bank::BankError;
use ns_store::StoreError;
use ns_types::{Address, Amount, TypeError};

/// Every way a registry operation can fail.
///
/// All variants are terminal for the operation that raised them: nothing is
/// retried and nothing the operation wrote survives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("invalid address: the empty address cannot act")]
    InvalidAddress,

    #[error("bids must be positive")]
    NonPositiveBid,

    #[error("name is {len} bytes, limit is {max}")]
    NameTooLong { len: usize, max: usize },

    #[error("value is {len} bytes, limit is {max}")]
    ValueTooLong { len: usize, max: usize },

    #[error("{sender} is not the owner of {name:?}")]
    Unauthorized { name: String, sender: Address },

    #[error("bid {bid} does not exceed current price {price}")]
    BidTooLow { bid: Amount, price: Amount },

    #[error("insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: Address,
        required: Amount,
        available: Amount,
    },

    #[error("unknown operation: {tag}")]
    UnknownOperation { tag: String },

    #[error("{0} is already registered")]
    AlreadyRegistered(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("ledger error: {0}")]
    Ledger(BankError),
}

impl RegistryError {
    /// Stable machine-readable code for receipts.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::InvalidAddress => "invalid_address",
            Self::NonPositiveBid => "non_positive_bid",
            Self::NameTooLong { .. } => "name_too_long",
            Self::ValueTooLong { .. } => "value_too_long",
            Self::Unauthorized { .. } => "unauthorized",
            Self::BidTooLow { .. } => "bid_too_low",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::UnknownOperation { .. } => "unknown_operation",
            Self::AlreadyRegistered(_) => "already_registered",
            Self::Codec(_) => "codec",
            Self::Config(_) => "config",
            Self::Store(_) => "store",
            Self::Ledger(_) => "ledger",
        }
    }

    /// Returns `true` for failures caught before the store is touched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyName
                | Self::InvalidAddress
                | Self::NonPositiveBid
                | Self::NameTooLong { .. }
                | Self::ValueTooLong { .. }
        )
    }
}

impl From<BankError> for RegistryError {
    fn from(err: BankError) -> Self {
        match err {
            BankError::InsufficientFunds {
                account,
                required,
                available,
            } => Self::InsufficientFunds {
                account,
                required,
                available,
            },
            BankError::Store(e) => Self::Store(e),
            other => Self::Ledger(other),
        }
    }
}

impl From<TypeError> for RegistryError {
    fn from(err: TypeError) -> Self {
        Self::Codec(err.to_string())
    }
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
