use ns_types::{Address, Amount};

use crate::error::BankResult;

/// The only ledger capability the registry engine is given.
///
/// Implementations must be all-or-nothing per call: a rejected transfer or
/// debit leaves every balance exactly as it was. Nothing here exposes balance
/// reads or unmatched credits.
pub trait LedgerTransfer {
    /// Move `amount` from `from` to `to`.
    ///
    /// Fails with [`BankError::InsufficientFunds`](crate::BankError) when
    /// `from` holds less than `amount`.
    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> BankResult<()>;

    /// Remove `amount` from `account` without crediting anyone.
    ///
    /// The debited funds land in the ledger's reserve.
    fn debit(&mut self, account: &Address, amount: Amount) -> BankResult<()>;
}
