use ns_store::KvStore;
use ns_types::{Address, Amount};

use crate::bank::Bank;
use crate::error::BankResult;
use crate::traits::LedgerTransfer;

/// Transfer-only view of a [`Bank`].
///
/// Holding a `TransferAdapter` grants exactly the [`LedgerTransfer`]
/// capability: no balance reads, no minting, no access to the backing store.
pub struct TransferAdapter<'a, S: KvStore> {
    bank: &'a mut Bank<S>,
}

impl<'a, S: KvStore> TransferAdapter<'a, S> {
    pub fn new(bank: &'a mut Bank<S>) -> Self {
        Self { bank }
    }
}

impl<S: KvStore> LedgerTransfer for TransferAdapter<'_, S> {
    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> BankResult<()> {
        self.bank.transfer(from, to, amount)
    }

    fn debit(&mut self, account: &Address, amount: Amount) -> BankResult<()> {
        self.bank.debit(account, amount)
    }
}
