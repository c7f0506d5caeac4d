use serde::{Deserialize, Serialize};
use tracing::debug;

use ns_store::{KvRead, KvStore, StoreError};
use ns_types::{Address, Amount};

use crate::error::{BankError, BankResult};

const BALANCE_PREFIX: &[u8] = b"balances/";
const RESERVE_KEY: &[u8] = b"reserve";

/// An initial balance loaded before the first operation is applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisBalance {
    pub address: Address,
    pub amount: Amount,
}

/// Account balances kept in a key-value store.
///
/// Wrapping the backing store in a [`CacheStore`](ns_store::CacheStore) makes
/// every movement revertible together with whatever else shares the batch
/// boundary.
#[derive(Debug)]
pub struct Bank<S> {
    store: S,
}

impl<S> Bank<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the bank and return the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: KvRead> Bank<S> {
    /// Current balance of `account` (zero if never credited).
    pub fn balance(&self, account: &Address) -> BankResult<Amount> {
        self.read_amount(&balance_key(account))
    }

    /// Total amount removed from circulation by debits.
    pub fn reserve(&self) -> BankResult<Amount> {
        self.read_amount(RESERVE_KEY)
    }

    fn checked_withdraw(&self, account: &Address, amount: Amount) -> BankResult<Amount> {
        let available = self.balance(account)?;
        available
            .checked_sub(amount)
            .ok_or(BankError::InsufficientFunds {
                account: *account,
                required: amount,
                available,
            })
    }

    fn read_amount(&self, key: &[u8]) -> BankResult<Amount> {
        match self.store.get(key)? {
            Some(raw) => Amount::from_be_slice(&raw)
                .map_err(|e| BankError::Store(StoreError::corrupt(key, e.to_string()))),
            None => Ok(Amount::ZERO),
        }
    }
}

impl<S: KvStore> Bank<S> {
    /// Credit `account` out of thin air. Genesis and tests only.
    pub fn mint(&mut self, account: &Address, amount: Amount) -> BankResult<()> {
        let balance = self.balance(account)?;
        let updated = balance
            .checked_add(amount)
            .ok_or(BankError::Overflow { account: *account })?;
        self.store.set(&balance_key(account), &updated.to_be_bytes())?;
        debug!(account = %account, amount = %amount, "minted");
        Ok(())
    }

    /// Apply a genesis allocation.
    pub fn load_genesis(&mut self, balances: &[GenesisBalance]) -> BankResult<()> {
        for entry in balances {
            self.mint(&entry.address, entry.amount)?;
        }
        Ok(())
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// The sender is debited before the recipient is read, so a transfer to
    /// oneself leaves the balance unchanged.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> BankResult<()> {
        let remaining = self.checked_withdraw(from, amount)?;
        let to_balance = if from == to {
            remaining
        } else {
            self.balance(to)?
        };
        let credited = to_balance
            .checked_add(amount)
            .ok_or(BankError::Overflow { account: *to })?;
        // Both balances are computed before either write.
        self.store.set(&balance_key(from), &remaining.to_be_bytes())?;
        self.store.set(&balance_key(to), &credited.to_be_bytes())?;
        debug!(from = %from, to = %to, amount = %amount, "transfer");
        Ok(())
    }

    /// Remove `amount` from `account` and add it to the reserve.
    pub fn debit(&mut self, account: &Address, amount: Amount) -> BankResult<()> {
        let remaining = self.checked_withdraw(account, amount)?;
        let reserve = self
            .reserve()?
            .checked_add(amount)
            .ok_or(BankError::Overflow { account: *account })?;
        self.store.set(&balance_key(account), &remaining.to_be_bytes())?;
        self.store.set(RESERVE_KEY, &reserve.to_be_bytes())?;
        debug!(account = %account, amount = %amount, "debit");
        Ok(())
    }
}

fn balance_key(account: &Address) -> Vec<u8> {
    let mut key = Vec::with_capacity(BALANCE_PREFIX.len() + account.as_bytes().len());
    key.extend_from_slice(BALANCE_PREFIX);
    key.extend_from_slice(account.as_bytes());
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use ns_store::{CacheStore, InMemoryKvStore};

    fn funded(accounts: &[(Address, u128)]) -> Bank<InMemoryKvStore> {
        let mut bank = Bank::new(InMemoryKvStore::new());
        for (account, amount) in accounts {
            bank.mint(account, Amount::new(*amount)).unwrap();
        }
        bank
    }

    fn alice() -> Address {
        Address::derive(b"alice")
    }

    fn bob() -> Address {
        Address::derive(b"bob")
    }

    #[test]
    fn unknown_account_has_zero_balance() {
        let bank = funded(&[]);
        assert_eq!(bank.balance(&alice()).unwrap(), Amount::ZERO);
        assert_eq!(bank.reserve().unwrap(), Amount::ZERO);
    }

    #[test]
    fn mint_accumulates() {
        let mut bank = funded(&[(alice(), 10)]);
        bank.mint(&alice(), Amount::new(5)).unwrap();
        assert_eq!(bank.balance(&alice()).unwrap(), Amount::new(15));
    }

    #[test]
    fn mint_overflow_is_rejected() {
        let mut bank = funded(&[(alice(), u128::MAX)]);
        let err = bank.mint(&alice(), Amount::new(1)).unwrap_err();
        assert_eq!(err, BankError::Overflow { account: alice() });
    }

    #[test]
    fn genesis_loads_every_entry() {
        let mut bank = funded(&[]);
        bank.load_genesis(&[
            GenesisBalance { address: alice(), amount: Amount::new(3) },
            GenesisBalance { address: bob(), amount: Amount::new(4) },
        ])
        .unwrap();
        assert_eq!(bank.balance(&alice()).unwrap(), Amount::new(3));
        assert_eq!(bank.balance(&bob()).unwrap(), Amount::new(4));
    }

    #[test]
    fn transfer_moves_funds() {
        let mut bank = funded(&[(alice(), 10), (bob(), 1)]);
        bank.transfer(&alice(), &bob(), Amount::new(4)).unwrap();
        assert_eq!(bank.balance(&alice()).unwrap(), Amount::new(6));
        assert_eq!(bank.balance(&bob()).unwrap(), Amount::new(5));
        assert_eq!(bank.reserve().unwrap(), Amount::ZERO);
    }

    #[test]
    fn transfer_with_insufficient_funds_changes_nothing() {
        let mut bank = funded(&[(alice(), 3)]);
        let err = bank.transfer(&alice(), &bob(), Amount::new(4)).unwrap_err();
        assert_eq!(
            err,
            BankError::InsufficientFunds {
                account: alice(),
                required: Amount::new(4),
                available: Amount::new(3),
            }
        );
        assert_eq!(bank.balance(&alice()).unwrap(), Amount::new(3));
        assert_eq!(bank.balance(&bob()).unwrap(), Amount::ZERO);
    }

    #[test]
    fn transfer_to_self_is_neutral() {
        let mut bank = funded(&[(alice(), 10)]);
        bank.transfer(&alice(), &alice(), Amount::new(7)).unwrap();
        assert_eq!(bank.balance(&alice()).unwrap(), Amount::new(10));
    }

    #[test]
    fn debit_moves_funds_into_reserve() {
        let mut bank = funded(&[(alice(), 10)]);
        bank.debit(&alice(), Amount::new(4)).unwrap();
        assert_eq!(bank.balance(&alice()).unwrap(), Amount::new(6));
        assert_eq!(bank.reserve().unwrap(), Amount::new(4));
    }

    #[test]
    fn debit_with_insufficient_funds_changes_nothing() {
        let mut bank = funded(&[(alice(), 1)]);
        assert!(matches!(
            bank.debit(&alice(), Amount::new(2)),
            Err(BankError::InsufficientFunds { .. })
        ));
        assert_eq!(bank.balance(&alice()).unwrap(), Amount::new(1));
        assert_eq!(bank.reserve().unwrap(), Amount::ZERO);
    }

    #[test]
    fn cached_bank_reverts_on_discard() {
        let mut bank = funded(&[(alice(), 10)]);
        {
            let mut cached = Bank::new(CacheStore::new(&mut bank.store));
            cached.debit(&alice(), Amount::new(10)).unwrap();
            assert_eq!(cached.balance(&alice()).unwrap(), Amount::ZERO);
        }
        assert_eq!(bank.balance(&alice()).unwrap(), Amount::new(10));
    }

    #[test]
    fn genesis_balance_serde() {
        let entry = GenesisBalance { address: alice(), amount: Amount::new(9) };
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: GenesisBalance = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }
}
