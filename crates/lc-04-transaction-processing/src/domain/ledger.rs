//! # Account Ledger
//!
//! Crypto accounts with a per-transaction change set. Every balance change
//! made while a transaction is handled (fees included) is buffered in the
//! change set and only reaches the backing collection on `commit`.
//!
//! ```text
//! begin ──→ adjust* ──┬── commit   (deltas written through get_for_modify/replace)
//!                     └── rollback (deltas discarded)
//! ```

use crate::domain::errors::LedgerError;
use lc_01_schedule_store::{AccountLookup, BackingCollection, InMemoryCollection};
use serde::{Deserialize, Serialize};
use shared_types::{AccountAmount, AccountId, Key};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: u64,
    pub key: Key,
    pub deleted: bool,
}

impl Account {
    pub fn new(balance: u64, key: Key) -> Self {
        Self {
            balance,
            key,
            deleted: false,
        }
    }
}

/// Net balance changes of the in-flight transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    deltas: BTreeMap<AccountId, i64>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.deltas.values().all(|d| *d == 0)
    }

    fn delta_of(&self, id: &AccountId) -> i64 {
        self.deltas.get(id).copied().unwrap_or(0)
    }

    /// Non-zero adjustments in account order.
    pub fn net_transfers(&self) -> Vec<AccountAmount> {
        self.deltas
            .iter()
            .filter(|(_, amount)| **amount != 0)
            .map(|(account, amount)| AccountAmount {
                account: *account,
                amount: *amount,
            })
            .collect()
    }
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, aa) in self.net_transfers().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} -> {:+}", aa.account, aa.amount)?;
        }
        f.write_str("}")
    }
}

pub struct AccountLedger {
    accounts: InMemoryCollection<AccountId, Account>,
    change_set: Option<ChangeSet>,
}

impl Default for AccountLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountLedger {
    pub fn new() -> Self {
        Self {
            accounts: InMemoryCollection::new(),
            change_set: None,
        }
    }

    pub fn with_accounts(accounts: impl IntoIterator<Item = (AccountId, Account)>) -> Self {
        let mut ledger = Self::new();
        for (id, account) in accounts {
            ledger.create(id, account);
        }
        ledger
    }

    /// Installs an account directly, outside any transaction.
    pub fn create(&mut self, id: AccountId, account: Account) {
        self.accounts.put(id, account);
    }

    /// Exists and is not deleted.
    pub fn contains(&self, id: &AccountId) -> bool {
        self.accounts.get(id).is_some_and(|a| !a.deleted)
    }

    pub fn key_of(&self, id: &AccountId) -> Option<&Key> {
        self.accounts
            .get(id)
            .filter(|a| !a.deleted)
            .map(|a| &a.key)
    }

    /// Balance including the in-flight change set.
    pub fn balance(&self, id: &AccountId) -> Option<u64> {
        let committed = self.accounts.get(id).filter(|a| !a.deleted)?.balance;
        let delta = self.change_set.as_ref().map_or(0, |cs| cs.delta_of(id));
        u64::try_from(i128::from(committed) + i128::from(delta)).ok()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn is_in_transaction(&self) -> bool {
        self.change_set.is_some()
    }

    pub fn begin(&mut self) -> Result<(), LedgerError> {
        if self.change_set.is_some() {
            return Err(LedgerError::TransactionAlreadyActive);
        }
        self.change_set = Some(ChangeSet::default());
        Ok(())
    }

    /// Adds `delta` to the account's in-flight balance. Both the resulting
    /// balance and the account's accumulated delta must stay representable.
    pub fn adjust_balance(&mut self, id: AccountId, delta: i64) -> Result<(), LedgerError> {
        let balance = self.balance(&id).ok_or(LedgerError::MissingAccount(id))?;
        let updated = i128::from(balance) + i128::from(delta);
        if updated < 0 {
            return Err(LedgerError::InsufficientBalance {
                account: id,
                balance,
                delta,
            });
        }
        let change_set = self
            .change_set
            .as_mut()
            .ok_or(LedgerError::NoActiveTransaction)?;
        let overflow = LedgerError::Overflow {
            account: id,
            balance,
            delta,
        };
        if updated > i128::from(u64::MAX) {
            return Err(overflow);
        }
        let accumulated = change_set
            .delta_of(&id)
            .checked_add(delta)
            .ok_or(overflow)?;
        change_set.deltas.insert(id, accumulated);
        Ok(())
    }

    /// Moves `amount` from `from` to `to`, or changes nothing.
    pub fn transfer(&mut self, from: AccountId, to: AccountId, amount: u64) -> Result<(), LedgerError> {
        if amount == 0 {
            return Ok(());
        }
        let delta = i64::try_from(amount).map_err(|_| LedgerError::InsufficientBalance {
            account: from,
            balance: self.balance(&from).unwrap_or(0),
            delta: i64::MIN,
        })?;
        if !self.contains(&to) {
            return Err(LedgerError::MissingAccount(to));
        }
        self.adjust_balance(from, -delta)?;
        self.adjust_balance(to, delta)
    }

    pub fn net_transfers(&self) -> Vec<AccountAmount> {
        self.change_set
            .as_ref()
            .map(ChangeSet::net_transfers)
            .unwrap_or_default()
    }

    /// Loggable form of the in-flight change set.
    pub fn current_change_set(&self) -> String {
        match &self.change_set {
            Some(cs) => cs.to_string(),
            None => "<no active transaction>".to_string(),
        }
    }

    pub fn commit(&mut self) -> Result<(), LedgerError> {
        let change_set = self
            .change_set
            .take()
            .ok_or(LedgerError::NoActiveTransaction)?;
        for (id, delta) in change_set.deltas {
            if delta == 0 {
                continue;
            }
            let mut account = self
                .accounts
                .get_for_modify(&id)
                .ok_or(LedgerError::MissingAccount(id))?;
            account.balance = u64::try_from(i128::from(account.balance) + i128::from(delta))
                .map_err(|_| LedgerError::InsufficientBalance {
                    account: id,
                    balance: account.balance,
                    delta,
                })?;
            self.accounts.replace(id, account);
        }
        Ok(())
    }

    pub fn rollback(&mut self) {
        self.change_set = None;
    }

    pub fn root_hash(&self) -> [u8; 32] {
        self.accounts.root_hash()
    }
}

impl AccountLookup for AccountLedger {
    fn is_usable(&self, id: &AccountId) -> bool {
        self.contains(id)
    }
}
