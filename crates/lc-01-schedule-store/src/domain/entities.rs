//! # Schedule Entity
//!
//! A scheduled transaction waiting for its required signers.
//!
//! ```text
//! [PROVISIONAL] ──commit──→ [COMMITTED] ──delete / execute / expire──→ [GONE]
//!       │
//!       └──rollback──→ [DISCARDED]
//! ```

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Ed25519Key, Key, Timestamp, TransactionId};

/// A scheduled transaction and the signatures witnessed for it so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Serialized inner transaction body, parsed lazily.
    transaction_body: Vec<u8>,
    payer: AccountId,
    scheduling_account: AccountId,
    scheduling_txn_valid_start: Timestamp,
    expiration_time_secs: i64,
    admin_key: Option<Key>,
    memo: String,
    /// Keys with a verified signature over `transaction_body`, in witness order.
    signatories: Vec<Ed25519Key>,
}

impl Schedule {
    /// The payer defaults to the scheduling account until set.
    pub fn new(
        transaction_body: Vec<u8>,
        scheduling_account: AccountId,
        scheduling_txn_valid_start: Timestamp,
    ) -> Self {
        Self {
            transaction_body,
            payer: scheduling_account,
            scheduling_account,
            scheduling_txn_valid_start,
            expiration_time_secs: 0,
            admin_key: None,
            memo: String::new(),
            signatories: Vec::new(),
        }
    }

    pub fn with_payer(mut self, payer: AccountId) -> Self {
        self.payer = payer;
        self
    }

    pub fn with_admin_key(mut self, admin_key: Option<Key>) -> Self {
        self.admin_key = admin_key;
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn with_expiry(mut self, expiration_time_secs: i64) -> Self {
        self.expiration_time_secs = expiration_time_secs;
        self
    }

    pub fn transaction_body(&self) -> &[u8] {
        &self.transaction_body
    }

    pub fn payer(&self) -> AccountId {
        self.payer
    }

    pub fn scheduling_account(&self) -> AccountId {
        self.scheduling_account
    }

    pub fn scheduling_txn_valid_start(&self) -> Timestamp {
        self.scheduling_txn_valid_start
    }

    pub fn expiration_time_secs(&self) -> i64 {
        self.expiration_time_secs
    }

    pub fn admin_key(&self) -> Option<&Key> {
        self.admin_key.as_ref()
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn signatories(&self) -> &[Ed25519Key] {
        &self.signatories
    }

    /// Id the inner transaction executes under: the scheduling
    /// transaction's id, flagged as scheduled.
    pub fn scheduled_txn_id(&self) -> TransactionId {
        TransactionId::new(self.scheduling_account, self.scheduling_txn_valid_start).as_scheduled()
    }

    /// Records `key` as having signed. Returns `false` if it already had.
    pub fn witness_valid_ed25519_signature(&mut self, key: &Ed25519Key) -> bool {
        if self.has_valid_ed25519_signature(key) {
            return false;
        }
        self.signatories.push(*key);
        true
    }

    pub fn has_valid_ed25519_signature(&self, key: &Ed25519Key) -> bool {
        self.signatories.contains(key)
    }
}
