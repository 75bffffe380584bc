//! # Processing Errors
//!
//! Unexpected failures inside the pipeline. None of these reach the caller of
//! `incorporate_consensus_txn`; they are logged at the pipeline boundary and
//! the transaction keeps its last status.

use lc_01_schedule_store::StoreError;
use lc_03_record_stream::RecordStreamError;
use shared_types::{AccountId, Functionality, ParseError, ResponseCode};
use thiserror::Error;

/// Account ledger errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Account {0} does not exist")]
    MissingAccount(AccountId),

    #[error("Account {account} cannot absorb {delta} with balance {balance}")]
    InsufficientBalance {
        account: AccountId,
        balance: u64,
        delta: i64,
    },

    #[error("Account {account} with balance {balance} overflows applying {delta}")]
    Overflow {
        account: AccountId,
        balance: u64,
        delta: i64,
    },

    #[error("No ledger transaction is active")]
    NoActiveTransaction,

    #[error("A ledger transaction is already active")]
    TransactionAlreadyActive,
}

impl LedgerError {
    /// Status reported when a charge or transfer hits this error.
    pub fn as_status(&self) -> ResponseCode {
        match self {
            LedgerError::MissingAccount(_) => ResponseCode::InvalidAccountId,
            LedgerError::InsufficientBalance { .. } => ResponseCode::InsufficientAccountBalance,
            LedgerError::Overflow { .. }
            | LedgerError::NoActiveTransaction
            | LedgerError::TransactionAlreadyActive => {
                ResponseCode::FailInvalid
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Schedule store: {0}")]
    Store(#[from] StoreError),

    #[error("Ledger: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Wire format: {0}")]
    Parse(#[from] ParseError),

    #[error("Record stream: {0}")]
    RecordStream(#[from] RecordStreamError),

    /// A schedule operation reached its transition without verified
    /// scheduled signatures.
    #[error("{0} handled without a scheduled signing scope")]
    MissingScheduledScope(Functionality),
}
