//! # Transaction Records
//!
//! The immutable outcome of handling one transaction, as streamed.

use crate::accessor::TxnHash;
use crate::entities::{ScheduleId, Timestamp};
use crate::errors::ParseError;
use crate::response_codes::ResponseCode;
use crate::transaction::{AccountAmount, TransactionId};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

/// Status plus any entity the transaction created or referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub status: ResponseCode,
    pub schedule_id: Option<ScheduleId>,
    /// Id of the inner transaction a schedule operation triggered.
    pub scheduled_transaction_id: Option<TransactionId>,
}

impl TransactionReceipt {
    pub fn with_status(status: ResponseCode) -> Self {
        Self {
            status,
            schedule_id: None,
            scheduled_transaction_id: None,
        }
    }
}

/// Full record of a handled transaction.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub receipt: TransactionReceipt,
    #[serde_as(as = "Bytes")]
    pub transaction_hash: TxnHash,
    pub consensus_timestamp: Timestamp,
    pub transaction_id: TransactionId,
    pub memo: String,
    /// Total fee actually charged.
    pub transaction_fee: u64,
    /// Net balance changes, fees included.
    pub transfers: Vec<AccountAmount>,
    /// Set when this record is for a triggered scheduled transaction.
    pub schedule_ref: Option<ScheduleId>,
}

impl TransactionRecord {
    pub fn status(&self) -> ResponseCode {
        self.receipt.status
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ParseError> {
        bincode::serialize(self).map_err(|e| ParseError::Encode(e.to_string()))
    }
}
