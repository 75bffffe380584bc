//! # Transactions
//!
//! Wire shapes of the signed transaction envelope and its body.
//!
//! ```text
//! SignedTransaction ── body_bytes ──→ TransactionBody ── data ──→ TransactionData
//!        │
//!        └── sig_map (prefix, signature)*
//! ```
//!
//! Both layers are `bincode`-encoded. Scheduled transactions embed an inner
//! `TransactionBody` as opaque bytes that are only parsed on demand.

use crate::entities::{AccountId, ScheduleId, Timestamp};
use crate::errors::ParseError;
use crate::keys::Key;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Uniquely identifies a transaction by payer and valid-start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TransactionId {
    pub payer: AccountId,
    pub valid_start: Timestamp,
    /// Set for the inner transaction of an executed schedule.
    pub scheduled: bool,
}

impl TransactionId {
    pub fn new(payer: AccountId, valid_start: Timestamp) -> Self {
        Self {
            payer,
            valid_start,
            scheduled: false,
        }
    }

    /// The id under which a scheduled transaction executes.
    pub fn as_scheduled(&self) -> Self {
        Self {
            scheduled: true,
            ..*self
        }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.payer, self.valid_start)?;
        if self.scheduled {
            f.write_str("?scheduled")?;
        }
        Ok(())
    }
}

/// One signature with the (possibly abbreviated) public key it claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePair {
    pub pub_key_prefix: Vec<u8>,
    pub signature: Vec<u8>,
}

/// Signatures attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SignatureMap {
    pub pairs: Vec<SignaturePair>,
}

impl SignatureMap {
    pub fn new(pairs: Vec<SignaturePair>) -> Self {
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// A signed balance adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAmount {
    pub account: AccountId,
    pub amount: i64,
}

/// Operation-specific payload of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionData {
    CryptoTransfer {
        transfers: Vec<AccountAmount>,
    },
    ScheduleCreate {
        /// Serialized inner [`TransactionBody`].
        scheduled_body_bytes: Vec<u8>,
        /// Account paying for the inner transaction; defaults to the creator.
        payer: Option<AccountId>,
        admin_key: Option<Key>,
        memo: String,
        /// Signatures over `scheduled_body_bytes`.
        sig_map: SignatureMap,
    },
    ScheduleSign {
        schedule_id: ScheduleId,
        /// Signatures over the schedule's inner transaction bytes.
        sig_map: SignatureMap,
    },
    ScheduleDelete {
        schedule_id: ScheduleId,
    },
    Freeze {
        start_hour: u8,
        start_min: u8,
        end_hour: u8,
        end_min: u8,
    },
}

/// The kind of operation a transaction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Functionality {
    CryptoTransfer,
    ScheduleCreate,
    ScheduleSign,
    ScheduleDelete,
    Freeze,
}

impl Functionality {
    pub const ALL: [Functionality; 5] = [
        Functionality::CryptoTransfer,
        Functionality::ScheduleCreate,
        Functionality::ScheduleSign,
        Functionality::ScheduleDelete,
        Functionality::Freeze,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Functionality::CryptoTransfer => "CryptoTransfer",
            Functionality::ScheduleCreate => "ScheduleCreate",
            Functionality::ScheduleSign => "ScheduleSign",
            Functionality::ScheduleDelete => "ScheduleDelete",
            Functionality::Freeze => "Freeze",
        }
    }

    /// Operations whose handling may make a scheduled transaction executable.
    pub fn can_trigger(&self) -> bool {
        matches!(
            self,
            Functionality::ScheduleCreate | Functionality::ScheduleSign
        )
    }

    /// Schedule operations may not themselves be scheduled.
    pub fn is_schedulable(&self) -> bool {
        !matches!(
            self,
            Functionality::ScheduleCreate
                | Functionality::ScheduleSign
                | Functionality::ScheduleDelete
        )
    }
}

impl fmt::Display for Functionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-over content of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    pub transaction_id: TransactionId,
    /// The node the payer designated to submit this transaction.
    pub node_account: AccountId,
    /// Maximum fee the payer is willing to pay.
    pub transaction_fee: u64,
    pub valid_duration_secs: i64,
    pub memo: String,
    pub data: TransactionData,
}

impl TransactionBody {
    pub fn function(&self) -> Functionality {
        match &self.data {
            TransactionData::CryptoTransfer { .. } => Functionality::CryptoTransfer,
            TransactionData::ScheduleCreate { .. } => Functionality::ScheduleCreate,
            TransactionData::ScheduleSign { .. } => Functionality::ScheduleSign,
            TransactionData::ScheduleDelete { .. } => Functionality::ScheduleDelete,
            TransactionData::Freeze { .. } => Functionality::Freeze,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        bincode::deserialize(bytes).map_err(|e| ParseError::MalformedBody(e.to_string()))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ParseError> {
        bincode::serialize(self).map_err(|e| ParseError::Encode(e.to_string()))
    }
}

/// The outer envelope delivered by consensus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub body_bytes: Vec<u8>,
    pub sig_map: SignatureMap,
}

impl SignedTransaction {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        bincode::deserialize(bytes).map_err(|e| ParseError::MalformedEnvelope(e.to_string()))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ParseError> {
        bincode::serialize(self).map_err(|e| ParseError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer_body() -> TransactionBody {
        TransactionBody {
            transaction_id: TransactionId::new(AccountId::from_num(1001), Timestamp::of_seconds(10)),
            node_account: AccountId::from_num(3),
            transaction_fee: 100_000,
            valid_duration_secs: 120,
            memo: "hi".into(),
            data: TransactionData::CryptoTransfer {
                transfers: vec![
                    AccountAmount {
                        account: AccountId::from_num(1001),
                        amount: -5,
                    },
                    AccountAmount {
                        account: AccountId::from_num(1002),
                        amount: 5,
                    },
                ],
            },
        }
    }

    #[test]
    fn test_body_function() {
        assert_eq!(transfer_body().function(), Functionality::CryptoTransfer);
    }

    #[test]
    fn test_garbage_body_is_rejected() {
        let err = TransactionBody::from_bytes(&[0xFF, 0x01]).unwrap_err();
        assert!(matches!(err, ParseError::MalformedBody(_)));
    }

    #[test]
    fn test_envelope_survives_encoding() {
        let signed = SignedTransaction {
            body_bytes: transfer_body().to_bytes().unwrap(),
            sig_map: SignatureMap::new(vec![SignaturePair {
                pub_key_prefix: vec![1, 2],
                signature: vec![9; 64],
            }]),
        };
        let decoded = SignedTransaction::from_bytes(&signed.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, signed);
        assert_eq!(
            TransactionBody::from_bytes(&decoded.body_bytes).unwrap(),
            transfer_body()
        );
    }

    #[test]
    fn test_schedule_ops_are_unschedulable() {
        assert!(Functionality::CryptoTransfer.is_schedulable());
        assert!(!Functionality::ScheduleSign.is_schedulable());
        assert!(Functionality::ScheduleCreate.can_trigger());
        assert!(!Functionality::ScheduleDelete.can_trigger());
    }

    #[test]
    fn test_scheduled_txn_id_display() {
        let id = TransactionId::new(AccountId::from_num(2), Timestamp::new(1, 5)).as_scheduled();
        assert_eq!(id.to_string(), "0.0.2@1.000000005?scheduled");
    }
}
