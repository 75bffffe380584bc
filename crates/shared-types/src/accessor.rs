//! # Transaction Accessor
//!
//! A parsed, immutable view over one consensus transaction. Built once from
//! wire bytes and owned by the processing call for its whole duration.

use crate::entities::{AccountId, ScheduleId, Timestamp};
use crate::errors::ParseError;
use crate::transaction::{
    Functionality, SignatureMap, SignedTransaction, TransactionBody, TransactionId,
};
use sha2::{Digest, Sha384};

/// SHA-384 digest of the signed transaction bytes.
pub type TxnHash = [u8; 48];

/// Parsed view of a transaction being handled.
#[derive(Debug, Clone)]
pub struct TxnAccessor {
    signed_txn_bytes: Vec<u8>,
    body_bytes: Vec<u8>,
    body: TransactionBody,
    sig_map: SignatureMap,
    function: Functionality,
    hash: TxnHash,
    payer: AccountId,
    scheduled_ref: Option<ScheduleId>,
}

impl TxnAccessor {
    /// Parses a consensus-delivered signed transaction.
    pub fn from_signed_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        let signed = SignedTransaction::from_bytes(bytes)?;
        let body = TransactionBody::from_bytes(&signed.body_bytes)?;
        Ok(Self {
            hash: sha384(bytes),
            signed_txn_bytes: bytes.to_vec(),
            function: body.function(),
            payer: body.transaction_id.payer,
            body,
            body_bytes: signed.body_bytes,
            sig_map: signed.sig_map,
            scheduled_ref: None,
        })
    }

    /// Builds the accessor for a scheduled transaction that became executable.
    ///
    /// The inner body executes under `txn_id` (the scheduling transaction's
    /// id flagged as scheduled) and carries no signatures of its own; its
    /// signers were witnessed on the schedule. Fees are charged to the
    /// schedule's designated `payer`.
    pub fn from_scheduled(
        scheduled_body_bytes: &[u8],
        txn_id: TransactionId,
        payer: AccountId,
        schedule: ScheduleId,
    ) -> Result<Self, ParseError> {
        let mut body = TransactionBody::from_bytes(scheduled_body_bytes)?;
        body.transaction_id = txn_id.as_scheduled();
        let body_bytes = body.to_bytes()?;
        let signed = SignedTransaction {
            body_bytes: body_bytes.clone(),
            sig_map: SignatureMap::default(),
        };
        let signed_txn_bytes = signed.to_bytes()?;
        Ok(Self {
            hash: sha384(&signed_txn_bytes),
            signed_txn_bytes,
            function: body.function(),
            payer,
            body,
            body_bytes,
            sig_map: SignatureMap::default(),
            scheduled_ref: Some(schedule),
        })
    }

    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    /// The exact bytes the signatures in [`Self::sig_map`] sign.
    pub fn body_bytes(&self) -> &[u8] {
        &self.body_bytes
    }

    /// The signed transaction as delivered, for streaming.
    pub fn signed_txn_bytes(&self) -> &[u8] {
        &self.signed_txn_bytes
    }

    pub fn sig_map(&self) -> &SignatureMap {
        &self.sig_map
    }

    pub fn function(&self) -> Functionality {
        self.function
    }

    pub fn txn_id(&self) -> TransactionId {
        self.body.transaction_id
    }

    /// Account charged for this transaction.
    pub fn payer(&self) -> AccountId {
        self.payer
    }

    pub fn valid_start(&self) -> Timestamp {
        self.body.transaction_id.valid_start
    }

    pub fn valid_duration_secs(&self) -> i64 {
        self.body.valid_duration_secs
    }

    pub fn node_account(&self) -> AccountId {
        self.body.node_account
    }

    pub fn hash(&self) -> &TxnHash {
        &self.hash
    }

    pub fn memo(&self) -> &str {
        &self.body.memo
    }

    /// The schedule this transaction was triggered from, if any.
    pub fn scheduled_ref(&self) -> Option<ScheduleId> {
        self.scheduled_ref
    }

    pub fn is_triggered_txn(&self) -> bool {
        self.scheduled_ref.is_some()
    }

    pub fn can_trigger_txn(&self) -> bool {
        self.function.can_trigger()
    }

    /// Compact description suitable for logs.
    pub fn signed_txn_for_log(&self) -> String {
        format!(
            "{{ txn_id: {}, function: {}, node: {}, memo: {:?}, sigs: {}, hash: {} }}",
            self.body.transaction_id,
            self.function,
            self.body.node_account,
            self.body.memo,
            self.sig_map.len(),
            hex::encode(&self.hash[..8]),
        )
    }
}

fn sha384(bytes: &[u8]) -> TxnHash {
    let mut out = [0u8; 48];
    out.copy_from_slice(&Sha384::digest(bytes));
    out
}
