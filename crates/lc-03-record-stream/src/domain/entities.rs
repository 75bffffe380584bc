//! # Record Stream Entities

use crate::domain::errors::RecordStreamError;
use serde::Serialize;
use shared_crypto::{RunningHashDigest, Sha384Digest};
use shared_types::{Timestamp, TransactionRecord};

/// What the stream carries for one handled transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordStreamObject {
    pub record: TransactionRecord,
    /// Signed transaction as submitted; for a triggered transaction, the
    /// scheduled body bytes.
    pub signed_txn_bytes: Vec<u8>,
    pub consensus_time: Timestamp,
}

impl RecordStreamObject {
    pub fn new(
        record: TransactionRecord,
        signed_txn_bytes: Vec<u8>,
        consensus_time: Timestamp,
    ) -> Self {
        Self {
            record,
            signed_txn_bytes,
            consensus_time,
        }
    }

    /// Canonical bytes folded into the running hash.
    pub fn content_bytes(&self) -> Result<Vec<u8>, RecordStreamError> {
        bincode::serialize(self).map_err(|e| RecordStreamError::Encode(e.to_string()))
    }
}

/// A record together with the running hash after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamedRecord {
    pub object: RecordStreamObject,
    pub running_hash: Sha384Digest,
}

/// JSON line written to record files.
#[derive(Debug, Serialize)]
pub struct RecordLine<'a> {
    pub consensus_time: String,
    pub record: &'a TransactionRecord,
    pub signed_txn: String,
    pub running_hash: String,
}

impl<'a> From<&'a StreamedRecord> for RecordLine<'a> {
    fn from(entry: &'a StreamedRecord) -> Self {
        Self {
            consensus_time: entry.object.consensus_time.to_string(),
            record: &entry.object.record,
            signed_txn: hex::encode(&entry.object.signed_txn_bytes),
            running_hash: hex::encode(entry.running_hash),
        }
    }
}

/// Re-derives a chain from `seed` over `objects`.
pub fn recompute_chain<'a, I>(seed: Sha384Digest, objects: I) -> Result<Sha384Digest, RecordStreamError>
where
    I: IntoIterator<Item = &'a RecordStreamObject>,
{
    let mut chain = RunningHashDigest::from_seed(seed);
    for object in objects {
        chain.absorb(&object.content_bytes()?);
    }
    Ok(chain.current())
}
