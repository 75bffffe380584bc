//! # Inbound Ports (Driving Ports / API)

use crate::domain::{RecordStreamError, RecordStreamObject};
use shared_crypto::Sha384Digest;

/// Append side of the record stream, as used by the handling pipeline.
pub trait RecordStream: Send + Sync {
    /// Appends `object` and returns the running hash after it.
    fn append(&self, object: RecordStreamObject) -> Result<Sha384Digest, RecordStreamError>;

    /// Running hash after the most recent append.
    fn latest_running_hash(&self) -> Sha384Digest;
}
