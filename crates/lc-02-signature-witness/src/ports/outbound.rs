//! # Outbound Ports (Driven Ports / SPI)
//!
//! Dependencies of the witness engine and the rationalizer.

use shared_types::Ed25519Key;

/// The schedule a signing scope is witnessed against.
///
/// Implemented by the schedule transition logic over the schedule store; the
/// engine never touches the store directly.
pub trait WitnessTarget {
    type Error;

    /// Records each key as a signatory. Returns how many were new.
    fn witness(&mut self, keys: &[Ed25519Key]) -> Result<usize, Self::Error>;

    /// Whether the scheduled transaction's required signers are all
    /// satisfied by the currently witnessed keys.
    fn is_ready(&self) -> Result<bool, Self::Error>;
}

/// Ed25519 primitive.
pub trait Ed25519Verifier: Send + Sync {
    fn verify(&self, key: &Ed25519Key, message: &[u8], signature: &[u8]) -> bool;
}
