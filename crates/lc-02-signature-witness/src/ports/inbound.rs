//! # Inbound Ports (Driving Ports / API)

use crate::domain::entities::VerifiedSigs;
use shared_types::{Ed25519Key, SignatureMap};

/// Signature rationalization API used by the handling pipeline.
pub trait SignatureRationalizationApi: Send + Sync {
    /// Expands `sig_map` against `required` keys and verifies every
    /// expansion over `message`.
    ///
    /// A prefix ambiguity yields an error status and no signatures.
    fn verify_sig_map(
        &self,
        message: &[u8],
        sig_map: &SignatureMap,
        required: &[Ed25519Key],
    ) -> VerifiedSigs;
}
