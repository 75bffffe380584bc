//! # Adapters
//!
//! Production Ed25519 verifier over `shared-crypto`.

use crate::ports::outbound::Ed25519Verifier;
use shared_types::Ed25519Key;

/// Verifies with `ed25519-dalek` via `shared-crypto`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DalekVerifier;

impl Ed25519Verifier for DalekVerifier {
    fn verify(&self, key: &Ed25519Key, message: &[u8], signature: &[u8]) -> bool {
        shared_crypto::verify_ed25519(key, message, signature).is_ok()
    }
}
