//! # Signature Rationalizer
//!
//! Application service implementing [`SignatureRationalizationApi`].
//!
//! Small maps verify on the calling thread. Maps whose expansion reaches
//! `parallel_threshold` verify on the `rayon` pool while the caller waits, so
//! the outcome is identical either way and only the reported
//! [`CompletionMode`] differs.

use crate::adapters::DalekVerifier;
use crate::config::VerificationConfig;
use crate::domain::entities::{
    CompletionMode, ScopedSignature, SignatureStatus, VerificationStatus, VerifiedSigs,
};
use crate::domain::expansion::{expand, ExpandedSig};
use crate::ports::inbound::SignatureRationalizationApi;
use crate::ports::outbound::Ed25519Verifier;
use rayon::prelude::*;
use shared_types::{Ed25519Key, SignatureMap};
use tracing::debug;

pub struct SignatureRationalizer<V = DalekVerifier> {
    config: VerificationConfig,
    verifier: V,
}

impl SignatureRationalizer<DalekVerifier> {
    pub fn new(config: VerificationConfig) -> Self {
        Self::with_verifier(config, DalekVerifier)
    }
}

impl<V: Ed25519Verifier> SignatureRationalizer<V> {
    pub fn with_verifier(config: VerificationConfig, verifier: V) -> Self {
        Self { config, verifier }
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    fn verify_one(&self, message: &[u8], expanded: &ExpandedSig<'_>) -> ScopedSignature {
        let status = if self.verifier.verify(&expanded.key, message, expanded.signature) {
            VerificationStatus::Valid
        } else {
            VerificationStatus::Invalid
        };
        ScopedSignature {
            key: expanded.key,
            status,
        }
    }
}

impl<V: Ed25519Verifier> SignatureRationalizationApi for SignatureRationalizer<V> {
    fn verify_sig_map(
        &self,
        message: &[u8],
        sig_map: &SignatureMap,
        required: &[Ed25519Key],
    ) -> VerifiedSigs {
        let expanded = match expand(sig_map, required) {
            Ok(expanded) => expanded,
            Err(code) => {
                debug!(status = %code, pairs = sig_map.len(), "Signature map rejected");
                return VerifiedSigs {
                    sigs: Vec::new(),
                    status: SignatureStatus::failure(code, CompletionMode::Sync),
                };
            }
        };

        if expanded.len() >= self.config.parallel_threshold.max(1) {
            let sigs = expanded
                .par_iter()
                .map(|e| self.verify_one(message, e))
                .collect();
            VerifiedSigs {
                sigs,
                status: SignatureStatus::ok(CompletionMode::Async),
            }
        } else {
            let sigs = expanded
                .iter()
                .map(|e| self.verify_one(message, e))
                .collect();
            VerifiedSigs {
                sigs,
                status: SignatureStatus::ok(CompletionMode::Sync),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::Ed25519KeyPair;
    use shared_types::{ResponseCode, SignaturePair};

    fn signed_pair(keypair: &Ed25519KeyPair, msg: &[u8]) -> SignaturePair {
        SignaturePair {
            pub_key_prefix: keypair.public_key().to_vec(),
            signature: keypair.sign(msg),
        }
    }

    #[test]
    fn test_sync_below_threshold() {
        let kp = Ed25519KeyPair::from_seed([1; 32]);
        let map = SignatureMap::new(vec![signed_pair(&kp, b"m")]);
        let verified =
            SignatureRationalizer::new(VerificationConfig::default()).verify_sig_map(
                b"m",
                &map,
                &[kp.public_key()],
            );
        assert_eq!(verified.status, SignatureStatus::ok(CompletionMode::Sync));
        assert!(verified.has_valid_sig(&kp.public_key()));
    }

    #[test]
    fn test_async_at_threshold_matches_sync() {
        let keys: Vec<Ed25519KeyPair> = (1..=4u8).map(|i| Ed25519KeyPair::from_seed([i; 32])).collect();
        let required: Vec<Ed25519Key> = keys.iter().map(Ed25519KeyPair::public_key).collect();
        let map = SignatureMap::new(keys.iter().map(|k| signed_pair(k, b"m")).collect());

        let parallel = SignatureRationalizer::new(VerificationConfig {
            parallel_threshold: 4,
        })
        .verify_sig_map(b"m", &map, &required);
        let sequential = SignatureRationalizer::new(VerificationConfig {
            parallel_threshold: 100,
        })
        .verify_sig_map(b"m", &map, &required);

        assert_eq!(parallel.status.mode, CompletionMode::Async);
        assert_eq!(sequential.status.mode, CompletionMode::Sync);
        assert_eq!(parallel.sigs, sequential.sigs);
        assert_eq!(parallel.valid_keys().len(), 4);
    }

    #[test]
    fn test_wrong_message_is_invalid() {
        let kp = Ed25519KeyPair::from_seed([9; 32]);
        let map = SignatureMap::new(vec![signed_pair(&kp, b"other")]);
        let verified = SignatureRationalizer::new(VerificationConfig::default())
            .verify_sig_map(b"m", &map, &[kp.public_key()]);
        assert_eq!(verified.sigs, vec![ScopedSignature::invalid(kp.public_key())]);
        assert!(!verified.status.is_error());
    }

    #[test]
    fn test_prefix_mismatch_status() {
        let kp = Ed25519KeyPair::from_seed([3; 32]);
        let pk = kp.public_key();
        let map = SignatureMap::new(vec![
            SignaturePair {
                pub_key_prefix: pk[..1].to_vec(),
                signature: kp.sign(b"m"),
            },
            signed_pair(&kp, b"m"),
        ]);
        let verified = SignatureRationalizer::new(VerificationConfig::default())
            .verify_sig_map(b"m", &map, &[pk]);
        assert_eq!(verified.status.code, ResponseCode::KeyPrefixMismatch);
        assert!(verified.sigs.is_empty());
    }
}
