//! # Domain Entities
//!
//! Verification outcomes as consumed by the handling pipeline and the
//! witness engine.

use shared_types::{Ed25519Key, ResponseCode};
use std::collections::HashSet;

// =============================================================================
// Per-signature outcomes
// =============================================================================

/// Outcome of verifying one expanded signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationStatus {
    Valid,
    Invalid,
}

/// A signature attributed to one full Ed25519 key after prefix expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopedSignature {
    pub key: Ed25519Key,
    pub status: VerificationStatus,
}

impl ScopedSignature {
    pub fn valid(key: Ed25519Key) -> Self {
        Self {
            key,
            status: VerificationStatus::Valid,
        }
    }

    pub fn invalid(key: Ed25519Key) -> Self {
        Self {
            key,
            status: VerificationStatus::Invalid,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == VerificationStatus::Valid
    }
}

// =============================================================================
// Batch outcomes
// =============================================================================

/// Where a verification batch ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionMode {
    /// On the handling thread.
    Sync,
    /// On the verification pool; the handling thread waited for it.
    Async,
}

/// Overall status of rationalizing one signature map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureStatus {
    pub code: ResponseCode,
    pub mode: CompletionMode,
}

impl SignatureStatus {
    pub fn ok(mode: CompletionMode) -> Self {
        Self {
            code: ResponseCode::Ok,
            mode,
        }
    }

    pub fn failure(code: ResponseCode, mode: CompletionMode) -> Self {
        Self { code, mode }
    }

    pub fn is_error(&self) -> bool {
        !self.code.is_ok()
    }
}

/// Expanded and verified signatures of one signature map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSigs {
    pub sigs: Vec<ScopedSignature>,
    pub status: SignatureStatus,
}

impl VerifiedSigs {
    pub fn empty() -> Self {
        Self {
            sigs: Vec::new(),
            status: SignatureStatus::ok(CompletionMode::Sync),
        }
    }

    /// Distinct keys with a valid signature.
    pub fn valid_keys(&self) -> HashSet<Ed25519Key> {
        self.sigs
            .iter()
            .filter(|s| s.is_valid())
            .map(|s| s.key)
            .collect()
    }

    pub fn has_valid_sig(&self, key: &Ed25519Key) -> bool {
        self.sigs.iter().any(|s| s.is_valid() && s.key == *key)
    }
}

/// Verdict of the witness engine.
///
/// `ready` implies `status == OK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningOutcome {
    pub status: ResponseCode,
    pub ready: bool,
}

impl SigningOutcome {
    pub fn new(status: ResponseCode, ready: bool) -> Self {
        Self { status, ready }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys_deduplicate() {
        let verified = VerifiedSigs {
            sigs: vec![
                ScopedSignature::valid([1; 32]),
                ScopedSignature::valid([1; 32]),
                ScopedSignature::invalid([2; 32]),
            ],
            status: SignatureStatus::ok(CompletionMode::Sync),
        };
        assert_eq!(verified.valid_keys().len(), 1);
        assert!(verified.has_valid_sig(&[1; 32]));
        assert!(!verified.has_valid_sig(&[2; 32]));
    }

    #[test]
    fn test_status_error_flag() {
        assert!(!SignatureStatus::ok(CompletionMode::Async).is_error());
        assert!(
            SignatureStatus::failure(ResponseCode::KeyPrefixMismatch, CompletionMode::Sync)
                .is_error()
        );
    }
}
