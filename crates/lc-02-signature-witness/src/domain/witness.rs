//! # Signature Witness Engine
//!
//! Decides how a schedule operation responds to the scheduled-transaction
//! signatures in its scope. Four quantities drive the decision:
//!
//! | Symbol | Meaning |
//! |--------|---------|
//! | `A` | signing attempts in scope (pairs in the scheduled signature map) |
//! | `V` | distinct keys with a `Valid` expanded signature |
//! | `I` | `Invalid` expanded signatures |
//! | `N` | valid keys that are new signatories of the schedule |
//!
//! ```text
//! A == 0            ──→ recheck readiness only
//! V < A && I > 0    ──→ (SOME_SIGNATURES_WERE_INVALID, false), nothing witnessed
//! otherwise         ──→ witness V keys; N == 0 → NO_NEW_VALID_SIGNATURES
//! ready             ──→ (OK, true), overriding NO_NEW_VALID_SIGNATURES
//! ```
//!
//! When `V == A` any `Invalid` entries are ignored: a short public-key prefix
//! can expand one pair onto several required keys, and only one of those
//! expansions can verify. Every replica must apply this exact rule.

use super::entities::{ScopedSignature, SigningOutcome};
use crate::ports::outbound::WitnessTarget;
use shared_types::{Ed25519Key, ResponseCode};

/// Runs the engine over `scoped` signatures produced from `num_sigs`
/// signing attempts.
pub fn witness_in_scope<T, I>(
    num_sigs: usize,
    scoped: I,
    target: &mut T,
) -> Result<SigningOutcome, T::Error>
where
    T: WitnessTarget + ?Sized,
    I: IntoIterator<Item = ScopedSignature>,
{
    let mut status = ResponseCode::Ok;
    if num_sigs > 0 {
        status = witness_in_non_trivial_scope(num_sigs, scoped, target)?;
    }

    if status == ResponseCode::SomeSignaturesWereInvalid {
        return Ok(SigningOutcome::new(status, false));
    }

    let ready = target.is_ready()?;
    if ready {
        status = ResponseCode::Ok;
    }
    Ok(SigningOutcome::new(status, ready))
}

fn witness_in_non_trivial_scope<T, I>(
    num_sigs: usize,
    scoped: I,
    target: &mut T,
) -> Result<ResponseCode, T::Error>
where
    T: WitnessTarget + ?Sized,
    I: IntoIterator<Item = ScopedSignature>,
{
    let mut num_invalid = 0usize;
    let mut signatories: Vec<Ed25519Key> = Vec::new();
    for sig in scoped {
        if sig.is_valid() {
            if !signatories.contains(&sig.key) {
                signatories.push(sig.key);
            }
        } else {
            num_invalid += 1;
        }
    }

    if signatories.len() < num_sigs && num_invalid > 0 {
        return Ok(ResponseCode::SomeSignaturesWereInvalid);
    }

    let num_witnessed = target.witness(&signatories)?;
    Ok(if num_witnessed == 0 {
        ResponseCode::NoNewValidSignatures
    } else {
        ResponseCode::Ok
    })
}
