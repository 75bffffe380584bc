//! Engine invariants over arbitrary mixes of valid and invalid scoped
//! signatures.

use lc_02_signature_witness::{witness_in_scope, ScopedSignature, WitnessTarget};
use proptest::prelude::*;
use shared_types::{Ed25519Key, ResponseCode};
use std::convert::Infallible;

/// Ready once every required key has been witnessed.
struct Recorder {
    required: Vec<Ed25519Key>,
    witnessed: Vec<Ed25519Key>,
    witness_calls: usize,
}

impl WitnessTarget for Recorder {
    type Error = Infallible;

    fn witness(&mut self, keys: &[Ed25519Key]) -> Result<usize, Infallible> {
        self.witness_calls += 1;
        let before = self.witnessed.len();
        for key in keys {
            if !self.witnessed.contains(key) {
                self.witnessed.push(*key);
            }
        }
        Ok(self.witnessed.len() - before)
    }

    fn is_ready(&self) -> Result<bool, Infallible> {
        Ok(self.required.iter().all(|k| self.witnessed.contains(k)))
    }
}

fn key(i: u8) -> Ed25519Key {
    [i + 1; 32]
}

fn scoped_strategy() -> impl Strategy<Value = Vec<ScopedSignature>> {
    prop::collection::vec((0u8..5, any::<bool>()), 0..8).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(i, valid)| {
                if valid {
                    ScopedSignature::valid(key(i))
                } else {
                    ScopedSignature::invalid(key(i))
                }
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn outcome_invariants_hold(
        num_sigs in 0usize..6,
        scoped in scoped_strategy(),
        required in prop::collection::vec(0u8..5, 0..4),
        already in prop::collection::vec(0u8..5, 0..3),
    ) {
        let mut target = Recorder {
            required: required.into_iter().map(key).collect(),
            witnessed: already.into_iter().map(key).collect(),
            witness_calls: 0,
        };
        let before = target.witnessed.clone();
        let valid_keys: Vec<Ed25519Key> =
            scoped.iter().filter(|s| s.is_valid()).map(|s| s.key).collect();

        let outcome = witness_in_scope(num_sigs, scoped, &mut target).unwrap();

        if outcome.ready {
            prop_assert_eq!(outcome.status, ResponseCode::Ok);
        }
        if outcome.status == ResponseCode::SomeSignaturesWereInvalid {
            prop_assert!(!outcome.ready);
            prop_assert_eq!(target.witness_calls, 0);
            prop_assert_eq!(&target.witnessed, &before);
        }
        if outcome.status == ResponseCode::NoNewValidSignatures {
            prop_assert!(!outcome.ready);
            prop_assert_eq!(&target.witnessed, &before);
        }
        if num_sigs == 0 {
            prop_assert_eq!(target.witness_calls, 0);
        }
        prop_assert!(target.witness_calls <= 1);
        // Only valid keys ever become signatories.
        for k in target.witnessed.iter().filter(|k| !before.contains(k)) {
            prop_assert!(valid_keys.contains(k));
        }
    }
}
