//! # Dedup Key
//!
//! Structural fingerprint of a schedule used for create-or-reuse. The
//! schedule's own id is deliberately absent.

use super::entities::Schedule;
use shared_crypto::blake3_hash;
use shared_types::{AccountId, Key};

/// Identifies semantically identical schedules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    body_hash: [u8; 32],
    payer: AccountId,
    admin_key: Option<Key>,
    memo: String,
}

impl CompositeKey {
    pub fn new(body_bytes: &[u8], payer: AccountId, admin_key: Option<&Key>, memo: &str) -> Self {
        Self {
            body_hash: blake3_hash(body_bytes),
            payer,
            admin_key: admin_key.cloned(),
            memo: memo.to_string(),
        }
    }

    pub fn from_schedule(schedule: &Schedule) -> Self {
        Self::new(
            schedule.transaction_body(),
            schedule.payer(),
            schedule.admin_key(),
            schedule.memo(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shared_types::Timestamp;

    #[test]
    fn test_independent_of_creation_details() {
        let a = Schedule::new(vec![9; 16], AccountId::from_num(5), Timestamp::new(1, 0))
            .with_payer(AccountId::from_num(7))
            .with_memo("m");
        let b = Schedule::new(vec![9; 16], AccountId::from_num(6), Timestamp::new(2, 0))
            .with_payer(AccountId::from_num(7))
            .with_memo("m");
        assert_eq!(CompositeKey::from_schedule(&a), CompositeKey::from_schedule(&b));
    }

    proptest! {
        #[test]
        fn prop_any_field_change_changes_key(
            body in proptest::collection::vec(any::<u8>(), 0..64),
            payer in 1u64..10_000,
            key_byte in any::<u8>(),
            memo in "[a-z]{0,12}",
        ) {
            let admin = Key::Ed25519([key_byte; 32]);
            let base = CompositeKey::new(&body, AccountId::from_num(payer), Some(&admin), &memo);

            prop_assert_eq!(
                &base,
                &CompositeKey::new(&body, AccountId::from_num(payer), Some(&admin), &memo)
            );

            let mut other_body = body.clone();
            other_body.push(0);
            prop_assert_ne!(
                &base,
                &CompositeKey::new(&other_body, AccountId::from_num(payer), Some(&admin), &memo)
            );
            prop_assert_ne!(
                &base,
                &CompositeKey::new(&body, AccountId::from_num(payer + 1), Some(&admin), &memo)
            );
            prop_assert_ne!(
                &base,
                &CompositeKey::new(&body, AccountId::from_num(payer), None, &memo)
            );
            let other_memo = format!("{}x", memo);
            prop_assert_ne!(
                &base,
                &CompositeKey::new(&body, AccountId::from_num(payer), Some(&admin), &other_memo)
            );
        }
    }
}
