//! Schedule create, sign and delete through the full pipeline, including
//! triggered execution of the inner transaction.

mod common;

use common::*;
use shared_types::{
    Key, ResponseCode, ScheduleId, SignaturePair, SignatureMap, TransactionBody, TransactionData,
};

#[test]
fn test_sign_completing_schedule_triggers_inner_transfer() {
    let mut f = fixture();
    let inner = scheduled_transfer_bytes(500);

    let create = schedule_create(valid_start(), &inner, None, &[&f.keys.payer]);
    let t1 = valid_start().plus_seconds(1);
    let records = f.submit(&sign(&create, &[&f.keys.payer]), t1, MEMBER_0);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status(), ResponseCode::Ok);
    assert_eq!(records[0].consensus_timestamp, t1.minus_nanos(1));
    assert_eq!(records[0].receipt.scheduled_transaction_id, None);
    let id = created_schedule(&records[0]);
    assert!(f.processor.schedules().exists(&id));
    assert_eq!(f.balance(RECEIVER), 0);

    let sign_txn = schedule_sign(valid_start().plus_nanos(1), id, &inner, &[&f.keys.treasury]);
    let t2 = valid_start().plus_seconds(2);
    let records = f.submit(&sign(&sign_txn, &[&f.keys.payer]), t2, MEMBER_0);

    assert_eq!(records.len(), 2);
    let (outer, triggered) = (&records[0], &records[1]);
    assert_eq!(outer.status(), ResponseCode::Ok);
    assert_eq!(outer.consensus_timestamp, t2.minus_nanos(1));
    assert_eq!(outer.receipt.scheduled_transaction_id, Some(triggered.transaction_id));

    assert_eq!(triggered.status(), ResponseCode::Ok);
    assert_eq!(triggered.consensus_timestamp, t2);
    assert_eq!(triggered.schedule_ref, Some(id));
    assert!(triggered.transaction_id.scheduled);
    assert_eq!(triggered.transaction_id.valid_start, create.transaction_id.valid_start);

    assert_eq!(f.balance(RECEIVER), 500);
    assert_eq!(f.balance(TREASURY), PAYER_BALANCE - 500);
    assert!(!f.processor.schedules().exists(&id));
    assert_eq!(f.processor.clock().last_handled(), Some(t2));

    let metrics = f.processor.metrics();
    assert_eq!(metrics.handled("ScheduleCreate"), 1);
    assert_eq!(metrics.handled("ScheduleSign"), 1);
    assert_eq!(metrics.handled("CryptoTransfer"), 1);
    assert_eq!(f.sink.len(), 3);
}

#[test]
fn test_fully_signed_create_triggers_immediately() {
    let mut f = fixture();
    let inner = scheduled_transfer_bytes(250);
    let create = schedule_create(
        valid_start(),
        &inner,
        None,
        &[&f.keys.payer, &f.keys.treasury],
    );
    let t = valid_start().plus_seconds(1);

    let records = f.submit(&sign(&create, &[&f.keys.payer]), t, MEMBER_0);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].consensus_timestamp, t.minus_nanos(1));
    assert_eq!(records[1].consensus_timestamp, t);
    assert_eq!(records[1].status(), ResponseCode::Ok);
    assert_eq!(records[1].schedule_ref, records[0].receipt.schedule_id);
    assert_eq!(f.balance(RECEIVER), 250);
}

#[test]
fn test_identical_create_reuses_existing_schedule() {
    let mut f = fixture();
    let inner = scheduled_transfer_bytes(100);

    let first = schedule_create(valid_start(), &inner, None, &[&f.keys.payer]);
    let records = f.submit(
        &sign(&first, &[&f.keys.payer]),
        valid_start().plus_seconds(1),
        MEMBER_0,
    );
    let id = created_schedule(&records[0]);

    let second = schedule_create(
        valid_start().plus_nanos(1),
        &inner,
        None,
        &[&f.keys.treasury],
    );
    let records = f.submit(
        &sign(&second, &[&f.keys.payer]),
        valid_start().plus_seconds(2),
        MEMBER_0,
    );

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].receipt.schedule_id, Some(id));
    assert_eq!(records[1].schedule_ref, Some(id));
    assert_eq!(f.balance(RECEIVER), 100);
}

#[test]
fn test_invalid_scheduled_signature_rolls_back_creation() {
    let mut f = fixture();
    let inner = scheduled_transfer_bytes(100);
    let forged = SignatureMap::new(vec![SignaturePair {
        pub_key_prefix: f.keys.payer.public_key().to_vec(),
        signature: f.keys.payer.sign(b"something else"),
    }]);
    let create = body(
        PAYER,
        valid_start(),
        TransactionData::ScheduleCreate {
            scheduled_body_bytes: inner.clone(),
            payer: None,
            admin_key: None,
            memo: String::new(),
            sig_map: forged,
        },
    );

    let records = f.submit(
        &sign(&create, &[&f.keys.payer]),
        valid_start().plus_seconds(1),
        MEMBER_0,
    );

    assert_eq!(records[0].status(), ResponseCode::SomeSignaturesWereInvalid);
    assert_eq!(records[0].receipt.schedule_id, None);
    assert!(records[0].transaction_fee >= SCHEDULE_CREATE_SERVICE_FEE);
    assert!(!f.processor.schedules().is_creation_pending());
    assert_eq!(
        f.processor
            .schedules()
            .lookup_schedule_id(&inner, PAYER, None, ""),
        None
    );
}

#[test]
fn test_unschedulable_inner_transaction() {
    let mut f = fixture();
    let nested = body(
        PAYER,
        valid_start(),
        TransactionData::ScheduleDelete {
            schedule_id: ScheduleId::from_num(5000),
        },
    )
    .to_bytes()
    .unwrap();
    let create = schedule_create(valid_start(), &nested, None, &[&f.keys.payer]);

    let records = f.submit(
        &sign(&create, &[&f.keys.payer]),
        valid_start().plus_seconds(1),
        MEMBER_0,
    );

    assert_eq!(records[0].status(), ResponseCode::UnschedulableTransaction);
    assert!(records[0].transaction_fee > 0);
}

#[test]
fn test_failed_inner_transaction_still_consumes_schedule() {
    let mut f = fixture();
    let inner = scheduled_transfer_bytes(PAYER_BALANCE as i64 + 1);
    let create = schedule_create(
        valid_start(),
        &inner,
        None,
        &[&f.keys.payer, &f.keys.treasury],
    );

    let records = f.submit(
        &sign(&create, &[&f.keys.payer]),
        valid_start().plus_seconds(1),
        MEMBER_0,
    );

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].status(), ResponseCode::InsufficientAccountBalance);
    let id = created_schedule(&records[0]);
    assert!(!f.processor.schedules().exists(&id));
    assert_eq!(f.balance(TREASURY), PAYER_BALANCE);
}

// =============================================================================
// DELETE AND EXPIRY
// =============================================================================

fn delete(valid_start: shared_types::Timestamp, id: ScheduleId) -> TransactionBody {
    body(PAYER, valid_start, TransactionData::ScheduleDelete { schedule_id: id })
}

#[test]
fn test_delete_semantics() {
    let mut f = fixture();
    let admin = Key::Ed25519(f.keys.admin.public_key());

    let immutable = schedule_create(
        valid_start(),
        &scheduled_transfer_bytes(1),
        None,
        &[&f.keys.payer],
    );
    let records = f.submit(
        &sign(&immutable, &[&f.keys.payer]),
        valid_start().plus_seconds(1),
        MEMBER_0,
    );
    let immutable_id = created_schedule(&records[0]);

    let inner = scheduled_transfer_bytes(2);
    let mutable = schedule_create(
        valid_start().plus_nanos(1),
        &inner,
        Some(admin.clone()),
        &[&f.keys.payer],
    );
    let records = f.submit(
        &sign(&mutable, &[&f.keys.payer, &f.keys.admin]),
        valid_start().plus_seconds(2),
        MEMBER_0,
    );
    assert_eq!(records[0].status(), ResponseCode::Ok);
    let mutable_id = created_schedule(&records[0]);

    let records = f.submit(
        &sign(&delete(valid_start().plus_nanos(2), immutable_id), &[&f.keys.payer]),
        valid_start().plus_seconds(3),
        MEMBER_0,
    );
    assert_eq!(records[0].status(), ResponseCode::ScheduleIsImmutable);
    assert!(f.processor.schedules().exists(&immutable_id));

    let records = f.submit(
        &sign(&delete(valid_start().plus_nanos(3), ScheduleId::from_num(9_999)), &[&f.keys.payer]),
        valid_start().plus_seconds(4),
        MEMBER_0,
    );
    assert_eq!(records[0].status(), ResponseCode::InvalidScheduleId);

    // Admin key must sign the delete.
    let records = f.submit(
        &sign(&delete(valid_start().plus_nanos(4), mutable_id), &[&f.keys.payer]),
        valid_start().plus_seconds(5),
        MEMBER_0,
    );
    assert_eq!(records[0].status(), ResponseCode::InvalidSignature);
    assert!(f.processor.schedules().exists(&mutable_id));

    let records = f.submit(
        &sign(
            &delete(valid_start().plus_nanos(5), mutable_id),
            &[&f.keys.payer, &f.keys.admin],
        ),
        valid_start().plus_seconds(6),
        MEMBER_0,
    );
    assert_eq!(records[0].status(), ResponseCode::Ok);
    assert!(!f.processor.schedules().exists(&mutable_id));
    assert_eq!(
        f.processor
            .schedules()
            .lookup_schedule_id(&inner, PAYER, Some(&admin), ""),
        None
    );
}

#[test]
fn test_unsigned_schedule_expires_on_later_transaction() {
    let mut f = fixture();
    let create = schedule_create(
        valid_start(),
        &scheduled_transfer_bytes(1),
        None,
        &[&f.keys.payer],
    );
    let records = f.submit(
        &sign(&create, &[&f.keys.payer]),
        valid_start().plus_seconds(1),
        MEMBER_0,
    );
    let id = created_schedule(&records[0]);

    let later = valid_start().plus_seconds(1_900);
    let transfer = body(PAYER, later.plus_seconds(-1), transfer_data(PAYER, RECEIVER, 1));
    f.submit(&sign(&transfer, &[&f.keys.payer]), later, MEMBER_0);

    assert!(!f.processor.schedules().exists(&id));
    assert_eq!(f.balance(RECEIVER), 1);
}
