//! Shared fixture: a three-member network with real Ed25519 account keys.

#![allow(dead_code)]

use lc_01_schedule_store::{
    InMemorySchedules, ScheduleStore, ScheduleStoreConfig, SequentialIdSource,
};
use lc_03_record_stream::{InMemoryRecordSink, RecordEmitter};
use lc_04_transaction_processing::{
    Account, AccountLedger, ConsensusTxnHandler, NodeAddress, ProcessingConfig,
    StaticAddressBook, TransactionProcessor,
};
use ledger_telemetry::LedgerMetrics;
use shared_crypto::Ed25519KeyPair;
use shared_types::{
    AccountAmount, AccountId, Key, MemberId, ScheduleId, SignatureMap, SignaturePair,
    SignedTransaction, Timestamp, TransactionBody, TransactionData, TransactionId,
    TransactionRecord,
};
use std::sync::Arc;

pub const TREASURY: AccountId = AccountId::from_num(2);
pub const NODE_0: AccountId = AccountId::from_num(3);
pub const NODE_1: AccountId = AccountId::from_num(4);
pub const FUNDING: AccountId = AccountId::from_num(98);
pub const PAYER: AccountId = AccountId::from_num(1001);
pub const RECEIVER: AccountId = AccountId::from_num(1002);

pub const PAYER_BALANCE: u64 = 1_000_000;
pub const NODE_BALANCE: u64 = 10_000;

/// Default fees at 1 hbar = 12 cents, in tinybars.
pub const NODE_FEE: u64 = 100;
pub const NETWORK_FEE_PER_SIG: u64 = 50;
pub const TRANSFER_SERVICE_FEE: u64 = 500;
pub const SCHEDULE_CREATE_SERVICE_FEE: u64 = 10_000;

/// Member 0 runs node account 3, member 1 node account 4, member 2 has no
/// stake.
pub const MEMBER_0: MemberId = 0;
pub const MEMBER_1: MemberId = 1;
pub const ZERO_STAKE_MEMBER: MemberId = 2;

pub fn valid_start() -> Timestamp {
    // 2023-11-14T22:13:20Z
    Timestamp::of_seconds(1_700_000_000)
}

pub struct Keys {
    pub treasury: Ed25519KeyPair,
    pub payer: Ed25519KeyPair,
    pub receiver: Ed25519KeyPair,
    pub admin: Ed25519KeyPair,
}

impl Keys {
    pub fn new() -> Self {
        Self {
            treasury: Ed25519KeyPair::from_seed([2; 32]),
            payer: Ed25519KeyPair::from_seed([11; 32]),
            receiver: Ed25519KeyPair::from_seed([12; 32]),
            admin: Ed25519KeyPair::from_seed([42; 32]),
        }
    }
}

pub struct Fixture {
    pub keys: Keys,
    pub processor: TransactionProcessor,
    pub sink: InMemoryRecordSink,
}

pub fn ledger(keys: &Keys) -> AccountLedger {
    let key = |kp: &Ed25519KeyPair| Key::Ed25519(kp.public_key());
    AccountLedger::with_accounts([
        (TREASURY, Account::new(PAYER_BALANCE, key(&keys.treasury))),
        (NODE_0, Account::new(NODE_BALANCE, Key::Ed25519([3; 32]))),
        (NODE_1, Account::new(NODE_BALANCE, Key::Ed25519([4; 32]))),
        (FUNDING, Account::new(0, Key::Ed25519([98; 32]))),
        (PAYER, Account::new(PAYER_BALANCE, key(&keys.payer))),
        (RECEIVER, Account::new(0, key(&keys.receiver))),
    ])
}

pub fn processor(keys: &Keys, sink: &InMemoryRecordSink) -> TransactionProcessor {
    processor_over(ledger(keys), sink)
}

pub fn processor_over(ledger: AccountLedger, sink: &InMemoryRecordSink) -> TransactionProcessor {
    let address_book = StaticAddressBook::new([
        (MEMBER_0, NodeAddress { stake: 1, account: NODE_0 }),
        (MEMBER_1, NodeAddress { stake: 1, account: NODE_1 }),
        (ZERO_STAKE_MEMBER, NodeAddress { stake: 0, account: AccountId::from_num(5) }),
    ]);
    let schedules = ScheduleStore::new(
        ScheduleStoreConfig::default(),
        Arc::new(SequentialIdSource::starting_at(5000)),
        InMemorySchedules::new(),
    );
    let records = RecordEmitter::new([0; 48]).with_sink(Box::new(sink.clone()));
    TransactionProcessor::new(
        ProcessingConfig::default(),
        ledger,
        Box::new(schedules),
        Box::new(address_book),
        Arc::new(records),
        LedgerMetrics::new().unwrap(),
    )
}

pub fn fixture() -> Fixture {
    let keys = Keys::new();
    let sink = InMemoryRecordSink::with_capacity(64);
    let processor = processor(&keys, &sink);
    Fixture {
        keys,
        processor,
        sink,
    }
}

impl Fixture {
    pub fn submit(
        &mut self,
        signed: &[u8],
        consensus_time: Timestamp,
        member: MemberId,
    ) -> Vec<TransactionRecord> {
        self.processor
            .incorporate_consensus_txn(signed, consensus_time, member)
    }

    pub fn balance(&self, account: AccountId) -> u64 {
        self.processor.ledger().balance(&account).unwrap_or(0)
    }
}

// =============================================================================
// TRANSACTION BUILDERS
// =============================================================================

pub fn body(payer: AccountId, valid_start: Timestamp, data: TransactionData) -> TransactionBody {
    TransactionBody {
        transaction_id: TransactionId::new(payer, valid_start),
        node_account: NODE_0,
        transaction_fee: 1_000_000,
        valid_duration_secs: 120,
        memo: String::new(),
        data,
    }
}

pub fn transfer_data(from: AccountId, to: AccountId, amount: i64) -> TransactionData {
    TransactionData::CryptoTransfer {
        transfers: vec![
            AccountAmount {
                account: from,
                amount: -amount,
            },
            AccountAmount {
                account: to,
                amount,
            },
        ],
    }
}

pub fn sig_map(bytes: &[u8], signers: &[&Ed25519KeyPair]) -> SignatureMap {
    SignatureMap::new(
        signers
            .iter()
            .map(|kp| SignaturePair {
                pub_key_prefix: kp.public_key().to_vec(),
                signature: kp.sign(bytes),
            })
            .collect(),
    )
}

pub fn sign(body: &TransactionBody, signers: &[&Ed25519KeyPair]) -> Vec<u8> {
    let body_bytes = body.to_bytes().unwrap();
    SignedTransaction {
        sig_map: sig_map(&body_bytes, signers),
        body_bytes,
    }
    .to_bytes()
    .unwrap()
}

/// Inner transfer from the treasury to the receiver, paid by the payer.
pub fn scheduled_transfer_bytes(amount: i64) -> Vec<u8> {
    body(PAYER, valid_start(), transfer_data(TREASURY, RECEIVER, amount))
        .to_bytes()
        .unwrap()
}

pub fn schedule_create(
    valid_start: Timestamp,
    inner: &[u8],
    admin_key: Option<Key>,
    scheduled_signers: &[&Ed25519KeyPair],
) -> TransactionBody {
    body(
        PAYER,
        valid_start,
        TransactionData::ScheduleCreate {
            scheduled_body_bytes: inner.to_vec(),
            payer: None,
            admin_key,
            memo: String::new(),
            sig_map: sig_map(inner, scheduled_signers),
        },
    )
}

pub fn schedule_sign(
    valid_start: Timestamp,
    schedule_id: ScheduleId,
    inner: &[u8],
    scheduled_signers: &[&Ed25519KeyPair],
) -> TransactionBody {
    body(
        PAYER,
        valid_start,
        TransactionData::ScheduleSign {
            schedule_id,
            sig_map: sig_map(inner, scheduled_signers),
        },
    )
}

pub fn created_schedule(record: &TransactionRecord) -> ScheduleId {
    record.receipt.schedule_id.unwrap()
}
