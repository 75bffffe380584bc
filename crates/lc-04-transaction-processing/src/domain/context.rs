//! # Transaction Context
//!
//! Per-transaction handling state, and the environment a transition logic
//! runs in.

use crate::domain::ledger::AccountLedger;
use crate::domain::sig_requirements::ScheduledScope;
use lc_01_schedule_store::ScheduleStoreApi;
use shared_types::{
    AccountId, Key, MemberId, ResponseCode, ScheduleId, Timestamp, TransactionId,
    TransactionReceipt, TxnAccessor,
};

pub struct TransactionContext {
    consensus_time: Timestamp,
    submitting_member: MemberId,
    submitting_node_account: Option<AccountId>,
    status: Option<ResponseCode>,
    payer_sig_known_active: bool,
    active_payer_key: Option<Key>,
    fee_charged: u64,
    created_schedule: Option<ScheduleId>,
    scheduled_txn_id: Option<TransactionId>,
    triggered: Option<TxnAccessor>,
}

impl TransactionContext {
    pub fn new(
        consensus_time: Timestamp,
        submitting_member: MemberId,
        submitting_node_account: Option<AccountId>,
    ) -> Self {
        Self {
            consensus_time,
            submitting_member,
            submitting_node_account,
            status: None,
            payer_sig_known_active: false,
            active_payer_key: None,
            fee_charged: 0,
            created_schedule: None,
            scheduled_txn_id: None,
            triggered: None,
        }
    }

    pub fn consensus_time(&self) -> Timestamp {
        self.consensus_time
    }

    pub fn submitting_member(&self) -> MemberId {
        self.submitting_member
    }

    pub fn submitting_node_account(&self) -> Option<AccountId> {
        self.submitting_node_account
    }

    pub fn set_status(&mut self, status: ResponseCode) {
        self.status = Some(status);
    }

    /// Last status set, or `FAIL_INVALID` if none was.
    pub fn status(&self) -> ResponseCode {
        self.status.unwrap_or(ResponseCode::FailInvalid)
    }

    pub fn payer_sig_is_known_active(&mut self) {
        self.payer_sig_known_active = true;
    }

    pub fn is_payer_sig_known_active(&self) -> bool {
        self.payer_sig_known_active
    }

    pub fn set_active_payer_key(&mut self, key: Option<Key>) {
        self.active_payer_key = key;
    }

    pub fn active_payer_key(&self) -> Option<&Key> {
        self.active_payer_key.as_ref()
    }

    pub fn add_fee_charged(&mut self, amount: u64) {
        self.fee_charged = self.fee_charged.saturating_add(amount);
    }

    pub fn fee_charged(&self) -> u64 {
        self.fee_charged
    }

    pub fn set_created(&mut self, id: ScheduleId) {
        self.created_schedule = Some(id);
    }

    /// Queues `accessor` to run right after this transaction.
    pub fn trigger(&mut self, accessor: TxnAccessor) {
        self.scheduled_txn_id = Some(accessor.txn_id());
        self.triggered = Some(accessor);
    }

    pub fn triggered_txn(&self) -> Option<&TxnAccessor> {
        self.triggered.as_ref()
    }

    pub fn take_triggered(&mut self) -> Option<TxnAccessor> {
        self.triggered.take()
    }

    /// Drops any queued trigger; used when the transaction's effects are
    /// rolled back.
    pub fn clear_triggered(&mut self) {
        self.triggered = None;
        self.scheduled_txn_id = None;
    }

    pub fn receipt(&self) -> TransactionReceipt {
        TransactionReceipt {
            status: self.status(),
            schedule_id: self.created_schedule,
            scheduled_transaction_id: self.scheduled_txn_id,
        }
    }
}

/// Frozen network window set by a `Freeze` transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreezeWindow {
    pub start_hour: u8,
    pub start_min: u8,
    pub end_hour: u8,
    pub end_min: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkState {
    pub freeze_window: Option<FreezeWindow>,
}

/// What a transition logic may read and mutate.
///
/// This is the only place ledger entity collections are mutated on behalf of
/// a transaction's business logic.
pub struct HandleEnv<'a> {
    pub accessor: &'a TxnAccessor,
    pub txn_ctx: &'a mut TransactionContext,
    pub ledger: &'a mut AccountLedger,
    pub schedules: &'a mut dyn ScheduleStoreApi,
    pub network: &'a mut NetworkState,
    /// Verified signatures over the scheduled transaction, for schedule
    /// create and sign.
    pub scheduled_scope: Option<&'a ScheduledScope>,
}
