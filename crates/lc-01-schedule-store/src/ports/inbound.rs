//! # Inbound Ports (Driving Ports / API)
//!
//! The schedule store surface driven by schedule transition logic and by
//! the pipeline's expiry sweep.

use crate::domain::entities::Schedule;
use crate::domain::errors::StoreError;
use crate::ports::outbound::AccountLookup;
use shared_types::{AccountId, EntityId, Key, ResponseCode, ScheduleId, Timestamp};

/// Everything needed to provisionally create a schedule.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub body_bytes: Vec<u8>,
    /// Payer of the inner transaction.
    pub payer: AccountId,
    /// Payer of the scheduling transaction.
    pub scheduling_account: AccountId,
    pub scheduling_txn_valid_start: Timestamp,
    pub admin_key: Option<Key>,
    pub memo: String,
}

/// Outcome of [`ScheduleStoreApi::create_provisionally`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationResult {
    pub status: ResponseCode,
    pub created: Option<ScheduleId>,
}

impl CreationResult {
    pub fn success(id: ScheduleId) -> Self {
        Self {
            status: ResponseCode::Ok,
            created: Some(id),
        }
    }

    pub fn failure(status: ResponseCode) -> Self {
        Self {
            status,
            created: None,
        }
    }
}

/// Schedule store API.
///
/// Single-threaded: the handling pipeline owns the store and drives it one
/// transaction at a time.
pub trait ScheduleStoreApi: Send {
    fn exists(&self, id: &ScheduleId) -> bool;

    fn get(&self, id: &ScheduleId) -> Result<&Schedule, StoreError>;

    /// Applies a mutation to a pending or committed schedule.
    fn apply(
        &mut self,
        id: &ScheduleId,
        change: &mut dyn FnMut(&mut Schedule) -> Result<(), String>,
    ) -> Result<(), StoreError>;

    /// Validates the referenced accounts and installs a pending creation
    /// expiring `scheduled_tx_expiry_secs` after `consensus_time`.
    ///
    /// # Errors
    /// - `CreationAlreadyPending` if the previous creation was neither
    ///   committed nor rolled back
    fn create_provisionally(
        &mut self,
        accounts: &dyn AccountLookup,
        request: NewSchedule,
        consensus_time: Timestamp,
    ) -> Result<CreationResult, StoreError>;

    fn commit_creation(&mut self) -> Result<ScheduleId, StoreError>;

    fn rollback_creation(&mut self) -> Result<(), StoreError>;

    fn is_creation_pending(&self) -> bool;

    /// Finds a pending or committed schedule with the same dedup key,
    /// preferring the pending one.
    fn lookup_schedule_id(
        &self,
        body_bytes: &[u8],
        payer: AccountId,
        admin_key: Option<&Key>,
        memo: &str,
    ) -> Option<ScheduleId>;

    /// `INVALID_SCHEDULE_ID` if absent, `SCHEDULE_IS_IMMUTABLE` without an
    /// admin key, else removes the schedule.
    fn delete(&mut self, id: &ScheduleId) -> ResponseCode;

    /// Removes a schedule whose inner transaction ran.
    fn mark_as_executed(&mut self, id: &ScheduleId) -> ResponseCode;

    /// Time-driven removal.
    fn expire(&mut self, id: EntityId) -> ResponseCode;

    /// Expires every committed schedule due at or before `now_secs`.
    /// Returns how many were removed.
    fn purge_expired_entities_at(&mut self, now_secs: i64) -> usize;

    fn root_hash(&self) -> [u8; 32];
}
