//! Glue between the witness engine and the schedule store.

use crate::domain::context::HandleEnv;
use crate::domain::errors::ProcessingError;
use crate::domain::sig_requirements::ScheduledScope;
use lc_01_schedule_store::{ScheduleStoreApi, StoreError};
use lc_02_signature_witness::{witness_in_scope, SigningOutcome, WitnessTarget};
use shared_types::{Ed25519Key, ScheduleId, TxnAccessor};
use tracing::{debug, warn};

/// A schedule as seen by the witness engine: witnessing writes signatories
/// through the store, readiness checks the scope's required keys against
/// them.
pub struct ScheduleWitness<'s> {
    store: &'s mut dyn ScheduleStoreApi,
    id: ScheduleId,
    scope: &'s ScheduledScope,
}

impl<'s> ScheduleWitness<'s> {
    pub fn new(store: &'s mut dyn ScheduleStoreApi, id: ScheduleId, scope: &'s ScheduledScope) -> Self {
        Self { store, id, scope }
    }
}

impl WitnessTarget for ScheduleWitness<'_> {
    type Error = StoreError;

    fn witness(&mut self, keys: &[Ed25519Key]) -> Result<usize, StoreError> {
        let mut new = 0;
        self.store.apply(&self.id, &mut |schedule| {
            new += keys
                .iter()
                .filter(|key| schedule.witness_valid_ed25519_signature(key))
                .count();
            Ok(())
        })?;
        Ok(new)
    }

    fn is_ready(&self) -> Result<bool, StoreError> {
        let schedule = self.store.get(&self.id)?;
        Ok(self
            .scope
            .is_satisfied_by(&|key| schedule.has_valid_ed25519_signature(key)))
    }
}

pub fn witness_scope(
    store: &mut dyn ScheduleStoreApi,
    id: ScheduleId,
    scope: &ScheduledScope,
) -> Result<SigningOutcome, StoreError> {
    let mut target = ScheduleWitness::new(store, id, scope);
    witness_in_scope(scope.num_attempts, scope.sigs.iter().copied(), &mut target)
}

/// Removes a ready schedule and queues its inner transaction to run right
/// after the current one.
pub fn execute_ready(env: &mut HandleEnv<'_>, id: ScheduleId) -> Result<(), ProcessingError> {
    let schedule = env.schedules.get(&id)?;
    let triggered = TxnAccessor::from_scheduled(
        schedule.transaction_body(),
        schedule.scheduled_txn_id(),
        schedule.payer(),
        id,
    )?;

    let status = env.schedules.mark_as_executed(&id);
    if !status.is_ok() {
        warn!(schedule_id = %id, status = %status, "Ready schedule could not be marked executed");
        return Err(StoreError::NotFound(id.entity()).into());
    }

    debug!(
        schedule_id = %id,
        scheduled_txn_id = %triggered.txn_id(),
        "Scheduled transaction triggered"
    );
    env.txn_ctx.trigger(triggered);
    Ok(())
}
