use super::schedule_witness::{execute_ready, witness_scope};
use crate::domain::context::HandleEnv;
use crate::domain::errors::ProcessingError;
use crate::ports::outbound::TransitionLogic;
use lc_01_schedule_store::NewSchedule;
use shared_types::{Functionality, ResponseCode, TransactionBody, TransactionData};
use tracing::debug;

/// Creates a schedule, or reuses an identical one, and witnesses the
/// scheduled signatures that came with it.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleCreateLogic {
    max_memo_utf8_bytes: usize,
}

impl ScheduleCreateLogic {
    pub fn new(max_memo_utf8_bytes: usize) -> Self {
        Self {
            max_memo_utf8_bytes,
        }
    }
}

impl TransitionLogic for ScheduleCreateLogic {
    fn applies_to(&self, body: &TransactionBody) -> bool {
        matches!(body.data, TransactionData::ScheduleCreate { .. })
    }

    fn syntax_check(&self, body: &TransactionBody) -> ResponseCode {
        let TransactionData::ScheduleCreate {
            admin_key, memo, ..
        } = &body.data
        else {
            return ResponseCode::FailInvalid;
        };
        if memo.len() > self.max_memo_utf8_bytes {
            return ResponseCode::MemoTooLong;
        }
        if admin_key.as_ref().is_some_and(|key| !key.is_valid()) {
            return ResponseCode::InvalidAdminKey;
        }
        ResponseCode::Ok
    }

    fn do_state_transition(&self, env: &mut HandleEnv<'_>) -> Result<(), ProcessingError> {
        let accessor = env.accessor;
        let TransactionData::ScheduleCreate {
            scheduled_body_bytes,
            payer,
            admin_key,
            memo,
            ..
        } = &accessor.body().data
        else {
            env.txn_ctx.set_status(ResponseCode::FailInvalid);
            return Ok(());
        };
        let scope = env
            .scheduled_scope
            .ok_or(ProcessingError::MissingScheduledScope(Functionality::ScheduleCreate))?;
        let inner_payer = payer.unwrap_or_else(|| accessor.payer());

        let existing =
            env.schedules
                .lookup_schedule_id(scheduled_body_bytes, inner_payer, admin_key.as_ref(), memo);
        let id = match existing {
            Some(id) => {
                debug!(schedule_id = %id, "Reusing identical schedule");
                id
            }
            None => {
                let request = NewSchedule {
                    body_bytes: scheduled_body_bytes.clone(),
                    payer: inner_payer,
                    scheduling_account: accessor.payer(),
                    scheduling_txn_valid_start: accessor.valid_start(),
                    admin_key: admin_key.clone(),
                    memo: memo.clone(),
                };
                let result = env.schedules.create_provisionally(
                    &*env.ledger,
                    request,
                    env.txn_ctx.consensus_time(),
                )?;
                match result.created {
                    Some(id) if result.status.is_ok() => id,
                    _ => {
                        env.txn_ctx.set_status(result.status);
                        return Ok(());
                    }
                }
            }
        };

        let outcome = witness_scope(env.schedules, id, scope)?;
        if outcome.status == ResponseCode::SomeSignaturesWereInvalid {
            if env.schedules.is_creation_pending() {
                env.schedules.rollback_creation()?;
            }
            env.txn_ctx.set_status(outcome.status);
            return Ok(());
        }

        if env.schedules.is_creation_pending() {
            env.schedules.commit_creation()?;
        }
        env.txn_ctx.set_created(id);
        if outcome.ready {
            execute_ready(env, id)?;
        }
        env.txn_ctx.set_status(outcome.status);
        Ok(())
    }
}
