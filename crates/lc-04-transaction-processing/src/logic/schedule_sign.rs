use super::schedule_witness::{execute_ready, witness_scope};
use crate::domain::context::HandleEnv;
use crate::domain::errors::ProcessingError;
use crate::ports::outbound::TransitionLogic;
use shared_types::{Functionality, ResponseCode, TransactionBody, TransactionData};

/// Adds signatures to an existing schedule.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScheduleSignLogic;

impl TransitionLogic for ScheduleSignLogic {
    fn applies_to(&self, body: &TransactionBody) -> bool {
        matches!(body.data, TransactionData::ScheduleSign { .. })
    }

    fn syntax_check(&self, body: &TransactionBody) -> ResponseCode {
        match &body.data {
            TransactionData::ScheduleSign { schedule_id, .. } if schedule_id.entity().is_missing() => {
                ResponseCode::InvalidScheduleId
            }
            TransactionData::ScheduleSign { .. } => ResponseCode::Ok,
            _ => ResponseCode::FailInvalid,
        }
    }

    fn do_state_transition(&self, env: &mut HandleEnv<'_>) -> Result<(), ProcessingError> {
        let accessor = env.accessor;
        let TransactionData::ScheduleSign { schedule_id, .. } = &accessor.body().data else {
            env.txn_ctx.set_status(ResponseCode::FailInvalid);
            return Ok(());
        };
        let scope = env
            .scheduled_scope
            .ok_or(ProcessingError::MissingScheduledScope(Functionality::ScheduleSign))?;
        if !env.schedules.exists(schedule_id) {
            env.txn_ctx.set_status(ResponseCode::InvalidScheduleId);
            return Ok(());
        }

        let outcome = witness_scope(env.schedules, *schedule_id, scope)?;
        if outcome.ready {
            execute_ready(env, *schedule_id)?;
        }
        env.txn_ctx.set_status(outcome.status);
        Ok(())
    }
}
