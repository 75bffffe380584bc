use crate::domain::context::HandleEnv;
use crate::domain::errors::ProcessingError;
use crate::ports::outbound::TransitionLogic;
use shared_types::{ResponseCode, TransactionBody, TransactionData};
use ledger_telemetry::log_schedule_event;

/// Deletes a mutable schedule. The admin key's signature is enforced before
/// dispatch, with the other required parties.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScheduleDeleteLogic;

impl TransitionLogic for ScheduleDeleteLogic {
    fn applies_to(&self, body: &TransactionBody) -> bool {
        matches!(body.data, TransactionData::ScheduleDelete { .. })
    }

    fn syntax_check(&self, body: &TransactionBody) -> ResponseCode {
        match &body.data {
            TransactionData::ScheduleDelete { schedule_id } if schedule_id.entity().is_missing() => {
                ResponseCode::InvalidScheduleId
            }
            TransactionData::ScheduleDelete { .. } => ResponseCode::Ok,
            _ => ResponseCode::FailInvalid,
        }
    }

    fn do_state_transition(&self, env: &mut HandleEnv<'_>) -> Result<(), ProcessingError> {
        let accessor = env.accessor;
        let TransactionData::ScheduleDelete { schedule_id } = &accessor.body().data else {
            env.txn_ctx.set_status(ResponseCode::FailInvalid);
            return Ok(());
        };
        let status = env.schedules.delete(schedule_id);
        log_schedule_event!(debug, "Schedule delete handled", schedule_id, status = %status);
        env.txn_ctx.set_status(status);
        Ok(())
    }
}
