use crate::domain::context::{FreezeWindow, HandleEnv};
use crate::domain::errors::ProcessingError;
use crate::ports::outbound::TransitionLogic;
use shared_types::{ResponseCode, TransactionBody, TransactionData};
use tracing::info;

/// Schedules a network freeze window (UTC hour and minute bounds).
#[derive(Debug, Default, Clone, Copy)]
pub struct FreezeLogic;

fn window_of(body: &TransactionBody) -> Option<FreezeWindow> {
    match body.data {
        TransactionData::Freeze {
            start_hour,
            start_min,
            end_hour,
            end_min,
        } => Some(FreezeWindow {
            start_hour,
            start_min,
            end_hour,
            end_min,
        }),
        _ => None,
    }
}

impl TransitionLogic for FreezeLogic {
    fn applies_to(&self, body: &TransactionBody) -> bool {
        window_of(body).is_some()
    }

    fn syntax_check(&self, body: &TransactionBody) -> ResponseCode {
        match window_of(body) {
            Some(w) if w.start_hour < 24 && w.end_hour < 24 && w.start_min < 60 && w.end_min < 60 => {
                ResponseCode::Ok
            }
            Some(_) => ResponseCode::InvalidFreezeTransactionBody,
            None => ResponseCode::FailInvalid,
        }
    }

    fn do_state_transition(&self, env: &mut HandleEnv<'_>) -> Result<(), ProcessingError> {
        let accessor = env.accessor;
        let Some(window) = window_of(accessor.body()) else {
            env.txn_ctx.set_status(ResponseCode::FailInvalid);
            return Ok(());
        };
        info!(
            start = %format!("{:02}:{:02}", window.start_hour, window.start_min),
            end = %format!("{:02}:{:02}", window.end_hour, window.end_min),
            "Network freeze window set"
        );
        env.network.freeze_window = Some(window);
        env.txn_ctx.set_status(ResponseCode::Ok);
        Ok(())
    }
}
