use crate::domain::context::HandleEnv;
use crate::domain::errors::ProcessingError;
use crate::ports::outbound::TransitionLogic;
use shared_types::{AccountAmount, ResponseCode, TransactionBody, TransactionData};
use std::collections::HashSet;

/// Moves balances between accounts. Either every adjustment applies or none
/// does.
#[derive(Debug, Default, Clone, Copy)]
pub struct CryptoTransferLogic;

fn transfers_of(body: &TransactionBody) -> Option<&[AccountAmount]> {
    match &body.data {
        TransactionData::CryptoTransfer { transfers } => Some(transfers),
        _ => None,
    }
}

impl TransitionLogic for CryptoTransferLogic {
    fn applies_to(&self, body: &TransactionBody) -> bool {
        transfers_of(body).is_some()
    }

    fn syntax_check(&self, body: &TransactionBody) -> ResponseCode {
        let Some(transfers) = transfers_of(body) else {
            return ResponseCode::FailInvalid;
        };
        if transfers.is_empty() {
            return ResponseCode::EmptyTransferList;
        }
        let net: i128 = transfers.iter().map(|aa| i128::from(aa.amount)).sum();
        if net != 0 {
            return ResponseCode::InvalidAccountAmounts;
        }
        let mut seen = HashSet::with_capacity(transfers.len());
        if !transfers.iter().all(|aa| seen.insert(aa.account)) {
            return ResponseCode::AccountRepeatedInAccountAmounts;
        }
        ResponseCode::Ok
    }

    fn do_state_transition(&self, env: &mut HandleEnv<'_>) -> Result<(), ProcessingError> {
        let accessor = env.accessor;
        let Some(transfers) = transfers_of(accessor.body()) else {
            env.txn_ctx.set_status(ResponseCode::FailInvalid);
            return Ok(());
        };

        for aa in transfers {
            let Some(balance) = env.ledger.balance(&aa.account) else {
                env.txn_ctx.set_status(ResponseCode::InvalidAccountId);
                return Ok(());
            };
            if i128::from(balance) + i128::from(aa.amount) < 0 {
                env.txn_ctx.set_status(ResponseCode::InsufficientAccountBalance);
                return Ok(());
            }
        }

        for aa in transfers {
            env.ledger.adjust_balance(aa.account, aa.amount)?;
        }
        env.txn_ctx.set_status(ResponseCode::Ok);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{AccountId, Timestamp, TransactionId};

    fn body(transfers: Vec<(u64, i64)>) -> TransactionBody {
        TransactionBody {
            transaction_id: TransactionId::new(AccountId::from_num(1001), Timestamp::of_seconds(1)),
            node_account: AccountId::from_num(3),
            transaction_fee: 0,
            valid_duration_secs: 120,
            memo: String::new(),
            data: TransactionData::CryptoTransfer {
                transfers: transfers
                    .into_iter()
                    .map(|(num, amount)| AccountAmount {
                        account: AccountId::from_num(num),
                        amount,
                    })
                    .collect(),
            },
        }
    }

    #[test]
    fn test_syntax() {
        let logic = CryptoTransferLogic;
        assert_eq!(logic.syntax_check(&body(vec![])), ResponseCode::EmptyTransferList);
        assert_eq!(
            logic.syntax_check(&body(vec![(1, -5), (2, 4)])),
            ResponseCode::InvalidAccountAmounts
        );
        assert_eq!(
            logic.syntax_check(&body(vec![(1, -5), (1, 5)])),
            ResponseCode::AccountRepeatedInAccountAmounts
        );
        assert_eq!(
            logic.syntax_check(&body(vec![(1, -5), (2, 3), (3, 2)])),
            ResponseCode::Ok
        );
        assert_eq!(
            logic.syntax_check(&body(vec![(1, i64::MIN), (2, i64::MAX), (3, 1)])),
            ResponseCode::Ok
        );
    }
}
