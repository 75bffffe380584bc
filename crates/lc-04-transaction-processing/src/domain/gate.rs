//! # Transaction Gate
//!
//! Checks run before any business logic.
//!
//! Sanity checks drop a transaction outright: no status, no fee, no record.
//!
//! | Order | Sanity check | On failure |
//! |-------|--------------|------------|
//! | 1 | consensus time strictly after watermark | `error!`, dropped |
//! | 2 | submitting member has stake | `warn!`, dropped |
//!
//! Due-diligence checks assign a terminal status and charge the submitting
//! node instead of the payer.
//!
//! | Order | Due-diligence check | Status |
//! |-------|---------------------|--------|
//! | 1 | designated node account exists and is the submitter's | `INVALID_NODE_ACCOUNT` |
//! | 2 | payer signature known active | `INVALID_PAYER_SIGNATURE` |
//! | 3 | not a duplicate from the same member | `DUPLICATE_TRANSACTION` |
//! | 4 | valid duration within bounds | `INVALID_TRANSACTION_DURATION` |
//! | 5 | chronology | validator's code |

use crate::domain::context::TransactionContext;
use crate::domain::history::DuplicateClassification;
use crate::domain::ledger::AccountLedger;
use crate::ports::outbound::{AddressBook, NodeAddress, Validator};
use shared_types::{MemberId, ResponseCode, Timestamp, TxnAccessor};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SanityFailure {
    #[error("consensus time {consensus_time} is not after {last_handled}")]
    NonIncreasingConsensusTime {
        consensus_time: Timestamp,
        last_handled: Timestamp,
    },

    #[error("member {0} has zero stake")]
    ZeroStake(MemberId),
}

pub struct TransactionGate<'a> {
    address_book: &'a dyn AddressBook,
    validator: &'a dyn Validator,
    ledger: &'a AccountLedger,
}

impl<'a> TransactionGate<'a> {
    pub fn new(
        address_book: &'a dyn AddressBook,
        validator: &'a dyn Validator,
        ledger: &'a AccountLedger,
    ) -> Self {
        Self {
            address_book,
            validator,
            ledger,
        }
    }

    /// Returns the submitter's address when the transaction may be handled.
    pub fn sanity_check(
        &self,
        accessor: &TxnAccessor,
        consensus_time: Timestamp,
        last_handled: Option<Timestamp>,
        submitting_member: MemberId,
    ) -> Result<NodeAddress, SanityFailure> {
        if let Some(last_handled) = last_handled {
            if !consensus_time.is_after(&last_handled) {
                error!(
                    consensus_time = %consensus_time,
                    last_handled = %last_handled,
                    txn = %accessor.signed_txn_for_log(),
                    "Catastrophic invariant failure! Non-increasing consensus time"
                );
                return Err(SanityFailure::NonIncreasingConsensusTime {
                    consensus_time,
                    last_handled,
                });
            }
        }

        match self.address_book.address(submitting_member) {
            Some(address) if address.stake > 0 => Ok(address),
            _ => {
                warn!(
                    member = submitting_member,
                    txn_id = %accessor.txn_id(),
                    "Ignoring a transaction submitted by zero-stake node"
                );
                Err(SanityFailure::ZeroStake(submitting_member))
            }
        }
    }

    /// First failing due-diligence check, if any.
    pub fn due_diligence_failure(
        &self,
        accessor: &TxnAccessor,
        txn_ctx: &TransactionContext,
        duplicity: DuplicateClassification,
    ) -> Option<ResponseCode> {
        let designated = accessor.node_account();
        let node_account_ok = self.ledger.contains(&designated)
            && txn_ctx.submitting_node_account() == Some(designated);
        if !node_account_ok {
            warn!(
                member = txn_ctx.submitting_member(),
                designated = %designated,
                txn_id = %accessor.txn_id(),
                "Node submitted a transaction designated for another node account"
            );
            return Some(ResponseCode::InvalidNodeAccount);
        }

        if !txn_ctx.is_payer_sig_known_active() {
            return Some(ResponseCode::InvalidPayerSignature);
        }

        if duplicity == DuplicateClassification::NodeDuplicate {
            return Some(ResponseCode::DuplicateTransaction);
        }

        if !self
            .validator
            .is_valid_txn_duration(accessor.valid_duration_secs())
        {
            return Some(ResponseCode::InvalidTransactionDuration);
        }

        let chronology = self
            .validator
            .chronology_status(accessor, &txn_ctx.consensus_time());
        (!chronology.is_ok()).then_some(chronology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ContextValidator, StaticAddressBook};
    use crate::domain::ledger::Account;
    use shared_types::{
        AccountId, Key, SignatureMap, SignedTransaction, TransactionBody, TransactionData,
        TransactionId,
    };

    const NODE: AccountId = AccountId::from_num(3);
    const PAYER: AccountId = AccountId::from_num(1001);

    fn accessor(valid_start: i64, duration: i64) -> TxnAccessor {
        let body = TransactionBody {
            transaction_id: TransactionId::new(PAYER, Timestamp::of_seconds(valid_start)),
            node_account: NODE,
            transaction_fee: 100,
            valid_duration_secs: duration,
            memo: String::new(),
            data: TransactionData::CryptoTransfer { transfers: vec![] },
        };
        let signed = SignedTransaction {
            body_bytes: body.to_bytes().unwrap(),
            sig_map: SignatureMap::default(),
        };
        TxnAccessor::from_signed_bytes(&signed.to_bytes().unwrap()).unwrap()
    }

    fn fixtures() -> (StaticAddressBook, ContextValidator, AccountLedger) {
        let book = StaticAddressBook::new([
            (0, NodeAddress { stake: 1, account: NODE }),
            (1, NodeAddress { stake: 0, account: AccountId::from_num(4) }),
        ]);
        let ledger = AccountLedger::with_accounts([
            (NODE, Account::new(0, Key::Ed25519([3; 32]))),
            (PAYER, Account::new(0, Key::Ed25519([1; 32]))),
        ]);
        (book, ContextValidator::new(15, 180), ledger)
    }

    fn ctx(consensus: i64, member: MemberId, known_active: bool) -> TransactionContext {
        let mut ctx = TransactionContext::new(Timestamp::of_seconds(consensus), member, Some(NODE));
        if known_active {
            ctx.payer_sig_is_known_active();
        }
        ctx
    }

    #[test]
    fn test_sanity_rejects_stale_time_and_zero_stake() {
        let (book, validator, ledger) = fixtures();
        let gate = TransactionGate::new(&book, &validator, &ledger);
        let txn = accessor(100, 120);
        let t = Timestamp::of_seconds(110);

        assert!(gate.sanity_check(&txn, t, None, 0).is_ok());
        assert!(matches!(
            gate.sanity_check(&txn, t, Some(t), 0),
            Err(SanityFailure::NonIncreasingConsensusTime { .. })
        ));
        assert_eq!(
            gate.sanity_check(&txn, t, None, 1),
            Err(SanityFailure::ZeroStake(1))
        );
        assert_eq!(
            gate.sanity_check(&txn, t, None, 7),
            Err(SanityFailure::ZeroStake(7))
        );
    }

    #[test]
    fn test_due_diligence_order() {
        let (book, validator, ledger) = fixtures();
        let gate = TransactionGate::new(&book, &validator, &ledger);
        let unique = DuplicateClassification::BelievedUnique;

        let wrong_node = TransactionContext::new(
            Timestamp::of_seconds(110),
            0,
            Some(AccountId::from_num(5)),
        );
        assert_eq!(
            gate.due_diligence_failure(&accessor(100, 120), &wrong_node, unique),
            Some(ResponseCode::InvalidNodeAccount)
        );
        assert_eq!(
            gate.due_diligence_failure(&accessor(100, 120), &ctx(110, 0, false), unique),
            Some(ResponseCode::InvalidPayerSignature)
        );
        assert_eq!(
            gate.due_diligence_failure(
                &accessor(100, 120),
                &ctx(110, 0, true),
                DuplicateClassification::NodeDuplicate
            ),
            Some(ResponseCode::DuplicateTransaction)
        );
        assert_eq!(
            gate.due_diligence_failure(&accessor(100, 5), &ctx(110, 0, true), unique),
            Some(ResponseCode::InvalidTransactionDuration)
        );
        assert_eq!(
            gate.due_diligence_failure(&accessor(100, 120), &ctx(99, 0, true), unique),
            Some(ResponseCode::InvalidTransactionStart)
        );
        assert_eq!(
            gate.due_diligence_failure(&accessor(100, 120), &ctx(220, 0, true), unique),
            Some(ResponseCode::TransactionExpired)
        );
        assert_eq!(
            gate.due_diligence_failure(&accessor(100, 120), &ctx(110, 0, true), unique),
            None
        );
    }

    #[test]
    fn test_other_members_duplicate_passes_due_diligence() {
        let (book, validator, ledger) = fixtures();
        let gate = TransactionGate::new(&book, &validator, &ledger);
        assert_eq!(
            gate.due_diligence_failure(
                &accessor(100, 120),
                &ctx(110, 0, true),
                DuplicateClassification::Duplicate
            ),
            None
        );
    }
}
