//! # Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators the pipeline consults while handling a transaction. Default
//! implementations live in [`crate::adapters`]; tests substitute their own.

use crate::domain::context::HandleEnv;
use crate::domain::errors::ProcessingError;
use crate::domain::fees::{ChargingContext, FeeObject};
use shared_types::{
    AccountId, ExchangeRateSet, Key, MemberId, ResponseCode, Timestamp, TransactionBody,
    TxnAccessor,
};

// =============================================================================
// FEES AND CHARGING
// =============================================================================

/// Computes the fee for a transaction as submitted.
pub trait FeeCalculator: Send + Sync {
    fn compute_fee(
        &self,
        accessor: &TxnAccessor,
        payer_key: Option<&Key>,
        rates: &ExchangeRateSet,
    ) -> FeeObject;
}

/// Moves fees between accounts. Every method returns the outcome as a status.
pub trait ChargingPolicy: Send + Sync {
    /// Normal charging: payer pays every component.
    fn apply(&self, ctx: &mut ChargingContext<'_>, fee: &FeeObject) -> ResponseCode;

    /// Charging for a duplicate of an already-handled transaction.
    fn apply_for_duplicate(&self, ctx: &mut ChargingContext<'_>, fee: &FeeObject) -> ResponseCode;

    /// Charging the submitting node for a transaction it should never have
    /// submitted.
    fn apply_for_ignored_due_diligence(
        &self,
        ctx: &mut ChargingContext<'_>,
        fee: &FeeObject,
    ) -> ResponseCode;
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Business logic for one kind of transaction.
pub trait TransitionLogic: Send + Sync {
    /// Finer-grained match than the function tag, for logics that share one.
    fn applies_to(&self, _body: &TransactionBody) -> bool {
        true
    }

    fn syntax_check(&self, body: &TransactionBody) -> ResponseCode;

    /// Performs the transition and sets the transaction status.
    fn do_state_transition(&self, env: &mut HandleEnv<'_>) -> Result<(), ProcessingError>;
}

/// Privileged-operation authorization.
pub trait SystemOpPolicies: Send + Sync {
    fn check(&self, accessor: &TxnAccessor) -> ResponseCode;
}

// =============================================================================
// NETWORK VIEWS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeAddress {
    pub stake: u64,
    pub account: AccountId,
}

/// Consensus members by id.
pub trait AddressBook: Send + Sync {
    fn address(&self, member: MemberId) -> Option<NodeAddress>;
}

/// Context-free transaction checks.
pub trait Validator: Send + Sync {
    fn is_valid_txn_duration(&self, duration_secs: i64) -> bool;

    fn chronology_status(&self, accessor: &TxnAccessor, consensus_time: &Timestamp)
        -> ResponseCode;
}

pub trait ExchangeRateSource: Send + Sync {
    fn active_rates(&self) -> ExchangeRateSet;
}
