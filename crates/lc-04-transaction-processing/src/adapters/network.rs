//! Address book, validation, system policies and exchange rates for a
//! statically configured network.

use crate::ports::outbound::{
    AddressBook, ExchangeRateSource, NodeAddress, SystemOpPolicies, Validator,
};
use shared_types::{
    ExchangeRateSet, Functionality, MemberId, ResponseCode, Timestamp, TxnAccessor,
};
use std::collections::HashMap;

/// Highest account number treated as a system account.
pub const MAX_SYSTEM_ACCOUNT_NUM: u64 = 100;

#[derive(Debug, Clone, Default)]
pub struct StaticAddressBook {
    members: HashMap<MemberId, NodeAddress>,
}

impl StaticAddressBook {
    pub fn new(members: impl IntoIterator<Item = (MemberId, NodeAddress)>) -> Self {
        Self {
            members: members.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl AddressBook for StaticAddressBook {
    fn address(&self, member: MemberId) -> Option<NodeAddress> {
        self.members.get(&member).copied()
    }
}

/// Duration bounds and the valid-start window.
#[derive(Debug, Clone, Copy)]
pub struct ContextValidator {
    min_duration_secs: i64,
    max_duration_secs: i64,
}

impl ContextValidator {
    pub fn new(min_duration_secs: i64, max_duration_secs: i64) -> Self {
        Self {
            min_duration_secs,
            max_duration_secs,
        }
    }
}

impl Validator for ContextValidator {
    fn is_valid_txn_duration(&self, duration_secs: i64) -> bool {
        (self.min_duration_secs..=self.max_duration_secs).contains(&duration_secs)
    }

    fn chronology_status(&self, accessor: &TxnAccessor, consensus_time: &Timestamp) -> ResponseCode {
        let valid_start = accessor.valid_start();
        if valid_start.is_after(consensus_time) {
            return ResponseCode::InvalidTransactionStart;
        }
        let expiry = valid_start.plus_seconds(accessor.valid_duration_secs());
        if !expiry.is_after(consensus_time) {
            return ResponseCode::TransactionExpired;
        }
        ResponseCode::Ok
    }
}

/// Restricts network administration to system payers.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAccountPolicies;

impl SystemOpPolicies for SystemAccountPolicies {
    fn check(&self, accessor: &TxnAccessor) -> ResponseCode {
        match accessor.function() {
            Functionality::Freeze if accessor.payer().num() > MAX_SYSTEM_ACCOUNT_NUM => {
                ResponseCode::NotSupported
            }
            _ => ResponseCode::Ok,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedExchangeRates(pub ExchangeRateSet);

impl ExchangeRateSource for FixedExchangeRates {
    fn active_rates(&self) -> ExchangeRateSet {
        self.0
    }
}
