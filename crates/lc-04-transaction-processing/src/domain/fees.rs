//! # Fees and Charging Context

use crate::domain::errors::LedgerError;
use crate::domain::ledger::AccountLedger;
use shared_types::{AccountId, ResponseCode};

/// Fee computed once per transaction, before its outcome is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeObject {
    pub node_fee: u64,
    pub network_fee: u64,
    pub service_fee: u64,
}

impl FeeObject {
    pub fn new(node_fee: u64, network_fee: u64, service_fee: u64) -> Self {
        Self {
            node_fee,
            network_fee,
            service_fee,
        }
    }

    pub fn total(&self) -> u64 {
        self.node_fee
            .saturating_add(self.network_fee)
            .saturating_add(self.service_fee)
    }
}

/// Accounts and ledger a charging policy moves fees between.
pub struct ChargingContext<'a> {
    ledger: &'a mut AccountLedger,
    payer: AccountId,
    /// Node credited with the node fee.
    node_account: AccountId,
    /// Node penalised for ignored due diligence.
    submitting_node_account: Option<AccountId>,
    funding_account: AccountId,
    /// Most the payer agreed to pay.
    offered_fee: u64,
    charged_to_payer: u64,
    total_charged: u64,
}

impl<'a> ChargingContext<'a> {
    pub fn new(
        ledger: &'a mut AccountLedger,
        payer: AccountId,
        node_account: AccountId,
        submitting_node_account: Option<AccountId>,
        funding_account: AccountId,
    ) -> Self {
        Self {
            ledger,
            payer,
            node_account,
            submitting_node_account,
            funding_account,
            offered_fee: u64::MAX,
            charged_to_payer: 0,
            total_charged: 0,
        }
    }

    /// Caps what the payer is willing to be charged; uncapped by default.
    pub fn with_offered_fee(mut self, offered_fee: u64) -> Self {
        self.offered_fee = offered_fee;
        self
    }

    pub fn offered_fee(&self) -> u64 {
        self.offered_fee
    }

    pub fn payer(&self) -> AccountId {
        self.payer
    }

    pub fn payer_balance(&self) -> u64 {
        self.ledger.balance(&self.payer).unwrap_or(0)
    }

    /// Fees moved out of the payer account so far.
    pub fn charged_to_payer(&self) -> u64 {
        self.charged_to_payer
    }

    /// Fees moved out of any account so far.
    pub fn total_charged(&self) -> u64 {
        self.total_charged
    }

    fn note_payer_charge(&mut self, amount: u64) {
        self.charged_to_payer = self.charged_to_payer.saturating_add(amount);
        self.total_charged = self.total_charged.saturating_add(amount);
    }

    pub fn charge_payer_to_node(&mut self, amount: u64) -> Result<(), LedgerError> {
        self.ledger.transfer(self.payer, self.node_account, amount)?;
        self.note_payer_charge(amount);
        Ok(())
    }

    pub fn charge_payer_to_funding(&mut self, amount: u64) -> Result<(), LedgerError> {
        self.ledger
            .transfer(self.payer, self.funding_account, amount)?;
        self.note_payer_charge(amount);
        Ok(())
    }

    /// Charges the submitting node itself; fails with `INVALID_NODE_ACCOUNT`
    /// when the member has no account.
    pub fn charge_submitting_node_to_funding(&mut self, amount: u64) -> Result<(), ResponseCode> {
        let node = self
            .submitting_node_account
            .ok_or(ResponseCode::InvalidNodeAccount)?;
        self.ledger
            .transfer(node, self.funding_account, amount)
            .map_err(|e| e.as_status())?;
        self.total_charged = self.total_charged.saturating_add(amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::Account;
    use shared_types::Key;

    #[test]
    fn test_total_saturates() {
        assert_eq!(FeeObject::new(1, 2, 3).total(), 6);
        assert_eq!(FeeObject::new(u64::MAX, 1, 0).total(), u64::MAX);
    }

    #[test]
    fn test_context_tracks_payer_charges_only() {
        let payer = AccountId::from_num(1001);
        let node = AccountId::from_num(3);
        let funding = AccountId::from_num(98);
        let mut ledger = AccountLedger::with_accounts([
            (payer, Account::new(100, Key::Ed25519([1; 32]))),
            (node, Account::new(50, Key::Ed25519([3; 32]))),
            (funding, Account::new(0, Key::Ed25519([98; 32]))),
        ]);
        ledger.begin().unwrap();

        let mut ctx = ChargingContext::new(&mut ledger, payer, node, Some(node), funding);
        ctx.charge_payer_to_node(10).unwrap();
        ctx.charge_payer_to_funding(5).unwrap();
        ctx.charge_submitting_node_to_funding(7).unwrap();
        assert_eq!(ctx.charged_to_payer(), 15);
        assert_eq!(ctx.total_charged(), 22);
        assert_eq!(ctx.payer_balance(), 85);

        assert_eq!(ledger.balance(&node), Some(53));
        assert_eq!(ledger.balance(&funding), Some(12));
    }
}
