//! Default fee schedule and charging policy.

use crate::domain::fees::{ChargingContext, FeeObject};
use crate::ports::outbound::{ChargingPolicy, FeeCalculator};
use serde::Deserialize;
use shared_types::{ExchangeRate, ExchangeRateSet, Functionality, Key, ResponseCode, TxnAccessor};
use tracing::debug;

/// Prices in tinycents, converted to tinybars at the current rate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub node_fee_tinycents: u64,
    /// Charged per signature the network must verify.
    pub network_fee_per_sig_tinycents: u64,
    pub crypto_transfer_tinycents: u64,
    pub schedule_create_tinycents: u64,
    pub schedule_sign_tinycents: u64,
    pub schedule_delete_tinycents: u64,
    pub freeze_tinycents: u64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            node_fee_tinycents: 1_200,
            network_fee_per_sig_tinycents: 600,
            crypto_transfer_tinycents: 6_000,
            schedule_create_tinycents: 120_000,
            schedule_sign_tinycents: 12_000,
            schedule_delete_tinycents: 12_000,
            freeze_tinycents: 0,
        }
    }
}

impl FeeSchedule {
    pub fn service_fee_tinycents(&self, function: Functionality) -> u64 {
        match function {
            Functionality::CryptoTransfer => self.crypto_transfer_tinycents,
            Functionality::ScheduleCreate => self.schedule_create_tinycents,
            Functionality::ScheduleSign => self.schedule_sign_tinycents,
            Functionality::ScheduleDelete => self.schedule_delete_tinycents,
            Functionality::Freeze => self.freeze_tinycents,
        }
    }
}

fn to_tinybars(tinycents: u64, rate: &ExchangeRate) -> u64 {
    let cents = u128::from(rate.cent_equiv.max(1));
    let tinybars = u128::from(tinycents) * u128::from(rate.hbar_equiv) / cents;
    u64::try_from(tinybars).unwrap_or(u64::MAX)
}

impl FeeCalculator for FeeSchedule {
    fn compute_fee(
        &self,
        accessor: &TxnAccessor,
        payer_key: Option<&Key>,
        rates: &ExchangeRateSet,
    ) -> FeeObject {
        let payer_sigs = payer_key.map_or(1, |k| k.ed25519_leaves().len());
        let sigs = accessor.sig_map().len().max(payer_sigs) as u64;
        let rate = &rates.current;
        FeeObject::new(
            to_tinybars(self.node_fee_tinycents, rate),
            to_tinybars(self.network_fee_per_sig_tinycents.saturating_mul(sigs), rate),
            to_tinybars(self.service_fee_tinycents(accessor.function()), rate),
        )
    }
}

/// Node fee goes to the designated node; network and service fees to the
/// funding account.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardChargingPolicy;

impl StandardChargingPolicy {
    /// Charges node and network fees only if the payer offered and can
    /// cover both.
    fn charge_node_and_network(ctx: &mut ChargingContext<'_>, fee: &FeeObject) -> ResponseCode {
        let node_and_network = fee.node_fee.saturating_add(fee.network_fee);
        if ctx.offered_fee() < node_and_network {
            return ResponseCode::InsufficientTxFee;
        }
        if ctx.payer_balance() < node_and_network {
            return ResponseCode::InsufficientPayerBalance;
        }
        let charged = ctx
            .charge_payer_to_node(fee.node_fee)
            .and_then(|_| ctx.charge_payer_to_funding(fee.network_fee));
        match charged {
            Ok(()) => ResponseCode::Ok,
            Err(e) => e.as_status(),
        }
    }
}

impl ChargingPolicy for StandardChargingPolicy {
    fn apply(&self, ctx: &mut ChargingContext<'_>, fee: &FeeObject) -> ResponseCode {
        let status = Self::charge_node_and_network(ctx, fee);
        if !status.is_ok() {
            return status;
        }
        if ctx.offered_fee() < fee.total() {
            debug!(
                payer = %ctx.payer(),
                offered = ctx.offered_fee(),
                "Fee exceeds the payer's offer"
            );
            return ResponseCode::InsufficientTxFee;
        }
        if ctx.payer_balance() < fee.service_fee {
            debug!(payer = %ctx.payer(), "Payer cannot cover the service fee");
            return ResponseCode::InsufficientPayerBalance;
        }
        match ctx.charge_payer_to_funding(fee.service_fee) {
            Ok(()) => ResponseCode::Ok,
            Err(e) => e.as_status(),
        }
    }

    fn apply_for_duplicate(&self, ctx: &mut ChargingContext<'_>, fee: &FeeObject) -> ResponseCode {
        Self::charge_node_and_network(ctx, fee)
    }

    fn apply_for_ignored_due_diligence(
        &self,
        ctx: &mut ChargingContext<'_>,
        fee: &FeeObject,
    ) -> ResponseCode {
        match ctx.charge_submitting_node_to_funding(fee.network_fee) {
            Ok(()) => ResponseCode::Ok,
            Err(status) => status,
        }
    }
}
