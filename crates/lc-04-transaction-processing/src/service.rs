//! # Transaction Processing Service
//!
//! [`TransactionProcessor`] drives every consensus-ordered transaction
//! through the handling pipeline and implements the
//! [`ConsensusTxnHandler`] driving port.
//!
//! ## Pipeline
//!
//! ```text
//! parse ──► sanity check ──► clock ──► rationalize ──► fee ──► due diligence
//!                                                                  │
//!   record ◄── transition ◄── syntax ◄── dispatch ◄── policies ◄── charge
//!     │
//!     └──► triggered scheduled transaction (at most one, same loop)
//! ```
//!
//! A transaction that can trigger another runs 1ns before its consensus
//! time, so its triggered transaction can run at the consensus time itself.
//!
//! Each transaction runs inside one ledger transaction. An unexpected
//! [`ProcessingError`] rolls the ledger back, is logged with the change set
//! that was in flight, and still produces a record with the last status set.

use crate::adapters::{
    ContextValidator, FeeSchedule, FixedExchangeRates, StandardChargingPolicy,
    SystemAccountPolicies,
};
use crate::config::ProcessingConfig;
use crate::domain::{
    is_terminal_rationalization_error, rationalize, AccountLedger, ChargingContext,
    ConsensusClock, DuplicateClassification, FeeObject, HandleEnv, IssEventInfo, NetworkState,
    ProcessingError, ScheduledScope, TransactionContext, TransactionGate, TxnHistories,
};
use crate::forensics::{IssListener, StateRootHashes, StateView};
use crate::logic::TransitionLogicRegistry;
use crate::ports::inbound::ConsensusTxnHandler;
use crate::ports::outbound::{
    AddressBook, ChargingPolicy, ExchangeRateSource, FeeCalculator, SystemOpPolicies, Validator,
};
use lc_01_schedule_store::ScheduleStoreApi;
use lc_02_signature_witness::{
    CompletionMode, SignatureRationalizationApi, SignatureRationalizer, VerificationConfig,
};
use lc_03_record_stream::{RecordStream, RecordStreamObject};
use ledger_telemetry::{log_txn_event, LedgerMetrics, VerificationMode};
use shared_types::{
    AccountAmount, AccountId, MemberId, ResponseCode, Timestamp, TransactionRecord, TxnAccessor,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charge {
    Standard,
    Duplicate,
    IgnoredDueDiligence,
}

/// The consensus transaction-handling pipeline.
///
/// Owns the account ledger, schedule store and all handling state; must be
/// driven from one thread, in consensus order.
pub struct TransactionProcessor {
    config: ProcessingConfig,
    funding_account: AccountId,
    clock: ConsensusClock,
    histories: TxnHistories,
    ledger: AccountLedger,
    schedules: Box<dyn ScheduleStoreApi>,
    network: NetworkState,
    verifier: Box<dyn SignatureRationalizationApi>,
    fees: Box<dyn FeeCalculator>,
    charging: Box<dyn ChargingPolicy>,
    logics: TransitionLogicRegistry,
    policies: Box<dyn SystemOpPolicies>,
    address_book: Box<dyn AddressBook>,
    validator: Box<dyn Validator>,
    rates: Box<dyn ExchangeRateSource>,
    records: Arc<dyn RecordStream>,
    metrics: LedgerMetrics,
}

impl TransactionProcessor {
    /// Creates a processor with the default collaborators: tinycent fee
    /// schedule, standard charging, every built-in transition logic, system
    /// account policies, a duration/chronology validator from `config`, and
    /// default exchange rates.
    pub fn new(
        config: ProcessingConfig,
        ledger: AccountLedger,
        schedules: Box<dyn ScheduleStoreApi>,
        address_book: Box<dyn AddressBook>,
        records: Arc<dyn RecordStream>,
        metrics: LedgerMetrics,
    ) -> Self {
        let rates = FixedExchangeRates::default();
        let clock = ConsensusClock::new(
            rates.active_rates(),
            IssEventInfo::shared(config.iss_rounds_to_dump),
            config.iss_reset_period_secs,
        );
        Self {
            funding_account: AccountId::from_num(config.funding_account),
            clock,
            histories: TxnHistories::new(config.cache_records_ttl_secs),
            ledger,
            schedules,
            network: NetworkState::default(),
            verifier: Box::new(SignatureRationalizer::new(VerificationConfig::default())),
            fees: Box::new(FeeSchedule::default()),
            charging: Box::new(StandardChargingPolicy),
            logics: TransitionLogicRegistry::standard(config.max_memo_utf8_bytes),
            policies: Box::new(SystemAccountPolicies),
            address_book,
            validator: Box::new(ContextValidator::new(
                config.min_txn_duration_secs,
                config.max_txn_duration_secs,
            )),
            rates: Box::new(rates),
            records,
            metrics,
            config,
        }
    }

    pub fn with_verifier(mut self, verifier: Box<dyn SignatureRationalizationApi>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn with_fee_calculator(mut self, fees: Box<dyn FeeCalculator>) -> Self {
        self.fees = fees;
        self
    }

    pub fn with_charging_policy(mut self, charging: Box<dyn ChargingPolicy>) -> Self {
        self.charging = charging;
        self
    }

    pub fn with_transition_logics(mut self, logics: TransitionLogicRegistry) -> Self {
        self.logics = logics;
        self
    }

    pub fn with_system_policies(mut self, policies: Box<dyn SystemOpPolicies>) -> Self {
        self.policies = policies;
        self
    }

    pub fn with_validator(mut self, validator: Box<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    /// Replaces the rate source; its active rates become the midnight rates.
    /// Call before handling any transaction.
    pub fn with_exchange_rates(mut self, rates: Box<dyn ExchangeRateSource>) -> Self {
        self.clock = ConsensusClock::new(
            rates.active_rates(),
            self.clock.iss_info(),
            self.config.iss_reset_period_secs,
        );
        self.rates = rates;
        self
    }

    pub fn ledger(&self) -> &AccountLedger {
        &self.ledger
    }

    pub fn schedules(&self) -> &dyn ScheduleStoreApi {
        self.schedules.as_ref()
    }

    pub fn clock(&self) -> &ConsensusClock {
        &self.clock
    }

    pub fn histories(&self) -> &TxnHistories {
        &self.histories
    }

    pub fn network(&self) -> &NetworkState {
        &self.network
    }

    pub fn metrics(&self) -> &LedgerMetrics {
        &self.metrics
    }

    /// A listener sharing this processor's ISS alert state.
    pub fn iss_listener(&self) -> IssListener {
        IssListener::new(self.clock.iss_info())
    }

    // =========================================================================
    // HANDLING
    // =========================================================================

    /// Runs one transaction in its own ledger transaction. Returns the net
    /// transfers it committed, or `None` if it was rolled back.
    fn handle(
        &mut self,
        accessor: &TxnAccessor,
        txn_ctx: &mut TransactionContext,
        triggered: bool,
    ) -> Option<Vec<AccountAmount>> {
        if self.ledger.is_in_transaction() {
            warn!(txn_id = %accessor.txn_id(), "Discarding a ledger transaction left open");
            self.ledger.rollback();
        }

        let result = self.ledger.begin().map_err(ProcessingError::from).and_then(|()| {
            if triggered {
                self.do_triggered_process(accessor, txn_ctx)
            } else {
                self.do_process(accessor, txn_ctx)
            }
        });
        let result = result.and_then(|()| {
            let transfers = self.ledger.net_transfers();
            self.ledger.commit()?;
            Ok(transfers)
        });

        match result {
            Ok(transfers) => Some(transfers),
            Err(e) => {
                self.warn_of(&e, "handling", accessor);
                self.metrics.count_pipeline_failure();
                self.ledger.rollback();
                if self.schedules.is_creation_pending() {
                    if let Err(e) = self.schedules.rollback_creation() {
                        self.warn_of(&ProcessingError::from(e), "schedule rollback", accessor);
                    }
                }
                txn_ctx.clear_triggered();
                None
            }
        }
    }

    fn do_process(
        &mut self,
        accessor: &TxnAccessor,
        txn_ctx: &mut TransactionContext,
    ) -> Result<(), ProcessingError> {
        self.advance_clock(txn_ctx.consensus_time());

        let rationalization = rationalize(
            accessor,
            &self.ledger,
            self.schedules.as_ref(),
            self.verifier.as_ref(),
        );
        if !rationalization.status.is_error() {
            self.metrics
                .count_verification(verification_mode(rationalization.status.mode));
        }
        if rationalization.payer_sig_active() {
            txn_ctx.payer_sig_is_known_active();
        }
        txn_ctx.set_active_payer_key(rationalization.payer_key.clone());

        let fee = self.compute_fee(accessor, txn_ctx);
        let duplicity = self
            .histories
            .duplicity_of(&accessor.txn_id(), txn_ctx.submitting_member());

        let gate = TransactionGate::new(
            self.address_book.as_ref(),
            self.validator.as_ref(),
            &self.ledger,
        );
        if let Some(status) = gate.due_diligence_failure(accessor, txn_ctx, duplicity) {
            self.charge(Charge::IgnoredDueDiligence, accessor, txn_ctx, &fee);
            txn_ctx.set_status(status);
            return Ok(());
        }
        if duplicity == DuplicateClassification::Duplicate {
            self.charge(Charge::Duplicate, accessor, txn_ctx, &fee);
            txn_ctx.set_status(ResponseCode::DuplicateTransaction);
            return Ok(());
        }

        let charging = self.charge(Charge::Standard, accessor, txn_ctx, &fee);
        if !charging.is_ok() {
            txn_ctx.set_status(charging);
            return Ok(());
        }

        let sig_status = rationalization.status.code;
        if is_terminal_rationalization_error(sig_status) {
            txn_ctx.set_status(sig_status);
            return Ok(());
        }
        if !rationalization.other_parties_active() {
            txn_ctx.set_status(ResponseCode::InvalidSignature);
            return Ok(());
        }

        self.process(accessor, txn_ctx, rationalization.scheduled.as_ref())
    }

    /// Signatures were checked when the schedule became ready, so a
    /// triggered transaction goes from fee straight to charging.
    fn do_triggered_process(
        &mut self,
        accessor: &TxnAccessor,
        txn_ctx: &mut TransactionContext,
    ) -> Result<(), ProcessingError> {
        self.advance_clock(txn_ctx.consensus_time());

        txn_ctx.set_active_payer_key(self.ledger.key_of(&accessor.payer()).cloned());
        let fee = self.compute_fee(accessor, txn_ctx);
        let charging = self.charge(Charge::Standard, accessor, txn_ctx, &fee);
        if !charging.is_ok() {
            txn_ctx.set_status(charging);
            return Ok(());
        }

        self.process(accessor, txn_ctx, None)
    }

    fn process(
        &mut self,
        accessor: &TxnAccessor,
        txn_ctx: &mut TransactionContext,
        scheduled_scope: Option<&ScheduledScope>,
    ) -> Result<(), ProcessingError> {
        let policy_status = self.policies.check(accessor);
        if !policy_status.is_ok() {
            txn_ctx.set_status(policy_status);
            return Ok(());
        }

        let Some(logic) = self.logics.lookup_for(accessor.function(), accessor.body()) else {
            warn!(
                txn = %accessor.signed_txn_for_log(),
                "Transaction w/o applicable transition logic at consensus"
            );
            txn_ctx.set_status(ResponseCode::FailInvalid);
            return Ok(());
        };

        let syntax_status = logic.syntax_check(accessor.body());
        if !syntax_status.is_ok() {
            txn_ctx.set_status(syntax_status);
            return Ok(());
        }

        let mut env = HandleEnv {
            accessor,
            txn_ctx,
            ledger: &mut self.ledger,
            schedules: self.schedules.as_mut(),
            network: &mut self.network,
            scheduled_scope,
        };
        logic.do_state_transition(&mut env)?;
        self.metrics.count_handled(accessor.function().as_str());
        Ok(())
    }

    /// Midnight rates, watermark, expiry purges and ISS cooldown, in that
    /// order.
    fn advance_clock(&mut self, now: Timestamp) {
        let rates = self.rates.as_ref();
        if self.clock.advance_to(now, || rates.active_rates()) {
            info!(consensus_time = %now, "New consensus day; midnight exchange rates updated");
        }

        let forgotten = self.histories.purge_expired_records(&now);
        let expired = self.schedules.purge_expired_entities_at(now.seconds);
        if forgotten > 0 || expired > 0 {
            debug!(
                consensus_time = %now,
                forgotten_txn_ids = forgotten,
                expired_schedules = expired,
                "Purged expired records and entities"
            );
        }

        if self.clock.relax_iss_if_due(&now) {
            info!(consensus_time = %now, "ISS alert relaxed");
        }
    }

    fn compute_fee(&self, accessor: &TxnAccessor, txn_ctx: &TransactionContext) -> FeeObject {
        self.fees
            .compute_fee(accessor, txn_ctx.active_payer_key(), &self.rates.active_rates())
    }

    fn charge(
        &mut self,
        kind: Charge,
        accessor: &TxnAccessor,
        txn_ctx: &mut TransactionContext,
        fee: &FeeObject,
    ) -> ResponseCode {
        let submitting_node = txn_ctx.submitting_node_account();
        let mut ctx = ChargingContext::new(
            &mut self.ledger,
            accessor.payer(),
            submitting_node.unwrap_or_else(|| accessor.node_account()),
            submitting_node,
            self.funding_account,
        )
        .with_offered_fee(accessor.body().transaction_fee);
        let status = match kind {
            Charge::Standard => self.charging.apply(&mut ctx, fee),
            Charge::Duplicate => self.charging.apply_for_duplicate(&mut ctx, fee),
            Charge::IgnoredDueDiligence => {
                self.charging.apply_for_ignored_due_diligence(&mut ctx, fee)
            }
        };
        txn_ctx.add_fee_charged(ctx.total_charged());
        status
    }

    // =========================================================================
    // RECORDS
    // =========================================================================

    fn finish(
        &mut self,
        accessor: &TxnAccessor,
        txn_ctx: &TransactionContext,
        committed: Option<Vec<AccountAmount>>,
    ) -> TransactionRecord {
        let fee = if committed.is_some() {
            txn_ctx.fee_charged()
        } else {
            0
        };
        let record = TransactionRecord {
            receipt: txn_ctx.receipt(),
            transaction_hash: *accessor.hash(),
            consensus_timestamp: txn_ctx.consensus_time(),
            transaction_id: accessor.txn_id(),
            memo: accessor.memo().to_string(),
            transaction_fee: fee,
            transfers: committed.unwrap_or_default(),
            schedule_ref: accessor.scheduled_ref(),
        };
        self.histories.observe(
            record.transaction_id,
            txn_ctx.submitting_member(),
            record.status(),
            record.consensus_timestamp,
        );

        let object = RecordStreamObject::new(
            record.clone(),
            accessor.signed_txn_bytes().to_vec(),
            record.consensus_timestamp,
        );
        match self.records.append(object) {
            Ok(running_hash) => {
                self.metrics.count_record_streamed();
                log_txn_event!(
                    debug,
                    "Record streamed",
                    record.transaction_id,
                    record.consensus_timestamp,
                    status = %record.status(),
                    fee = record.transaction_fee,
                    running_hash = %hex::encode(running_hash)
                );
            }
            Err(e) => {
                self.metrics.count_pipeline_failure();
                log_txn_event!(
                    warn,
                    "Record could not be streamed",
                    record.transaction_id,
                    record.consensus_timestamp,
                    error = %e
                );
            }
        }
        record
    }

    fn warn_of(&self, err: &ProcessingError, context: &str, accessor: &TxnAccessor) {
        warn!(
            error = %err,
            txn = %accessor.signed_txn_for_log(),
            change_set = %self.ledger.current_change_set(),
            "Possibly CATASTROPHIC failure in {context}"
        );
    }
}

fn verification_mode(mode: CompletionMode) -> VerificationMode {
    match mode {
        CompletionMode::Sync => VerificationMode::Sync,
        CompletionMode::Async => VerificationMode::Async,
    }
}

impl ConsensusTxnHandler for TransactionProcessor {
    fn incorporate_consensus_txn(
        &mut self,
        signed_txn_bytes: &[u8],
        consensus_time: Timestamp,
        submitting_member: MemberId,
    ) -> Vec<TransactionRecord> {
        let accessor = match TxnAccessor::from_signed_bytes(signed_txn_bytes) {
            Ok(accessor) => accessor,
            Err(e) => {
                warn!(
                    member = submitting_member,
                    consensus_time = %consensus_time,
                    error = %e,
                    "Consensus platform ordered an unparseable transaction"
                );
                return Vec::new();
            }
        };

        let effective_time = if accessor.can_trigger_txn() {
            consensus_time.minus_nanos(1)
        } else {
            consensus_time
        };
        let gate = TransactionGate::new(
            self.address_book.as_ref(),
            self.validator.as_ref(),
            &self.ledger,
        );
        let node = match gate.sanity_check(
            &accessor,
            effective_time,
            self.clock.last_handled(),
            submitting_member,
        ) {
            Ok(node) => node,
            Err(_) => return Vec::new(),
        };

        let mut records = Vec::new();
        let mut next = Some((accessor, effective_time, false));
        while let Some((accessor, time, triggered)) = next.take() {
            let mut txn_ctx = TransactionContext::new(time, submitting_member, Some(node.account));
            let committed = self.handle(&accessor, &mut txn_ctx, triggered);
            let inner = txn_ctx.take_triggered();
            records.push(self.finish(&accessor, &txn_ctx, committed));
            next = inner.map(|inner| (inner, consensus_time, true));
        }
        records
    }
}

impl StateView for TransactionProcessor {
    fn root_hashes(&self) -> Result<StateRootHashes, ProcessingError> {
        Ok(StateRootHashes {
            accounts: self.ledger.root_hash(),
            schedules: self.schedules.root_hash(),
            running_hash: self.records.latest_running_hash(),
        })
    }
}
