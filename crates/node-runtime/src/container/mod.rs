//! # Node Container
//!
//! Owns the wired transaction processor and the handles the runtime needs
//! around it at shutdown.
//!
//! ## Wiring Order
//!
//! 1. Genesis ledger and running hash seed
//! 2. Schedule store over an in-memory collection
//! 3. Record emitter with the file sink (when enabled) and a bounded
//!    in-memory sink
//! 4. Address book from the network section
//! 5. Transaction processor with configured fees, rates and verification

pub mod config;

pub use config::{ConfigError, DeliveryConfig, MemberConfig, NetworkConfig, NodeConfig};

use std::sync::Arc;

use lc_01_schedule_store::{InMemorySchedules, ScheduleStore, SequentialIdSource};
use lc_02_signature_witness::SignatureRationalizer;
use lc_03_record_stream::{InMemoryRecordSink, RecordEmitter};
use lc_04_transaction_processing::{
    FixedExchangeRates, NodeAddress, StaticAddressBook, TransactionProcessor,
};
use ledger_telemetry::{LedgerMetrics, TelemetryError};
use shared_types::AccountId;
use thiserror::Error;
use tracing::info;

use crate::genesis::{GenesisBuilder, GenesisError};

/// Container construction errors.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Genesis(#[from] GenesisError),

    #[error("Failed to register metrics: {0}")]
    Metrics(#[from] TelemetryError),
}

pub struct NodeContainer {
    pub processor: TransactionProcessor,
    pub records: Arc<RecordEmitter>,
    /// Most recent streamed records, bounded by `record_stream.queue_capacity`.
    pub recent_records: InMemoryRecordSink,
}

impl NodeContainer {
    pub fn build(config: &NodeConfig) -> Result<Self, ContainerError> {
        config.validate()?;

        let funding = AccountId::from_num(config.processing.funding_account);
        let builder = config
            .network
            .members
            .iter()
            .fold(GenesisBuilder::new(&config.genesis).require(funding), |b, m| {
                b.require(AccountId::from_num(m.account))
            });
        let genesis = builder.build()?;

        let first_schedule_num = config
            .genesis
            .accounts
            .iter()
            .map(|a| a.num)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        let schedules = ScheduleStore::new(
            config.schedules.clone(),
            Arc::new(SequentialIdSource::starting_at(first_schedule_num)),
            InMemorySchedules::new(),
        );

        let recent_records = InMemoryRecordSink::with_capacity(config.record_stream.queue_capacity);
        let records = Arc::new(
            RecordEmitter::from_config(&config.record_stream, genesis.running_hash_seed)
                .with_sink(Box::new(recent_records.clone())),
        );

        let address_book = StaticAddressBook::new(config.network.members.iter().map(|m| {
            (
                m.id,
                NodeAddress {
                    stake: m.stake,
                    account: AccountId::from_num(m.account),
                },
            )
        }));

        let processor = TransactionProcessor::new(
            config.processing.clone(),
            genesis.ledger,
            Box::new(schedules),
            Box::new(address_book),
            records.clone(),
            LedgerMetrics::new()?,
        )
        .with_verifier(Box::new(SignatureRationalizer::new(
            config.verification.clone(),
        )))
        .with_fee_calculator(Box::new(config.fees.clone()))
        .with_exchange_rates(Box::new(FixedExchangeRates(config.exchange_rates)));

        info!(
            members = config.network.members.len(),
            self_id = config.network.self_id,
            first_schedule_num,
            record_files = config.record_stream.enabled,
            "Node container built"
        );
        Ok(Self {
            processor,
            records,
            recent_records,
        })
    }
}
