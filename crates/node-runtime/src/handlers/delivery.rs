//! # Consensus Delivery
//!
//! Consensus events arrive as JSON lines, one per transaction, already in
//! consensus order:
//!
//! ```text
//! {"signed_txn": "<hex>", "consensus_seconds": 1700000001, "consensus_nanos": 0, "member": 0}
//! ```
//!
//! ## Flow
//!
//! ```text
//! reader ──read_events──→ mpsc ──→ DeliveryHandler::run ──→ TransactionProcessor
//!                                          ↑
//!                                   shutdown (watch)
//! ```
//!
//! A line that fails to decode is logged and skipped; the processor itself
//! drops bytes that do not parse as a transaction.

use lc_04_transaction_processing::{ConsensusTxnHandler, TransactionProcessor};
use serde::Deserialize;
use shared_types::{MemberId, Timestamp};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Malformed event: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Transaction bytes are not hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Consensus nanos out of range: {0}")]
    Nanos(u32),
}

/// One consensus-ordered transaction as delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConsensusEvent {
    pub signed_txn: String,
    pub consensus_seconds: i64,
    #[serde(default)]
    pub consensus_nanos: u32,
    pub member: MemberId,
}

/// A decoded event ready for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub signed_txn_bytes: Vec<u8>,
    pub consensus_time: Timestamp,
    pub member: MemberId,
}

impl ConsensusEvent {
    pub fn parse(line: &str) -> Result<Delivery, EventError> {
        let event: ConsensusEvent = serde_json::from_str(line)?;
        event.decode()
    }

    pub fn decode(&self) -> Result<Delivery, EventError> {
        if self.consensus_nanos >= 1_000_000_000 {
            return Err(EventError::Nanos(self.consensus_nanos));
        }
        Ok(Delivery {
            signed_txn_bytes: hex::decode(&self.signed_txn)?,
            consensus_time: Timestamp::new(self.consensus_seconds, self.consensus_nanos),
            member: self.member,
        })
    }
}

/// Reads JSON lines from `input` until EOF, the receiver closes, or
/// shutdown. Returns the number of lines skipped as malformed.
pub async fn read_events<R>(
    input: R,
    tx: mpsc::Sender<Delivery>,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut skipped = 0;
    loop {
        let line = tokio::select! {
            _ = shutdown.changed() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }
        match ConsensusEvent::parse(&line) {
            Ok(delivery) => {
                if tx.send(delivery).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                skipped += 1;
                warn!(error = %e, "Skipping undecodable consensus event");
            }
        }
    }
    Ok(skipped)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    pub delivered: u64,
    /// Deliveries the pipeline dropped without a record.
    pub dropped: u64,
    pub records: u64,
}

/// Feeds deliveries into the processor one at a time.
pub struct DeliveryHandler {
    processor: TransactionProcessor,
    rx: mpsc::Receiver<Delivery>,
    stats: DeliveryStats,
}

impl DeliveryHandler {
    pub fn new(processor: TransactionProcessor, rx: mpsc::Receiver<Delivery>) -> Self {
        Self {
            processor,
            rx,
            stats: DeliveryStats::default(),
        }
    }

    /// Runs until the channel drains closed or shutdown is signalled, then
    /// hands the processor back.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> (TransactionProcessor, DeliveryStats) {
        info!("Consensus delivery handler started");
        loop {
            let delivery = tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                delivery = self.rx.recv() => delivery,
            };
            let Some(delivery) = delivery else { break };
            self.deliver(delivery);
        }
        info!(
            delivered = self.stats.delivered,
            dropped = self.stats.dropped,
            records = self.stats.records,
            "Consensus delivery handler stopped"
        );
        (self.processor, self.stats)
    }

    fn deliver(&mut self, delivery: Delivery) {
        let records = self.processor.incorporate_consensus_txn(
            &delivery.signed_txn_bytes,
            delivery.consensus_time,
            delivery.member,
        );
        self.stats.delivered += 1;
        if records.is_empty() {
            self.stats.dropped += 1;
        }
        self.stats.records += records.len() as u64;
        for record in &records {
            debug!(
                txn_id = %record.transaction_id,
                status = ?record.status(),
                fee = record.transaction_fee,
                "Record streamed"
            );
        }
    }
}
