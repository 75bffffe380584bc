//! # Ledger Core Node
//!
//! Reads consensus-ordered transactions as JSON lines on stdin and runs them
//! through the transaction pipeline until EOF or Ctrl+C.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (`LC_CONFIG` file, then `LC_*` overrides)
//! 2. Initialize logging
//! 3. Build genesis ledger and wire subsystems
//! 4. Start the stdin reader and the delivery handler
//!
//! ## Shutdown Sequence
//!
//! 1. Signal the reader and handler to stop
//! 2. Flush record sinks
//! 3. Log final pipeline state and metrics

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use node_runtime::container::{NodeConfig, NodeContainer};
use node_runtime::handlers::{read_events, DeliveryHandler};

/// The running node.
pub struct NodeRuntime {
    config: NodeConfig,
    container: NodeContainer,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl NodeRuntime {
    pub fn new(config: NodeConfig) -> Result<Self> {
        let container = NodeContainer::build(&config).context("Failed to build node")?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            config,
            container,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Delivers stdin events until EOF or Ctrl+C.
    pub async fn run(self) -> Result<()> {
        info!(
            service = %self.config.telemetry.service_name,
            self_id = self.config.network.self_id,
            "Ledger core node running, reading consensus events from stdin"
        );

        let NodeContainer {
            processor,
            records,
            recent_records,
        } = self.container;
        let (tx, rx) = mpsc::channel(self.config.delivery.channel_capacity);

        let reader = tokio::spawn(read_events(
            BufReader::new(tokio::io::stdin()),
            tx,
            self.shutdown_rx.clone(),
        ));
        let mut delivery =
            tokio::spawn(DeliveryHandler::new(processor, rx).run(self.shutdown_rx.clone()));

        let (processor, stats) = tokio::select! {
            joined = &mut delivery => joined.context("Delivery handler panicked")?,
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl+C")?;
                info!("Shutdown signal received");
                if self.shutdown_tx.send(true).is_err() {
                    debug!("Handlers already stopped");
                }
                delivery.await.context("Delivery handler panicked")?
            }
        };

        if reader.is_finished() {
            match reader.await {
                Ok(Ok(skipped)) if skipped > 0 => warn!(skipped, "Skipped undecodable events"),
                Ok(Ok(_)) => {}
                Ok(Err(e)) => warn!(error = %e, "Event reader failed"),
                Err(e) => warn!(error = %e, "Event reader panicked"),
            }
        } else {
            reader.abort();
        }

        if let Err(e) = records.flush() {
            warn!(error = %e, "Failed to flush record sinks");
        }
        let (appended, running_hash) = records.snapshot();
        info!(
            delivered = stats.delivered,
            dropped = stats.dropped,
            records = appended,
            retained = recent_records.len(),
            running_hash = %hex::encode(running_hash),
            last_handled = ?processor.clock().last_handled(),
            "Shutdown complete"
        );
        match processor.metrics().gather_text() {
            Ok(text) => debug!(metrics = %text, "Final metrics"),
            Err(e) => warn!(error = %e, "Failed to gather metrics"),
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::load().context("Failed to load configuration")?;
    ledger_telemetry::init_logging(&config.telemetry).context("Failed to initialize logging")?;

    NodeRuntime::new(config)?.run().await
}
