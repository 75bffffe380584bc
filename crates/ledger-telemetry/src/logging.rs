//! Structured logging setup.
//!
//! Every log line carries consistent fields so that transaction outcomes can
//! be correlated across subsystems:
//! - `txn_id`: `payer@valid_start` of the transaction being handled
//! - `consensus_time`: consensus timestamp assigned by the platform
//! - `status`: response code assigned so far
//! - `schedule_id`: schedule touched by the operation, if any
//! - `member`: submitting member id

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level when set. Fails if
/// a global subscriber was already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(config.with_source_location)
                    .with_line_number(config.with_source_location),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(config.with_source_location)
                    .with_line_number(config.with_source_location),
            )
            .try_init()
    };
    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Logging initialized"
    );
    Ok(())
}

/// Log a transaction-related event with standard fields.
#[macro_export]
macro_rules! log_txn_event {
    ($level:ident, $msg:expr, $txn_id:expr, $consensus_time:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            txn_id = %$txn_id,
            consensus_time = %$consensus_time,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a schedule lifecycle event with standard fields.
#[macro_export]
macro_rules! log_schedule_event {
    ($level:ident, $msg:expr, $schedule_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            schedule_id = %$schedule_id,
            $($($field)*,)?
            $msg
        )
    };
}
