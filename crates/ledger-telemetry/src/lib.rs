//! # Ledger Telemetry
//!
//! Observability for the ledger core.
//!
//! ## Components
//!
//! - **Logging**: `tracing` subscriber with env filter, plain or JSON output
//! - **Metrics**: per-instance Prometheus registry ([`LedgerMetrics`])
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_logging, LedgerMetrics, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! let metrics = LedgerMetrics::new()?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LC_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `LC_JSON_LOGS` | `false` | JSON formatted output |
//! | `LC_SERVICE_NAME` | `ledger-core` | Service name |

mod config;
mod logging;
mod metrics;

pub use config::{parse_flag, TelemetryConfig};
pub use logging::init_logging;
pub use metrics::{LedgerMetrics, VerificationMode};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}
