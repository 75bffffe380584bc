//! # Node Configuration
//!
//! Unified configuration for every subsystem plus the runtime itself.
//!
//! Loaded from an optional TOML file named by `LC_CONFIG`, then overlaid with
//! `LC_*` environment variables. Every section and field has a default, so
//! an empty file is a valid single-member development node.
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `LC_LOG_LEVEL`, `LC_JSON_LOGS`, `LC_SERVICE_NAME`, `LC_LOG_SOURCE` | `telemetry.*` |
//! | `LC_RECORD_STREAM_ENABLED` | `record_stream.enabled` |
//! | `LC_RECORD_LOG_DIR` | `record_stream.log_dir` |
//! | `LC_SCHEDULE_EXPIRY_SECS` | `schedules.scheduled_tx_expiry_secs` |

use std::env;
use std::path::{Path, PathBuf};

use lc_01_schedule_store::ScheduleStoreConfig;
use lc_02_signature_witness::VerificationConfig;
use lc_03_record_stream::RecordStreamConfig;
use lc_04_transaction_processing::{FeeSchedule, ProcessingConfig};
use ledger_telemetry::{parse_flag, TelemetryConfig};
use serde::Deserialize;
use shared_types::{ExchangeRateSet, MemberId};
use thiserror::Error;

use crate::genesis::GenesisConfig;

pub const CONFIG_PATH_VAR: &str = "LC_CONFIG";

/// Complete node configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub telemetry: TelemetryConfig,
    pub processing: ProcessingConfig,
    pub schedules: ScheduleStoreConfig,
    pub verification: VerificationConfig,
    pub record_stream: RecordStreamConfig,
    pub fees: FeeSchedule,
    /// Rates in force at startup; they also seed the midnight rates.
    pub exchange_rates: ExchangeRateSet,
    pub network: NetworkConfig,
    pub genesis: GenesisConfig,
    pub delivery: DeliveryConfig,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl NodeConfig {
    /// Reads `LC_CONFIG` when set, otherwise starts from defaults, then
    /// applies environment overrides and validates.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        let config = config.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        self.telemetry = self.telemetry.with_env_overrides();
        if let Ok(v) = env::var("LC_RECORD_STREAM_ENABLED") {
            self.record_stream.enabled = parse_flag(&v);
        }
        if let Ok(dir) = env::var("LC_RECORD_LOG_DIR") {
            self.record_stream.log_dir = PathBuf::from(dir);
        }
        if let Ok(v) = env::var("LC_SCHEDULE_EXPIRY_SECS") {
            self.schedules.scheduled_tx_expiry_secs =
                v.parse().map_err(|_| ConfigError::InvalidEnv {
                    var: "LC_SCHEDULE_EXPIRY_SECS",
                    value: v.clone(),
                })?;
        }
        Ok(self)
    }

    /// Rejects bounds the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.processing;
        if p.min_txn_duration_secs <= 0 || p.min_txn_duration_secs > p.max_txn_duration_secs {
            return Err(invalid(
                "processing.min_txn_duration_secs",
                format!(
                    "need 0 < min ({}) <= max ({})",
                    p.min_txn_duration_secs, p.max_txn_duration_secs
                ),
            ));
        }
        if p.cache_records_ttl_secs <= 0 {
            return Err(invalid("processing.cache_records_ttl_secs", "must be positive"));
        }
        if self.schedules.scheduled_tx_expiry_secs <= 0 {
            return Err(invalid("schedules.scheduled_tx_expiry_secs", "must be positive"));
        }
        if self.record_stream.queue_capacity == 0 {
            return Err(invalid("record_stream.queue_capacity", "must be positive"));
        }
        if self.record_stream.enabled && self.record_stream.log_period_secs == 0 {
            return Err(invalid("record_stream.log_period_secs", "must be positive"));
        }
        if self.delivery.channel_capacity == 0 {
            return Err(invalid("delivery.channel_capacity", "must be positive"));
        }
        if self.exchange_rates.current.hbar_equiv == 0 || self.exchange_rates.next.hbar_equiv == 0 {
            return Err(invalid("exchange_rates", "hbar_equiv must be positive"));
        }
        if !self.network.members.iter().any(|m| m.stake > 0) {
            return Err(invalid("network.members", "no member has stake"));
        }
        if !self.network.members.iter().any(|m| m.id == self.network.self_id) {
            return Err(invalid(
                "network.self_id",
                format!("member {} is not in the address book", self.network.self_id),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// The consensus address book.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// This node's member id.
    pub self_id: MemberId,
    pub members: Vec<MemberConfig>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            self_id: 0,
            members: vec![MemberConfig {
                id: 0,
                stake: 1,
                account: 3,
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemberConfig {
    pub id: MemberId,
    pub stake: u64,
    /// Account number credited with this member's node fees.
    pub account: u64,
}

/// Consensus event intake.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Events buffered between the reader and the pipeline.
    pub channel_capacity: usize,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}
