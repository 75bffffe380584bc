//! Schedule store configuration.

use serde::Deserialize;

/// Default lifetime of a schedule (30 minutes).
pub const DEFAULT_SCHEDULED_TX_EXPIRY_SECS: i64 = 1800;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScheduleStoreConfig {
    /// Seconds after creation at which an unexecuted schedule expires.
    pub scheduled_tx_expiry_secs: i64,
}

impl Default for ScheduleStoreConfig {
    fn default() -> Self {
        Self {
            scheduled_tx_expiry_secs: DEFAULT_SCHEDULED_TX_EXPIRY_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: ScheduleStoreConfig = toml::from_str("").unwrap();
        assert_eq!(config, ScheduleStoreConfig::default());

        let config: ScheduleStoreConfig = toml::from_str("scheduled_tx_expiry_secs = 60").unwrap();
        assert_eq!(config.scheduled_tx_expiry_secs, 60);
    }
}
