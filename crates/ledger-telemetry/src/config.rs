//! Telemetry configuration from environment variables.

use serde::Deserialize;
use std::env;

/// Configuration for logging output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to startup logs
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive such as `lc_04_transaction_processing=debug`
    pub log_level: String,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Whether to include source file and line in log lines
    pub with_source_location: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "ledger-core".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_source_location: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LC_SERVICE_NAME`: Service name (default: ledger-core)
    /// - `LC_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `LC_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `LC_LOG_SOURCE`: Include file/line in logs (default: false)
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Overlays any `LC_*` variables present in the environment on top of
    /// `self`, leaving unset fields untouched.
    pub fn with_env_overrides(mut self) -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        if let Ok(name) = env::var("LC_SERVICE_NAME") {
            self.service_name = name;
        }
        if let Ok(level) = env::var("LC_LOG_LEVEL").or_else(|_| env::var("RUST_LOG")) {
            self.log_level = level;
        }
        self.json_logs = env::var("LC_JSON_LOGS")
            .map(|v| parse_flag(&v))
            .unwrap_or(self.json_logs || is_container);
        if let Ok(v) = env::var("LC_LOG_SOURCE") {
            self.with_source_location = parse_flag(&v);
        }
        self
    }
}

/// `"true"`/`"1"` (any case) enable a flag, anything else disables it.
pub fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "ledger-core");
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("yes"));
    }

    #[test]
    fn test_deserialize_partial_table() {
        let config: TelemetryConfig = toml::from_str("json_logs = true").unwrap();
        assert!(config.json_logs);
        assert_eq!(config.log_level, "info");
    }
}
