//! Record stream configuration.

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecordStreamConfig {
    /// Write rolling record files under `log_dir`.
    pub enabled: bool,
    pub log_dir: PathBuf,
    /// Width of the consensus-time window covered by one record file.
    pub log_period_secs: u64,
    /// Recent records retained in memory for queries.
    pub queue_capacity: usize,
}

impl Default for RecordStreamConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: PathBuf::from("data/recordStreams"),
            log_period_secs: 2,
            queue_capacity: 5000,
        }
    }
}
