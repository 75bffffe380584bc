//! Pipeline configuration.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Seconds after an ISS alert before an ongoing ISS relaxes.
    pub iss_reset_period_secs: i64,
    /// Rounds whose state hashes are dumped after an ISS alert.
    pub iss_rounds_to_dump: u32,
    pub min_txn_duration_secs: i64,
    pub max_txn_duration_secs: i64,
    /// How long a handled transaction id counts for duplicate detection.
    pub cache_records_ttl_secs: i64,
    /// Account receiving network and service fees.
    pub funding_account: u64,
    pub max_memo_utf8_bytes: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            iss_reset_period_secs: 60,
            iss_rounds_to_dump: 5,
            min_txn_duration_secs: 15,
            max_txn_duration_secs: 180,
            cache_records_ttl_secs: 180,
            funding_account: 98,
            max_memo_utf8_bytes: 100,
        }
    }
}
