//! Verification configuration.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Expanded signatures at or above which a map is verified on the
    /// `rayon` pool (reported as `Async`).
    pub parallel_threshold: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 8,
        }
    }
}
