//! Prometheus metrics for the ledger core.
//!
//! All metrics follow the naming convention: `lc_<area>_<metric>_<unit>`
//!
//! Each [`LedgerMetrics`] owns its own registry so that several processors
//! (or tests) in one process never collide on registration.

use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

/// How a signature verification completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationMode {
    /// Completed on the handling thread
    Sync,
    /// Completed on the verification pool
    Async,
}

impl VerificationMode {
    fn label(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Async => "async",
        }
    }
}

/// Counters and speedometers for the transaction pipeline.
#[derive(Clone)]
pub struct LedgerMetrics {
    registry: Registry,

    /// Operations that reached the state-transition step, by function
    handled_ops: CounterVec,

    /// Signature verifications by completion mode
    verifications: CounterVec,

    /// Records appended to the record stream
    records_streamed: Counter,

    /// Failures caught at the pipeline boundary
    pipeline_failures: Counter,
}

impl LedgerMetrics {
    /// Create the metrics set and register it with a fresh registry.
    pub fn new() -> Result<Self, TelemetryError> {
        let registry = Registry::new();

        let handled_ops = CounterVec::new(
            Opts::new("lc_ops_handled_total", "Transactions handled by function"),
            &["function"],
        )
        .map_err(metrics_err)?;
        let verifications = CounterVec::new(
            Opts::new(
                "lc_signature_verifications_total",
                "Signature verifications by completion mode",
            ),
            &["mode"],
        )
        .map_err(metrics_err)?;
        let records_streamed = Counter::new(
            "lc_records_streamed_total",
            "Records appended to the record stream",
        )
        .map_err(metrics_err)?;
        let pipeline_failures = Counter::new(
            "lc_pipeline_failures_total",
            "Unexpected failures caught at the pipeline boundary",
        )
        .map_err(metrics_err)?;

        registry
            .register(Box::new(handled_ops.clone()))
            .map_err(metrics_err)?;
        registry
            .register(Box::new(verifications.clone()))
            .map_err(metrics_err)?;
        registry
            .register(Box::new(records_streamed.clone()))
            .map_err(metrics_err)?;
        registry
            .register(Box::new(pipeline_failures.clone()))
            .map_err(metrics_err)?;

        Ok(Self {
            registry,
            handled_ops,
            verifications,
            records_streamed,
            pipeline_failures,
        })
    }

    /// Count one handled operation of the given function.
    pub fn count_handled(&self, function: &str) {
        self.handled_ops.with_label_values(&[function]).inc();
    }

    /// Count one signature verification.
    pub fn count_verification(&self, mode: VerificationMode) {
        self.verifications.with_label_values(&[mode.label()]).inc();
    }

    pub fn count_record_streamed(&self) {
        self.records_streamed.inc();
    }

    pub fn count_pipeline_failure(&self) {
        self.pipeline_failures.inc();
    }

    pub fn handled(&self, function: &str) -> u64 {
        self.handled_ops.with_label_values(&[function]).get() as u64
    }

    pub fn verifications(&self, mode: VerificationMode) -> u64 {
        self.verifications.with_label_values(&[mode.label()]).get() as u64
    }

    pub fn records_streamed(&self) -> u64 {
        self.records_streamed.get() as u64
    }

    pub fn pipeline_failures(&self) -> u64 {
        self.pipeline_failures.get() as u64
    }

    /// Encode all metrics as Prometheus text format.
    pub fn gather_text(&self) -> Result<String, TelemetryError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(metrics_err)?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
    }
}

impl std::fmt::Debug for LedgerMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerMetrics")
            .field("records_streamed", &self.records_streamed())
            .field("pipeline_failures", &self.pipeline_failures())
            .finish()
    }
}

fn metrics_err(e: prometheus::Error) -> TelemetryError {
    TelemetryError::MetricsInit(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_independent_registries() {
        let a = LedgerMetrics::new().unwrap();
        let b = LedgerMetrics::new().unwrap();
        a.count_record_streamed();
        assert_eq!(a.records_streamed(), 1);
        assert_eq!(b.records_streamed(), 0);
    }

    #[test]
    fn test_handled_by_function() {
        let metrics = LedgerMetrics::new().unwrap();
        metrics.count_handled("CryptoTransfer");
        metrics.count_handled("CryptoTransfer");
        metrics.count_handled("ScheduleSign");
        assert_eq!(metrics.handled("CryptoTransfer"), 2);
        assert_eq!(metrics.handled("ScheduleSign"), 1);
        assert_eq!(metrics.handled("Freeze"), 0);
    }

    #[test]
    fn test_verification_modes() {
        let metrics = LedgerMetrics::new().unwrap();
        metrics.count_verification(VerificationMode::Async);
        assert_eq!(metrics.verifications(VerificationMode::Async), 1);
        assert_eq!(metrics.verifications(VerificationMode::Sync), 0);
    }

    #[test]
    fn test_gather_text() {
        let metrics = LedgerMetrics::new().unwrap();
        metrics.count_pipeline_failure();
        let text = metrics.gather_text().unwrap();
        assert!(text.contains("lc_pipeline_failures_total 1"));
    }
}
