//! # Record Emitter
//!
//! Appends records and advances the running hash under one lock, so a reader
//! of [`RecordEmitter::snapshot`] sees either both or neither.

use crate::adapters::RollingFileSink;
use crate::config::RecordStreamConfig;
use crate::domain::{RecordStreamError, RecordStreamObject, StreamedRecord};
use crate::ports::inbound::RecordStream;
use crate::ports::outbound::RecordSink;
use parking_lot::Mutex;
use shared_crypto::{RunningHashDigest, Sha384Digest};
use tracing::{debug, warn};

struct EmitterState {
    running_hash: RunningHashDigest,
    appended: u64,
    sink_failures: u64,
    sinks: Vec<Box<dyn RecordSink>>,
}

pub struct RecordEmitter {
    state: Mutex<EmitterState>,
}

impl RecordEmitter {
    /// An emitter with no sinks whose chain starts at `seed`.
    pub fn new(seed: Sha384Digest) -> Self {
        Self {
            state: Mutex::new(EmitterState {
                running_hash: RunningHashDigest::from_seed(seed),
                appended: 0,
                sink_failures: 0,
                sinks: Vec::new(),
            }),
        }
    }

    /// Adds the rolling file sink when record files are enabled.
    pub fn from_config(config: &RecordStreamConfig, seed: Sha384Digest) -> Self {
        let emitter = Self::new(seed);
        if config.enabled {
            emitter.add_sink(Box::new(RollingFileSink::new(
                &config.log_dir,
                config.log_period_secs,
            )));
        }
        emitter
    }

    pub fn with_sink(self, sink: Box<dyn RecordSink>) -> Self {
        self.add_sink(sink);
        self
    }

    pub fn add_sink(&self, sink: Box<dyn RecordSink>) {
        self.state.lock().sinks.push(sink);
    }

    /// Number of records appended and the running hash after the last one.
    pub fn snapshot(&self) -> (u64, Sha384Digest) {
        let state = self.state.lock();
        (state.appended, state.running_hash.current())
    }

    pub fn records_appended(&self) -> u64 {
        self.state.lock().appended
    }

    pub fn sink_failures(&self) -> u64 {
        self.state.lock().sink_failures
    }

    pub fn flush(&self) -> Result<(), RecordStreamError> {
        let mut state = self.state.lock();
        for sink in state.sinks.iter_mut() {
            sink.flush()?;
        }
        Ok(())
    }
}

impl RecordStream for RecordEmitter {
    fn append(&self, object: RecordStreamObject) -> Result<Sha384Digest, RecordStreamError> {
        let content = object.content_bytes()?;

        let mut state = self.state.lock();
        let running_hash = state.running_hash.absorb(&content);
        state.appended += 1;

        let entry = StreamedRecord {
            object,
            running_hash,
        };
        let mut failures = 0;
        for sink in state.sinks.iter_mut() {
            if let Err(e) = sink.accept(&entry) {
                failures += 1;
                warn!(
                    error = %e,
                    txn_id = %entry.object.record.transaction_id,
                    "Record sink rejected record"
                );
            }
        }
        state.sink_failures += failures;

        debug!(
            txn_id = %entry.object.record.transaction_id,
            consensus_time = %entry.object.consensus_time,
            status = %entry.object.record.status(),
            running_hash = %hex::encode(&running_hash[..8]),
            "Record streamed"
        );
        Ok(running_hash)
    }

    fn latest_running_hash(&self) -> Sha384Digest {
        self.state.lock().running_hash.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRecordSink;
    use crate::domain::recompute_chain;
    use shared_types::{
        AccountId, ResponseCode, Timestamp, TransactionId, TransactionReceipt, TransactionRecord,
    };

    fn object(n: i64) -> RecordStreamObject {
        let consensus = Timestamp::new(1_000 + n, 0);
        let txn_id = TransactionId::new(AccountId::from_num(2), Timestamp::new(990, 0));
        RecordStreamObject::new(
            TransactionRecord {
                receipt: TransactionReceipt::with_status(ResponseCode::Ok),
                transaction_hash: [n as u8; 48],
                consensus_timestamp: consensus,
                transaction_id: txn_id,
                memo: String::new(),
                transaction_fee: 10,
                transfers: Vec::new(),
                schedule_ref: None,
            },
            vec![n as u8; 4],
            consensus,
        )
    }

    #[test]
    fn test_append_advances_hash_and_feeds_sinks() {
        let sink = InMemoryRecordSink::with_capacity(8);
        let emitter = RecordEmitter::new([0; 48]).with_sink(Box::new(sink.clone()));

        let first = emitter.append(object(1)).unwrap();
        let second = emitter.append(object(2)).unwrap();

        assert_ne!(first, second);
        assert_eq!(emitter.latest_running_hash(), second);
        assert_eq!(emitter.snapshot(), (2, second));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.last().unwrap().running_hash, second);
    }

    #[test]
    fn test_chain_matches_recompute() {
        let emitter = RecordEmitter::new([9; 48]);
        let objects: Vec<_> = (0..5).map(object).collect();
        for o in &objects {
            emitter.append(o.clone()).unwrap();
        }
        assert_eq!(
            emitter.latest_running_hash(),
            recompute_chain([9; 48], &objects).unwrap()
        );
    }

    #[test]
    fn test_memory_sink_is_bounded() {
        let sink = InMemoryRecordSink::with_capacity(2);
        let emitter = RecordEmitter::new([0; 48]).with_sink(Box::new(sink.clone()));
        for n in 0..4 {
            emitter.append(object(n)).unwrap();
        }
        let kept: Vec<_> = sink
            .records()
            .into_iter()
            .map(|r| r.object.consensus_time.seconds)
            .collect();
        assert_eq!(kept, vec![1_002, 1_003]);
    }

    struct FailingSink;

    impl RecordSink for FailingSink {
        fn accept(&mut self, _entry: &StreamedRecord) -> Result<(), RecordStreamError> {
            Err(RecordStreamError::Encode("disk full".into()))
        }
    }

    #[test]
    fn test_sink_failure_does_not_break_chain() {
        let emitter = RecordEmitter::new([0; 48]).with_sink(Box::new(FailingSink));
        let hash = emitter.append(object(1)).unwrap();
        assert_eq!(emitter.latest_running_hash(), hash);
        assert_eq!(emitter.sink_failures(), 1);
    }
}
