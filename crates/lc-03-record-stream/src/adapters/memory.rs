use crate::domain::{RecordStreamError, StreamedRecord};
use crate::ports::outbound::RecordSink;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Keeps the most recent `capacity` records.
///
/// Clones share the same buffer, so a handle can be kept for reading after
/// the sink is handed to the emitter.
#[derive(Debug, Clone)]
pub struct InMemoryRecordSink {
    capacity: usize,
    buffer: Arc<Mutex<VecDeque<StreamedRecord>>>,
}

impl InMemoryRecordSink {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            buffer: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn records(&self) -> Vec<StreamedRecord> {
        self.buffer.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn last(&self) -> Option<StreamedRecord> {
        self.buffer.lock().back().cloned()
    }
}

impl RecordSink for InMemoryRecordSink {
    fn accept(&mut self, entry: &StreamedRecord) -> Result<(), RecordStreamError> {
        let mut buffer = self.buffer.lock();
        if buffer.len() == self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(entry.clone());
        Ok(())
    }
}
