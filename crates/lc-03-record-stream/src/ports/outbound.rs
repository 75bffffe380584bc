//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::{RecordStreamError, StreamedRecord};

/// Destination for appended records.
///
/// Called with the emitter's lock held, in append order.
pub trait RecordSink: Send {
    fn accept(&mut self, entry: &StreamedRecord) -> Result<(), RecordStreamError>;

    fn flush(&mut self) -> Result<(), RecordStreamError> {
        Ok(())
    }
}
