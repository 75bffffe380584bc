//! # Adapters
//!
//! - [`InMemoryRecordSink`]: bounded buffer of recent records
//! - [`RollingFileSink`]: JSON-lines files, one per consensus-time window

pub mod file;
pub mod memory;

pub use file::RollingFileSink;
pub use memory::InMemoryRecordSink;
